//! Joint angles measured from a detected keypoint frame.

use serde::{Deserialize, Serialize};

use athlete_core::{angle_at, midpoint, trunk_lean, Keypoint, KeypointFrame};

/// Keypoints below this confidence are treated as missing
pub const DEFAULT_MIN_CONFIDENCE: f32 = 0.25;

/// Whole-degree angles used by the technique tables.
///
/// Joint angles are interior angles in `[0, 180]`; an unmeasurable joint reads
/// 180. `trunk_lean` is signed, positive when the shoulders sit right of the
/// hips, and reads 0 when unmeasurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JointAngleSet {
    pub r_elbow: i32,
    pub l_elbow: i32,
    pub r_knee: i32,
    pub l_knee: i32,
    pub r_shoulder: i32,
    pub trunk_lean: i32,
}

impl JointAngleSet {
    /// Measure a frame.
    ///
    /// Returns `None` for frames without the full 17-point layout and for
    /// frames where no keypoint reaches `min_confidence`.
    pub fn from_frame(frame: &KeypointFrame, min_confidence: f32) -> Option<Self> {
        if !frame.is_complete() || frame.usable_count(min_confidence) == 0 {
            return None;
        }

        let kp = |k: Keypoint| frame.usable(k, min_confidence);
        let hip_mid = midpoint(kp(Keypoint::LeftHip), kp(Keypoint::RightHip));
        let shoulder_mid = midpoint(kp(Keypoint::LeftShoulder), kp(Keypoint::RightShoulder));

        Some(Self {
            r_elbow: angle_at(kp(Keypoint::RightShoulder), kp(Keypoint::RightElbow), kp(Keypoint::RightWrist)),
            l_elbow: angle_at(kp(Keypoint::LeftShoulder), kp(Keypoint::LeftElbow), kp(Keypoint::LeftWrist)),
            r_knee: angle_at(kp(Keypoint::RightHip), kp(Keypoint::RightKnee), kp(Keypoint::RightAnkle)),
            l_knee: angle_at(kp(Keypoint::LeftHip), kp(Keypoint::LeftKnee), kp(Keypoint::LeftAnkle)),
            r_shoulder: angle_at(kp(Keypoint::RightElbow), kp(Keypoint::RightShoulder), kp(Keypoint::RightHip)),
            trunk_lean: trunk_lean(hip_mid, shoulder_mid),
        })
    }

    /// The more flexed of the two knees
    pub fn min_knee(&self) -> i32 {
        self.r_knee.min(self.l_knee)
    }
}
