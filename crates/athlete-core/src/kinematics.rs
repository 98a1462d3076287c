//! Forward kinematics for the 2D reference stickman.
//!
//! ## Angle conventions
//!
//! All angles are radians in screen space: 0 points right (+x), π/2 points
//! down (+y), -π/2 points up.
//!
//! - The axial chain (pelvis → chest → neck → head) is **trunk-relative**:
//!   each point steps along `(sin θt, -cos θt)`, so `θt = 0` is upright.
//! - Limbs are **absolute**: the upper segment points along `θs`, the lower
//!   segment along `θs + θe`. Limb angles ignore the trunk.
//!
//! The two conventions differ on purpose; authored keyframes depend on it.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{JointMap, JointName, Point2D};

/// Bone connectivity of the stickman, a tree rooted at the pelvis
pub const BONES: [(JointName, JointName); 15] = [
    (JointName::Head, JointName::Neck),
    (JointName::Neck, JointName::Chest),
    (JointName::Chest, JointName::Pelvis),
    (JointName::Chest, JointName::RShoulder),
    (JointName::Chest, JointName::LShoulder),
    (JointName::RShoulder, JointName::RElbow),
    (JointName::RElbow, JointName::RWrist),
    (JointName::LShoulder, JointName::LElbow),
    (JointName::LElbow, JointName::LWrist),
    (JointName::Pelvis, JointName::RHip),
    (JointName::Pelvis, JointName::LHip),
    (JointName::RHip, JointName::RKnee),
    (JointName::RKnee, JointName::RAnkle),
    (JointName::LHip, JointName::LKnee),
    (JointName::LKnee, JointName::LAnkle),
];

/// Segment lengths of a skeleton profile, in drawing-surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentLengths {
    /// Pelvis to chest
    pub torso: f64,
    /// Chest to neck
    pub neck: f64,
    /// Neck to head centre
    pub head: f64,
    /// Half shoulder width
    pub shoulder: f64,
    /// Half hip width
    pub hip: f64,
    pub upper_arm: f64,
    pub forearm: f64,
    pub thigh: f64,
    pub shin: f64,
}

impl SegmentLengths {
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("torso", self.torso),
            ("neck", self.neck),
            ("head", self.head),
            ("shoulder", self.shoulder),
            ("hip", self.hip),
            ("upper_arm", self.upper_arm),
            ("forearm", self.forearm),
            ("thigh", self.thigh),
            ("shin", self.shin),
        ]
        .into_iter()
    }

    /// Every segment must be finite and strictly positive
    pub fn validate(&self) -> Result<()> {
        match self.iter().find(|(_, len)| !(len.is_finite() && *len > 0.0)) {
            Some((segment, length)) => Err(Error::InvalidSkeleton { segment, length }),
            None => Ok(()),
        }
    }
}

/// Which side of the trunk perpendicular carries the right-hand joints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lateral {
    /// Right joints at `+(cos θt, sin θt)`
    #[default]
    Standard,
    /// Right joints at `-(cos θt, sin θt)`
    Mirrored,
}

impl Lateral {
    fn sign(&self) -> f64 {
        match self {
            Lateral::Standard => 1.0,
            Lateral::Mirrored => -1.0,
        }
    }
}

/// The eight limb angles driving a pose, radians
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointAngles {
    #[serde(rename = "rS")]
    pub r_shoulder: f64,
    #[serde(rename = "rE")]
    pub r_elbow: f64,
    #[serde(rename = "lS")]
    pub l_shoulder: f64,
    #[serde(rename = "lE")]
    pub l_elbow: f64,
    #[serde(rename = "rH")]
    pub r_hip: f64,
    #[serde(rename = "rK")]
    pub r_knee: f64,
    #[serde(rename = "lH")]
    pub l_hip: f64,
    #[serde(rename = "lK")]
    pub l_knee: f64,
}

impl JointAngles {
    /// Angles in `[rS, rE, lS, lE, rH, rK, lH, lK]` order
    pub const fn from_array(a: [f64; 8]) -> Self {
        Self {
            r_shoulder: a[0],
            r_elbow: a[1],
            l_shoulder: a[2],
            l_elbow: a[3],
            r_hip: a[4],
            r_knee: a[5],
            l_hip: a[6],
            l_knee: a[7],
        }
    }

    pub fn to_array(&self) -> [f64; 8] {
        [
            self.r_shoulder,
            self.r_elbow,
            self.l_shoulder,
            self.l_elbow,
            self.r_hip,
            self.r_knee,
            self.l_hip,
            self.l_knee,
        ]
    }
}

/// Root pose plus limb angles; the source of truth for a stickman frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoseParameters {
    pub pelvis: Point2D,
    pub trunk_angle: f64,
    #[serde(flatten)]
    pub angles: JointAngles,
}

impl PoseParameters {
    pub const CHANNELS: usize = 11;

    pub const fn new(pelvis: Point2D, trunk_angle: f64, angles: JointAngles) -> Self {
        Self {
            pelvis,
            trunk_angle,
            angles,
        }
    }

    /// Scalar channels: pelvis x, pelvis y, trunk, then the limb angles
    pub fn channels(&self) -> [f64; Self::CHANNELS] {
        let a = self.angles.to_array();
        [
            self.pelvis.x,
            self.pelvis.y,
            self.trunk_angle,
            a[0],
            a[1],
            a[2],
            a[3],
            a[4],
            a[5],
            a[6],
            a[7],
        ]
    }

    pub fn from_channels(c: [f64; Self::CHANNELS]) -> Self {
        Self::new(
            Point2D::new(c[0], c[1]),
            c[2],
            JointAngles::from_array([c[3], c[4], c[5], c[6], c[7], c[8], c[9], c[10]]),
        )
    }

    /// Channel-wise linear blend; angles are blended in raw radians
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        let a = self.channels();
        let b = other.channels();
        let mut out = [0.0; Self::CHANNELS];
        for (i, value) in out.iter_mut().enumerate() {
            *value = a[i] + (b[i] - a[i]) * t;
        }
        Self::from_channels(out)
    }

    pub fn is_finite(&self) -> bool {
        self.channels().iter().all(|c| c.is_finite())
    }
}

/// Segment lengths and drawing conventions of one stickman
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SkeletonProfile {
    pub segments: SegmentLengths,
    /// Radius of the head circle drawn by renderers
    pub head_radius: f64,
    #[serde(default)]
    pub lateral: Lateral,
}

impl SkeletonProfile {
    pub fn new(segments: SegmentLengths, head_radius: f64, lateral: Lateral) -> Result<Self> {
        segments.validate()?;
        if !(head_radius.is_finite() && head_radius > 0.0) {
            return Err(Error::InvalidSkeleton {
                segment: "head_radius",
                length: head_radius,
            });
        }
        Ok(Self {
            segments,
            head_radius,
            lateral,
        })
    }

    /// Full-size reference athlete (280×420 canvas, ground at y = 400)
    pub const fn athlete() -> Self {
        Self {
            segments: SegmentLengths {
                torso: 82.0,
                neck: 16.0,
                head: 22.0 * 0.9,
                shoulder: 14.0,
                hip: 10.0,
                upper_arm: 60.0,
                forearm: 52.0,
                thigh: 80.0,
                shin: 74.0,
            },
            head_radius: 22.0,
            lateral: Lateral::Standard,
        }
    }

    /// Thumbnail stickman (160×240 canvas, ground at y = 228)
    pub const fn compact() -> Self {
        Self {
            segments: SegmentLengths {
                torso: 40.0,
                neck: 12.0,
                head: 6.0,
                shoulder: 14.0,
                hip: 8.0,
                upper_arm: 22.0,
                forearm: 18.0,
                thigh: 38.0,
                shin: 36.0,
            },
            head_radius: 10.0,
            lateral: Lateral::Mirrored,
        }
    }

    /// Compute world joint positions from a root pose and limb angles
    pub fn fk(&self, pelvis: Point2D, trunk_angle: f64, angles: &JointAngles) -> JointMap {
        let seg = &self.segments;

        // Axial chain, trunk-relative
        let (ax, ay) = (trunk_angle.sin(), -trunk_angle.cos());
        let chest = pelvis.offset(ax, ay, seg.torso);
        let neck = chest.offset(ax, ay, seg.neck);
        let head = neck.offset(ax, ay, seg.head);

        // Perpendicular to the trunk
        let side = self.lateral.sign();
        let (px, py) = (side * trunk_angle.cos(), side * trunk_angle.sin());
        let r_shoulder = chest.offset(px, py, seg.shoulder);
        let l_shoulder = chest.offset(px, py, -seg.shoulder);
        let r_hip = pelvis.offset(px, py, seg.hip);
        let l_hip = pelvis.offset(px, py, -seg.hip);

        // Limbs, absolute
        let (r_elbow, r_wrist) = limb(r_shoulder, angles.r_shoulder, angles.r_elbow, seg.upper_arm, seg.forearm);
        let (l_elbow, l_wrist) = limb(l_shoulder, angles.l_shoulder, angles.l_elbow, seg.upper_arm, seg.forearm);
        let (r_knee, r_ankle) = limb(r_hip, angles.r_hip, angles.r_knee, seg.thigh, seg.shin);
        let (l_knee, l_ankle) = limb(l_hip, angles.l_hip, angles.l_knee, seg.thigh, seg.shin);

        JointMap::from_fn(|joint| match joint {
            JointName::Head => head,
            JointName::Neck => neck,
            JointName::Chest => chest,
            JointName::Pelvis => pelvis,
            JointName::RShoulder => r_shoulder,
            JointName::LShoulder => l_shoulder,
            JointName::RElbow => r_elbow,
            JointName::LElbow => l_elbow,
            JointName::RWrist => r_wrist,
            JointName::LWrist => l_wrist,
            JointName::RHip => r_hip,
            JointName::LHip => l_hip,
            JointName::RKnee => r_knee,
            JointName::LKnee => l_knee,
            JointName::RAnkle => r_ankle,
            JointName::LAnkle => l_ankle,
        })
    }

    pub fn fk_pose(&self, pose: &PoseParameters) -> JointMap {
        self.fk(pose.pelvis, pose.trunk_angle, &pose.angles)
    }
}

#[derive(Deserialize)]
struct RawProfile {
    segments: SegmentLengths,
    head_radius: f64,
    #[serde(default)]
    lateral: Lateral,
}

impl<'de> Deserialize<'de> for SkeletonProfile {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawProfile::deserialize(deserializer)?;
        SkeletonProfile::new(raw.segments, raw.head_radius, raw.lateral).map_err(serde::de::Error::custom)
    }
}

impl Default for SkeletonProfile {
    fn default() -> Self {
        Self::athlete()
    }
}

/// Two-segment limb: root → middle along `upper`, middle → end along `upper + lower`
fn limb(root: Point2D, upper: f64, lower: f64, upper_len: f64, lower_len: f64) -> (Point2D, Point2D) {
    let middle = root.offset(upper.cos(), upper.sin(), upper_len);
    let end = middle.offset((upper + lower).cos(), (upper + lower).sin(), lower_len);
    (middle, end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPS: f64 = 1e-9;

    fn assert_close(a: Point2D, b: Point2D) {
        assert!(
            (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS,
            "{:?} != {:?}",
            a,
            b
        );
    }

    #[test]
    fn test_upright_axial_chain() {
        let profile = SkeletonProfile::athlete();
        let joints = profile.fk(Point2D::new(140.0, 228.0), 0.0, &JointAngles::default());

        assert_close(joints[JointName::Chest], Point2D::new(140.0, 146.0));
        assert_close(joints[JointName::Neck], Point2D::new(140.0, 130.0));
        assert_close(joints[JointName::Head], Point2D::new(140.0, 110.2));
        assert_close(joints[JointName::RShoulder], Point2D::new(154.0, 146.0));
        assert_close(joints[JointName::LShoulder], Point2D::new(126.0, 146.0));
        assert_close(joints[JointName::RHip], Point2D::new(150.0, 228.0));
    }

    #[test]
    fn test_limbs_ignore_trunk_angle() {
        let profile = SkeletonProfile::athlete();
        let angles = JointAngles {
            r_hip: FRAC_PI_2,
            r_knee: 0.0,
            ..Default::default()
        };
        let pelvis = Point2D::new(0.0, 0.0);

        for trunk in [0.0, 0.4, -0.7] {
            let joints = profile.fk(pelvis, trunk, &angles);
            let hip = joints[JointName::RHip];
            // Thigh and shin point straight down regardless of trunk lean
            assert_close(joints[JointName::RKnee], Point2D::new(hip.x, hip.y + 80.0));
            assert_close(joints[JointName::RAnkle], Point2D::new(hip.x, hip.y + 154.0));
        }
    }

    #[test]
    fn test_elbow_composes_with_shoulder() {
        let profile = SkeletonProfile::athlete();
        let angles = JointAngles {
            r_shoulder: 0.0,
            r_elbow: FRAC_PI_2,
            ..Default::default()
        };
        let joints = profile.fk(Point2D::new(0.0, 0.0), 0.0, &angles);
        let shoulder = joints[JointName::RShoulder];
        assert_close(joints[JointName::RElbow], Point2D::new(shoulder.x + 60.0, shoulder.y));
        assert_close(joints[JointName::RWrist], Point2D::new(shoulder.x + 60.0, shoulder.y + 52.0));
    }

    #[test]
    fn test_compact_profile_is_mirrored() {
        let joints = SkeletonProfile::compact().fk(Point2D::new(80.0, 148.0), 0.0, &JointAngles::default());
        assert_close(joints[JointName::RShoulder], Point2D::new(66.0, 108.0));
        assert_close(joints[JointName::LHip], Point2D::new(88.0, 148.0));
        assert_close(joints[JointName::Head], Point2D::new(80.0, 90.0));
    }

    #[test]
    fn test_fk_finite_for_extreme_angles() {
        let profile = SkeletonProfile::athlete();
        for &v in &[0.0, PI, -PI, 1e6, -1e6, 12.34] {
            let angles = JointAngles::from_array([v; 8]);
            let joints = profile.fk(Point2D::new(v, -v), v, &angles);
            assert!(joints.is_finite());
            assert_eq!(joints.iter().count(), JointName::COUNT);
        }
    }

    #[test]
    fn test_bones_form_tree_rooted_at_pelvis() {
        let mut adjacency: HashMap<JointName, Vec<JointName>> = HashMap::new();
        for (a, b) in BONES {
            adjacency.entry(a).or_default().push(b);
            adjacency.entry(b).or_default().push(a);
        }

        let mut seen = HashSet::new();
        let mut stack = vec![JointName::Pelvis];
        while let Some(joint) = stack.pop() {
            if seen.insert(joint) {
                stack.extend(adjacency[&joint].iter().copied());
            }
        }

        assert_eq!(seen.len(), JointName::COUNT);
        assert_eq!(BONES.len(), JointName::COUNT - 1);
    }

    #[test]
    fn test_segment_validation() {
        let mut segments = SkeletonProfile::athlete().segments;
        assert!(segments.validate().is_ok());

        segments.shin = 0.0;
        assert_eq!(
            segments.validate(),
            Err(Error::InvalidSkeleton {
                segment: "shin",
                length: 0.0
            })
        );
        assert!(SkeletonProfile::new(segments, 22.0, Lateral::Standard).is_err());
        assert!(SkeletonProfile::new(SkeletonProfile::athlete().segments, 0.0, Lateral::Standard).is_err());
    }

    #[test]
    fn test_deserialize_validates_profile() {
        let json = serde_json::to_string(&SkeletonProfile::compact()).unwrap();
        let parsed: SkeletonProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, SkeletonProfile::compact());

        let negative_shin = json.replace("\"shin\":36.0", "\"shin\":-74.0");
        assert_ne!(negative_shin, json);
        let err = serde_json::from_str::<SkeletonProfile>(&negative_shin).unwrap_err();
        assert!(err.to_string().contains("shin"));

        let flat_head = json.replace("\"head_radius\":10.0", "\"head_radius\":0.0");
        assert_ne!(flat_head, json);
        assert!(serde_json::from_str::<SkeletonProfile>(&flat_head).is_err());
    }

    #[test]
    fn test_pose_lerp_midpoint() {
        let a = PoseParameters::new(Point2D::new(0.0, 0.0), 0.0, JointAngles::from_array([0.0; 8]));
        let b = PoseParameters::new(Point2D::new(10.0, 20.0), 1.0, JointAngles::from_array([2.0; 8]));
        let mid = a.lerp(&b, 0.5);
        assert_eq!(mid.pelvis, Point2D::new(5.0, 10.0));
        assert_eq!(mid.trunk_angle, 0.5);
        assert_eq!(mid.angles, JointAngles::from_array([1.0; 8]));
    }
}
