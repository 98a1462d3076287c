//! Frame-level technique analyzer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use athlete_core::{KeypointFrame, Sport};

use crate::angles::{JointAngleSet, DEFAULT_MIN_CONFIDENCE};
use crate::profile::StyleProfile;
use crate::rules::SportTechnique;

/// Measures and classifies detected keypoint frames for one sport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointAngleAnalyzer {
    pub sport: Sport,
    /// Keypoints below this confidence are treated as missing
    pub min_confidence: f32,
}

impl JointAngleAnalyzer {
    pub fn new(sport: Sport) -> Self {
        Self {
            sport,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: f32) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn measure(&self, frame: &KeypointFrame) -> Option<JointAngleSet> {
        JointAngleSet::from_frame(frame, self.min_confidence)
    }

    /// Classify a frame; `None` when the frame carries no usable anatomy
    pub fn analyze(&self, frame: &KeypointFrame) -> Option<StyleProfile> {
        let Some(angles) = self.measure(frame) else {
            debug!(
                sport = %self.sport,
                keypoints = frame.keypoints.len(),
                "frame has no usable keypoints, skipping analysis"
            );
            return None;
        };

        let profile = self.sport.classify(&angles);
        debug!(
            sport = %self.sport,
            style = %profile.style,
            score = profile.score,
            "classified technique"
        );
        Some(profile)
    }
}

impl Default for JointAngleAnalyzer {
    fn default() -> Self {
        Self::new(Sport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angles::fixtures::{frame, moved, standing};
    use crate::profile::{MAX_TECHNIQUE_SCORE, MIN_TECHNIQUE_SCORE};
    use athlete_core::{DetectedKeypoint, FrameSize, Keypoint};

    #[test]
    fn test_standing_cricket_frame() {
        let analyzer = JointAngleAnalyzer::new(Sport::Cricket);
        let profile = analyzer.analyze(&frame(&standing())).unwrap();

        // Arm down the side: shoulder angle 0
        assert_eq!(profile.angles.r_shoulder, 0);
        assert_eq!(profile.style, "Round-arm Action");
        assert!((MIN_TECHNIQUE_SCORE..=MAX_TECHNIQUE_SCORE).contains(&profile.score));
    }

    #[test]
    fn test_raised_arm_bowler() {
        // Arm straight overhead: elbow and wrist directly above the shoulder
        let points = moved(standing(), Keypoint::RightElbow, 300.0, 80.0);
        let points = moved(points, Keypoint::RightWrist, 300.0, 20.0);
        let profile = JointAngleAnalyzer::new(Sport::Cricket)
            .analyze(&frame(&points))
            .unwrap();

        assert_eq!(profile.angles.r_shoulder, 180);
        assert_eq!(profile.angles.r_elbow, 180);
        assert_eq!(profile.style, "High-arm Bowling Action");
    }

    #[test]
    fn test_all_zero_confidence_yields_nothing() {
        let f = KeypointFrame::new(
            vec![DetectedKeypoint::new(100.0, 100.0, 0.0); Keypoint::COUNT],
            FrameSize::default(),
        );
        for sport in Sport::ALL {
            assert!(JointAngleAnalyzer::new(sport).analyze(&f).is_none());
        }
    }

    #[test]
    fn test_short_frame_yields_nothing() {
        let f = KeypointFrame::new(vec![DetectedKeypoint::new(1.0, 1.0, 0.9); 5], FrameSize::default());
        assert!(JointAngleAnalyzer::default().analyze(&f).is_none());
    }

    #[test]
    fn test_custom_confidence() {
        let mut f = frame(&standing());
        for kp in f.keypoints.iter_mut() {
            kp.confidence = kp.confidence.min(0.4);
        }
        let strict = JointAngleAnalyzer::new(Sport::Badminton).with_min_confidence(0.5);
        assert!(strict.analyze(&f).is_none());
        assert!(JointAngleAnalyzer::new(Sport::Badminton).analyze(&f).is_some());
    }
}
