//! Pose detector abstraction.

use async_trait::async_trait;

use athlete_core::{KeypointFrame, Result};

/// Trait for pose-estimation backends
///
/// A backend turns one input frame (a decoded video frame, a camera capture,
/// a prerecorded keypoint set) into a 17-point [`KeypointFrame`].
#[async_trait]
pub trait PoseDetector: Send + Sync + 'static {
    /// Input the detector consumes
    type Frame: Send + Sync + 'static;

    /// Estimate the pose in `frame`; `Ok(None)` when nobody is in view
    async fn estimate(&self, frame: &Self::Frame) -> Result<Option<KeypointFrame>>;
}

/// Detector for input that already carries keypoints, such as recorded
/// sessions or an external estimator feeding the analyzer directly
#[derive(Debug, Clone, Copy, Default)]
pub struct PrecomputedDetector;

#[async_trait]
impl PoseDetector for PrecomputedDetector {
    type Frame = KeypointFrame;

    async fn estimate(&self, frame: &KeypointFrame) -> Result<Option<KeypointFrame>> {
        if frame.keypoints.is_empty() {
            return Ok(None);
        }
        Ok(Some(frame.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use athlete_core::{DetectedKeypoint, FrameSize, Keypoint};

    #[tokio::test]
    async fn test_precomputed_passthrough() {
        let frame = KeypointFrame::new(
            vec![DetectedKeypoint::new(10.0, 20.0, 0.8); Keypoint::COUNT],
            FrameSize::new(320.0, 240.0),
        );
        let out = PrecomputedDetector.estimate(&frame).await.unwrap();
        assert_eq!(out, Some(frame));

        let empty = KeypointFrame::default();
        assert!(PrecomputedDetector.estimate(&empty).await.unwrap().is_none());
    }
}
