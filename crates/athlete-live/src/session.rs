//! Live detection and analysis loop.
//!
//! A [`LiveSession`] is ticked once per rendered frame. Every
//! `detection_interval` ticks, and only when no detection is already running,
//! it hands the current input frame to the detector on a background task and
//! returns immediately. The render path always reads the latest *completed*
//! keypoint frame, so a slow detector lowers the overlay's update rate but
//! never stalls rendering. Every `analysis_interval` ticks the analyzer
//! re-classifies the latest frame.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use athlete_core::{Error, FrameSize, KeypointFrame, Point2D, Result, Sport};
use athlete_technique::{JointAngleAnalyzer, StyleProfile};

use crate::config::LiveConfig;
use crate::detector::PoseDetector;
use crate::shared::SharedDetector;

/// State written by detection tasks
#[derive(Debug, Default)]
struct Latest {
    closed: bool,
    frame: Option<KeypointFrame>,
    completed: u64,
}

/// Detection overlay for one rendered frame, in destination coordinates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeypointOverlay {
    pub bones: Vec<(Point2D, Point2D)>,
    pub joints: Vec<Point2D>,
}

impl KeypointOverlay {
    pub fn is_empty(&self) -> bool {
        self.bones.is_empty() && self.joints.is_empty()
    }
}

/// What happened on one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub tick: u64,
    /// A detection task was launched this tick
    pub detection_started: bool,
    /// The style profile was re-classified this tick
    pub profile_updated: bool,
}

pub struct LiveSession<D: PoseDetector> {
    detector: Arc<D>,
    analyzer: JointAngleAnalyzer,
    config: LiveConfig,
    ticks: u64,
    latest: Arc<Mutex<Latest>>,
    in_flight: Option<JoinHandle<()>>,
    profile: Option<StyleProfile>,
}

impl<D: PoseDetector> LiveSession<D> {
    pub fn new(detector: Arc<D>, sport: Sport, config: LiveConfig) -> Result<Self> {
        config.validate()?;
        info!(%sport, detection_interval = config.detection_interval, "live session started");

        Ok(Self {
            detector,
            analyzer: JointAngleAnalyzer::new(sport).with_min_confidence(config.min_confidence),
            config,
            ticks: 0,
            latest: Arc::new(Mutex::new(Latest::default())),
            in_flight: None,
            profile: None,
        })
    }

    /// Acquire the process-wide detector, initializing it if needed, and
    /// start a session on it
    pub async fn connect<F, Fut>(shared: &SharedDetector<D>, init: F, sport: Sport, config: LiveConfig) -> Result<Self>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<D>>,
    {
        let detector = shared.acquire(init).await?;
        Self::new(detector, sport, config)
    }

    /// Advance one rendered frame.
    ///
    /// Never waits on the detector. A detection tick outside a tokio runtime
    /// fails with [`Error::Detection`] and leaves the tick count unchanged.
    pub fn tick(&mut self, frame: D::Frame) -> Result<TickReport> {
        if self.is_closed() {
            return Err(Error::SessionClosed);
        }

        let tick = self.ticks;
        let runtime = if tick % self.config.detection_interval != 0 {
            None
        } else if self.detection_in_flight() {
            debug!(tick, "previous detection still running, skipping");
            None
        } else {
            let handle = Handle::try_current().map_err(|e| Error::Detection(format!("no tokio runtime: {}", e)))?;
            Some(handle)
        };
        self.ticks += 1;

        let detection_started = match runtime {
            Some(handle) => {
                self.spawn_detection(&handle, frame);
                true
            }
            None => false,
        };

        let profile_updated = tick % self.config.analysis_interval == 0 && self.refresh_profile();

        Ok(TickReport {
            tick,
            detection_started,
            profile_updated,
        })
    }

    fn spawn_detection(&mut self, runtime: &Handle, frame: D::Frame) {
        let detector = Arc::clone(&self.detector);
        let latest = Arc::clone(&self.latest);

        self.in_flight = Some(runtime.spawn(async move {
            match detector.estimate(&frame).await {
                Ok(Some(keypoints)) => {
                    let mut latest = latest.lock();
                    if !latest.closed {
                        latest.frame = Some(keypoints);
                        latest.completed += 1;
                    }
                }
                Ok(None) => debug!("no pose in frame"),
                Err(e) => warn!(error = %e, "pose detection failed"),
            }
        }));
    }

    fn refresh_profile(&mut self) -> bool {
        let Some(frame) = self.latest_frame() else {
            return false;
        };
        match self.analyzer.analyze(&frame) {
            Some(profile) => {
                self.profile = Some(profile);
                true
            }
            None => false,
        }
    }

    pub fn detection_in_flight(&self) -> bool {
        self.in_flight.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    /// Most recent completed keypoint frame
    pub fn latest_frame(&self) -> Option<KeypointFrame> {
        self.latest.lock().frame.clone()
    }

    /// Number of detections that produced a keypoint frame
    pub fn completed_detections(&self) -> u64 {
        self.latest.lock().completed
    }

    /// Overlay of the latest frame mapped onto a `target` surface
    pub fn overlay(&self, target: FrameSize) -> KeypointOverlay {
        let latest = self.latest.lock();
        let Some(frame) = latest.frame.as_ref() else {
            return KeypointOverlay::default();
        };

        KeypointOverlay {
            bones: frame.overlay_segments(target, self.config.overlay_confidence),
            joints: frame.overlay_points(target, self.config.overlay_confidence),
        }
    }

    pub fn profile(&self) -> Option<&StyleProfile> {
        self.profile.as_ref()
    }

    pub fn sport(&self) -> Sport {
        self.analyzer.sport
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &LiveConfig {
        &self.config
    }

    pub fn is_closed(&self) -> bool {
        self.latest.lock().closed
    }

    /// Stop the session; a detection still running is aborted and its
    /// result discarded
    pub fn shutdown(&mut self) {
        let was_open = !std::mem::replace(&mut self.latest.lock().closed, true);
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
        if was_open {
            info!(sport = %self.sport(), ticks = self.ticks, "live session stopped");
        }
    }
}

impl<D: PoseDetector> Drop for LiveSession<D> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use athlete_core::{DetectedKeypoint, Keypoint};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Semaphore;

    /// Returns a fixed frame; optionally waits for a permit first
    struct ScriptedDetector {
        calls: AtomicUsize,
        gate: Option<Semaphore>,
        result: Result<Option<KeypointFrame>>,
    }

    impl ScriptedDetector {
        fn instant(result: Result<Option<KeypointFrame>>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                gate: None,
                result,
            }
        }

        fn gated(result: Result<Option<KeypointFrame>>) -> Self {
            Self {
                gate: Some(Semaphore::new(0)),
                ..Self::instant(result)
            }
        }

        fn release(&self) {
            if let Some(gate) = &self.gate {
                gate.add_permits(1);
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PoseDetector for ScriptedDetector {
        type Frame = u64;

        async fn estimate(&self, _frame: &u64) -> Result<Option<KeypointFrame>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.acquire().await.map_err(|e| Error::Detection(e.to_string()))?.forget();
            }
            self.result.clone()
        }
    }

    fn upright_frame() -> KeypointFrame {
        let mut keypoints = vec![DetectedKeypoint::new(0.0, 0.0, 0.0); Keypoint::COUNT];
        let points = [
            (Keypoint::LeftShoulder, 340.0, 140.0),
            (Keypoint::RightShoulder, 300.0, 140.0),
            (Keypoint::RightElbow, 300.0, 80.0),
            (Keypoint::RightWrist, 300.0, 20.0),
            (Keypoint::LeftHip, 340.0, 260.0),
            (Keypoint::RightHip, 300.0, 260.0),
        ];
        for (k, x, y) in points {
            keypoints[k.index()] = DetectedKeypoint::new(x, y, 0.9);
        }
        KeypointFrame::new(keypoints, FrameSize::new(640.0, 480.0))
    }

    #[test]
    fn test_tick_outside_runtime_is_an_error() {
        let detector = Arc::new(ScriptedDetector::instant(Ok(Some(upright_frame()))));
        let mut session = LiveSession::new(Arc::clone(&detector), Sport::Cricket, LiveConfig::default()).unwrap();

        assert!(matches!(session.tick(0), Err(Error::Detection(_))));
        assert_eq!(session.ticks(), 0);
        assert!(!session.detection_in_flight());
        assert_eq!(detector.calls(), 0);
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    #[tokio::test]
    async fn test_detection_runs_every_other_tick() {
        let detector = Arc::new(ScriptedDetector::instant(Ok(Some(upright_frame()))));
        let mut session = LiveSession::new(Arc::clone(&detector), Sport::Cricket, LiveConfig::default()).unwrap();

        let mut started = Vec::new();
        for i in 0..10 {
            let report = session.tick(i).unwrap();
            if report.detection_started {
                started.push(report.tick);
            }
            settle().await;
        }

        assert_eq!(started, vec![0, 2, 4, 6, 8]);
        assert_eq!(detector.calls(), 5);
        assert_eq!(session.completed_detections(), 5);
        assert!(session.latest_frame().is_some());
    }

    #[tokio::test]
    async fn test_tick_does_not_wait_for_slow_detector() {
        let detector = Arc::new(ScriptedDetector::gated(Ok(Some(upright_frame()))));
        let mut session = LiveSession::new(Arc::clone(&detector), Sport::Cricket, LiveConfig::default()).unwrap();

        assert!(session.tick(0).unwrap().detection_started);
        settle().await;
        for i in 1..6 {
            assert!(!session.tick(i).unwrap().detection_started);
        }
        assert!(session.detection_in_flight());
        assert_eq!(detector.calls(), 1);
        assert!(session.latest_frame().is_none());

        detector.release();
        settle().await;
        assert!(!session.detection_in_flight());
        assert!(session.latest_frame().is_some());

        assert!(session.tick(6).unwrap().detection_started);
    }

    #[tokio::test]
    async fn test_errors_keep_previous_frame() {
        let good = Arc::new(ScriptedDetector::instant(Ok(Some(upright_frame()))));
        let mut session = LiveSession::new(good, Sport::Badminton, LiveConfig::default()).unwrap();
        session.tick(0).unwrap();
        settle().await;
        let before = session.latest_frame();
        assert!(before.is_some());

        // Same latest slot, failing detector
        let failing = Arc::new(ScriptedDetector::instant(Err(Error::Detection("decode error".into()))));
        session.detector = failing;
        session.tick(1).unwrap();
        session.tick(2).unwrap();
        settle().await;
        assert_eq!(session.latest_frame(), before);
        assert_eq!(session.completed_detections(), 1);
    }

    #[tokio::test]
    async fn test_analysis_every_90_ticks() {
        let detector = Arc::new(ScriptedDetector::instant(Ok(Some(upright_frame()))));
        let mut session = LiveSession::new(detector, Sport::Cricket, LiveConfig::default()).unwrap();

        // Nothing detected yet on the first analysis tick
        assert!(!session.tick(0).unwrap().profile_updated);
        settle().await;

        for i in 1..90 {
            assert!(!session.tick(i).unwrap().profile_updated);
        }
        assert!(session.profile().is_none());

        assert!(session.tick(90).unwrap().profile_updated);
        let profile = session.profile().unwrap();
        assert_eq!(profile.angles.r_shoulder, 180);
        assert_eq!(profile.style, "High-arm Bowling Action");
    }

    #[tokio::test]
    async fn test_shutdown_discards_in_flight_result() {
        let detector = Arc::new(ScriptedDetector::gated(Ok(Some(upright_frame()))));
        let mut session = LiveSession::new(Arc::clone(&detector), Sport::Football, LiveConfig::default()).unwrap();

        session.tick(0).unwrap();
        settle().await;
        session.shutdown();
        detector.release();
        settle().await;

        assert!(session.is_closed());
        assert!(session.latest_frame().is_none());
        assert_eq!(session.tick(1), Err(Error::SessionClosed));
    }

    #[tokio::test]
    async fn test_overlay_uses_overlay_threshold() {
        let mut frame = upright_frame();
        frame.keypoints[Keypoint::RightWrist.index()].confidence = 0.28;
        let detector = Arc::new(ScriptedDetector::instant(Ok(Some(frame))));
        let mut session = LiveSession::new(detector, Sport::Cricket, LiveConfig::default()).unwrap();

        assert!(session.overlay(FrameSize::new(320.0, 240.0)).is_empty());
        session.tick(0).unwrap();
        settle().await;

        let overlay = session.overlay(FrameSize::new(320.0, 240.0));
        // Shoulders, right upper arm, both torso sides and the hips; the
        // forearm is below the overlay threshold
        assert_eq!(overlay.bones.len(), 5);
        assert_eq!(overlay.joints.len(), 5);
        assert!(overlay.joints.contains(&Point2D::new(150.0, 70.0)));
    }

    #[tokio::test]
    async fn test_connect_through_shared_detector() {
        let shared: SharedDetector<ScriptedDetector> = SharedDetector::new();
        let session = LiveSession::connect(
            &shared,
            || async { Ok(ScriptedDetector::instant(Ok(None))) },
            Sport::Badminton,
            LiveConfig::default(),
        )
        .await
        .unwrap();

        assert!(shared.is_ready());
        assert_eq!(session.sport(), Sport::Badminton);

        let bad = LiveConfig {
            detection_interval: 0,
            ..LiveConfig::default()
        };
        let detector = shared.get().unwrap();
        assert!(LiveSession::new(detector, Sport::Cricket, bad).is_err());
    }
}
