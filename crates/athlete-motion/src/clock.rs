//! Frame-coupled animation clock.
//!
//! The clock advances its phase by a fixed amount on every tick, independent
//! of wall-clock time, samples its [`PoseSource`], runs forward kinematics and
//! feeds the resulting joint map into its trail.

use serde::Serialize;

use athlete_core::{JointMap, PoseParameters, SkeletonProfile, Sport};

use crate::clip::{AnimationClip, PROCEDURAL_SPEED};
use crate::keyframe::KeyframeTrack;
use crate::procedural::ProceduralMotion;
use crate::trail::{TrailBuffer, COMPACT_TRAIL, REFERENCE_TRAIL};

/// Anything that yields a pose for a phase
pub trait PoseSource {
    fn pose_at(&self, phase: f64) -> PoseParameters;

    /// Name of the motion phase, when the source has one
    fn label_at(&self, _phase: f64) -> Option<&str> {
        None
    }
}

impl PoseSource for KeyframeTrack {
    fn pose_at(&self, phase: f64) -> PoseParameters {
        KeyframeTrack::pose_at(self, phase)
    }

    fn label_at(&self, phase: f64) -> Option<&str> {
        Some(KeyframeTrack::label_at(self, phase))
    }
}

/// Output of one clock tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimationFrame {
    pub tick: u64,
    pub phase: f64,
    pub label: Option<String>,
    pub pose: PoseParameters,
    /// Joint positions in destination drawing-surface coordinates
    pub joints: JointMap,
}

/// Drives a pose source forward one fixed phase step per tick
#[derive(Debug, Clone)]
pub struct AnimationClock<S> {
    source: S,
    profile: SkeletonProfile,
    speed: f64,
    scale: f64,
    phase: f64,
    ticks: u64,
    trail: TrailBuffer<JointMap>,
}

impl<S: PoseSource> AnimationClock<S> {
    pub fn new(source: S, profile: SkeletonProfile, speed: f64) -> Self {
        Self {
            source,
            profile,
            speed,
            scale: 1.0,
            phase: 0.0,
            ticks: 0,
            trail: TrailBuffer::new(REFERENCE_TRAIL),
        }
    }

    /// Uniform scale applied to joint coordinates before they are emitted
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_trail_capacity(mut self, capacity: usize) -> Self {
        self.trail = TrailBuffer::new(capacity);
        self
    }

    /// Start from `phase` instead of 0
    pub fn with_phase(mut self, phase: f64) -> Self {
        self.phase = phase;
        self
    }

    /// Advance one step, then pose, solve and record the frame
    pub fn tick(&mut self) -> AnimationFrame {
        self.phase += self.speed;
        self.ticks += 1;

        let pose = self.source.pose_at(self.phase);
        let joints = self.profile.fk_pose(&pose).scaled(self.scale, self.scale);
        self.trail.push(joints);

        AnimationFrame {
            tick: self.ticks,
            phase: self.phase,
            label: self.source.label_at(self.phase).map(str::to_owned),
            pose,
            joints,
        }
    }

    /// Joint map at an arbitrary phase without advancing the clock
    pub fn sample(&self, phase: f64) -> JointMap {
        self.profile
            .fk_pose(&self.source.pose_at(phase))
            .scaled(self.scale, self.scale)
    }

    pub fn label(&self) -> Option<&str> {
        self.source.label_at(self.phase)
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn trail(&self) -> &TrailBuffer<JointMap> {
        &self.trail
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn profile(&self) -> &SkeletonProfile {
        &self.profile
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.ticks = 0;
        self.trail.clear();
    }
}

impl AnimationClock<KeyframeTrack> {
    /// Full-size reference animation for a clip
    pub fn from_clip(clip: &AnimationClip) -> Self {
        Self::new(clip.track.clone(), SkeletonProfile::athlete(), clip.speed)
    }
}

impl AnimationClock<ProceduralMotion> {
    /// Compact thumbnail animation, `scale` maps the 160×240 layout onto the
    /// destination surface
    pub fn compact(sport: Sport, scale: f64) -> Self {
        Self::new(ProceduralMotion::new(sport), SkeletonProfile::compact(), PROCEDURAL_SPEED)
            .with_scale(scale)
            .with_trail_capacity(COMPACT_TRAIL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use athlete_core::JointName;

    #[test]
    fn test_tick_advances_by_speed() {
        let clip = AnimationClip::for_sport(Sport::Cricket).unwrap();
        let mut clock = AnimationClock::from_clip(&clip);

        let first = clock.tick();
        assert_eq!(first.tick, 1);
        assert!((first.phase - 0.0055).abs() < 1e-12);
        assert_eq!(first.label.as_deref(), Some("Run-up"));

        for _ in 0..99 {
            clock.tick();
        }
        assert!((clock.phase() - 0.55).abs() < 1e-9);
        assert_eq!(clock.label(), Some("Front drive"));
    }

    #[test]
    fn test_trail_tracks_recent_frames() {
        let clip = AnimationClip::for_sport(Sport::Football).unwrap();
        let mut clock = AnimationClock::from_clip(&clip);

        let frames: Vec<AnimationFrame> = (0..8).map(|_| clock.tick()).collect();
        assert_eq!(clock.trail().len(), REFERENCE_TRAIL);
        assert_eq!(clock.trail().newest(), Some(&frames[7].joints));
        assert!(!clock.trail().iter().any(|j| *j == frames[2].joints));
    }

    #[test]
    fn test_frame_joints_match_sample() {
        let clip = AnimationClip::for_sport(Sport::Badminton).unwrap();
        let mut clock = AnimationClock::from_clip(&clip);
        let frame = clock.tick();
        assert_eq!(frame.joints, clock.sample(frame.phase));
    }

    #[test]
    fn test_compact_clock_scales_joints() {
        let mut full = AnimationClock::compact(Sport::Cricket, 1.0);
        let mut small = AnimationClock::compact(Sport::Cricket, 0.68);
        let a = full.tick().joints[JointName::Pelvis];
        let b = small.tick().joints[JointName::Pelvis];

        assert!((b.x - a.x * 0.68).abs() < 1e-9);
        assert!((b.y - a.y * 0.68).abs() < 1e-9);
        assert_eq!(small.trail().capacity(), COMPACT_TRAIL);
        assert!(small.label().is_none());
    }

    #[test]
    fn test_reset() {
        let mut clock = AnimationClock::compact(Sport::Football, 1.0);
        clock.tick();
        clock.tick();
        clock.reset();
        assert_eq!(clock.phase(), 0.0);
        assert!(clock.trail().is_empty());
    }
}
