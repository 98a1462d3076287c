//! # Athlete-Motion
//!
//! Drives the reference stickman through time.
//!
//! ## Pipeline
//!
//! 1. **Source**: a [`KeyframeTrack`] (authored poses, smoothstep-eased) or a
//!    [`ProceduralMotion`] (closed-form sine curves) yields [`PoseParameters`]
//!    for a phase
//! 2. **Clock**: [`AnimationClock`] advances the phase by a fixed amount per
//!    tick and runs forward kinematics
//! 3. **Trail**: [`TrailBuffer`] keeps the last few joint maps for ghosting
//!
//! [`PoseParameters`]: athlete_core::PoseParameters

pub mod clip;
pub mod clock;
pub mod keyframe;
pub mod procedural;
pub mod trail;

pub use clip::*;
pub use clock::*;
pub use keyframe::*;
pub use procedural::*;
pub use trail::*;
