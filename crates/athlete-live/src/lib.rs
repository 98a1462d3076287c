//! # Athlete-Live
//!
//! Runtime layer tying detection, analysis and the reference animation to a
//! render loop.
//!
//! ## Model
//!
//! - [`SharedDetector`]: one process-wide detector, initialized on first use;
//!   concurrent callers wait for the same initialization
//! - [`LiveSession`]: per-view loop that launches detection every other tick
//!   without blocking, renders from the latest completed keypoint frame and
//!   re-classifies technique periodically
//! - [`ReferencePlayer`]: reference stickman playback with periodic synthetic
//!   scores

pub mod config;
pub mod detector;
pub mod reference;
pub mod session;
pub mod shared;
pub mod telemetry;

pub use self::config::*;
pub use detector::*;
pub use reference::*;
pub use session::*;
pub use shared::*;
