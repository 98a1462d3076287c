//! # Athlete-Core
//!
//! Core types and utilities for the athlete motion engine: the reference
//! stickman skeleton, its forward kinematics, and the 17-point keypoint
//! layout shared with the technique analyzer.

pub mod error;
pub mod geometry;
pub mod kinematics;
pub mod types;

pub use error::{Error, Result};
pub use geometry::*;
pub use kinematics::*;
pub use types::*;
