//! # Athlete-Technique
//!
//! Turns detected keypoints into technique feedback.
//!
//! ## Components
//!
//! - [`JointAngleSet`]: the six angles measured from a 17-point frame
//! - [`TechniqueTable`]: per-sport decision tables (style ladder, tags,
//!   notes, weighted score terms)
//! - [`JointAngleAnalyzer`]: frame → [`StyleProfile`]
//! - [`BiomechanicalScorer`]: deterministic synthetic per-joint scores for the
//!   reference animation

pub mod analyzer;
pub mod angles;
pub mod profile;
pub mod rules;
pub mod scorer;

pub use analyzer::*;
pub use angles::*;
pub use profile::*;
pub use rules::*;
pub use scorer::*;
