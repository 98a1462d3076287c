//! Error types for the athlete motion engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid keyframe track: {0}")]
    InvalidTrack(String),

    #[error("Invalid skeleton profile: segment `{segment}` has length {length}")]
    InvalidSkeleton { segment: &'static str, length: f64 },

    #[error("Pose detector initialization failed: {0}")]
    DetectorInit(String),

    #[error("Pose detection error: {0}")]
    Detection(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unknown sport: {0}")]
    UnknownSport(String),

    #[error("Session closed")]
    SessionClosed,
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
