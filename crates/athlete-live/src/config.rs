//! Live session configuration.

use serde::{Deserialize, Serialize};

use athlete_core::{Error, Result};

/// Prefix for environment overrides, e.g. `ATHLETE_DETECTION_INTERVAL=3`
pub const ENV_PREFIX: &str = "ATHLETE";

/// Tunables for [`LiveSession`](crate::LiveSession) and
/// [`ReferencePlayer`](crate::ReferencePlayer)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveConfig {
    /// Launch detection on every n-th tick
    pub detection_interval: u64,

    /// Re-classify technique on every n-th tick
    pub analysis_interval: u64,

    /// Refresh reference scores on every n-th tick
    pub score_interval: u64,

    /// Keypoints below this confidence are ignored by the analyzer
    pub min_confidence: f32,

    /// Keypoints below this confidence are left out of the overlay
    pub overlay_confidence: f32,

    /// Ghost frames kept behind the reference stickman
    pub trail_capacity: usize,

    /// Peak opacity of the newest ghost frame
    pub trail_max_alpha: f64,
}

impl Default for LiveConfig {
    fn default() -> Self {
        Self {
            detection_interval: 2,
            analysis_interval: 90,
            score_interval: 12,
            min_confidence: 0.25,
            overlay_confidence: 0.3,
            trail_capacity: 5,
            trail_max_alpha: 0.22,
        }
    }
}

impl LiveConfig {
    /// Load configuration from file, with environment overrides
    pub fn from_file(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(config_error)?;

        Self::finish(settings)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .map_err(config_error)?;

        Self::finish(settings)
    }

    /// Parse configuration text in the given format
    pub fn parse(contents: &str, format: config::FileFormat) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(contents, format))
            .build()
            .map_err(config_error)?;

        Self::finish(settings)
    }

    fn finish(settings: config::Config) -> Result<Self> {
        let config: Self = settings.try_deserialize().map_err(config_error)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("detection_interval", self.detection_interval),
            ("analysis_interval", self.analysis_interval),
            ("score_interval", self.score_interval),
        ] {
            if value == 0 {
                return Err(Error::Config(format!("{} must be at least 1", name)));
            }
        }

        for (name, value) in [
            ("min_confidence", self.min_confidence),
            ("overlay_confidence", self.overlay_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::Config(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }

        if self.trail_capacity == 0 {
            return Err(Error::Config("trail_capacity must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.trail_max_alpha) {
            return Err(Error::Config(format!(
                "trail_max_alpha must be within [0, 1], got {}",
                self.trail_max_alpha
            )));
        }

        Ok(())
    }
}

fn config_error(err: config::ConfigError) -> Error {
    Error::Config(err.to_string())
}
