//! Extraction settings.
//!
//! Settings are plain serde data so they can be embedded in a caller's own
//! configuration or loaded from a standalone JSON file:
//!
//! ```json
//! {
//!   "labels": { "truth": "y", "falsy": "n" },
//!   "workers": 4
//! }
//! ```
//!
//! Every field is optional and falls back to [`ExtractionConfig::default`].

use std::{fs::File, io::BufReader, num::NonZeroUsize, path::Path};

use akiscan_engine::LabelTokens;
use serde::{Deserialize, Serialize};

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum ConfigError {
    #[display("failed to read extraction config: {_0}")]
    Io(std::io::Error),
    #[display("failed to parse extraction config: {_0}")]
    Json(serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Tokens marking positive and negative AKI labels in raw rows.
    pub labels: LabelTokens,
    /// Number of worker threads used for batch extraction; 1 runs inline.
    pub workers: NonZeroUsize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            labels: LabelTokens::default(),
            workers: NonZeroUsize::MIN,
        }
    }
}

impl ExtractionConfig {
    /// Parses a configuration from a JSON string.
    ///
    /// # Examples
    ///
    /// ```
    /// use akiscan_features::ExtractionConfig;
    ///
    /// let config = ExtractionConfig::from_json_str(r#"{ "workers": 8 }"#)?;
    /// assert_eq!(config.workers.get(), 8);
    /// assert_eq!(config.labels.truth, "y");
    /// # Ok::<(), akiscan_features::ConfigError>(())
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn open<P>(path: P) -> Result<Self, ConfigError>
    where
        P: AsRef<Path>,
    {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}
