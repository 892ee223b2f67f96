use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::params::Dims;

/// One gradient-check run over random data, labels and parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SanityConfig {
    pub name: String,
    pub batch_size: usize,
    pub dims: Dims,
    pub epsilon: f64,
    pub tolerance: f64,
    pub seed: Option<u64>,
    pub distributed: bool,
}

impl Default for SanityConfig {
    fn default() -> Self {
        SanityConfig {
            name: String::from("sanity"),
            batch_size: 20,
            dims: Dims {
                input: 10,
                hidden: 5,
                output: 10,
            },
            epsilon: 1e-4,
            tolerance: 1e-5,
            seed: None,
            distributed: false,
        }
    }
}

impl SanityConfig {
    /// The default check plus a wider hidden layer.
    pub fn presets() -> Vec<SanityConfig> {
        vec![
            SanityConfig::default(),
            SanityConfig {
                name: String::from("wide-hidden"),
                dims: Dims {
                    input: 20,
                    hidden: 25,
                    output: 10,
                },
                ..SanityConfig::default()
            },
        ]
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<SanityConfig> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        SanityConfig::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<SanityConfig> {
        let config: SanityConfig = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.dims.validate()?;

        if self.batch_size == 0 {
            return Err(Error::InvalidConfig("batch_size must be positive".into()));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.) {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be finite and positive, got {}",
                self.epsilon
            )));
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.) {
            return Err(Error::InvalidConfig(format!(
                "tolerance must be finite and positive, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }
}
