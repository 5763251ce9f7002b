//! TOML configuration for the `proposal` binary.
//!
//! ```toml
//! [rates]
//! gaco_silicone_price = 215
//! elevated_office_fee_pct = "0.06"
//! commissioned_salespeople = ["David Estes"]
//!
//! [rates.warranty]
//! gaco_minimum_squares = 80
//! ```
//!
//! Every key is optional; anything left out keeps the built-in rate card.

use std::path::Path;

use anyhow::{Context, Result};
use proposal_core::RateCard;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rates: RateCard,
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid configuration")
    }

    /// Loads `path`, or the built-in defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            debug!("no config file given, using built-in rate card");
            return Ok(Self::default());
        };

        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file '{}'", path.display()))?;
        let config = Self::from_toml_str(&text)
            .with_context(|| format!("in config file '{}'", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
