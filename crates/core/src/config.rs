use crate::error::{LocusError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default listing-cache lifetime: one hour.
pub const DEFAULT_CACHE_TTL_SECS: f64 = 3600.0;

pub const ENV_CACHE_LISTINGS: &str = "LOCUS_CACHE_LISTINGS";
pub const ENV_CACHE_TTL: &str = "LOCUS_CACHE_TTL";

/// Runtime configuration of a [`crate::LocationService`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Whether directory listings are cached at all.
    pub cache_listings: bool,
    /// Lifetime of a cached listing, in seconds.
    pub cache_ttl_secs: f64,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            cache_listings: false,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl LocationConfig {
    /// Load from a JSON file; missing fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&bytes)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with `LOCUS_CACHE_LISTINGS` / `LOCUS_CACHE_TTL`.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env(|key| std::env::var(key).ok())
    }

    /// Overlay values from `lookup`, which maps variable names to values.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_CACHE_LISTINGS) {
            self.cache_listings = parse_flag(&raw).ok_or_else(|| {
                LocusError::InvalidArgument(format!("{ENV_CACHE_LISTINGS}={raw} is not a boolean"))
            })?;
        }
        if let Some(raw) = lookup(ENV_CACHE_TTL) {
            self.cache_ttl_secs = raw.trim().parse().map_err(|_| {
                LocusError::InvalidArgument(format!("{ENV_CACHE_TTL}={raw} is not a number"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cache_ttl_secs.is_finite() || self.cache_ttl_secs < 0.0 {
            return Err(LocusError::InvalidArgument(format!(
                "cache TTL must be a non-negative number of seconds, got {}",
                self.cache_ttl_secs
            )));
        }
        Ok(())
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
