//! Partner program configuration
//!
//! Defaults match the published partner program. A TOML file can override
//! any subset of fields, and a few environment variables override the file:
//!
//! | Variable | Field |
//! |---|---|
//! | `SNOW_PARTNER_CHECKSUM_SECRET` | `checksum_secret` |
//! | `SNOW_PARTNER_EXPIRY_WARNING_DAYS` | `expiry_warning_days` |
//! | `SNOW_PARTNER_RETAIL_PRICE` | `pricing.suggested_retail_per_seat` |

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::license::ChecksumScheme;
use crate::security::{ChecksumKey, MacError};

const ENV_CHECKSUM_SECRET: &str = "SNOW_PARTNER_CHECKSUM_SECRET";
const ENV_EXPIRY_WARNING_DAYS: &str = "SNOW_PARTNER_EXPIRY_WARNING_DAYS";
const ENV_RETAIL_PRICE: &str = "SNOW_PARTNER_RETAIL_PRICE";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file unreadable
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// File path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment override does not parse
    #[error("invalid value for {var}: {value:?}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
    },

    /// Keyed checksum requested without a secret
    #[error("no checksum secret configured (set SNOW_PARTNER_CHECKSUM_SECRET)")]
    MissingSecret,

    /// Secret rejected by key derivation
    #[error(transparent)]
    Security(#[from] MacError),
}

/// One step of the reseller volume schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTier {
    /// Smallest seat count this price applies to
    pub min_seats: u32,
    /// Wholesale dollars per seat per month
    pub price_per_seat: u32,
}

/// Reseller wholesale pricing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResellerPricing {
    /// Volume tiers, any order
    pub tiers: Vec<PriceTier>,
    /// Suggested retail dollars per seat per month
    pub suggested_retail_per_seat: u32,
}

impl Default for ResellerPricing {
    fn default() -> Self {
        Self {
            tiers: vec![
                PriceTier {
                    min_seats: 25,
                    price_per_seat: 69,
                },
                PriceTier {
                    min_seats: 100,
                    price_per_seat: 59,
                },
                PriceTier {
                    min_seats: 500,
                    price_per_seat: 49,
                },
            ],
            suggested_retail_per_seat: 99,
        }
    }
}

impl ResellerPricing {
    /// Wholesale price per seat for a seat count
    ///
    /// Uses the largest tier whose floor is at or below `seats`; counts
    /// under every floor get the smallest tier's price.
    pub fn price_per_seat(&self, seats: u32) -> u32 {
        self.tiers
            .iter()
            .filter(|t| t.min_seats <= seats)
            .max_by_key(|t| t.min_seats)
            .or_else(|| self.tiers.iter().min_by_key(|t| t.min_seats))
            .map(|t| t.price_per_seat)
            .unwrap_or(0)
    }
}

/// Solution partner referral commission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Commission {
    /// Percent of first-year revenue
    pub first_year_percent: u32,
    /// Percent of revenue from year two on
    pub renewal_percent: u32,
}

impl Default for Commission {
    fn default() -> Self {
        Self {
            first_year_percent: 15,
            renewal_percent: 10,
        }
    }
}

/// Partner program configuration
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartnerConfig {
    /// Reseller pricing
    pub pricing: ResellerPricing,
    /// Solution commission
    pub commission: Commission,
    /// Days before expiry at which a warning is shown
    pub expiry_warning_days: i64,
    /// Secret for keyed checksums
    pub checksum_secret: Option<String>,
}

impl Default for PartnerConfig {
    fn default() -> Self {
        Self {
            pricing: ResellerPricing::default(),
            commission: Commission::default(),
            expiry_warning_days: 30,
            checksum_secret: None,
        }
    }
}

impl fmt::Debug for PartnerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PartnerConfig")
            .field("pricing", &self.pricing)
            .field("commission", &self.commission)
            .field("expiry_warning_days", &self.expiry_warning_days)
            .field("checksum_secret", &self.checksum_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl PartnerConfig {
    /// Load from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_env_overrides(|var| std::env::var(var).ok())
    }

    /// Defaults plus environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Read a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded partner config");
        Self::from_toml(&text)
    }

    /// Parse TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply overrides from a variable lookup
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup(ENV_CHECKSUM_SECRET) {
            self.checksum_secret = Some(secret);
        }

        if let Some(val) = lookup(ENV_EXPIRY_WARNING_DAYS) {
            self.expiry_warning_days = val.parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_EXPIRY_WARNING_DAYS,
                value: val.clone(),
            })?;
        }

        if let Some(val) = lookup(ENV_RETAIL_PRICE) {
            self.pricing.suggested_retail_per_seat =
                val.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_RETAIL_PRICE,
                    value: val.clone(),
                })?;
        }

        Ok(self)
    }

    /// Keyed checksum scheme from the configured secret
    pub fn keyed_scheme(&self) -> Result<ChecksumScheme, ConfigError> {
        let secret = self
            .checksum_secret
            .as_deref()
            .ok_or(ConfigError::MissingSecret)?;
        Ok(ChecksumScheme::Keyed(ChecksumKey::from_secret(secret.as_bytes())?))
    }
}
