//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `TILL_DATA_DIR` - Directory holding the saved cart and orders (default: `.till`)
//! - `TILL_ROLE` - Role of the signed-in operator (`admin`, `manager`, `staff`);
//!   unset means nobody is signed in
//! - `TILL_USER_ID` - Operator's user id (default: `local`)
//! - `TILL_DEFAULT_TAX_RATE` - Tax percent for a cart that was never saved (default: 7)
//! - `TILL_LOG_FORMAT` - `pretty` or `json` (default: pretty)
//! - `RUST_LOG` - Log filter (default: `info`)

use std::path::PathBuf;
use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;
use till_core::access::Principal;
use till_core::{Role, TaxRate, UserId};

const DEFAULT_DATA_DIR: &str = ".till";
const DEFAULT_USER_ID: &str = "local";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Till CLI configuration.
#[derive(Debug, Clone)]
pub struct TillConfig {
    /// Directory for the key-value store
    pub data_dir: PathBuf,
    /// Role of the signed-in operator, if any
    pub role: Option<Role>,
    /// Operator's user id
    pub user_id: UserId,
    /// Tax rate for a cart with no saved state
    pub default_tax_rate: TaxRate,
    /// Log output format
    pub log_format: LogFormat,
}

impl TillConfig {
    /// Load configuration from the environment (after `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        let role = get_optional_env("TILL_ROLE")
            .map(|value| parse_env("TILL_ROLE", &value))
            .transpose()?;

        let default_tax_rate = get_optional_env("TILL_DEFAULT_TAX_RATE")
            .map(|value| parse_tax_rate("TILL_DEFAULT_TAX_RATE", &value))
            .transpose()?
            .unwrap_or_default();

        let log_format = match get_env_or_default("TILL_LOG_FORMAT", "pretty").as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidEnvVar(
                    "TILL_LOG_FORMAT".to_string(),
                    format!("expected pretty or json, got {other}"),
                ));
            }
        };

        Ok(Self {
            data_dir: PathBuf::from(get_env_or_default("TILL_DATA_DIR", DEFAULT_DATA_DIR)),
            role,
            user_id: UserId::new(get_env_or_default("TILL_USER_ID", DEFAULT_USER_ID)),
            default_tax_rate,
            log_format,
        })
    }

    /// The operator as a principal, if signed in.
    #[must_use]
    pub fn principal(&self) -> Option<Principal> {
        self.role
            .map(|role| Principal::new(self.user_id.clone(), role))
    }
}

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_tax_rate(key: &str, value: &str) -> Result<TaxRate, ConfigError> {
    let percent: Decimal = parse_env(key, value.trim())?;
    TaxRate::new(percent).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tax_rate() {
        let rate = parse_tax_rate("TEST_RATE", " 8.25 ").unwrap();
        assert_eq!(rate.percent(), Decimal::new(825, 2));
    }

    #[test]
    fn test_parse_tax_rate_negative() {
        let err = parse_tax_rate("TEST_RATE", "-1").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "TEST_RATE"));
    }

    #[test]
    fn test_parse_tax_rate_garbage() {
        assert!(parse_tax_rate("TEST_RATE", "seven").is_err());
    }

    #[test]
    fn test_parse_role() {
        let role: Role = parse_env("TEST_ROLE", "Manager").unwrap();
        assert_eq!(role, Role::Manager);
        assert!(parse_env::<Role>("TEST_ROLE", "owner").is_err());
    }

    #[test]
    fn test_principal_requires_role() {
        let mut config = TillConfig {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            role: None,
            user_id: UserId::new("7"),
            default_tax_rate: TaxRate::DEFAULT,
            log_format: LogFormat::Pretty,
        };
        assert!(config.principal().is_none());

        config.role = Some(Role::Staff);
        let principal = config.principal().unwrap();
        assert_eq!(principal.id.as_str(), "7");
        assert_eq!(principal.role, Role::Staff);
    }
}
