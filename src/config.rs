use std::str::FromStr;

use rust_decimal::Decimal;
use thiserror::Error;

pub const INTEREST_RATE_VAR: &str = "BANK_LEDGER_INTEREST_RATE";
pub const OVERDRAFT_LIMIT_VAR: &str = "BANK_LEDGER_OVERDRAFT_LIMIT";
pub const HISTORY_LIMIT_VAR: &str = "BANK_LEDGER_HISTORY_LIMIT";
pub const VERBOSE_VAR: &str = "BANK_LEDGER_VERBOSE";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value `{value}` for {name}")]
    InvalidValue { name: &'static str, value: String },
    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: Decimal },
}

/// Settings for the batch driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// Rate used when a savings account is opened without one, in percent.
    pub default_interest_rate: Decimal,
    /// Limit used when a current account is opened without one.
    pub default_overdraft_limit: Decimal,
    /// How many entries a history listing shows.
    pub history_limit: usize,
    pub verbose: bool,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_interest_rate: Decimal::new(35, 1),
            default_overdraft_limit: Decimal::new(1000, 0),
            history_limit: 10,
            verbose: false,
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the config from `lookup`, falling back to the defaults for every
    /// variable it does not know.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let config = Self {
            default_interest_rate: parse_var(
                &lookup,
                INTEREST_RATE_VAR,
                defaults.default_interest_rate,
            )?,
            default_overdraft_limit: parse_var(
                &lookup,
                OVERDRAFT_LIMIT_VAR,
                defaults.default_overdraft_limit,
            )?,
            history_limit: parse_var(&lookup, HISTORY_LIMIT_VAR, defaults.history_limit)?,
            verbose: parse_var(&lookup, VERBOSE_VAR, defaults.verbose)?,
        };
        ensure_not_negative(INTEREST_RATE_VAR, config.default_interest_rate)?;
        ensure_not_negative(OVERDRAFT_LIMIT_VAR, config.default_overdraft_limit)?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}

fn ensure_not_negative(name: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        Err(ConfigError::Negative { name, value })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = LedgerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.default_interest_rate, Decimal::new(35, 1));
        assert_eq!(config.default_overdraft_limit, Decimal::from(1000));
        assert_eq!(config.history_limit, 10);
        assert!(!config.verbose);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (INTEREST_RATE_VAR, "4.25"),
            (OVERDRAFT_LIMIT_VAR, " 250 "),
            (HISTORY_LIMIT_VAR, "3"),
            (VERBOSE_VAR, "true"),
        ]))
        .unwrap();
        assert_eq!(config.default_interest_rate, Decimal::new(425, 2));
        assert_eq!(config.default_overdraft_limit, Decimal::from(250));
        assert_eq!(config.history_limit, 3);
        assert!(config.verbose);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = LedgerConfig::from_lookup(lookup(&[(HISTORY_LIMIT_VAR, "many")])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid value `many` for BANK_LEDGER_HISTORY_LIMIT"
        );

        let err = LedgerConfig::from_lookup(lookup(&[(INTEREST_RATE_VAR, "-1")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Negative {
                name: INTEREST_RATE_VAR,
                ..
            }
        ));
    }
}
