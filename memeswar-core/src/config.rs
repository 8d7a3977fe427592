//! Run-wide configuration injected into every account session.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    ACCOUNT_DELAY_SECS, CYCLE_INTERVAL_SECS, DEFAULT_BASE_URL, QUEST_DELAY_SECS,
    REQUEST_TIMEOUT_SECS, VERIFY_DELAY_SECS,
};
use crate::retry::RetryPolicy;

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("guild id is empty")]
    MissingGuildId,
    #[error("base url `{0}` must start with http:// or https://")]
    BaseUrlScheme(String),
    #[error("retry policy needs at least one attempt")]
    NoAttempts,
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    #[error("invalid config json: {0}")]
    Parse(String),
}

/// Courtesy delays between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pacing {
    #[serde(default = "Pacing::default_account_delay")]
    pub account_delay_secs: u64,
    #[serde(default = "Pacing::default_quest_delay")]
    pub quest_delay_secs: u64,
    #[serde(default = "Pacing::default_verify_delay")]
    pub verify_delay_secs: u64,
    #[serde(default = "Pacing::default_cycle_interval")]
    pub cycle_interval_secs: u64,
}

impl Pacing {
    const fn default_account_delay() -> u64 {
        ACCOUNT_DELAY_SECS
    }

    const fn default_quest_delay() -> u64 {
        QUEST_DELAY_SECS
    }

    const fn default_verify_delay() -> u64 {
        VERIFY_DELAY_SECS
    }

    const fn default_cycle_interval() -> u64 {
        CYCLE_INTERVAL_SECS
    }

    #[must_use]
    pub const fn account_delay(&self) -> Duration {
        Duration::from_secs(self.account_delay_secs)
    }

    #[must_use]
    pub const fn quest_delay(&self) -> Duration {
        Duration::from_secs(self.quest_delay_secs)
    }

    #[must_use]
    pub const fn verify_delay(&self) -> Duration {
        Duration::from_secs(self.verify_delay_secs)
    }

    #[must_use]
    pub const fn cycle_interval(&self) -> Duration {
        Duration::from_secs(self.cycle_interval_secs)
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            account_delay_secs: Self::default_account_delay(),
            quest_delay_secs: Self::default_quest_delay(),
            verify_delay_secs: Self::default_verify_delay(),
            cycle_interval_secs: Self::default_cycle_interval(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BotConfig {
    #[serde(default)]
    pub guild_id: String,
    #[serde(default)]
    pub referral_code: String,
    #[serde(default = "BotConfig::default_base_url")]
    pub base_url: String,
    #[serde(default = "BotConfig::default_request_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub pacing: Pacing,
    #[serde(default)]
    pub retry: RetryPolicy,
}

impl BotConfig {
    fn default_base_url() -> String {
        DEFAULT_BASE_URL.to_string()
    }

    const fn default_request_timeout() -> u64 {
        REQUEST_TIMEOUT_SECS
    }

    /// Parse a JSON config document. Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Check the invariants every run depends on.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.guild_id.trim().is_empty() {
            return Err(ConfigError::MissingGuildId);
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::BaseUrlScheme(self.base_url.clone()));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            guild_id: String::new(),
            referral_code: String::new(),
            base_url: Self::default_base_url(),
            request_timeout_secs: Self::default_request_timeout(),
            pacing: Pacing::default(),
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_takes_defaults() {
        let cfg = BotConfig::from_json_str(r#"{"guild_id":"g-1","pacing":{"quest_delay_secs":1}}"#)
            .unwrap();
        assert_eq!(cfg.guild_id, "g-1");
        assert_eq!(cfg.referral_code, "");
        assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.pacing.quest_delay_secs, 1);
        assert_eq!(cfg.pacing.account_delay_secs, 5);
        assert_eq!(cfg.retry.max_attempts, 3);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(10));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn empty_guild_is_rejected() {
        assert_eq!(
            BotConfig::default().validate(),
            Err(ConfigError::MissingGuildId)
        );
    }

    #[test]
    fn scheme_and_attempts_are_checked() {
        let mut cfg = BotConfig {
            guild_id: "g".into(),
            base_url: "ftp://nope".into(),
            ..BotConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::BaseUrlScheme(_))));
        cfg.base_url = DEFAULT_BASE_URL.into();
        cfg.retry.max_attempts = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::NoAttempts));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        assert!(matches!(
            BotConfig::from_json_str("{guild"),
            Err(ConfigError::Parse(_))
        ));
    }
}
