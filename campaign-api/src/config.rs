use crate::error::ApiError;
use tracing::{info, warn};

pub const API_URL_VAR: &str = "CAMPAIGN_API_URL";
pub const GROUP_ID_VAR: &str = "CAMPAIGN_GROUP_ID";

/// Backend location and the fixed operating group. Both are required.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiConfig {
    pub base_url: String,
    pub group_id: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim().trim_end_matches('/').to_string(),
            group_id: group_id.into().trim().to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves both variables through `lookup`; blank counts as missing.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let base_url = require(&lookup, API_URL_VAR)?;
        let group_id = require(&lookup, GROUP_ID_VAR)?;
        let config = Self::new(base_url, group_id);
        info!(base_url = %config.base_url, group_id = %config.group_id, "api config loaded");
        Ok(config)
    }
}

fn require(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<String, ApiError> {
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => {
            warn!("environment variable {key} not set");
            Err(ApiError::Config(key))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn trims_trailing_slash() {
        let vars: HashMap<&str, &str> =
            [(API_URL_VAR, "https://api.example.org/v1/"), (GROUP_ID_VAR, " g-7 ")].into();
        let config = ApiConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.base_url, "https://api.example.org/v1");
        assert_eq!(config.group_id, "g-7");
    }

    #[test]
    fn missing_or_blank_is_a_hard_failure() {
        let err = ApiConfig::from_lookup(|_| None).unwrap_err();
        assert!(matches!(err, ApiError::Config(API_URL_VAR)));

        let vars: HashMap<&str, &str> = [(API_URL_VAR, "http://x"), (GROUP_ID_VAR, "  ")].into();
        let err = ApiConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap_err();
        assert_eq!(err.to_string(), "CAMPAIGN_GROUP_ID must be set");
    }
}
