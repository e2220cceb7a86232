use std::time::Duration;

use crate::error::{GenerationError, Result};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Connection settings for the generation service.
#[derive(Clone)]
pub struct GatewayConfig {
    pub api_key: String,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
    pub timeout: Duration,
    /// Transport retries on 429/5xx. Zero keeps every recovery user-driven.
    pub max_retries: usize,
}

impl std::fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("api_key", &"*".repeat(self.api_key.len().min(8)))
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            max_retries: 0,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_text_model(mut self, model: impl Into<String>) -> Self {
        self.text_model = model.into();
        self
    }

    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Reads `GEMINI_API_KEY` (or `API_KEY`) plus the optional `GEMINI_BASE_URL`,
    /// `WANDER_TEXT_MODEL`, `WANDER_IMAGE_MODEL`, `WANDER_TIMEOUT_SECS` and
    /// `WANDER_MAX_RETRIES` overrides.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GenerationError::Config(
                    "GEMINI_API_KEY (or API_KEY) must be set before generating an itinerary"
                        .to_string(),
                )
            })?;

        let mut config = Self::new(api_key);

        if let Some(base_url) = lookup("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Some(model) = lookup("WANDER_TEXT_MODEL") {
            config.text_model = model;
        }
        if let Some(model) = lookup("WANDER_IMAGE_MODEL") {
            config.image_model = model;
        }
        if let Some(raw) = lookup("WANDER_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                GenerationError::Config(format!("WANDER_TIMEOUT_SECS is not a number: {raw}"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(raw) = lookup("WANDER_MAX_RETRIES") {
            config.max_retries = raw.trim().parse().map_err(|_| {
                GenerationError::Config(format!("WANDER_MAX_RETRIES is not a number: {raw}"))
            })?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let err = GatewayConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err.error_code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_fallback_key_and_defaults() {
        let config = GatewayConfig::from_lookup(lookup_from(&[("API_KEY", "abc")])).unwrap();
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.text_model, DEFAULT_TEXT_MODEL);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn test_overrides() {
        let config = GatewayConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("GEMINI_BASE_URL", "http://localhost:9"),
            ("WANDER_TIMEOUT_SECS", "5"),
            ("WANDER_MAX_RETRIES", "2"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "http://localhost:9");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let result = GatewayConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key"),
            ("WANDER_TIMEOUT_SECS", "soon"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_masks_key() {
        let config = GatewayConfig::new("super-secret-key");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret-key"));
    }
}
