//! Client configuration.
//!
//! Layered: built-in defaults, then an optional `salon-client.toml` in the
//! working directory, then `SALON_*` environment variables
//! (e.g. `SALON_BASE_URL`, `SALON_IMAGE_TIMEOUT_SECS`).

use anyhow::{Context, Result};
use serde::Deserialize;
use url::Url;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the platform backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Timeout for before/after image requests, in seconds. This is the
    /// only client-enforced timeout; ordinary calls use the platform
    /// default.
    #[serde(default = "default_image_timeout_secs")]
    pub image_timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_image_timeout_secs() -> u64 {
    15
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_timeout_secs: default_image_timeout_secs(),
        }
    }
}

pub fn load_config() -> Result<ClientConfig> {
    let config = ::config::Config::builder()
        .set_default("base_url", default_base_url())?
        .set_default("image_timeout_secs", default_image_timeout_secs() as i64)?
        .add_source(::config::File::with_name("salon-client").required(false))
        .add_source(
            ::config::Environment::with_prefix("SALON")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: ClientConfig = config.try_deserialize()?;

    Url::parse(&config.base_url)
        .with_context(|| format!("invalid base_url: {}", config.base_url))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.image_timeout_secs, 15);
    }

    #[test]
    fn test_base_url_must_parse() {
        assert!(Url::parse(&ClientConfig::default().base_url).is_ok());
    }
}
