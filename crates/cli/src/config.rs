//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required for `--store woocommerce`
//! - `WOOCOMMERCE_URL` - Site root (e.g., `https://shop.example.com`)
//! - `WOOCOMMERCE_CONSUMER_KEY` - REST API consumer key (`ck_...`)
//! - `WOOCOMMERCE_CONSUMER_SECRET` - REST API consumer secret (`cs_...`)
//!
//! ## Optional
//! - `SMOOTHGEN_IMAGE_BASE_URL` - Placeholder image service (default: <https://placehold.co>)
//! - `SMOOTHGEN_LOG_FORMAT` - `text` or `json` (default: text)
//! - `RUST_LOG` - Log filter (default: info)

use secrecy::SecretString;
use smoothgen_generator::WooCommerceConfig;
use thiserror::Error;
use url::Url;

const DEFAULT_IMAGE_BASE_URL: &str = "https://placehold.co";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// Read `SMOOTHGEN_LOG_FORMAT`. Anything other than `json` means text.
    pub fn from_env() -> Self {
        Self::from_lookup(env_lookup)
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup("SMOOTHGEN_LOG_FORMAT") {
            Some(value) if value.trim().eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Text,
        }
    }
}

/// Load the WooCommerce connection settings.
///
/// # Errors
///
/// Returns `ConfigError` if a required variable is missing or a URL or
/// credential is malformed.
pub fn woocommerce_from_env() -> Result<WooCommerceConfig, ConfigError> {
    woocommerce_from_lookup(env_lookup)
}

fn woocommerce_from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<WooCommerceConfig, ConfigError> {
    let get_required = |key: &str| {
        lookup(key)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    };

    let base_url = parse_url("WOOCOMMERCE_URL", &get_required("WOOCOMMERCE_URL")?)?;
    let consumer_key = get_required("WOOCOMMERCE_CONSUMER_KEY")?;
    let consumer_secret = get_required("WOOCOMMERCE_CONSUMER_SECRET")?;
    validate_credential("WOOCOMMERCE_CONSUMER_KEY", &consumer_key, "ck_")?;
    validate_credential("WOOCOMMERCE_CONSUMER_SECRET", &consumer_secret, "cs_")?;

    let image_base_url = lookup("SMOOTHGEN_IMAGE_BASE_URL")
        .unwrap_or_else(|| DEFAULT_IMAGE_BASE_URL.to_string());
    let image_base_url = parse_url("SMOOTHGEN_IMAGE_BASE_URL", &image_base_url)?;

    Ok(WooCommerceConfig {
        base_url,
        consumer_key,
        consumer_secret: SecretString::from(consumer_secret),
        image_base_url,
    })
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse an absolute `http(s)` URL.
fn parse_url(key: &str, value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }
    Ok(url)
}

/// WooCommerce REST keys carry a fixed prefix.
fn validate_credential(key: &str, value: &str, prefix: &str) -> Result<(), ConfigError> {
    if value.starts_with(prefix) {
        Ok(())
    } else {
        Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected a value starting with {prefix}"),
        ))
    }
}
