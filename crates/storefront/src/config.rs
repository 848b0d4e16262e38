//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `STOREFRONT_STORE_URL` - Base URL of the backing store (e.g.
//!   `https://abcdefgh.supabase.co`)
//! - `STOREFRONT_STORE_KEY` - Publishable API key for the backing store
//!   (safe to embed in a client; row access is enforced server-side)
//!
//! ## Optional
//! - `STOREFRONT_STORAGE_BUCKET` - Bucket for analysis uploads
//!   (default: `skin-analysis`)

use thiserror::Error;
use url::Url;

/// Default bucket holding user-uploaded analysis photos.
pub const DEFAULT_STORAGE_BUCKET: &str = "skin-analysis";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the backing store
    pub store_url: Url,
    /// Publishable API key sent with every request
    pub store_key: String,
    /// Bucket for analysis photo uploads
    pub storage_bucket: String,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let store_url = get_required_env("STOREFRONT_STORE_URL")?;
        let store_url = Url::parse(&store_url).map_err(|e| {
            ConfigError::InvalidEnvVar("STOREFRONT_STORE_URL".to_string(), e.to_string())
        })?;
        let store_key = get_required_env("STOREFRONT_STORE_KEY")?;
        let storage_bucket =
            get_env_or_default("STOREFRONT_STORAGE_BUCKET", DEFAULT_STORAGE_BUCKET);

        Ok(Self {
            store_url,
            store_key,
            storage_bucket,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
