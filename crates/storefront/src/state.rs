//! Application state shared across views.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::store::{StoreClient, StoreError};

/// Application state shared by every view.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration and the backing-store client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    store: StoreClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing-store client fails to build.
    pub fn new(config: StorefrontConfig) -> Result<Self, StoreError> {
        let store = StoreClient::new(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner { config, store }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the backing-store client.
    #[must_use]
    pub fn store(&self) -> &StoreClient {
        &self.inner.store
    }
}
