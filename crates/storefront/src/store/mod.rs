//! Backing-store client: object storage plus row-level CRUD over REST.
//!
//! # Architecture
//!
//! - The store is the source of truth - no local sync, direct API calls
//! - Every request carries the publishable API key; scoped requests add
//!   the viewer's bearer token, and row-level access control at the store
//!   restricts each row to its owning identity
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//!
//! # Surfaces
//!
//! ## Object storage
//! - `upload_object` / `public_object_url` against a named bucket
//!
//! ## Rows
//! - `insert` (returns the row with its generated id), `select` with
//!   column filters, `update` for append-only status transitions and
//!   profile edits, `delete` for cart removal
//!
//! # Example
//!
//! ```rust,ignore
//! use velvet_muse_storefront::store::StoreClient;
//!
//! let store = StoreClient::new(&config)?;
//!
//! // Browse the catalog (cached)
//! let products = store.list_products().await?;
//!
//! // Add something to the signed-in viewer's cart
//! let item = store
//!     .add_cart_item(&session, &NewCartItem {
//!         user_id: session.user_id(),
//!         product_id: products[0].id,
//!         color: Some("Lavender".into()),
//!         size: Some("M".into()),
//!         quantity: 1,
//!     })
//!     .await?;
//! ```

mod cache;
mod client;
pub mod rows;

pub use client::StoreClient;
pub use rows::*;

use thiserror::Error;

/// Errors that can occur when talking to the backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Tables this client reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Products,
    Profiles,
    CartItems,
    Orders,
    OrderItems,
    SkinAnalysis,
    VirtualTryons,
}

impl Table {
    /// The table's path segment in the REST API.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Profiles => "profiles",
            Self::CartItems => "cart_items",
            Self::Orders => "orders",
            Self::OrderItems => "order_items",
            Self::SkinAnalysis => "skin_analysis",
            Self::VirtualTryons => "virtual_tryons",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::NotFound("product 123".to_string());
        assert_eq!(err.to_string(), "Not found: product 123");

        let err = StoreError::Api {
            status: 403,
            message: "row-level security violation".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "API error: 403 - row-level security violation"
        );
    }

    #[test]
    fn test_table_path_segments() {
        assert_eq!(Table::SkinAnalysis.as_str(), "skin_analysis");
        assert_eq!(Table::VirtualTryons.as_str(), "virtual_tryons");
        assert_eq!(Table::CartItems.to_string(), "cart_items");
    }
}
