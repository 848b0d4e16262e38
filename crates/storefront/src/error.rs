//! Unified error handling for view actions.
//!
//! Provides the `AppError` type returned by every fallible user action.
//! Failures are caught at the action boundary, converted to a user-visible
//! [`Notice`], and do not propagate further; none is fatal to the process.
//! The view returns to its pre-action state after reporting.

use thiserror::Error;

use crate::notify::Notice;
use crate::store::StoreError;

/// Application-level error type for storefront actions.
#[derive(Debug, Error)]
pub enum AppError {
    /// No signed-in identity for an action requiring one.
    #[error("Sign in required")]
    Unauthenticated,

    /// A required local file or selection is missing.
    #[error("Missing input: {0}")]
    NoInput(String),

    /// Writing to object storage failed.
    #[error("Storage write failed: {0}")]
    StorageWrite(#[source] StoreError),

    /// Persisting a row failed.
    #[error("Persistence failed: {0}")]
    Persistence(#[source] StoreError),

    /// A read or other store operation failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AppError {
    /// Convert into the generic user-visible notice for this failure.
    ///
    /// Views with feature-specific wording (the analysis flow) build their
    /// own notices instead.
    #[must_use]
    pub fn notice(&self) -> Notice {
        match self {
            Self::Unauthenticated => Notice::error(
                "Please sign in",
                "You need to be signed in to use this feature.",
            ),
            Self::NoInput(what) => Notice::error("Missing input", what.clone()),
            Self::StorageWrite(_) => Notice::error(
                "Upload failed",
                "We couldn't upload your photo. Please try again.",
            ),
            Self::Persistence(_) | Self::Store(_) => Notice::error(
                "Something went wrong",
                "The store couldn't complete your request. Please try again.",
            ),
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
