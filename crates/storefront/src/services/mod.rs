//! Business logic services for the storefront.
//!
//! # Services
//!
//! - [`engine`] - The analysis engine seam and its sampling implementation
//! - [`checkout`] - Cart checkout orchestration with price snapshots

pub mod checkout;
pub mod engine;
