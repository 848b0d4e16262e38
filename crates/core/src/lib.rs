//! Velvet Muse Core - Shared types library.
//!
//! This crate provides common types used across all Velvet Muse components:
//! - `storefront` - The headless storefront client layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no HTTP clients, no async.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, statuses, and
//!   the skin-tone enumerations used by the analysis feature

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
