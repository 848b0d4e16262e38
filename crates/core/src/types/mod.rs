//! Core types for Velvet Muse.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod skin;
pub mod status;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use skin::{SkinTone, Undertone};
pub use status::*;
