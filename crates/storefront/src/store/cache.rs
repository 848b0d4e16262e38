//! Cache types for catalog reads.

use velvet_muse_core::ProductId;

use super::rows::ProductRow;

/// Cache key for catalog reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<ProductRow>),
    Products(Vec<ProductRow>),
}
