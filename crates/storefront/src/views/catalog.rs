//! Catalog view: category filtering and the client-local like set.

use std::collections::HashSet;

use velvet_muse_core::{Price, ProductId};

use crate::store::rows::ProductRow;
use crate::store::{StoreClient, StoreError};

/// The category filter applied to the catalog grid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// The sentinel "all" key: every product passes.
    #[default]
    All,
    /// Only products whose category equals the key pass.
    Category(String),
}

impl CategoryFilter {
    /// The sentinel key selecting every product.
    pub const ALL_KEY: &'static str = "all";

    /// Parse a filter from its UI key.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        if key == Self::ALL_KEY {
            Self::All
        } else {
            Self::Category(key.to_string())
        }
    }

    /// The UI key for this filter.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::All => Self::ALL_KEY,
            Self::Category(key) => key,
        }
    }

    /// Whether a product with this category passes the filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Category(key) => key == category,
        }
    }
}

/// A catalog entry as the grid displays it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Price,
    pub colors: Vec<String>,
    pub sizes: Vec<String>,
    pub image: Option<String>,
    pub is_available: bool,
}

impl From<ProductRow> for CatalogProduct {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category: row.category,
            price: Price::usd(row.price),
            colors: row.colors.unwrap_or_default(),
            sizes: row.sizes.unwrap_or_default(),
            image: row.images.and_then(|images| images.into_iter().next()),
            is_available: row.is_available.unwrap_or(true),
        }
    }
}

/// Snapshot of the catalog view.
#[derive(Debug, Clone, Default)]
pub struct CatalogState {
    /// Every product, in catalog order.
    pub products: Vec<CatalogProduct>,
    /// The active category filter.
    pub filter: CategoryFilter,
    /// Product ids liked by the current viewer. Client-local only; this
    /// never reaches the store.
    pub liked: HashSet<ProductId>,
    /// The search field's text. Captured here but not applied to
    /// [`CatalogState::visible`]; the search box is not wired to
    /// filtering.
    pub query: String,
}

/// Events the catalog view reacts to.
#[derive(Debug, Clone)]
pub enum CatalogEvent {
    CategorySelected(CategoryFilter),
    LikeToggled(ProductId),
    QueryChanged(String),
}

/// Pure reducer from (state, event) to new state.
#[must_use]
pub fn reduce(state: &CatalogState, event: CatalogEvent) -> CatalogState {
    let mut next = state.clone();
    match event {
        CatalogEvent::CategorySelected(filter) => next.filter = filter,
        CatalogEvent::LikeToggled(id) => {
            if !next.liked.remove(&id) {
                next.liked.insert(id);
            }
        }
        CatalogEvent::QueryChanged(query) => next.query = query,
    }
    next
}

impl CatalogState {
    /// A catalog over the given products, unfiltered.
    #[must_use]
    pub fn new(products: Vec<CatalogProduct>) -> Self {
        Self {
            products,
            ..Self::default()
        }
    }

    /// Load the catalog from the store.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn load(store: &StoreClient) -> Result<Self, StoreError> {
        let products = store.list_products().await?;
        Ok(Self::new(products.into_iter().map(Into::into).collect()))
    }

    /// The products the active filter lets through, in catalog order.
    #[must_use]
    pub fn visible(&self) -> Vec<&CatalogProduct> {
        self.products
            .iter()
            .filter(|product| self.filter.matches(&product.category))
            .collect()
    }

    /// Distinct categories, in catalog order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|product| product.category.as_str())
            .filter(|category| seen.insert(*category))
            .collect()
    }

    /// Whether the viewer has liked a product.
    #[must_use]
    pub fn is_liked(&self, id: ProductId) -> bool {
        self.liked.contains(&id)
    }
}
