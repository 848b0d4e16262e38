//! REST client for the backing store.
//!
//! Uses `reqwest` with a default-headers client carrying the publishable
//! API key; scoped requests add the viewer's bearer token per call.
//! Catalog reads are cached with `moka` (5-minute TTL).

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use velvet_muse_core::{CartItemId, OrderId, OrderStatus, ProductId};

use crate::auth::AuthSession;
use crate::config::StorefrontConfig;

use super::cache::{CacheKey, CacheValue};
use super::rows::{
    CartItemRow, NewCartItem, NewOrder, NewOrderItem, NewSkinAnalysis, NewVirtualTryon,
    OrderItemRow, OrderRow, ProductRow, ProfileChanges, ProfileRow, SkinAnalysisRow,
    VirtualTryonRow,
};
use super::{StoreError, Table};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

/// Build a PostgREST equality filter value.
fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

// =============================================================================
// StoreClient
// =============================================================================

/// Client for the backing store's REST and object-storage APIs.
///
/// Cheaply cloneable via `Arc`; one instance is shared by every view.
#[derive(Clone)]
pub struct StoreClient {
    inner: Arc<StoreClientInner>,
}

struct StoreClientInner {
    client: reqwest::Client,
    rest_url: Url,
    storage_url: Url,
    catalog: Cache<CacheKey, CacheValue>,
}

impl StoreClient {
    /// Create a new backing-store client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build or the configured
    /// base URL cannot host the REST and storage endpoints.
    pub fn new(config: &StorefrontConfig) -> Result<Self, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "apikey",
            HeaderValue::from_str(&config.store_key)
                .map_err(|e| StoreError::Parse(format!("Invalid API key format: {e}")))?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let rest_url = config
            .store_url
            .join("rest/v1/")
            .map_err(|e| StoreError::Parse(e.to_string()))?;
        let storage_url = config
            .store_url
            .join("storage/v1/")
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        let catalog = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(StoreClientInner {
                client,
                rest_url,
                storage_url,
                catalog,
            }),
        })
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    /// List every product in the catalog. Cached.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<ProductRow>, StoreError> {
        if let Some(CacheValue::Products(rows)) = self.inner.catalog.get(&CacheKey::Products).await
        {
            debug!("catalog cache hit");
            return Ok(rows);
        }

        let rows: Vec<ProductRow> = self.select_rows(None, Table::Products, &[]).await?;
        self.inner
            .catalog
            .insert(CacheKey::Products, CacheValue::Products(rows.clone()))
            .await;
        Ok(rows)
    }

    /// Get a single product by id. Cached.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if no such product exists.
    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ProductId) -> Result<ProductRow, StoreError> {
        let key = CacheKey::Product(id);
        if let Some(CacheValue::Product(row)) = self.inner.catalog.get(&key).await {
            return Ok(*row);
        }

        let rows: Vec<ProductRow> = self
            .select_rows(None, Table::Products, &[("id", eq(id))])
            .await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("product {id}")))?;

        self.inner
            .catalog
            .insert(key, CacheValue::Product(Box::new(row.clone())))
            .await;
        Ok(row)
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Get the signed-in viewer's profile, if one exists.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn profile(&self, auth: &AuthSession) -> Result<Option<ProfileRow>, StoreError> {
        let rows: Vec<ProfileRow> = self
            .select_rows(
                Some(auth),
                Table::Profiles,
                &[("user_id", eq(auth.user_id()))],
            )
            .await?;
        Ok(rows.into_iter().next())
    }

    /// Apply profile edits; absent fields are left untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    #[instrument(skip(self, auth, changes))]
    pub async fn update_profile(
        &self,
        auth: &AuthSession,
        changes: &ProfileChanges,
    ) -> Result<ProfileRow, StoreError> {
        self.update_rows(
            auth,
            Table::Profiles,
            &[("user_id", eq(auth.user_id()))],
            changes,
        )
        .await
    }

    // =========================================================================
    // Cart
    // =========================================================================

    /// The signed-in viewer's cart rows.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn cart_items(&self, auth: &AuthSession) -> Result<Vec<CartItemRow>, StoreError> {
        self.select_rows(
            Some(auth),
            Table::CartItems,
            &[("user_id", eq(auth.user_id()))],
        )
        .await
    }

    /// Insert a cart row for one (product, color, size) selection.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    #[instrument(skip(self, auth, item), fields(product_id = %item.product_id))]
    pub async fn add_cart_item(
        &self,
        auth: &AuthSession,
        item: &NewCartItem,
    ) -> Result<CartItemRow, StoreError> {
        self.insert_row(auth, Table::CartItems, item).await
    }

    /// Delete one cart row.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn remove_cart_item(
        &self,
        auth: &AuthSession,
        id: CartItemId,
    ) -> Result<(), StoreError> {
        self.delete_rows(
            auth,
            Table::CartItems,
            &[("id", eq(id)), ("user_id", eq(auth.user_id()))],
        )
        .await
    }

    /// Delete every cart row for the signed-in viewer (checkout).
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn clear_cart(&self, auth: &AuthSession) -> Result<(), StoreError> {
        self.delete_rows(
            auth,
            Table::CartItems,
            &[("user_id", eq(auth.user_id()))],
        )
        .await
    }

    // =========================================================================
    // Orders
    // =========================================================================

    /// Create an order at checkout.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    #[instrument(skip(self, auth, order), fields(total = %order.total_amount))]
    pub async fn create_order(
        &self,
        auth: &AuthSession,
        order: &NewOrder,
    ) -> Result<OrderRow, StoreError> {
        self.insert_row(auth, Table::Orders, order).await
    }

    /// Insert one immutable order line item.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn add_order_item(
        &self,
        auth: &AuthSession,
        item: &NewOrderItem,
    ) -> Result<OrderItemRow, StoreError> {
        self.insert_row(auth, Table::OrderItems, item).await
    }

    /// The signed-in viewer's order history.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn orders(&self, auth: &AuthSession) -> Result<Vec<OrderRow>, StoreError> {
        self.select_rows(Some(auth), Table::Orders, &[("user_id", eq(auth.user_id()))])
            .await
    }

    /// Advance an order's status. Transitions are append-only; orders are
    /// never deleted.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    #[instrument(skip(self, auth))]
    pub async fn update_order_status(
        &self,
        auth: &AuthSession,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<OrderRow, StoreError> {
        self.update_rows(
            auth,
            Table::Orders,
            &[("id", eq(id)), ("user_id", eq(auth.user_id()))],
            &serde_json::json!({ "status": status }),
        )
        .await
    }

    // =========================================================================
    // Skin analysis
    // =========================================================================

    /// Persist one analysis run.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    #[instrument(skip(self, auth, analysis))]
    pub async fn insert_analysis(
        &self,
        auth: &AuthSession,
        analysis: &NewSkinAnalysis,
    ) -> Result<SkinAnalysisRow, StoreError> {
        self.insert_row(auth, Table::SkinAnalysis, analysis).await
    }

    /// The signed-in viewer's analysis history.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn analyses(&self, auth: &AuthSession) -> Result<Vec<SkinAnalysisRow>, StoreError> {
        self.select_rows(
            Some(auth),
            Table::SkinAnalysis,
            &[("user_id", eq(auth.user_id()))],
        )
        .await
    }

    // =========================================================================
    // Virtual try-on
    // =========================================================================

    /// Persist one try-on attempt.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn insert_tryon(
        &self,
        auth: &AuthSession,
        tryon: &NewVirtualTryon,
    ) -> Result<VirtualTryonRow, StoreError> {
        self.insert_row(auth, Table::VirtualTryons, tryon).await
    }

    /// The signed-in viewer's try-on history.
    ///
    /// # Errors
    ///
    /// Returns error if the store request fails.
    pub async fn tryons(&self, auth: &AuthSession) -> Result<Vec<VirtualTryonRow>, StoreError> {
        self.select_rows(
            Some(auth),
            Table::VirtualTryons,
            &[("user_id", eq(auth.user_id()))],
        )
        .await
    }

    // =========================================================================
    // Object storage
    // =========================================================================

    /// Upload bytes under `bucket/key`.
    ///
    /// # Errors
    ///
    /// Returns error if the upload is rejected or the request fails.
    #[instrument(skip(self, auth, bytes), fields(len = bytes.len()))]
    pub async fn upload_object(
        &self,
        auth: &AuthSession,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let url = self
            .inner
            .storage_url
            .join(&format!("object/{bucket}/{key}"))
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        let response = self
            .inner
            .client
            .post(url)
            .bearer_auth(auth.bearer_token())
            .header(CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// The publicly addressable URL for an uploaded object.
    #[must_use]
    pub fn public_object_url(&self, bucket: &str, key: &str) -> String {
        format!("{}object/public/{bucket}/{key}", self.inner.storage_url)
    }

    // =========================================================================
    // Row primitives
    // =========================================================================

    fn endpoint(&self, table: Table) -> Result<Url, StoreError> {
        self.inner
            .rest_url
            .join(table.as_str())
            .map_err(|e| StoreError::Parse(e.to_string()))
    }

    /// Insert one row and return it with its generated id.
    async fn insert_row<T, R>(
        &self,
        auth: &AuthSession,
        table: Table,
        row: &T,
    ) -> Result<R, StoreError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .inner
            .client
            .post(self.endpoint(table)?)
            .bearer_auth(auth.bearer_token())
            .header("Prefer", "return=representation")
            .json(row)
            .send()
            .await?;

        let rows: Vec<R> = Self::take_json(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::Parse(format!("insert into {table} returned no rows")))
    }

    /// Select rows matching every column filter, scoped to `auth` when given.
    async fn select_rows<R>(
        &self,
        auth: Option<&AuthSession>,
        table: Table,
        filters: &[(&str, String)],
    ) -> Result<Vec<R>, StoreError>
    where
        R: DeserializeOwned,
    {
        let mut request = self
            .inner
            .client
            .get(self.endpoint(table)?)
            .query(&[("select", "*")]);
        for (column, condition) in filters {
            request = request.query(&[(column, condition)]);
        }
        if let Some(auth) = auth {
            request = request.bearer_auth(auth.bearer_token());
        }

        Self::take_json(request.send().await?).await
    }

    /// Patch rows matching every column filter and return the first.
    async fn update_rows<T, R>(
        &self,
        auth: &AuthSession,
        table: Table,
        filters: &[(&str, String)],
        patch: &T,
    ) -> Result<R, StoreError>
    where
        T: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self
            .inner
            .client
            .patch(self.endpoint(table)?)
            .bearer_auth(auth.bearer_token())
            .header("Prefer", "return=representation");
        for (column, condition) in filters {
            request = request.query(&[(column, condition)]);
        }

        let rows: Vec<R> = Self::take_json(request.json(patch).send().await?).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(format!("no matching row in {table}")))
    }

    /// Delete rows matching every column filter.
    async fn delete_rows(
        &self,
        auth: &AuthSession,
        table: Table,
        filters: &[(&str, String)],
    ) -> Result<(), StoreError> {
        let mut request = self
            .inner
            .client
            .delete(self.endpoint(table)?)
            .bearer_auth(auth.bearer_token());
        for (column, condition) in filters {
            request = request.query(&[(column, condition)]);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Check the status and decode the JSON body.
    async fn take_json<R: DeserializeOwned>(response: reqwest::Response) -> Result<R, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))
    }
}
