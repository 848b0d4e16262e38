//! Row types mirroring the backing store's schema.
//!
//! These types are the schema contract: field names and nullability match
//! the store's tables column for column, so a row written by any client
//! deserializes here unchanged. `New*` types are the insert payloads - the
//! store fills in generated ids and timestamps.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use velvet_muse_core::{
    AnalysisId, CartItemId, OrderId, OrderItemId, OrderStatus, PaymentStatus, ProductId,
    ProfileId, SkinTone, TryonId, Undertone, UserId,
};

// =============================================================================
// Catalog
// =============================================================================

/// A catalog entry. Created and updated by an external admin process;
/// read-only from this client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub subcategory: Option<String>,
    pub brand: Option<String>,
    pub price: Decimal,
    /// Ordered; insertion order preserved, no uniqueness constraint.
    pub colors: Option<Vec<String>>,
    pub sizes: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub tags: Option<Vec<String>>,
    pub stock_quantity: Option<i32>,
    pub is_available: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Profile
// =============================================================================

/// One profile per user; created on first sign-in, mutated by user edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileRow {
    pub id: ProfileId,
    pub user_id: UserId,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub skin_tone: Option<String>,
    pub style_preferences: Option<Value>,
    pub body_measurements: Option<Value>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Partial profile update; absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skin_tone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_preferences: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_measurements: Option<Value>,
}

// =============================================================================
// Cart
// =============================================================================

/// One row per distinct (product, color, size) selection in a user's cart.
/// Deleted on checkout or removal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItemRow {
    pub id: CartItemId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: i32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for `cart_items`.
#[derive(Debug, Clone, Serialize)]
pub struct NewCartItem {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub color: Option<String>,
    pub size: Option<String>,
    pub quantity: i32,
}

// =============================================================================
// Orders
// =============================================================================

/// An order created at checkout. Status transitions are append-only via
/// update; orders are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub shipping_address: Option<Value>,
    pub total_amount: Decimal,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Insert payload for `orders`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    pub user_id: UserId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping_address: Value,
    pub total_amount: Decimal,
}

/// An immutable order line item. `price` is captured at order time and
/// must not follow later catalog price changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemRow {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub price: Decimal,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for `order_items`.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub price: Decimal,
    pub quantity: i32,
    pub size: Option<String>,
    pub color: Option<String>,
}

// =============================================================================
// Skin analysis
// =============================================================================

/// Numeric findings of an analysis run, stored as a structured blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub hydration_level: i64,
    pub oiliness: i64,
    pub sensitivity: i64,
    pub age_appearance: i64,
}

/// Recommendation lists attached to an analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendations {
    pub foundation_shades: Vec<String>,
    pub colors_to_wear: Vec<String>,
    pub skincare_tips: Vec<String>,
}

/// One row per analysis run; append-only history, never updated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkinAnalysisRow {
    pub id: AnalysisId,
    pub user_id: UserId,
    pub image_url: String,
    pub skin_tone: Option<SkinTone>,
    pub undertone: Option<Undertone>,
    pub analysis_results: Option<AnalysisResults>,
    pub recommendations: Option<Recommendations>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for `skin_analysis`.
#[derive(Debug, Clone, Serialize)]
pub struct NewSkinAnalysis {
    pub user_id: UserId,
    pub image_url: String,
    pub skin_tone: SkinTone,
    pub undertone: Undertone,
    pub analysis_results: AnalysisResults,
    pub recommendations: Recommendations,
}

// =============================================================================
// Virtual try-on
// =============================================================================

/// One row per try-on attempt. `result_image_url` is populated only when
/// an external render pipeline completes; this client always writes null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VirtualTryonRow {
    pub id: TryonId,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub user_image_url: String,
    pub result_image_url: Option<String>,
    pub is_saved: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for `virtual_tryons`.
#[derive(Debug, Clone, Serialize)]
pub struct NewVirtualTryon {
    pub user_id: UserId,
    pub product_id: ProductId,
    pub user_image_url: String,
    pub is_saved: bool,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_product_row_from_store_json() {
        let json = r#"{
            "id": "71b4b2a8-13c1-4c5f-86ae-6cf176a6e0a1",
            "name": "Lavender Silk Maxi Dress",
            "description": null,
            "category": "dresses",
            "subcategory": null,
            "brand": "Velvet Muse",
            "price": 189,
            "colors": ["Lavender"],
            "sizes": ["XS", "S", "M", "L", "XL"],
            "images": [],
            "tags": null,
            "stock_quantity": 12,
            "is_available": true,
            "created_at": "2026-01-15T09:30:00Z",
            "updated_at": null
        }"#;

        let row: ProductRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.name, "Lavender Silk Maxi Dress");
        assert_eq!(row.price, Decimal::new(189, 0));
        assert_eq!(row.sizes.as_deref().unwrap().len(), 5);
        assert!(row.tags.is_none());
    }

    #[test]
    fn test_order_row_keeps_unknown_status() {
        let json = format!(
            r#"{{
                "id": "{}",
                "user_id": "{}",
                "status": "awaiting_pickup",
                "payment_status": "paid",
                "shipping_address": {{"city": "Oslo"}},
                "total_amount": 254.5,
                "created_at": null,
                "updated_at": null
            }}"#,
            uuid::Uuid::new_v4(),
            uuid::Uuid::new_v4(),
        );

        let row: OrderRow = serde_json::from_str(&json).unwrap();
        assert_eq!(
            row.status,
            Some(OrderStatus::Other("awaiting_pickup".to_string()))
        );
        assert_eq!(row.payment_status, Some(PaymentStatus::Paid));
        assert_eq!(row.total_amount, Decimal::new(2545, 1));
    }

    #[test]
    fn test_new_analysis_serializes_capitalized_enums() {
        let payload = NewSkinAnalysis {
            user_id: UserId::new(uuid::Uuid::new_v4()),
            image_url: "https://store/object/public/skin-analysis/x.jpg".to_string(),
            skin_tone: SkinTone::Tan,
            undertone: Undertone::Warm,
            analysis_results: AnalysisResults {
                hydration_level: 61,
                oiliness: 22,
                sensitivity: 45,
                age_appearance: 27,
            },
            recommendations: Recommendations {
                foundation_shades: vec!["Warm Sand 320".to_string()],
                colors_to_wear: vec!["Burgundy".to_string()],
                skincare_tips: vec![],
            },
        };

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["skin_tone"], "Tan");
        assert_eq!(value["undertone"], "Warm");
        assert_eq!(value["analysis_results"]["age_appearance"], 27);
    }

    #[test]
    fn test_profile_changes_skip_absent_fields() {
        let changes = ProfileChanges {
            skin_tone: Some("Medium".to_string()),
            ..ProfileChanges::default()
        };
        let value = serde_json::to_value(&changes).unwrap();
        let object = value.as_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["skin_tone"], "Medium");
    }
}
