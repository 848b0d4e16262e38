//! End-to-end flows through the public API, no rendering surface attached.

#![allow(clippy::unwrap_used)]

use std::sync::Mutex;
use std::time::Duration;

use secrecy::SecretString;

use velvet_muse_core::{AnalysisId, ChatRole, Price, ProductId, SkinTone, Undertone, UserId};
use velvet_muse_storefront::auth::{AuthSession, Viewer};
use velvet_muse_storefront::media::LocalImage;
use velvet_muse_storefront::services::engine::ShadeSampler;
use velvet_muse_storefront::store::rows::{NewSkinAnalysis, SkinAnalysisRow};
use velvet_muse_storefront::store::StoreError;
use velvet_muse_storefront::views::analysis::{AnalysisPhase, AnalysisStore, SkinAnalysisView};
use velvet_muse_storefront::views::catalog::{
    reduce as reduce_catalog, CatalogEvent, CatalogProduct, CatalogState, CategoryFilter,
};
use velvet_muse_storefront::views::stylist::{StylistChat, REPLY_DELAY};
use velvet_muse_storefront::views::tryon::{TryOnItem, TryOnStudio, PROCESSING_DELAY};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "velvet_muse_storefront=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn product(name: &str, category: &str, price: i64) -> CatalogProduct {
    CatalogProduct {
        id: ProductId::new(uuid::Uuid::new_v4()),
        name: name.to_string(),
        category: category.to_string(),
        price: Price::usd(rust_decimal::Decimal::new(price, 0)),
        colors: vec!["Lavender".to_string()],
        sizes: vec!["S".to_string(), "M".to_string()],
        image: None,
        is_available: true,
    }
}

fn demo_catalog() -> CatalogState {
    CatalogState::new(vec![
        product("Lavender Silk Maxi Dress", "dresses", 189),
        product("Beige Linen Blazer", "outerwear", 129),
        product("Cream Silk Camisole", "tops", 65),
        product("Rose Gold Pleated Skirt", "bottoms", 95),
        product("Soft Cashmere Cardigan", "outerwear", 159),
        product("Minimalist Wrap Dress", "dresses", 145),
    ])
}

#[test]
fn browsing_filters_and_likes_without_touching_the_store() {
    let state = demo_catalog();

    // Filter down to dresses, like one, filter back out.
    let state = reduce_catalog(
        &state,
        CatalogEvent::CategorySelected(CategoryFilter::from_key("dresses")),
    );
    let visible = state.visible();
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0].name, "Lavender Silk Maxi Dress");
    assert_eq!(visible[1].name, "Minimalist Wrap Dress");

    let liked_id = visible[0].id;
    let state = reduce_catalog(&state, CatalogEvent::LikeToggled(liked_id));
    let state = reduce_catalog(
        &state,
        CatalogEvent::CategorySelected(CategoryFilter::All),
    );

    assert_eq!(state.visible().len(), 6);
    assert!(state.is_liked(liked_id));
}

#[tokio::test(start_paused = true)]
async fn chat_and_tryon_timers_run_to_completion() {
    let mut chat = StylistChat::new();
    chat.set_draft("What colors look best on me?");
    chat.submit();

    let mut studio = TryOnStudio::new(vec![TryOnItem {
        product_id: ProductId::new(uuid::Uuid::new_v4()),
        name: "Lavender Maxi Dress".to_string(),
        price: Price::usd(rust_decimal::Decimal::new(89, 0)),
        color: Some("Lavender".to_string()),
    }]);
    studio.start();
    assert!(studio.snapshot().processing);

    tokio::time::sleep(REPLY_DELAY.max(PROCESSING_DELAY) + Duration::from_millis(100)).await;
    tokio::task::yield_now().await;

    let transcript = chat.snapshot().transcript;
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1].role, ChatRole::User);
    assert_eq!(transcript[2].role, ChatRole::Stylist);
    assert!(!studio.snapshot().processing);
}

/// In-memory stand-in for the backing store's analysis surface.
#[derive(Default)]
struct MemoryStore {
    rows: Mutex<Vec<SkinAnalysisRow>>,
    objects: Mutex<Vec<String>>,
}

impl AnalysisStore for MemoryStore {
    async fn upload_image(
        &self,
        _auth: &AuthSession,
        bucket: &str,
        key: &str,
        _image: &LocalImage,
    ) -> Result<(), StoreError> {
        self.objects.lock().unwrap().push(format!("{bucket}/{key}"));
        Ok(())
    }

    fn image_url(&self, bucket: &str, key: &str) -> String {
        format!("https://store.test/object/public/{bucket}/{key}")
    }

    async fn persist_analysis(
        &self,
        auth: &AuthSession,
        analysis: &NewSkinAnalysis,
    ) -> Result<SkinAnalysisRow, StoreError> {
        let row = SkinAnalysisRow {
            id: AnalysisId::new(uuid::Uuid::new_v4()),
            user_id: auth.user_id(),
            image_url: analysis.image_url.clone(),
            skin_tone: Some(analysis.skin_tone),
            undertone: Some(analysis.undertone),
            analysis_results: Some(analysis.analysis_results.clone()),
            recommendations: Some(analysis.recommendations.clone()),
            created_at: Some(chrono::Utc::now()),
        };
        self.rows.lock().unwrap().push(row.clone());
        Ok(row)
    }
}

#[tokio::test]
async fn analysis_flow_from_photo_pick_to_persisted_row() {
    init_tracing();
    let store = MemoryStore::default();
    let viewer = Viewer::signed_in(AuthSession::new(
        UserId::new(uuid::Uuid::new_v4()),
        SecretString::from("integration-token".to_string()),
    ));

    // The shell hands over the file reader's data URL.
    let image = LocalImage::from_data_url("face.jpg", "data:image/jpeg;base64,/9j/4AA=")
        .expect("valid data url");

    let mut view = SkinAnalysisView::new("skin-analysis");
    view.select_image(image);
    let notice = view.analyze(&store, &viewer, &ShadeSampler).await;

    assert!(!notice.is_error());
    assert!(matches!(view.phase, AnalysisPhase::Complete(_)));

    let rows = store.rows.lock().unwrap();
    assert_eq!(rows.len(), 1);
    assert!(SkinTone::ALL.contains(&rows[0].skin_tone.unwrap()));
    assert!(Undertone::ALL.contains(&rows[0].undertone.unwrap()));
    assert_eq!(
        rows[0].recommendations.as_ref().unwrap().foundation_shades,
        vec!["Ivory 110", "Natural Beige 220", "Warm Sand 320"]
    );

    let objects = store.objects.lock().unwrap();
    assert_eq!(objects.len(), 1);
    assert!(objects[0].starts_with("skin-analysis/"));
}

#[tokio::test]
async fn analysis_flow_rejects_anonymous_viewer_without_side_effects() {
    let store = MemoryStore::default();
    let mut view = SkinAnalysisView::new("skin-analysis");
    view.select_image(LocalImage::new("face.jpg", "image/jpeg", vec![1, 2, 3]));

    let notice = view.analyze(&store, &Viewer::anonymous(), &ShadeSampler).await;

    assert!(notice.is_error());
    assert!(store.rows.lock().unwrap().is_empty());
    assert!(store.objects.lock().unwrap().is_empty());
}
