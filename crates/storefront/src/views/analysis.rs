//! Skin analysis view: the upload/analyze/persist pipeline.
//!
//! The pipeline is a strict sequence - identity check, image check, upload,
//! URL resolution, generation, row insert - and each step can fail on its
//! own. Upload and insert are separate requests with no transaction between
//! them: if the insert fails after the upload succeeded, the stored image
//! is orphaned. That inconsistency is inherent to the store contract and is
//! surfaced, not corrected, here.

use chrono::Utc;
use tracing::{info, instrument, warn};

use crate::auth::{AuthSession, Viewer};
use crate::error::AppError;
use crate::media::LocalImage;
use crate::notify::Notice;
use crate::services::engine::AnalysisEngine;
use crate::store::rows::{NewSkinAnalysis, SkinAnalysisRow};
use crate::store::{StoreClient, StoreError};

/// The store surface the pipeline needs.
///
/// Narrow on purpose: the pipeline only uploads one object, resolves its
/// URL, and inserts one row.
#[allow(async_fn_in_trait)]
pub trait AnalysisStore {
    /// Upload the image bytes under `bucket/key`.
    async fn upload_image(
        &self,
        auth: &AuthSession,
        bucket: &str,
        key: &str,
        image: &LocalImage,
    ) -> Result<(), StoreError>;

    /// The publicly addressable URL for an uploaded object.
    fn image_url(&self, bucket: &str, key: &str) -> String;

    /// Insert one analysis row and return it with its generated id.
    async fn persist_analysis(
        &self,
        auth: &AuthSession,
        analysis: &NewSkinAnalysis,
    ) -> Result<SkinAnalysisRow, StoreError>;
}

impl AnalysisStore for StoreClient {
    async fn upload_image(
        &self,
        auth: &AuthSession,
        bucket: &str,
        key: &str,
        image: &LocalImage,
    ) -> Result<(), StoreError> {
        self.upload_object(auth, bucket, key, image.bytes.clone(), &image.content_type)
            .await
    }

    fn image_url(&self, bucket: &str, key: &str) -> String {
        self.public_object_url(bucket, key)
    }

    async fn persist_analysis(
        &self,
        auth: &AuthSession,
        analysis: &NewSkinAnalysis,
    ) -> Result<SkinAnalysisRow, StoreError> {
        self.insert_analysis(auth, analysis).await
    }
}

/// Where the pipeline currently is.
///
/// `Failed` is terminal: there is no partial resume, and another run
/// starts over from `Idle` via [`SkinAnalysisView::reset`].
#[derive(Debug, Clone, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    Uploading,
    Analyzing,
    Persisting,
    Complete(Box<SkinAnalysisRow>),
    Failed,
}

impl AnalysisPhase {
    /// Whether a run is currently in flight.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        matches!(self, Self::Uploading | Self::Analyzing | Self::Persisting)
    }
}

/// Snapshot of the skin analysis view.
#[derive(Debug, Clone, Default)]
pub struct SkinAnalysisView {
    /// Pipeline phase.
    pub phase: AnalysisPhase,
    /// The photo picked from the viewer's device, previewed until upload.
    selected: Option<LocalImage>,
    /// Bucket the upload lands in.
    bucket: String,
}

impl SkinAnalysisView {
    /// A fresh view uploading into the given bucket.
    #[must_use]
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            phase: AnalysisPhase::Idle,
            selected: None,
            bucket: bucket.into(),
        }
    }

    /// Pick a photo. Replaces any previous pick; an earlier result stays
    /// visible until the next run.
    pub fn select_image(&mut self, image: LocalImage) {
        self.selected = Some(image);
    }

    /// The currently picked photo.
    #[must_use]
    pub const fn selected_image(&self) -> Option<&LocalImage> {
        self.selected.as_ref()
    }

    /// Return to `Idle` so a failed run can be retried from the start.
    pub fn reset(&mut self) {
        self.phase = AnalysisPhase::Idle;
    }

    /// Run the full pipeline and report the outcome.
    ///
    /// This is the action boundary: every failure is converted into the
    /// returned [`Notice`] and goes no further.
    #[instrument(skip_all)]
    pub async fn analyze<S, E>(&mut self, store: &S, viewer: &Viewer, engine: &E) -> Notice
    where
        S: AnalysisStore,
        E: AnalysisEngine,
    {
        match self.run(store, viewer, engine).await {
            Ok(row) => {
                info!(analysis_id = %row.id, "skin analysis complete");
                self.phase = AnalysisPhase::Complete(Box::new(row));
                Notice::success(
                    "Analysis Complete!",
                    "Your skin analysis has been completed successfully.",
                )
            }
            Err(err) => {
                warn!(error = %err, "skin analysis failed");
                self.phase = AnalysisPhase::Failed;
                match err {
                    AppError::Unauthenticated => Notice::error(
                        "Please sign in",
                        "You need to be signed in to use skin analysis",
                    ),
                    AppError::NoInput(description) => {
                        Notice::error("No photo selected", description)
                    }
                    _ => Notice::error(
                        "Analysis Failed",
                        "Failed to analyze your skin. Please try again.",
                    ),
                }
            }
        }
    }

    /// The pipeline itself: `Idle -> Uploading -> Analyzing -> Persisting`.
    ///
    /// The identity and image checks run before any store call is issued.
    async fn run<S, E>(
        &mut self,
        store: &S,
        viewer: &Viewer,
        engine: &E,
    ) -> Result<SkinAnalysisRow, AppError>
    where
        S: AnalysisStore,
        E: AnalysisEngine,
    {
        let auth = viewer.require()?;
        let image = self.selected.as_ref().ok_or_else(|| {
            AppError::NoInput("Select a photo before running the analysis.".to_string())
        })?;

        self.phase = AnalysisPhase::Uploading;
        let key = format!("{}/{}.jpg", auth.user_id(), Utc::now().timestamp_millis());
        store
            .upload_image(auth, &self.bucket, &key, image)
            .await
            .map_err(AppError::StorageWrite)?;
        let image_url = store.image_url(&self.bucket, &key);

        self.phase = AnalysisPhase::Analyzing;
        let generated = engine.analyze(image);

        self.phase = AnalysisPhase::Persisting;
        store
            .persist_analysis(
                auth,
                &NewSkinAnalysis {
                    user_id: auth.user_id(),
                    image_url,
                    skin_tone: generated.skin_tone,
                    undertone: generated.undertone,
                    analysis_results: generated.analysis_results,
                    recommendations: generated.recommendations,
                },
            )
            .await
            .map_err(AppError::Persistence)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use secrecy::SecretString;
    use velvet_muse_core::{AnalysisId, SkinTone, Undertone, UserId};

    /// Records every store call so tests can assert what was (not) issued.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
        fail_upload: bool,
        fail_persist: bool,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl AnalysisStore for RecordingStore {
        async fn upload_image(
            &self,
            _auth: &AuthSession,
            bucket: &str,
            key: &str,
            _image: &LocalImage,
        ) -> Result<(), StoreError> {
            self.calls.lock().unwrap().push(format!("upload {bucket}/{key}"));
            if self.fail_upload {
                return Err(StoreError::Api {
                    status: 500,
                    message: "bucket unavailable".to_string(),
                });
            }
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
            self.calls.lock().unwrap().push("persist".to_string());
            if self.fail_persist {
                return Err(StoreError::Api {
                    status: 500,
                    message: "insert rejected".to_string(),
                });
            }
            Ok(SkinAnalysisRow {
                id: AnalysisId::new(uuid::Uuid::new_v4()),
                user_id: auth.user_id(),
                image_url: analysis.image_url.clone(),
                skin_tone: Some(analysis.skin_tone),
                undertone: Some(analysis.undertone),
                analysis_results: Some(analysis.analysis_results.clone()),
                recommendations: Some(analysis.recommendations.clone()),
                created_at: Some(Utc::now()),
            })
        }
    }

    fn signed_in() -> Viewer {
        Viewer::signed_in(AuthSession::new(
            UserId::new(uuid::Uuid::new_v4()),
            SecretString::from("token".to_string()),
        ))
    }

    fn view_with_image() -> SkinAnalysisView {
        let mut view = SkinAnalysisView::new("skin-analysis");
        view.select_image(LocalImage::new("face.jpg", "image/jpeg", vec![0xff, 0xd8]));
        view
    }

    #[tokio::test]
    async fn test_unauthenticated_run_issues_no_store_calls() {
        let store = RecordingStore::default();
        let mut view = view_with_image();

        let notice = view
            .analyze(&store, &Viewer::anonymous(), &crate::services::engine::ShadeSampler)
            .await;

        assert!(notice.is_error());
        assert_eq!(notice.title, "Please sign in");
        assert!(matches!(view.phase, AnalysisPhase::Failed));
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_image_fails_before_any_store_call() {
        let store = RecordingStore::default();
        let mut view = SkinAnalysisView::new("skin-analysis");

        let notice = view
            .analyze(&store, &signed_in(), &crate::services::engine::ShadeSampler)
            .await;

        assert_eq!(notice.title, "No photo selected");
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_successful_run_completes_with_sampled_result() {
        let store = RecordingStore::default();
        let viewer = signed_in();
        let user_id = viewer.session().unwrap().user_id();
        let mut view = view_with_image();

        let notice = view
            .analyze(&store, &viewer, &crate::services::engine::ShadeSampler)
            .await;

        assert_eq!(notice.title, "Analysis Complete!");
        let AnalysisPhase::Complete(row) = &view.phase else {
            panic!("expected Complete, got {:?}", view.phase);
        };
        assert_eq!(row.user_id, user_id);
        assert!(SkinTone::ALL.contains(&row.skin_tone.unwrap()));
        assert!(Undertone::ALL.contains(&row.undertone.unwrap()));
        let results = row.analysis_results.as_ref().unwrap();
        assert!((0..100).contains(&results.hydration_level));
        assert!((0..100).contains(&results.oiliness));
        assert!((0..100).contains(&results.sensitivity));
        assert!((20..30).contains(&results.age_appearance));

        // Upload happened before the insert, under a key namespaced by
        // the user id.
        let calls = store.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with(&format!("upload skin-analysis/{user_id}/")));
        assert_eq!(calls[1], "persist");
        assert!(row.image_url.contains(&user_id.to_string()));
    }

    #[tokio::test]
    async fn test_upload_failure_aborts_before_persist() {
        let store = RecordingStore {
            fail_upload: true,
            ..RecordingStore::default()
        };
        let mut view = view_with_image();

        let notice = view
            .analyze(&store, &signed_in(), &crate::services::engine::ShadeSampler)
            .await;

        assert_eq!(notice.title, "Analysis Failed");
        assert!(matches!(view.phase, AnalysisPhase::Failed));
        assert_eq!(store.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_persist_failure_leaves_uploaded_image_behind() {
        let store = RecordingStore {
            fail_persist: true,
            ..RecordingStore::default()
        };
        let mut view = view_with_image();

        let notice = view
            .analyze(&store, &signed_in(), &crate::services::engine::ShadeSampler)
            .await;

        assert!(notice.is_error());
        assert!(matches!(view.phase, AnalysisPhase::Failed));
        // The upload went through; with no transaction across the two
        // requests the stored object is now orphaned.
        let calls = store.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].starts_with("upload"));
    }

    #[tokio::test]
    async fn test_reset_returns_to_idle_for_manual_retry() {
        let store = RecordingStore {
            fail_upload: true,
            ..RecordingStore::default()
        };
        let mut view = view_with_image();
        view.analyze(&store, &signed_in(), &crate::services::engine::ShadeSampler)
            .await;
        assert!(matches!(view.phase, AnalysisPhase::Failed));

        view.reset();
        assert!(matches!(view.phase, AnalysisPhase::Idle));
        assert!(!view.phase.is_busy());
    }
}
