//! Virtual try-on studio: single-select item list and the processing timer.
//!
//! No compositing happens here: "processing" is a busy flag cleared after a
//! fixed delay. The render pipeline that would fill `result_image_url` is
//! external; saving a look persists the attempt with a null result.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::warn;

use velvet_muse_core::{Price, ProductId};

use crate::auth::Viewer;
use crate::error::AppError;
use crate::notify::Notice;
use crate::store::rows::{NewVirtualTryon, ProductRow};
use crate::store::StoreClient;

/// How long the busy flag stays set per try-on.
pub const PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// A catalog item offered in the try-on list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TryOnItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Price,
    pub color: Option<String>,
}

impl From<&ProductRow> for TryOnItem {
    fn from(row: &ProductRow) -> Self {
        Self {
            product_id: row.id,
            name: row.name.clone(),
            price: Price::usd(row.price),
            color: row
                .colors
                .as_ref()
                .and_then(|colors| colors.first().cloned()),
        }
    }
}

/// Snapshot of the try-on view.
#[derive(Debug, Clone, Default)]
pub struct TryOnState {
    /// Items offered for try-on.
    pub items: Vec<TryOnItem>,
    /// The single selected item. Exactly one item is selected whenever the
    /// list is non-empty.
    pub selected: Option<ProductId>,
    /// Busy flag while the simulated processing runs.
    pub processing: bool,
}

/// Events the try-on view reacts to.
#[derive(Debug, Clone)]
pub enum TryOnEvent {
    /// Select one item; replaces any previous selection.
    ItemSelected(ProductId),
    /// Start processing. Ignored while already processing.
    Started,
    /// Processing finished.
    Finished,
}

/// Pure reducer from (state, event) to new state.
#[must_use]
pub fn reduce(state: &TryOnState, event: TryOnEvent) -> TryOnState {
    let mut next = state.clone();
    match event {
        TryOnEvent::ItemSelected(id) => {
            if next.items.iter().any(|item| item.product_id == id) {
                next.selected = Some(id);
            }
        }
        TryOnEvent::Started => {
            if !next.processing {
                next.processing = true;
            }
        }
        TryOnEvent::Finished => next.processing = false,
    }
    next
}

impl TryOnState {
    /// A try-on list with the first item selected.
    #[must_use]
    pub fn new(items: Vec<TryOnItem>) -> Self {
        let selected = items.first().map(|item| item.product_id);
        Self {
            items,
            selected,
            processing: false,
        }
    }

    /// The selected item, if any.
    #[must_use]
    pub fn selected_item(&self) -> Option<&TryOnItem> {
        self.selected
            .and_then(|id| self.items.iter().find(|item| item.product_id == id))
    }
}

// =============================================================================
// Controller
// =============================================================================

/// The try-on view with its processing timer.
///
/// Must live inside a Tokio runtime; [`TryOnStudio::start`] spawns the task
/// that clears the busy flag. Dropping the controller aborts pending
/// timers, so the flag can never flip after teardown.
pub struct TryOnStudio {
    state: Arc<Mutex<TryOnState>>,
    jobs: JoinSet<()>,
}

impl TryOnStudio {
    /// A studio over the given items, first item selected.
    #[must_use]
    pub fn new(items: Vec<TryOnItem>) -> Self {
        Self {
            state: Arc::new(Mutex::new(TryOnState::new(items))),
            jobs: JoinSet::new(),
        }
    }

    /// A snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> TryOnState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Select one item.
    pub fn select(&self, id: ProductId) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = reduce(&guard, TryOnEvent::ItemSelected(id));
    }

    /// Start the simulated try-on.
    ///
    /// Sets the busy flag and clears it after [`PROCESSING_DELAY`]. A
    /// second start while busy does nothing.
    pub fn start(&mut self) {
        let started = {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            if guard.processing {
                false
            } else {
                *guard = reduce(&guard, TryOnEvent::Started);
                true
            }
        };

        if started {
            let state = Arc::clone(&self.state);
            self.jobs.spawn(async move {
                tokio::time::sleep(PROCESSING_DELAY).await;
                let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                *guard = reduce(&guard, TryOnEvent::Finished);
            });
        }
    }

    /// Persist the current look for the signed-in viewer.
    ///
    /// The render pipeline is external, so the stored row carries the
    /// user's photo URL and a null result.
    pub async fn save_look(
        &self,
        store: &StoreClient,
        viewer: &Viewer,
        user_image_url: String,
    ) -> Notice {
        match self.try_save(store, viewer, user_image_url).await {
            Ok(()) => Notice::success("Look saved", "Find it any time in your try-on history."),
            Err(err) => {
                warn!(error = %err, "saving try-on failed");
                err.notice()
            }
        }
    }

    async fn try_save(
        &self,
        store: &StoreClient,
        viewer: &Viewer,
        user_image_url: String,
    ) -> Result<(), AppError> {
        let auth = viewer.require()?;
        let product_id = self
            .snapshot()
            .selected
            .ok_or_else(|| AppError::NoInput("Select an item to try on first.".to_string()))?;

        store
            .insert_tryon(
                auth,
                &NewVirtualTryon {
                    user_id: auth.user_id(),
                    product_id,
                    user_image_url,
                    is_saved: true,
                },
            )
            .await
            .map_err(AppError::Persistence)?;
        Ok(())
    }
}
