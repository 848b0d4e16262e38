//! Stylist chat view: ordered transcript plus the delayed canned reply.
//!
//! The transcript and draft live in a pure reducer; [`StylistChat`] wraps
//! them with the reply timer. Replies are appended by a spawned task after
//! [`REPLY_DELAY`], and every pending task is aborted when the controller
//! is dropped - a reply can never mutate state after teardown.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::task::JoinSet;

use velvet_muse_core::ChatRole;

/// How long the stylist "thinks" before replying.
pub const REPLY_DELAY: Duration = Duration::from_secs(1);

/// The message the transcript opens with.
pub const GREETING: &str = "Hello! I'm your AI stylist. I can help you find the perfect outfit \
     based on your body type, skin tone, and personal style. What would you like to explore \
     today?";

/// The reply sent after every user message.
pub const CANNED_REPLY: &str = "Based on your request, I'd recommend exploring soft, muted tones \
     that complement your natural coloring. Would you like me to show you some specific pieces \
     from our collection?";

/// Prompt suggestions the shell offers below the transcript.
pub const SUGGESTIONS: [&str; 4] = [
    "What colors look best on me?",
    "Outfit for a dinner date",
    "Professional wardrobe essentials",
    "Casual weekend looks",
];

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: u32,
    pub role: ChatRole,
    pub content: String,
    pub sent_at: DateTime<Utc>,
}

/// Snapshot of the chat view.
#[derive(Debug, Clone)]
pub struct ChatState {
    /// Messages in submission order.
    pub transcript: Vec<ChatMessage>,
    /// The input field's text.
    pub draft: String,
}

impl Default for ChatState {
    fn default() -> Self {
        Self {
            transcript: vec![ChatMessage {
                id: 1,
                role: ChatRole::Stylist,
                content: GREETING.to_string(),
                sent_at: Utc::now(),
            }],
            draft: String::new(),
        }
    }
}

/// Events the chat view reacts to.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    DraftChanged(String),
    /// Submit the draft. Empty or whitespace-only drafts append nothing.
    Submitted,
    /// A stylist reply arrived.
    ReplyArrived(String),
}

/// Pure reducer from (state, event) to new state.
#[must_use]
pub fn reduce(state: &ChatState, event: ChatEvent) -> ChatState {
    let mut next = state.clone();
    match event {
        ChatEvent::DraftChanged(draft) => next.draft = draft,
        ChatEvent::Submitted => {
            let content = next.draft.trim().to_string();
            if content.is_empty() {
                return next;
            }
            next.push(ChatRole::User, content);
            next.draft.clear();
        }
        ChatEvent::ReplyArrived(content) => next.push(ChatRole::Stylist, content),
    }
    next
}

impl ChatState {
    fn push(&mut self, role: ChatRole, content: String) {
        let id = u32::try_from(self.transcript.len()).unwrap_or(u32::MAX).saturating_add(1);
        self.transcript.push(ChatMessage {
            id,
            role,
            content,
            sent_at: Utc::now(),
        });
    }
}

// =============================================================================
// Controller
// =============================================================================

/// The chat view with its reply timer.
///
/// Must live inside a Tokio runtime; [`StylistChat::submit`] spawns the
/// delayed reply task. Dropping the controller aborts every pending reply.
pub struct StylistChat {
    state: Arc<Mutex<ChatState>>,
    replies: JoinSet<()>,
}

impl Default for StylistChat {
    fn default() -> Self {
        Self::new()
    }
}

impl StylistChat {
    /// A fresh chat opening with the stylist greeting.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ChatState::default())),
            replies: JoinSet::new(),
        }
    }

    /// A snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> ChatState {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update the draft text.
    pub fn set_draft(&self, draft: impl Into<String>) {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = reduce(&guard, ChatEvent::DraftChanged(draft.into()));
    }

    /// Submit the draft.
    ///
    /// Appends the user message immediately and schedules the canned reply
    /// after [`REPLY_DELAY`]. Empty or whitespace-only drafts do nothing.
    pub fn submit(&mut self) {
        let appended = {
            let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            let before = guard.transcript.len();
            *guard = reduce(&guard, ChatEvent::Submitted);
            guard.transcript.len() > before
        };

        if appended {
            let state = Arc::clone(&self.state);
            self.replies.spawn(async move {
                tokio::time::sleep(REPLY_DELAY).await;
                let mut guard = state.lock().unwrap_or_else(PoisonError::into_inner);
                *guard = reduce(&guard, ChatEvent::ReplyArrived(CANNED_REPLY.to_string()));
            });
        }
    }
}
