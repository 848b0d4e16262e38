//! User-visible notifications.
//!
//! Every action boundary converts its outcome into a [`Notice`] - the
//! rendering shell decides how to present it (toast, banner, ...). Failures
//! never propagate past the boundary that produced the notice.

use serde::{Deserialize, Serialize};

/// How prominently the shell should present a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A user-visible notification emitted at an action boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

impl Notice {
    /// A success notice.
    #[must_use]
    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Success,
            title: title.into(),
            description: description.into(),
        }
    }

    /// An error notice.
    #[must_use]
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            title: title.into(),
            description: description.into(),
        }
    }

    /// An informational notice.
    #[must_use]
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether this notice reports a failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}
