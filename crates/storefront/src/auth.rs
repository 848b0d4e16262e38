//! Signed-in identity handle.
//!
//! Authentication itself (sign-up, sign-in, token refresh) is delegated to
//! the backing store's auth service; this module only carries the result: a
//! user id plus the bearer token every scoped request must present. The
//! store enforces row-level access control with it - the client never
//! receives or validates other users' rows.

use secrecy::{ExposeSecret, SecretString};

use velvet_muse_core::UserId;

use crate::error::AppError;

/// An authenticated session against the backing store.
#[derive(Clone)]
pub struct AuthSession {
    user_id: UserId,
    access_token: SecretString,
}

impl AuthSession {
    /// Create a session from the backing store's auth response.
    #[must_use]
    pub fn new(user_id: UserId, access_token: SecretString) -> Self {
        Self {
            user_id,
            access_token,
        }
    }

    /// The signed-in user's id.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The bearer token presented on scoped requests.
    #[must_use]
    pub fn bearer_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("user_id", &self.user_id)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// The current viewer: signed in or anonymous.
///
/// Views hold a `Viewer` and call [`Viewer::require`] at the top of any
/// action that needs an identity.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    session: Option<AuthSession>,
}

impl Viewer {
    /// An anonymous viewer.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { session: None }
    }

    /// A signed-in viewer.
    #[must_use]
    pub const fn signed_in(session: AuthSession) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// The session, if signed in.
    #[must_use]
    pub const fn session(&self) -> Option<&AuthSession> {
        self.session.as_ref()
    }

    /// Require a signed-in session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Unauthenticated` for an anonymous viewer.
    pub fn require(&self) -> Result<&AuthSession, AppError> {
        self.session.as_ref().ok_or(AppError::Unauthenticated)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn session() -> AuthSession {
        AuthSession::new(
            UserId::new(uuid::Uuid::new_v4()),
            SecretString::from("test-token".to_string()),
        )
    }

    #[test]
    fn test_anonymous_viewer_is_rejected() {
        let viewer = Viewer::anonymous();
        assert!(matches!(
            viewer.require(),
            Err(AppError::Unauthenticated)
        ));
    }

    #[test]
    fn test_signed_in_viewer_passes() {
        let session = session();
        let user_id = session.user_id();
        let viewer = Viewer::signed_in(session);
        assert_eq!(viewer.require().unwrap().user_id(), user_id);
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", session());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test-token"));
    }
}
