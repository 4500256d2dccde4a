//! Signed-in user as the identity backend reports it.
//!
//! [`SessionUser`] is the small, client-safe view of the signed-in identity: the
//! opaque `uid` the backend assigns, the email, and the optional display name and
//! photo the provider knows about. It is what sign-in operations return and what
//! the session stream pushes.
//!
//! [`SocialSignIn`] wraps a user coming back from the consent popup together with
//! the backend's "first time this identity signs in" flag, which decides whether
//! a default profile gets written.

use serde::{Deserialize, Serialize};

/// Signed-in user as reported by the identity backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionUser {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}

impl SessionUser {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.email)
    }
}

/// Result of a popup sign-in with a third-party provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialSignIn {
    pub user: SessionUser,
    pub is_new_user: bool,
}
