//! Persisted Firebase session.
//!
//! In the browser the session lives in `localStorage` so that a reload signs the
//! user back in, the same way the vendor SDK behaves. Native builds keep it in
//! memory only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SessionUser;

#[cfg(all(target_arch = "wasm32", feature = "firebase"))]
const STORAGE_KEY: &str = "doctorsab.session";

/// Tokens of the signed-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StoredSession {
    pub user: SessionUser,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl StoredSession {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(all(target_arch = "wasm32", feature = "firebase"))]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Load the session saved by a previous page.
#[cfg(all(target_arch = "wasm32", feature = "firebase"))]
pub(crate) fn load() -> Option<StoredSession> {
    let raw = local_storage()?.get_item(STORAGE_KEY).ok().flatten()?;
    match serde_json::from_str(&raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, "Discarding unreadable stored session");
            None
        }
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "firebase")))]
pub(crate) fn load() -> Option<StoredSession> {
    None
}

/// Save (`Some`) or clear (`None`) the persisted session.
#[cfg(all(target_arch = "wasm32", feature = "firebase"))]
pub(crate) fn save(session: Option<&StoredSession>) {
    let Some(storage) = local_storage() else {
        return;
    };
    let result = match session {
        Some(s) => match serde_json::to_string(s) {
            Ok(raw) => storage.set_item(STORAGE_KEY, &raw),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to serialize session");
                return;
            }
        },
        None => storage.remove_item(STORAGE_KEY),
    };
    if result.is_err() {
        tracing::warn!("Failed to update stored session");
    }
}

#[cfg(not(all(target_arch = "wasm32", feature = "firebase")))]
pub(crate) fn save(_session: Option<&StoredSession>) {}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let session = StoredSession {
            user: SessionUser {
                uid: "u1".to_string(),
                email: "a@x.com".to_string(),
                display_name: None,
                photo_url: None,
            },
            id_token: "id".to_string(),
            refresh_token: "r".to_string(),
            expires_at: now + Duration::seconds(10),
        };
        assert!(!session.is_expired(now));
        assert!(session.is_expired(now + Duration::seconds(10)));
    }
}
