//! # Auth gateway — the one entry point the UI talks to
//!
//! [`AuthGateway`] is a cheap, clonable handle that the web crate creates once and
//! hands to the UI through context. It wraps an [`AuthBackend`] that becomes
//! available when [`AuthGateway::initialize`] resolves; until then every operation
//! fails fast with [`AuthError::Unavailable`] instead of waiting.
//!
//! Operations return [`UiResult`]: the gateway owns the translation from typed
//! backend errors to the message shown in the form, and logs every failure.
//!
//! ## Registration is not transactional
//!
//! [`register`](AuthGateway::register) creates the credential first and writes the
//! profile second. If the write fails the credential stays behind and the failure
//! is reported; nothing is rolled back. The warning log carries the uid of the
//! account left without a profile.
//!
//! Google sign-in is the opposite case: the session already exists when the
//! default profile of a new identity is written, so a failed write is only
//! logged and the sign-in still succeeds.

use std::future::Future;
use std::rc::Rc;

use chrono::Utc;
use tokio::sync::OnceCell;
use tracing::{debug, error, info, warn};

use crate::backend::{AuthBackend, DocumentQuery, SessionEvents, SocialSignInRequest};
use crate::error::AuthError;
use crate::models::{
    ProfileEntry, ProfileUpdate, Role, SessionUser, SocialSignIn, UserProfile,
    PROFILES_COLLECTION,
};
use crate::navigation::{Destination, LogoutStatus};
use crate::result::UiResult;

/// Profiles returned by one listing.
const PROFILE_LISTING_LIMIT: usize = 10;

/// Result of a logout: the backend outcome and where to go next.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoutOutcome {
    pub result: UiResult<()>,
    pub destination: Destination,
}

/// Facade over the identity and document backends.
#[derive(Clone, Default)]
pub struct AuthGateway {
    backend: Rc<OnceCell<Rc<dyn AuthBackend>>>,
}

impl std::fmt::Debug for AuthGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGateway")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl PartialEq for AuthGateway {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.backend, &other.backend)
    }
}

impl AuthGateway {
    /// A gateway whose backend is not initialized yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway that is ready immediately.
    pub fn with_backend(backend: impl AuthBackend + 'static) -> Self {
        let backend: Rc<dyn AuthBackend> = Rc::new(backend);
        Self {
            backend: Rc::new(OnceCell::new_with(Some(backend))),
        }
    }

    /// Await backend initialization. Only the first call runs `init`; later
    /// calls return once the backend is set.
    pub async fn initialize<F, B>(&self, init: F) -> Result<(), AuthError>
    where
        F: Future<Output = Result<B, AuthError>>,
        B: AuthBackend + 'static,
    {
        self.backend
            .get_or_try_init(|| async move {
                let backend = init.await?;
                info!("Auth backend initialized");
                Ok::<_, AuthError>(Rc::new(backend) as Rc<dyn AuthBackend>)
            })
            .await?;
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.backend.initialized()
    }

    fn backend(&self) -> Result<&Rc<dyn AuthBackend>, AuthError> {
        self.backend.get().ok_or(AuthError::Unavailable)
    }

    /// Sign in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> UiResult<SessionUser> {
        info!(%email, "Attempting to log in");
        let result = match self.backend() {
            Ok(backend) => backend.sign_in_with_password(email, password).await,
            Err(e) => Err(e),
        };
        report("login", result)
    }

    /// Create an account, then store its profile.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: &ProfileUpdate,
    ) -> UiResult<SessionUser> {
        info!(%email, role = ?profile.role, "Attempting to register");
        report("register", self.try_register(email, password, profile).await)
    }

    async fn try_register(
        &self,
        email: &str,
        password: &str,
        profile: &ProfileUpdate,
    ) -> Result<SessionUser, AuthError> {
        let backend = self.backend()?;
        let user = backend.create_account(email, password).await?;
        debug!(uid = %user.uid, "Account created, storing profile");

        if let Err(e) = merge_profile(&**backend, &user.uid, profile.clone()).await {
            warn!(
                uid = %user.uid,
                error = %e,
                "Account created but profile was not stored; credential left in place"
            );
            return Err(e);
        }
        Ok(user)
    }

    /// Sign in through the Google consent popup. The first sign-in of an
    /// identity stores a default patient profile.
    pub async fn login_with_social_provider(&self) -> UiResult<SessionUser> {
        info!("Attempting Google login");
        report("social_login", self.try_social_login().await)
    }

    async fn try_social_login(&self) -> Result<SessionUser, AuthError> {
        let backend = self.backend()?;
        let SocialSignIn { user, is_new_user } = backend
            .sign_in_with_popup(&SocialSignInRequest::google())
            .await?;

        if is_new_user {
            info!(uid = %user.uid, "New social identity, storing default profile");
            let profile = ProfileUpdate::social_default(&user, Utc::now());
            // The session is already established; a missing profile does not undo it.
            if let Err(e) = merge_profile(&**backend, &user.uid, profile).await {
                warn!(uid = %user.uid, error = %e, "Signed in but default profile was not stored");
            }
        }
        Ok(user)
    }

    /// End the session. The destination is always set, even when the backend
    /// failed or is unavailable.
    pub async fn logout(&self) -> LogoutOutcome {
        info!("Attempting to log out");
        let result = match self.backend() {
            Ok(backend) => backend.sign_out().await,
            Err(e) => Err(e),
        };
        let status = if result.is_ok() {
            LogoutStatus::Success
        } else {
            LogoutStatus::Error
        };
        LogoutOutcome {
            result: report("logout", result),
            destination: Destination::Home {
                logout: Some(status),
            },
        }
    }

    /// Read the stored profile for `user_id`.
    pub async fn get_profile(&self, user_id: &str) -> UiResult<UserProfile> {
        report("get_profile", self.try_get_profile(user_id).await)
    }

    async fn try_get_profile(&self, user_id: &str) -> Result<UserProfile, AuthError> {
        let fields = self
            .backend()?
            .get_document(PROFILES_COLLECTION, user_id)
            .await?
            .ok_or(AuthError::ProfileNotFound)?;
        UserProfile::from_fields(fields)
    }

    /// The newest profiles, optionally only those with `role`.
    pub async fn list_profiles(&self, role: Option<Role>) -> UiResult<Vec<ProfileEntry>> {
        report("list_profiles", self.try_list_profiles(role).await)
    }

    async fn try_list_profiles(&self, role: Option<Role>) -> Result<Vec<ProfileEntry>, AuthError> {
        let mut query = DocumentQuery::new(PROFILES_COLLECTION)
            .newest_first("createdAt")
            .limit(PROFILE_LISTING_LIMIT);
        if let Some(role) = role {
            query = query.where_eq("role", role.as_str());
        }
        let documents = self.backend()?.query_documents(&query).await?;

        let mut entries = Vec::with_capacity(documents.len());
        for document in documents {
            match UserProfile::from_fields(document.fields) {
                Ok(profile) => entries.push(ProfileEntry {
                    id: document.id,
                    profile,
                }),
                Err(e) => warn!(id = %document.id, error = %e, "Skipping unreadable profile"),
            }
        }
        debug!(count = entries.len(), role = ?role, "Listed profiles");
        Ok(entries)
    }

    /// Merge `update` into the stored profile, stamping `updatedAt`.
    pub async fn store_profile(&self, user_id: &str, update: ProfileUpdate) -> UiResult<()> {
        let result = match self.backend() {
            Ok(backend) => merge_profile(&**backend, user_id, update).await,
            Err(e) => Err(e),
        };
        report("store_profile", result)
    }

    /// The signed-in user, if any.
    pub fn current_user(&self) -> Result<Option<SessionUser>, AuthError> {
        Ok(self.backend()?.current_user())
    }

    /// Subscribe to session changes. The current state arrives first.
    pub fn subscribe(&self) -> Result<SessionEvents, AuthError> {
        Ok(self.backend()?.subscribe())
    }
}

async fn merge_profile(
    backend: &dyn AuthBackend,
    user_id: &str,
    mut update: ProfileUpdate,
) -> Result<(), AuthError> {
    update.updated_at = Some(Utc::now());
    let fields = update.to_fields()?;
    debug!(%user_id, fields = fields.len(), "Storing profile");
    backend
        .merge_document(PROFILES_COLLECTION, user_id, fields)
        .await
}

fn report<T>(operation: &'static str, result: Result<T, AuthError>) -> UiResult<T> {
    match &result {
        Ok(_) => debug!(operation, "Auth operation succeeded"),
        Err(e) => error!(operation, error = %e, "Auth operation failed"),
    }
    result.into()
}
