//! # Firebase backend — Identity Toolkit + Firestore over REST
//!
//! [`FirebaseBackend`] implements [`IdentityProvider`] and [`DocumentStore`] against
//! the public Firebase REST endpoints, so the browser bundle needs no JavaScript
//! SDK.
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | sign in | `accounts:signInWithPassword` |
//! | create account | `accounts:signUp` |
//! | popup sign-in | Google implicit-flow popup, then `accounts:signInWithIdp` |
//! | token refresh | `securetoken.googleapis.com/v1/token` |
//! | profile write | Firestore `PATCH` with `updateMask.fieldPaths` |
//! | profile read | Firestore `GET` |
//! | profile listing | Firestore `documents:runQuery` |
//!
//! Sign-out is local: the stored tokens are dropped and subscribers are told the
//! session ended.
//!
//! [`FirebaseBackend::connect`] is the initialization future the gateway awaits.
//! It validates the configuration and restores a session persisted by an earlier
//! page load, refreshing its id token if it expired.

mod firestore;
mod identity;
mod popup;
mod session;

use std::cell::RefCell;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::backend::{
    DocumentQuery, DocumentStore, IdentityProvider, SessionEvents, SessionHub,
    SocialSignInRequest, StoredDocument,
};
use crate::config::FirebaseConfig;
use crate::error::AuthError;
use crate::models::{SessionUser, SocialSignIn};

use firestore::FirestoreClient;
use identity::{IdentityClient, SignInResponse};
use session::StoredSession;

pub use popup::CALLBACK_PATH;

/// Firebase-backed identity provider and document store.
pub struct FirebaseBackend {
    identity: IdentityClient,
    firestore: FirestoreClient,
    session: RefCell<Option<StoredSession>>,
    hub: SessionHub,
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    config: FirebaseConfig,
}

impl FirebaseBackend {
    /// Validate `config` and restore any persisted session.
    pub async fn connect(config: FirebaseConfig) -> Result<Self, AuthError> {
        config.validate()?;
        info!(project = %config.project_id, "Connecting to Firebase");

        let http = Client::new();
        let backend = Self {
            identity: IdentityClient::new(http.clone(), config.api_key.clone()),
            firestore: FirestoreClient::new(http, config.project_id.clone()),
            session: RefCell::new(None),
            hub: SessionHub::new(),
            config,
        };

        if let Some(stored) = session::load() {
            match backend.fresh(stored).await {
                Ok(restored) => {
                    debug!(uid = %restored.user.uid, "Restored persisted session");
                    backend.establish(restored);
                }
                Err(e) => {
                    warn!(error = %e, "Persisted session could not be restored");
                    session::save(None);
                }
            }
        }
        Ok(backend)
    }

    /// Refresh `stored` if its id token expired.
    async fn fresh(&self, stored: StoredSession) -> Result<StoredSession, AuthError> {
        let now = Utc::now();
        if stored.is_expired(now) {
            self.identity.refresh(&stored, now).await
        } else {
            Ok(stored)
        }
    }

    fn establish(&self, stored: StoredSession) -> SessionUser {
        let user = stored.user.clone();
        session::save(Some(&stored));
        *self.session.borrow_mut() = Some(stored);
        self.hub.publish(Some(user.clone()));
        user
    }

    fn sign_in(&self, response: SignInResponse) -> SessionUser {
        self.establish(response.into_session(Utc::now()))
    }

    /// Id token for Firestore requests, refreshed when needed.
    async fn id_token(&self) -> Result<Option<String>, AuthError> {
        let current = self.session.borrow().clone();
        let Some(stored) = current else {
            return Ok(None);
        };
        if !stored.is_expired(Utc::now()) {
            return Ok(Some(stored.id_token));
        }
        let refreshed = self.fresh(stored).await?;
        let token = refreshed.id_token.clone();
        session::save(Some(&refreshed));
        *self.session.borrow_mut() = Some(refreshed);
        Ok(Some(token))
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FirebaseBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError> {
        let response = self.identity.sign_in_with_password(email, password).await?;
        Ok(self.sign_in(response))
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        let response = self.identity.sign_up(email, password).await?;
        Ok(self.sign_in(response))
    }

    #[cfg(target_arch = "wasm32")]
    async fn sign_in_with_popup(
        &self,
        request: &SocialSignInRequest,
    ) -> Result<SocialSignIn, AuthError> {
        let grant = popup::request_access_token(&self.config, request).await?;
        let response = self
            .identity
            .sign_in_with_idp(&request.provider_id, &grant.access_token, &grant.request_uri)
            .await?;
        let is_new_user = response.is_new_user;
        let user = self.sign_in(response);
        Ok(SocialSignIn { user, is_new_user })
    }

    #[cfg(not(target_arch = "wasm32"))]
    async fn sign_in_with_popup(
        &self,
        _request: &SocialSignInRequest,
    ) -> Result<SocialSignIn, AuthError> {
        Err(AuthError::Unsupported(
            "Popup sign-in is only available in the browser",
        ))
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        *self.session.borrow_mut() = None;
        session::save(None);
        self.hub.publish(None);
        Ok(())
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.hub.current()
    }

    fn subscribe(&self) -> SessionEvents {
        self.hub.subscribe()
    }
}

#[async_trait(?Send)]
impl DocumentStore for FirebaseBackend {
    async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), AuthError> {
        let token = self.id_token().await?;
        self.firestore
            .merge(collection, id, fields, token.as_deref())
            .await
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Map<String, Value>>, AuthError> {
        let token = self.id_token().await?;
        self.firestore.get(collection, id, token.as_deref()).await
    }

    async fn query_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<StoredDocument>, AuthError> {
        let token = self.id_token().await?;
        self.firestore.run_query(query, token.as_deref()).await
    }
}
