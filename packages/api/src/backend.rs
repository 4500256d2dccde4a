//! # Backend seams — identity provider and document store
//!
//! The gateway talks to the outside world only through the two traits defined
//! here. [`IdentityProvider`] covers credentials and the session; [`DocumentStore`]
//! covers the per-user profile documents. Anything implementing both is an
//! [`AuthBackend`].
//!
//! Everything runs on the browser's single UI thread, so the traits are `?Send`
//! and implementations are shared through `Rc`.
//!
//! [`SessionHub`] is the shared plumbing for the push subscription: it remembers
//! the current user and fans every change out to the subscribers. A new
//! subscriber immediately receives the current state, which is the backend's
//! "initial report" the session observer waits for.

use std::cell::RefCell;

use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use serde_json::{Map, Value};

use crate::error::AuthError;
use crate::models::{SessionUser, SocialSignIn};

/// Stream of session changes: `Some(user)` after sign-in, `None` after sign-out.
pub type SessionEvents = UnboundedReceiver<Option<SessionUser>>;

/// Parameters for a third-party consent popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialSignInRequest {
    /// Identity Toolkit provider id, e.g. `google.com`.
    pub provider_id: String,
    pub scopes: Vec<String>,
    pub custom_parameters: Vec<(String, String)>,
}

impl SocialSignInRequest {
    /// Google with email + profile scopes, always showing the account chooser.
    pub fn google() -> Self {
        Self {
            provider_id: "google.com".to_string(),
            scopes: vec![
                "https://www.googleapis.com/auth/userinfo.email".to_string(),
                "https://www.googleapis.com/auth/userinfo.profile".to_string(),
            ],
            custom_parameters: vec![("prompt".to_string(), "select_account".to_string())],
        }
    }
}

/// A filtered, ordered read over one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentQuery {
    pub collection: String,
    /// Keep only documents whose field equals this value.
    pub filter: Option<(String, Value)>,
    /// Sort descending on this field. Documents without it are left out.
    pub order_by_desc: Option<String>,
    pub limit: usize,
}

impl DocumentQuery {
    pub fn new(collection: &str) -> Self {
        Self {
            collection: collection.to_string(),
            filter: None,
            order_by_desc: None,
            limit: 10,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Some((field.to_string(), value.into()));
        self
    }

    pub fn newest_first(mut self, field: &str) -> Self {
        self.order_by_desc = Some(field.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// A document returned by a query, with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Map<String, Value>,
}

/// Credentials and session management.
#[async_trait(?Send)]
pub trait IdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError>;

    async fn create_account(&self, email: &str, password: &str)
        -> Result<SessionUser, AuthError>;

    async fn sign_in_with_popup(
        &self,
        request: &SocialSignInRequest,
    ) -> Result<SocialSignIn, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    fn current_user(&self) -> Option<SessionUser>;

    fn subscribe(&self) -> SessionEvents;
}

/// Keyed JSON documents with merge-write semantics.
#[async_trait(?Send)]
pub trait DocumentStore {
    /// Write `fields` into the document, keeping any field not mentioned.
    async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), AuthError>;

    /// Read a document; `Ok(None)` when it does not exist.
    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Map<String, Value>>, AuthError>;

    /// Run `query` and return at most `query.limit` documents.
    async fn query_documents(&self, query: &DocumentQuery)
        -> Result<Vec<StoredDocument>, AuthError>;
}

/// A complete backend for the gateway.
pub trait AuthBackend: IdentityProvider + DocumentStore {}

impl<T: IdentityProvider + DocumentStore> AuthBackend for T {}

/// Current session plus the list of live subscribers.
#[derive(Debug, Default)]
pub struct SessionHub {
    current: RefCell<Option<SessionUser>>,
    subscribers: RefCell<Vec<UnboundedSender<Option<SessionUser>>>>,
}

impl SessionHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> SessionEvents {
        let (tx, rx) = unbounded();
        if tx.unbounded_send(self.current()).is_ok() {
            self.subscribers.borrow_mut().push(tx);
        }
        rx
    }

    /// Record the new session and notify subscribers. Closed receivers are dropped.
    pub fn publish(&self, user: Option<SessionUser>) {
        *self.current.borrow_mut() = user.clone();
        self.subscribers
            .borrow_mut()
            .retain(|tx| tx.unbounded_send(user.clone()).is_ok());
    }
}
