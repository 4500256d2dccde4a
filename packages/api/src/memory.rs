use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::backend::{
    DocumentQuery, DocumentStore, IdentityProvider, SessionEvents, SessionHub,
    SocialSignInRequest, StoredDocument,
};
use crate::error::AuthError;
use crate::models::{SessionUser, SocialSignIn};

/// Minimum password length enforced by the identity backend.
const MIN_PASSWORD_LEN: usize = 6;

/// A backend call, recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    SignIn { email: String },
    CreateAccount { email: String },
    Popup { provider_id: String },
    SignOut,
    MergeDocument { collection: String, id: String },
    GetDocument { collection: String, id: String },
    Query { collection: String },
}

/// A successful merge-write.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub collection: String,
    pub id: String,
    pub fields: Map<String, Value>,
}

#[derive(Debug)]
struct Account {
    password: String,
    user: SessionUser,
}

#[derive(Debug, Default)]
struct Inner {
    accounts: RefCell<HashMap<String, Account>>,
    documents: RefCell<HashMap<(String, String), Map<String, Value>>>,
    calls: RefCell<Vec<BackendCall>>,
    writes: RefCell<Vec<DocumentWrite>>,
    popup_identity: RefCell<Option<SessionUser>>,
    known_social: RefCell<HashSet<String>>,
    session: SessionHub,
    next_uid: Cell<u64>,
    fail_sign_out: Cell<bool>,
    fail_document_writes: Cell<bool>,
}

/// In-memory identity + document backend for tests and offline development.
///
/// Clones share state, so a test can keep a handle while the gateway owns another.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    inner: Rc<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an email/password account without going through the gateway.
    pub fn with_account(self, email: &str, password: &str, display_name: Option<&str>) -> Self {
        let user = SessionUser {
            uid: self.allocate_uid(),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
            photo_url: None,
        };
        self.inner.accounts.borrow_mut().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user,
            },
        );
        self
    }

    /// Identity the next consent popup resolves to. `None` behaves as if the
    /// user closed the popup.
    pub fn set_popup_identity(&self, user: Option<SessionUser>) {
        *self.inner.popup_identity.borrow_mut() = user;
    }

    pub fn fail_sign_out(&self, fail: bool) {
        self.inner.fail_sign_out.set(fail);
    }

    pub fn fail_document_writes(&self, fail: bool) {
        self.inner.fail_document_writes.set(fail);
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.calls.borrow().clone()
    }

    pub fn document_writes(&self) -> Vec<DocumentWrite> {
        self.inner.writes.borrow().clone()
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<Map<String, Value>> {
        self.inner
            .documents
            .borrow()
            .get(&(collection.to_string(), id.to_string()))
            .cloned()
    }

    fn allocate_uid(&self) -> String {
        let n = self.inner.next_uid.get() + 1;
        self.inner.next_uid.set(n);
        format!("mem-{n}")
    }

    fn record(&self, call: BackendCall) {
        self.inner.calls.borrow_mut().push(call);
    }
}

#[async_trait(?Send)]
impl IdentityProvider for MemoryBackend {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SessionUser, AuthError> {
        self.record(BackendCall::SignIn {
            email: email.to_string(),
        });
        let user = {
            let accounts = self.inner.accounts.borrow();
            match accounts.get(email) {
                Some(account) if account.password == password => account.user.clone(),
                _ => return Err(AuthError::InvalidCredentials),
            }
        };
        self.inner.session.publish(Some(user.clone()));
        Ok(user)
    }

    async fn create_account(&self, email: &str, password: &str) -> Result<SessionUser, AuthError> {
        self.record(BackendCall::CreateAccount {
            email: email.to_string(),
        });
        if self.inner.accounts.borrow().contains_key(email) {
            return Err(AuthError::EmailInUse);
        }
        if password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        let user = SessionUser {
            uid: self.allocate_uid(),
            email: email.to_string(),
            display_name: None,
            photo_url: None,
        };
        self.inner.accounts.borrow_mut().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                user: user.clone(),
            },
        );
        self.inner.session.publish(Some(user.clone()));
        Ok(user)
    }

    async fn sign_in_with_popup(
        &self,
        request: &SocialSignInRequest,
    ) -> Result<SocialSignIn, AuthError> {
        self.record(BackendCall::Popup {
            provider_id: request.provider_id.clone(),
        });
        let user = self
            .inner
            .popup_identity
            .borrow()
            .clone()
            .ok_or(AuthError::PopupClosed)?;
        let is_new_user = self.inner.known_social.borrow_mut().insert(user.uid.clone());
        self.inner.session.publish(Some(user.clone()));
        Ok(SocialSignIn { user, is_new_user })
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.record(BackendCall::SignOut);
        if self.inner.fail_sign_out.get() {
            return Err(AuthError::Network("sign-out request failed".to_string()));
        }
        self.inner.session.publish(None);
        Ok(())
    }

    fn current_user(&self) -> Option<SessionUser> {
        self.inner.session.current()
    }

    fn subscribe(&self) -> SessionEvents {
        self.inner.session.subscribe()
    }
}

#[async_trait(?Send)]
impl DocumentStore for MemoryBackend {
    async fn merge_document(
        &self,
        collection: &str,
        id: &str,
        fields: Map<String, Value>,
    ) -> Result<(), AuthError> {
        self.record(BackendCall::MergeDocument {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        if self.inner.fail_document_writes.get() {
            return Err(AuthError::Backend(
                "Missing or insufficient permissions.".to_string(),
            ));
        }
        self.inner
            .documents
            .borrow_mut()
            .entry((collection.to_string(), id.to_string()))
            .or_default()
            .extend(fields.clone());
        self.inner.writes.borrow_mut().push(DocumentWrite {
            collection: collection.to_string(),
            id: id.to_string(),
            fields,
        });
        Ok(())
    }

    async fn get_document(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Map<String, Value>>, AuthError> {
        self.record(BackendCall::GetDocument {
            collection: collection.to_string(),
            id: id.to_string(),
        });
        Ok(self.document(collection, id))
    }

    async fn query_documents(
        &self,
        query: &DocumentQuery,
    ) -> Result<Vec<StoredDocument>, AuthError> {
        self.record(BackendCall::Query {
            collection: query.collection.clone(),
        });
        let mut matches: Vec<StoredDocument> = self
            .inner
            .documents
            .borrow()
            .iter()
            .filter(|((collection, _), _)| *collection == query.collection)
            .filter(|(_, fields)| match &query.filter {
                Some((field, value)) => fields.get(field) == Some(value),
                None => true,
            })
            .filter(|(_, fields)| match &query.order_by_desc {
                Some(field) => fields.contains_key(field),
                None => true,
            })
            .map(|((_, id), fields)| StoredDocument {
                id: id.clone(),
                fields: fields.clone(),
            })
            .collect();

        match &query.order_by_desc {
            // Ties fall back to the id, as Firestore orders by document name.
            Some(field) => matches.sort_by(|a, b| {
                order_key(&b.fields[field])
                    .cmp(&order_key(&a.fields[field]))
                    .then_with(|| a.id.cmp(&b.id))
            }),
            None => matches.sort_by(|a, b| a.id.cmp(&b.id)),
        }
        matches.truncate(query.limit);
        Ok(matches)
    }
}

/// Timestamps are stored as RFC 3339 strings, which sort lexically.
fn order_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_sign_in_checks_password() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", Some("Ada"));

        let err = backend.sign_in_with_password("a@x.com", "nope").await;
        assert_eq!(err, Err(AuthError::InvalidCredentials));
        assert!(backend.current_user().is_none());

        let user = backend.sign_in_with_password("a@x.com", "secret1").await.unwrap();
        assert_eq!(user.display_name(), "Ada");
        assert_eq!(backend.current_user(), Some(user));
    }

    #[tokio::test]
    async fn test_create_account_rejects_duplicates_and_weak_passwords() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", None);

        assert_eq!(
            backend.create_account("a@x.com", "secret2").await,
            Err(AuthError::EmailInUse)
        );
        assert_eq!(
            backend.create_account("b@x.com", "12345").await,
            Err(AuthError::WeakPassword)
        );
        let user = backend.create_account("b@x.com", "123456").await.unwrap();
        assert_ne!(user.uid, "mem-1");
    }

    #[tokio::test]
    async fn test_merge_keeps_unmentioned_fields() {
        let backend = MemoryBackend::new();
        backend
            .merge_document("users", "u1", fields(json!({"name": "Ada", "role": "patient"})))
            .await
            .unwrap();
        backend
            .merge_document("users", "u1", fields(json!({"role": "doctor"})))
            .await
            .unwrap();

        let doc = backend.get_document("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc["name"], json!("Ada"));
        assert_eq!(doc["role"], json!("doctor"));
        assert_eq!(backend.document_writes().len(), 2);
    }

    #[tokio::test]
    async fn test_query_filters_orders_and_limits() {
        let backend = MemoryBackend::new();
        let profiles = [
            ("d1", "doctor", Some("2025-01-01T00:00:00Z")),
            ("p1", "patient", Some("2025-01-02T00:00:00Z")),
            ("d2", "doctor", Some("2025-01-03T00:00:00Z")),
            ("d3", "doctor", None),
            ("d4", "doctor", Some("2025-01-02T00:00:00Z")),
        ];
        for (id, role, created_at) in profiles {
            let mut doc = fields(json!({ "role": role }));
            if let Some(at) = created_at {
                doc.insert("createdAt".to_string(), json!(at));
            }
            backend.merge_document("users", id, doc).await.unwrap();
        }
        let elsewhere = fields(json!({ "role": "doctor", "createdAt": "2030-01-01T00:00:00Z" }));
        backend.merge_document("other", "d9", elsewhere).await.unwrap();

        let query = DocumentQuery::new("users")
            .where_eq("role", "doctor")
            .newest_first("createdAt");
        let ids: Vec<String> = backend
            .query_documents(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, ["d2", "d4", "d1"]);

        let query = DocumentQuery::new("users").newest_first("createdAt").limit(2);
        let ids: Vec<String> = backend
            .query_documents(&query)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, ["d2", "d4"]);
        assert!(backend.calls().contains(&BackendCall::Query {
            collection: "users".to_string()
        }));
    }

    #[tokio::test]
    async fn test_popup_marks_only_first_sign_in_as_new() {
        let backend = MemoryBackend::new();
        let request = SocialSignInRequest::google();

        assert_eq!(
            backend.sign_in_with_popup(&request).await,
            Err(AuthError::PopupClosed)
        );

        backend.set_popup_identity(Some(SessionUser {
            uid: "g1".to_string(),
            email: "g@x.com".to_string(),
            display_name: Some("Gee".to_string()),
            photo_url: None,
        }));
        assert!(backend.sign_in_with_popup(&request).await.unwrap().is_new_user);
        assert!(!backend.sign_in_with_popup(&request).await.unwrap().is_new_user);
    }

    #[tokio::test]
    async fn test_session_changes_are_pushed() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", None);
        let mut events = backend.subscribe();
        assert_eq!(events.next().await, Some(None));

        backend.sign_in_with_password("a@x.com", "secret1").await.unwrap();
        assert!(matches!(events.next().await, Some(Some(_))));

        backend.sign_out().await.unwrap();
        assert_eq!(events.next().await, Some(None));
    }

    #[tokio::test]
    async fn test_failed_sign_out_keeps_session() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", None);
        backend.sign_in_with_password("a@x.com", "secret1").await.unwrap();
        backend.fail_sign_out(true);

        assert!(backend.sign_out().await.is_err());
        assert!(backend.current_user().is_some());
    }
}
