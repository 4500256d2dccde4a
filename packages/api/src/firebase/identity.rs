//! Identity Toolkit and Secure Token REST calls.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::session::StoredSession;
use crate::error::AuthError;
use crate::models::SessionUser;

const IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1/accounts";
const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1/token";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IdpRequest<'a> {
    post_body: String,
    request_uri: &'a str,
    return_secure_token: bool,
    return_idp_credential: bool,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    grant_type: &'static str,
    refresh_token: &'a str,
}

/// Body shared by `signInWithPassword`, `signUp` and `signInWithIdp`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SignInResponse {
    pub local_id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
    #[serde(default)]
    pub is_new_user: bool,
}

impl SignInResponse {
    pub fn into_session(self, now: DateTime<Utc>) -> StoredSession {
        StoredSession {
            expires_at: expiry(now, &self.expires_in),
            user: SessionUser {
                uid: self.local_id,
                email: self.email.unwrap_or_default(),
                display_name: self.display_name.filter(|n| !n.is_empty()),
                photo_url: self.photo_url.filter(|p| !p.is_empty()),
            },
            id_token: self.id_token,
            refresh_token: self.refresh_token,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    id_token: String,
    refresh_token: String,
    expires_in: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Thin client for the account endpoints of one Firebase project.
#[derive(Clone, Debug)]
pub(crate) struct IdentityClient {
    http: Client,
    api_key: String,
}

impl IdentityClient {
    pub fn new(http: Client, api_key: String) -> Self {
        Self { http, api_key }
    }

    pub async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignInResponse, AuthError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.post(&format!("{IDENTITY_URL}:signInWithPassword"), &body)
            .await
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignInResponse, AuthError> {
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };
        self.post(&format!("{IDENTITY_URL}:signUp"), &body).await
    }

    /// Exchange a provider access token for a Firebase session.
    pub async fn sign_in_with_idp(
        &self,
        provider_id: &str,
        access_token: &str,
        request_uri: &str,
    ) -> Result<SignInResponse, AuthError> {
        let body = IdpRequest {
            post_body: format!("access_token={access_token}&providerId={provider_id}"),
            request_uri,
            return_secure_token: true,
            return_idp_credential: true,
        };
        self.post(&format!("{IDENTITY_URL}:signInWithIdp"), &body)
            .await
    }

    /// Trade a refresh token for a fresh id token.
    pub async fn refresh(
        &self,
        session: &StoredSession,
        now: DateTime<Utc>,
    ) -> Result<StoredSession, AuthError> {
        let body = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token: &session.refresh_token,
        };
        let refreshed: RefreshResponse = self.post(SECURE_TOKEN_URL, &body).await?;
        Ok(StoredSession {
            user: session.user.clone(),
            expires_at: expiry(now, &refreshed.expires_in),
            id_token: refreshed.id_token,
            refresh_token: refreshed.refresh_token,
        })
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await
            .map_err(|e| AuthError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| AuthError::Network(e.to_string()))?;
            return Err(parse_error(&text)
                .unwrap_or_else(|| AuthError::Backend(format!("Request failed ({status})"))));
        }

        response
            .json()
            .await
            .map_err(|e| AuthError::Backend(format!("Unexpected response: {e}")))
    }
}

/// Decode a Google API error body (`{"error": {"message": ...}}`).
pub(crate) fn parse_error(body: &str) -> Option<AuthError> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .map(|b| AuthError::from_code(&b.error.message))
}

/// `expires_in` is a string of seconds. Tokens are treated as expiring a minute
/// early so a request never races the deadline.
fn expiry(now: DateTime<Utc>, expires_in: &str) -> DateTime<Utc> {
    let secs = expires_in.parse::<i64>().unwrap_or(3600);
    now + Duration::seconds((secs - 60).max(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"error":{"code":400,"message":"EMAIL_EXISTS","errors":[]}}"#;
        assert_eq!(parse_error(body), Some(AuthError::EmailInUse));
        assert_eq!(parse_error("<html>"), None);
    }

    #[test]
    fn test_sign_in_response_to_session() {
        let body = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "abc",
            "email": "a@x.com",
            "displayName": "",
            "idToken": "id",
            "refreshToken": "refresh",
            "expiresIn": "3600",
            "registered": true
        }"#;
        let response: SignInResponse = serde_json::from_str(body).unwrap();
        let now = Utc::now();
        let session = response.into_session(now);
        assert_eq!(session.user.uid, "abc");
        assert_eq!(session.user.display_name, None);
        assert_eq!(session.expires_at, now + Duration::seconds(3540));
        assert!(!session.is_expired(now));
    }

    #[test]
    fn test_idp_response_carries_new_user_flag() {
        let body = r#"{
            "localId": "g1",
            "email": "g@gmail.com",
            "displayName": "Gee",
            "photoUrl": "https://img/g.png",
            "idToken": "id",
            "refreshToken": "refresh",
            "expiresIn": "3600",
            "isNewUser": true
        }"#;
        let response: SignInResponse = serde_json::from_str(body).unwrap();
        assert!(response.is_new_user);
        assert_eq!(response.photo_url.as_deref(), Some("https://img/g.png"));
    }
}
