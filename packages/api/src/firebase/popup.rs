//! Google consent popup (OAuth implicit flow).
//!
//! The popup is sent to Google's authorization endpoint with `response_type=token`
//! and redirected back to `/auth/callback` on the app origin. Once it is back on
//! the origin its location becomes readable; the access token is taken from the
//! URL fragment, the CSRF state is checked and the popup is closed.

use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
use crate::backend::SocialSignInRequest;
#[cfg(target_arch = "wasm32")]
use crate::config::FirebaseConfig;
#[cfg(target_arch = "wasm32")]
use crate::error::AuthError;

/// Path the popup returns to.
pub const CALLBACK_PATH: &str = "/auth/callback";

#[cfg(target_arch = "wasm32")]
const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
#[cfg(target_arch = "wasm32")]
const POLL_INTERVAL_MS: u32 = 250;
/// Give up after five minutes without an answer.
#[cfg(target_arch = "wasm32")]
const MAX_POLLS: u32 = 5 * 60 * 1000 / POLL_INTERVAL_MS;

/// Split a `#a=1&b=2` fragment into key/value pairs.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn parse_fragment(fragment: &str) -> HashMap<String, String> {
    fragment
        .trim_start_matches('#')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Access token granted in the popup, plus the request URI to report to
/// `signInWithIdp`.
#[cfg(target_arch = "wasm32")]
pub(crate) struct PopupGrant {
    pub access_token: String,
    pub request_uri: String,
}

#[cfg(target_arch = "wasm32")]
fn random_state() -> String {
    let a = (js_sys::Math::random() * f64::from(u32::MAX)) as u32;
    let b = (js_sys::Math::random() * f64::from(u32::MAX)) as u32;
    format!("{a:08x}{b:08x}")
}

#[cfg(target_arch = "wasm32")]
fn decode(value: &str) -> String {
    js_sys::decode_uri_component(value)
        .ok()
        .and_then(|s| s.as_string())
        .unwrap_or_else(|| value.to_string())
}

#[cfg(target_arch = "wasm32")]
pub(crate) async fn request_access_token(
    config: &FirebaseConfig,
    request: &SocialSignInRequest,
) -> Result<PopupGrant, AuthError> {
    use oauth2::basic::BasicClient;
    use oauth2::{AuthUrl, ClientId, CsrfToken, RedirectUrl, Scope};

    let client_id = config
        .google_client_id
        .clone()
        .ok_or_else(|| AuthError::Config("firebase.google_client_id not set".to_string()))?;
    let window = web_sys::window().ok_or(AuthError::Unavailable)?;
    let origin = window.location().origin().map_err(|_| AuthError::Unavailable)?;
    let redirect = format!("{origin}{CALLBACK_PATH}");

    let client = BasicClient::new(ClientId::new(client_id))
        .set_auth_uri(
            AuthUrl::new(GOOGLE_AUTH_URL.to_string())
                .map_err(|e| AuthError::Config(e.to_string()))?,
        )
        .set_redirect_uri(
            RedirectUrl::new(redirect.clone()).map_err(|e| AuthError::Config(e.to_string()))?,
        );

    let state = random_state();
    let mut authorize = client
        .authorize_url(|| CsrfToken::new(state.clone()))
        .use_implicit_flow();
    for scope in &request.scopes {
        authorize = authorize.add_scope(Scope::new(scope.clone()));
    }
    for (name, value) in &request.custom_parameters {
        authorize = authorize.add_extra_param(name.clone(), value.clone());
    }
    let (url, _csrf) = authorize.url();

    let popup = window
        .open_with_url_and_target_and_features(url.as_str(), "doctorsab-auth", "width=500,height=600")
        .map_err(|_| AuthError::PopupBlocked)?
        .ok_or(AuthError::PopupBlocked)?;

    for _ in 0..MAX_POLLS {
        gloo_timers::future::TimeoutFuture::new(POLL_INTERVAL_MS).await;

        if popup.closed().unwrap_or(true) {
            return Err(AuthError::PopupClosed);
        }
        // Reading the location throws while the popup is on Google's origin.
        let Ok(href) = popup.location().href() else {
            continue;
        };
        if !href.starts_with(&redirect) {
            continue;
        }
        let fragment = popup.location().hash().unwrap_or_default();
        let _ = popup.close();

        let params = parse_fragment(&fragment);
        if let Some(error) = params.get("error") {
            return Err(AuthError::Backend(decode(error)));
        }
        if params.get("state").map(String::as_str) != Some(state.as_str()) {
            return Err(AuthError::Backend("OAuth state mismatch".to_string()));
        }
        let access_token = params
            .get("access_token")
            .map(|t| decode(t))
            .ok_or_else(|| AuthError::Backend("No access token in OAuth response".to_string()))?;
        return Ok(PopupGrant {
            access_token,
            request_uri: redirect,
        });
    }

    let _ = popup.close();
    Err(AuthError::PopupClosed)
}
