//! # Application configuration — `doctorsab.toml`
//!
//! The browser bundle embeds this file at build time; native builds may overlay
//! `FIREBASE_*` variables from the environment (and a `.env` file) on top.
//!
//! ```toml
//! [firebase]
//! api_key = "..."
//! auth_domain = "doc-sab.firebaseapp.com"
//! project_id = "doc-sab"
//! google_client_id = "....apps.googleusercontent.com"
//!
//! [navigation]
//! dashboard_path = "/dashboard/user"
//! home_path = "/"
//! landing_paths = ["/", "/login", "/index.html"]
//!
//! [feedback]
//! login_success_delay_ms = 1000
//! signup_success_delay_ms = 1500
//! ```
//!
//! Every section has defaults, so a missing table falls back to the values above
//! (with an empty Firebase section, which [`FirebaseConfig::validate`] rejects).

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub firebase: FirebaseConfig,
    #[serde(default)]
    pub navigation: NavigationConfig,
    #[serde(default)]
    pub feedback: FeedbackConfig,
}

/// Firebase project settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub auth_domain: String,
    #[serde(default)]
    pub project_id: String,
    /// OAuth client used for the Google consent popup.
    #[serde(default)]
    pub google_client_id: Option<String>,
}

/// Fixed navigation targets.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NavigationConfig {
    #[serde(default = "default_dashboard_path")]
    pub dashboard_path: String,
    #[serde(default = "default_home_path")]
    pub home_path: String,
    /// Pages that bounce an already signed-in user to the dashboard.
    #[serde(default = "default_landing_paths")]
    pub landing_paths: Vec<String>,
}

/// Delays between the success message and the redirect.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeedbackConfig {
    #[serde(default = "default_login_delay")]
    pub login_success_delay_ms: u64,
    #[serde(default = "default_signup_delay")]
    pub signup_success_delay_ms: u64,
}

fn default_dashboard_path() -> String {
    "/dashboard/user".to_string()
}

fn default_home_path() -> String {
    "/".to_string()
}

fn default_landing_paths() -> Vec<String> {
    vec!["/".to_string(), "/login".to_string(), "/index.html".to_string()]
}

fn default_login_delay() -> u64 {
    1000
}

fn default_signup_delay() -> u64 {
    1500
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            dashboard_path: default_dashboard_path(),
            home_path: default_home_path(),
            landing_paths: default_landing_paths(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            login_success_delay_ms: default_login_delay(),
            signup_success_delay_ms: default_signup_delay(),
        }
    }
}

impl AppConfig {
    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "doctorsab.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Overlay `FIREBASE_API_KEY`, `FIREBASE_AUTH_DOMAIN`, `FIREBASE_PROJECT_ID`
    /// and `GOOGLE_CLIENT_ID` from the environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_env_overrides(mut self) -> Self {
        dotenvy::dotenv().ok();

        if let Ok(key) = std::env::var("FIREBASE_API_KEY") {
            self.firebase.api_key = key;
        }
        if let Ok(domain) = std::env::var("FIREBASE_AUTH_DOMAIN") {
            self.firebase.auth_domain = domain;
        }
        if let Ok(project) = std::env::var("FIREBASE_PROJECT_ID") {
            self.firebase.project_id = project;
        }
        if let Ok(client_id) = std::env::var("GOOGLE_CLIENT_ID") {
            self.firebase.google_client_id = Some(client_id);
        }
        self
    }
}

impl FirebaseConfig {
    /// Check the fields every REST call needs.
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.api_key.trim().is_empty() {
            return Err(AuthError::Config("firebase.api_key not set".to_string()));
        }
        if self.project_id.trim().is_empty() {
            return Err(AuthError::Config("firebase.project_id not set".to_string()));
        }
        Ok(())
    }

    /// Firestore console page for the project, optionally opened on a collection.
    pub fn console_url(&self, collection: Option<&str>) -> String {
        let base = format!(
            "https://console.firebase.google.com/project/{}/firestore/data",
            self.project_id
        );
        match collection {
            Some(c) if !c.is_empty() => format!("{base}/{c}"),
            _ => base,
        }
    }
}

impl NavigationConfig {
    /// Whether `path` is a landing page a signed-in user should leave.
    pub fn is_landing(&self, path: &str) -> bool {
        self.landing_paths.iter().any(|p| p == path)
    }
}
