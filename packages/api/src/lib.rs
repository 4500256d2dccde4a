//! # API crate — authentication and profile services for DoctorSab
//!
//! This crate holds everything the UI needs to sign users in and keep their
//! profile documents, without any rendering code.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`backend`] | — | `IdentityProvider` / `DocumentStore` seams and the session push hub |
//! | [`config`] | — | `doctorsab.toml`: Firebase project, navigation targets, feedback timing |
//! | [`error`] | — | `AuthError`, one variant per failure the forms can show |
//! | [`firebase`] | `firebase` | REST-backed Firebase Auth + Firestore implementation |
//! | [`gateway`] | — | `AuthGateway`, the facade every form and the session observer go through |
//! | [`memory`] | — | In-memory backend for tests and offline development |
//! | [`models`] | — | Session user, profile document, roles and approval status |
//! | [`navigation`] | — | Post-action destinations (`/dashboard/user`, `/?logout=...`) |
//! | [`result`] | — | `UiResult`, the success/failure envelope handed to the forms |
//!
//! ## Gateway operations
//!
//! - **Credentials**: `login`, `register`, `login_with_social_provider`, `logout`
//! - **Profiles**: `get_profile`, `store_profile`, `list_profiles`
//! - **Session**: `current_user`, `subscribe`

pub mod backend;
pub mod config;
pub mod error;
#[cfg(feature = "firebase")]
pub mod firebase;
pub mod gateway;
pub mod memory;
pub mod models;
pub mod navigation;
pub mod result;

pub use backend::{
    AuthBackend, DocumentQuery, DocumentStore, IdentityProvider, SessionEvents,
    SocialSignInRequest, StoredDocument,
};
pub use config::{AppConfig, FeedbackConfig, FirebaseConfig, NavigationConfig};
pub use error::AuthError;
pub use gateway::{AuthGateway, LogoutOutcome};
pub use memory::MemoryBackend;
pub use models::{
    ApprovalStatus, ProfileEntry, ProfileUpdate, Role, SessionUser, SocialSignIn, UserProfile,
};
pub use navigation::{Destination, LogoutStatus};
pub use result::UiResult;
