//! This crate contains all shared UI for the workspace: the auth modal, the
//! header account block, and the controller and session observer behind them.

pub mod components;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}
pub mod brand_icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::*;
}

mod auth;
pub use auth::{
    use_auth, use_auth_provider, use_auth_ui, use_controller, AuthState, AuthTab, AuthUi,
    ModalState,
};

pub mod controller;
pub use controller::{FormController, UNAVAILABLE_MESSAGE};

pub mod feedback;
pub use feedback::{
    AuthMessage, Control, ControlPhase, FormId, FormView, MessageKind, LOGIN_BUTTON_ID,
    SIGNUP_BUTTON_ID,
};

pub mod navigator;
pub use navigator::{BrowserNavigator, Navigator};

pub mod password_strength;
pub use password_strength::StrengthTier;

pub mod session;
pub use session::{AccountWidget, HeaderState, SessionObserver, SessionState};

pub mod validation;
pub use validation::{DoctorDetails, LoginForm, SignupForm, SocialSignupForm, ValidationError};

pub use components::{AuthHeader, AuthModal, InitErrorBanner, LogoutButton};
