use dioxus::prelude::*;

use crate::auth::{use_auth, use_auth_ui, use_controller};
use crate::brand_icons::FaGoogle;
use crate::feedback::{Control, ControlPhase, FormId};
use crate::icons::{FaCheck, FaDatabase, FaSpinner};
use crate::Icon;

/// The `#loginMessage` / `#signupMessage` line.
#[component]
pub fn MessageBox(form: FormId) -> Element {
    let ui = use_auth_ui();

    match ui.message(form) {
        Some(message) => rsx! {
            div {
                id: form.message_id(),
                class: message.class(),
                "{message.text}"
            }
        },
        None => rsx! {
            div { id: form.message_id(), class: "auth-message" }
        },
    }
}

/// Button content for `control` in its current phase.
#[component]
pub fn ControlLabel(control: Control) -> Element {
    let ui = use_auth_ui();
    let google = matches!(control, Control::GoogleLogin | Control::GoogleSignup);

    match ui.phase(control) {
        ControlPhase::Idle => rsx! {
            if google {
                Icon { icon: FaGoogle, width: 14, height: 14 }
            }
            span { "{control.idle_label()}" }
        },
        ControlPhase::Busy => rsx! {
            Icon { icon: FaSpinner, width: 14, height: 14, class: "fa-spin" }
            span { "{control.busy_label()}" }
        },
        ControlPhase::Succeeded => rsx! {
            Icon { icon: FaCheck, width: 14, height: 14 }
            span { "Success!" }
        },
    }
}

/// Link to the project's Firestore data in the Firebase console, shown in the
/// social section of both forms.
#[component]
pub fn ConsoleButton() -> Element {
    let controller = use_controller();
    let url = controller.console_url().to_string();

    rsx! {
        a {
            class: "btn btn-secondary firestore-btn",
            href: url,
            target: "_blank",
            rel: "noopener noreferrer",
            Icon { icon: FaDatabase, width: 14, height: 14 }
            span { " Open Firebase Console" }
        }
    }
}

/// Fixed banner shown when the auth backend could not be initialized.
#[component]
pub fn InitErrorBanner() -> Element {
    let auth = use_auth();
    let Some(reason) = auth.read().init_error.clone() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: "init-error-banner",
            style: "position: fixed; top: 0; left: 0; right: 0; z-index: 3000; padding: 0.625rem 1rem; background: #f8d7da; color: #721c24; text-align: center; font-size: 0.875rem;",
            "Error initializing Firebase: {reason}"
        }
    }
}
