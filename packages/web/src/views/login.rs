//! Login page: the landing page with the auth modal already open.

use dioxus::prelude::*;
use ui::{use_auth_ui, AuthTab};

#[component]
pub fn Login() -> Element {
    let ui = use_auth_ui();
    use_effect(move || ui.open(AuthTab::Login));

    rsx! {
        div {
            class: "login-container",
            style: "display: flex; flex-direction: column; align-items: center; justify-content: center; min-height: 60vh; padding: 2rem;",
            h1 {
                style: "margin-bottom: 0.5rem; color: #37352f; font-weight: 700; font-size: 1.75rem;",
                "Welcome to DoctorSab"
            }
            p {
                style: "color: #787774; font-size: 0.9375rem;",
                "Sign in or create an account to continue."
            }
            button {
                class: "btn btn-primary",
                style: "margin-top: 1.5rem;",
                onclick: move |_| ui.open(AuthTab::Login),
                "Open sign-in"
            }
        }
    }
}
