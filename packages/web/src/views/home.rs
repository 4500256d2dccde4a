//! Landing page.

use api::LogoutStatus;
use dioxus::prelude::*;
use ui::{use_auth_ui, AuthTab};

#[component]
pub fn Home(logout: String) -> Element {
    let ui = use_auth_ui();

    let notice = match LogoutStatus::from_query(&logout) {
        Some(LogoutStatus::Success) => Some(("auth-message success", "You have been logged out.")),
        Some(LogoutStatus::Error) => Some((
            "auth-message error",
            "There was a problem logging you out. Please try again.",
        )),
        None => None,
    };

    rsx! {
        section {
            class: "hero",
            style: "display: flex; flex-direction: column; align-items: center; padding: 4rem 2rem; text-align: center;",

            if let Some((class, text)) = notice {
                div { class: class, style: "margin-bottom: 1.5rem;", "{text}" }
            }

            h1 {
                style: "margin-bottom: 0.5rem; color: #37352f; font-weight: 700; font-size: 2rem;",
                "Your doctor, one click away"
            }
            p {
                style: "margin-bottom: 2rem; color: #787774; font-size: 1rem;",
                "Find specialists, book appointments and keep your health records in one place."
            }
            div {
                style: "display: flex; gap: 0.75rem;",
                button {
                    class: "btn btn-primary",
                    onclick: move |_| ui.open(AuthTab::Signup),
                    "Get Started"
                }
                button {
                    class: "btn btn-login",
                    onclick: move |_| ui.open(AuthTab::Login),
                    "I already have an account"
                }
            }
        }
    }
}
