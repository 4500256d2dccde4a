use dioxus::prelude::*;

use crate::auth::{use_auth, use_auth_ui, use_controller, AuthTab};
use crate::feedback::{LOGIN_BUTTON_ID, SIGNUP_BUTTON_ID};
use crate::icons::FaRightFromBracket;
use crate::Icon;

/// Header slot that shows the login/signup buttons or, once signed in, the
/// account block.
#[component]
pub fn AuthHeader() -> Element {
    let auth = use_auth();
    let ui = use_auth_ui();
    let header = auth.read().observer.header().clone();

    if let Some(account) = header.account {
        return rsx! {
            div {
                class: "user-account",
                img {
                    class: "user-avatar",
                    src: "{account.avatar_url}",
                    alt: "{account.name}",
                    width: "40",
                    height: "40",
                }
                span { class: "user-name", "{account.name}" }
                LogoutButton {}
            }
        };
    }

    if !header.show_auth_buttons {
        return rsx! {};
    }

    rsx! {
        div {
            class: "auth-buttons",
            button {
                id: LOGIN_BUTTON_ID,
                class: "btn btn-login",
                onclick: move |_| ui.open(AuthTab::Login),
                "Login"
            }
            button {
                id: SIGNUP_BUTTON_ID,
                class: "btn btn-signup",
                onclick: move |_| ui.open(AuthTab::Signup),
                "Sign Up"
            }
        }
    }
}

/// Button to log out the current user.
#[component]
pub fn LogoutButton(#[props(default = "Logout".to_string())] label: String) -> Element {
    let controller = use_controller();
    let mut busy = use_signal(|| false);

    let onclick = move |_| {
        let controller = controller.clone();
        async move {
            busy.set(true);
            controller.logout().await;
        }
    };

    rsx! {
        button {
            class: "btn btn-logout",
            disabled: busy(),
            onclick: onclick,
            Icon { icon: FaRightFromBracket, width: 14, height: 14 }
            span { " {label}" }
        }
    }
}
