//! User dashboard: the stored profile of the signed-in user.

use api::models::PROFILES_COLLECTION;
use api::{AppConfig, Role, UiResult, UserProfile};
use dioxus::prelude::*;
use ui::{use_auth, use_controller, SessionState};

#[component]
pub fn Dashboard() -> Element {
    let auth = use_auth();
    let controller = use_controller();
    let config = use_context::<AppConfig>();

    let profile = use_resource(move || {
        let controller = controller.clone();
        let uid = auth.read().observer.user().map(|user| user.uid.clone());
        async move {
            match uid {
                Some(uid) => Some(controller.gateway().get_profile(&uid).await),
                None => None,
            }
        }
    });

    if matches!(auth.read().observer.state(), SessionState::Pending) {
        return rsx! {
            p { class: "dashboard-loading", "Loading..." }
        };
    }

    let console_url = config.firebase.console_url(Some(PROFILES_COLLECTION));

    rsx! {
        section {
            class: "dashboard",
            style: "max-width: 640px; margin: 2rem auto; padding: 0 1rem;",
            h1 { style: "font-size: 1.5rem; margin-bottom: 1rem;", "Dashboard" }

            match &*profile.read() {
                None | Some(None) if auth.read().observer.user().is_none() => rsx! {
                    p { "Please log in to see your dashboard." }
                },
                None | Some(None) => rsx! {
                    p { "Loading your profile..." }
                },
                Some(Some(UiResult::Failure { error })) => rsx! {
                    div { class: "auth-message error", "{error}" }
                },
                Some(Some(UiResult::Success { data })) => rsx! {
                    ProfileCard { profile: data.clone() }
                },
            }

            a {
                class: "console-link",
                href: "{console_url}",
                target: "_blank",
                rel: "noopener",
                style: "display: inline-block; margin-top: 1.5rem; font-size: 0.8125rem;",
                "Open user records in the Firestore console"
            }
        }
    }
}

#[component]
fn ProfileCard(profile: UserProfile) -> Element {
    let approval = profile
        .approval_status
        .map(|status| status.as_str())
        .unwrap_or("pending");
    let specialization = profile.specialization.clone().unwrap_or_default();
    let license_number = profile.license_number.clone().unwrap_or_default();

    rsx! {
        div {
            class: "profile-card",
            style: "border: 1px solid #e5e5e5; border-radius: 8px; padding: 1rem;",
            p { strong { "Name: " } "{profile.name}" }
            p { strong { "Email: " } "{profile.email}" }
            p { strong { "Role: " } "{profile.role}" }

            if profile.role == Role::Doctor {
                p { strong { "Specialization: " } "{specialization}" }
                p { strong { "License: " } "{license_number}" }
                if profile.is_approved_doctor() {
                    p { class: "auth-message success", "Your doctor account is approved." }
                } else {
                    p { class: "auth-message info", "Doctor account status: {approval}" }
                }
            }
        }
    }
}
