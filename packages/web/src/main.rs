use std::rc::Rc;

#[cfg(all(feature = "firebase", not(feature = "offline")))]
use api::firebase::FirebaseBackend;
use api::{AppConfig, AuthGateway};
use dioxus::prelude::*;

use ui::{AuthHeader, AuthModal, BrowserNavigator, FormController, InitErrorBanner};
use views::{AuthCallback, Dashboard, Home, Login};

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Shell)]
        #[route("/?:logout")]
        Home { logout: String },
        #[route("/index.html")]
        Index {},
        #[route("/login")]
        Login {},
        #[route("/dashboard/user")]
        Dashboard {},
    #[end_layout]
    #[route("/auth/callback")]
    AuthCallback {},
}

/// Embedded at build time; the browser has no filesystem to read it from.
const CONFIG_TOML: &str = include_str!("../doctorsab.toml");

fn main() {
    dioxus::launch(App);
}

fn load_config() -> AppConfig {
    let config = AppConfig::from_toml(CONFIG_TOML).unwrap_or_else(|e| {
        tracing::error!("Invalid {}: {}", AppConfig::filename(), e);
        AppConfig::default()
    });
    #[cfg(not(target_arch = "wasm32"))]
    let config = config.with_env_overrides();
    config
}

#[component]
fn App() -> Element {
    let config = use_context_provider(load_config);
    let controller = use_hook(|| {
        FormController::new(AuthGateway::new(), Rc::new(BrowserNavigator::new()), &config)
    });

    #[cfg(all(feature = "firebase", not(feature = "offline")))]
    {
        let firebase = config.firebase.clone();
        ui::use_auth_provider(controller, move || FirebaseBackend::connect(firebase));
    }
    #[cfg(any(feature = "offline", not(feature = "firebase")))]
    ui::use_auth_provider(controller, || async { Ok(api::MemoryBackend::new()) });

    rsx! {
        Router::<Route> {}
    }
}

/// Page chrome shared by every page except the OAuth callback.
#[component]
fn Shell() -> Element {
    rsx! {
        InitErrorBanner {}
        header {
            class: "site-header",
            style: "display: flex; align-items: center; justify-content: space-between; padding: 0.75rem 1.5rem; border-bottom: 1px solid #e5e5e5;",
            Link {
                to: Route::Home { logout: String::new() },
                style: "font-weight: 700; font-size: 1.25rem; color: #1a73e8; text-decoration: none;",
                "DoctorSab"
            }
            AuthHeader {}
        }
        main {
            Outlet::<Route> {}
        }
        AuthModal {}
    }
}

/// `/index.html` is an alias of the landing page.
#[component]
fn Index() -> Element {
    let nav = use_navigator();
    nav.replace(Route::Home {
        logout: String::new(),
    });
    rsx! {}
}
