//! Authentication context and hooks for the UI.

use std::future::Future;

use api::{AuthBackend, AuthError};
use dioxus::prelude::*;
use futures::StreamExt;
use tracing::{debug, error};

use crate::controller::FormController;
use crate::feedback::{AuthMessage, Control, ControlPhase, ControlStates, FormId, FormView};
use crate::session::SessionObserver;

/// Session and initialization state for the application.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub observer: SessionObserver,
    /// Set when the backend failed to initialize.
    pub init_error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthTab {
    #[default]
    Login,
    Signup,
}

impl AuthTab {
    /// Value of the tab's `data-form` attribute.
    pub fn data_form(&self) -> &'static str {
        match self {
            AuthTab::Login => "login",
            AuthTab::Signup => "signup",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AuthTab::Login => "Login",
            AuthTab::Signup => "Sign Up",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModalState {
    pub open: bool,
    pub tab: AuthTab,
}

/// Signals behind the auth modal. This is the [`FormView`] the controller
/// renders into.
#[derive(Clone, Copy, PartialEq)]
pub struct AuthUi {
    pub modal: Signal<ModalState>,
    pub login_message: Signal<Option<AuthMessage>>,
    pub signup_message: Signal<Option<AuthMessage>>,
    pub controls: Signal<ControlStates>,
}

impl AuthUi {
    fn new() -> Self {
        Self {
            modal: Signal::new(ModalState::default()),
            login_message: Signal::new(None),
            signup_message: Signal::new(None),
            controls: Signal::new(ControlStates::default()),
        }
    }

    pub fn open(&self, tab: AuthTab) {
        let mut modal = self.modal;
        modal.set(ModalState { open: true, tab });
    }

    pub fn select_tab(&self, tab: AuthTab) {
        let mut modal = self.modal;
        modal.write().tab = tab;
    }

    pub fn message(&self, form: FormId) -> Option<AuthMessage> {
        match form {
            FormId::Login => (self.login_message)(),
            FormId::Signup => (self.signup_message)(),
        }
    }

    pub fn phase(&self, control: Control) -> ControlPhase {
        self.controls.read().get(control)
    }
}

impl FormView for AuthUi {
    fn show_message(&self, form: FormId, message: AuthMessage) {
        let mut slot = match form {
            FormId::Login => self.login_message,
            FormId::Signup => self.signup_message,
        };
        slot.set(Some(message));
    }

    fn set_control(&self, control: Control, phase: ControlPhase) {
        let mut controls = self.controls;
        controls.write().set(control, phase);
    }

    fn close_modal(&self) {
        let mut modal = self.modal;
        modal.write().open = false;
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user logs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_auth_ui() -> AuthUi {
    use_context::<AuthUi>()
}

pub fn use_controller() -> FormController {
    use_context::<FormController>()
}

/// Provide the auth context to the component tree.
///
/// Runs `init` once to bring the backend up, then follows the session stream
/// for the lifetime of the app: every pushed change goes through the
/// [`SessionObserver`], which closes the modal and redirects off landing pages
/// after a sign-in. When `init` fails the error is kept for the banner and the
/// login form reports that authentication is unavailable.
pub fn use_auth_provider<I, F, B>(controller: FormController, init: I) -> Signal<AuthState>
where
    I: FnOnce() -> F + 'static,
    F: Future<Output = Result<B, AuthError>> + 'static,
    B: AuthBackend + 'static,
{
    let navigation = controller.navigation().clone();
    let mut auth_state = use_signal(|| AuthState {
        observer: SessionObserver::new(navigation),
        init_error: None,
    });
    let ui = use_hook(AuthUi::new);

    use_context_provider(|| auth_state);
    use_context_provider(|| ui);
    let controller = use_context_provider(|| controller);

    use_hook(move || {
        spawn(async move {
            let gateway = controller.gateway().clone();
            if let Err(e) = gateway.initialize(init()).await {
                error!(error = %e, "Auth backend failed to initialize");
                auth_state.write().init_error = Some(e.to_string());
                controller.report_unavailable(&ui);
                return;
            }

            let mut events = match gateway.subscribe() {
                Ok(events) => events,
                Err(e) => {
                    error!(error = %e, "Could not subscribe to session changes");
                    return;
                }
            };

            while let Some(user) = events.next().await {
                debug!(signed_in = user.is_some(), "Session changed");
                let path = controller.navigator().current_path();
                let reaction = auth_state.write().observer.apply(user, &path);
                if reaction.close_modal {
                    ui.close_modal();
                }
                if let Some(destination) = reaction.redirect {
                    controller.navigate(destination);
                }
            }
        })
    });

    auth_state
}
