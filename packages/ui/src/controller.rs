//! Binds the auth forms to gateway calls.
//!
//! [`FormController`] owns the submit and click handlers of the auth modal. Each
//! handler validates its form, drives the three feedback phases through a
//! [`FormView`], and on success closes the modal and navigates to the dashboard
//! after a short delay so the success message can be read.
//!
//! The controller holds no per-submit state; every handler receives the form
//! values and the view explicitly. It is cheap to clone and is shared with the
//! components through context.

use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use api::{AppConfig, AuthGateway, Destination, FeedbackConfig, NavigationConfig, SessionUser, UiResult};
use chrono::Utc;
use tracing::{debug, warn};

use crate::feedback::{AuthMessage, Control, ControlPhase, FormId, FormView};
use crate::navigator::Navigator;
use crate::validation::{LoginForm, SignupForm, SocialSignupForm};

/// Shown on the login form when the backend could not be initialized.
pub const UNAVAILABLE_MESSAGE: &str =
    "Firebase authentication isn't available. Check your internet connection.";

/// Messages and timing of one kind of submit.
struct Flow {
    control: Control,
    progress: &'static str,
    success: &'static str,
    fallback: &'static str,
}

const LOGIN: Flow = Flow {
    control: Control::LoginSubmit,
    progress: "Logging in...",
    success: "Login successful!",
    fallback: "Login failed. Please try again.",
};

const SIGNUP: Flow = Flow {
    control: Control::SignupSubmit,
    progress: "Creating your account...",
    success: "Account created successfully!",
    fallback: "Signup failed. Please try again.",
};

const GOOGLE_LOGIN: Flow = Flow {
    control: Control::GoogleLogin,
    progress: "Logging in with Google...",
    success: "Login successful!",
    fallback: "Google login failed. Please try again.",
};

const GOOGLE_SIGNUP: Flow = Flow {
    control: Control::GoogleSignup,
    progress: "Signing up with Google...",
    success: "Signup successful!",
    fallback: "Google signup failed. Please try again.",
};

#[derive(Clone)]
pub struct FormController {
    gateway: AuthGateway,
    navigator: Rc<dyn Navigator>,
    navigation: NavigationConfig,
    feedback: FeedbackConfig,
    console_url: String,
}

impl PartialEq for FormController {
    fn eq(&self, other: &Self) -> bool {
        self.gateway == other.gateway && Rc::ptr_eq(&self.navigator, &other.navigator)
    }
}

impl FormController {
    pub fn new(gateway: AuthGateway, navigator: Rc<dyn Navigator>, config: &AppConfig) -> Self {
        Self {
            gateway,
            navigator,
            navigation: config.navigation.clone(),
            feedback: config.feedback.clone(),
            console_url: config.firebase.console_url(None),
        }
    }

    pub fn gateway(&self) -> &AuthGateway {
        &self.gateway
    }

    pub fn navigator(&self) -> &dyn Navigator {
        self.navigator.as_ref()
    }

    pub fn navigation(&self) -> &NavigationConfig {
        &self.navigation
    }

    /// Firestore console page of the configured project.
    pub fn console_url(&self) -> &str {
        &self.console_url
    }

    pub fn navigate(&self, destination: Destination) {
        self.navigator.navigate(&destination.path(&self.navigation));
    }

    /// Email/password login.
    pub async fn submit_login(&self, view: &dyn FormView, form: &LoginForm) -> bool {
        let gateway = self.gateway.clone();
        let (email, password) = (form.email.clone(), form.password.clone());
        self.run(view, &LOGIN, self.feedback.login_success_delay_ms, async move {
            gateway.login(&email, &password).await
        })
        .await
        .is_some()
    }

    /// Validate the signup form, then create the account and its profile.
    pub async fn submit_signup(&self, view: &dyn FormView, form: &SignupForm) -> bool {
        if let Err(e) = form.validate() {
            debug!(error = %e, "Signup form rejected");
            view.show_message(FormId::Signup, AuthMessage::error(e.to_string()));
            return false;
        }

        let gateway = self.gateway.clone();
        let profile = form.profile(Utc::now());
        let (email, password) = (form.email.clone(), form.password.clone());
        self.run(view, &SIGNUP, self.feedback.signup_success_delay_ms, async move {
            gateway.register(&email, &password, &profile).await
        })
        .await
        .is_some()
    }

    /// "Continue with Google" on the login tab.
    pub async fn social_login(&self, view: &dyn FormView) -> bool {
        let gateway = self.gateway.clone();
        self.run(view, &GOOGLE_LOGIN, self.feedback.login_success_delay_ms, async move {
            gateway.login_with_social_provider().await
        })
        .await
        .is_some()
    }

    /// "Sign up with Google": popup sign-in, then record the chosen role (and
    /// doctor credentials) on the profile.
    pub async fn social_signup(&self, view: &dyn FormView, form: &SocialSignupForm) -> bool {
        if let Err(e) = form.validate() {
            debug!(error = %e, "Google signup rejected");
            view.show_message(FormId::Signup, AuthMessage::error(e.to_string()));
            return false;
        }

        let gateway = self.gateway.clone();
        let form = form.clone();
        self.run(view, &GOOGLE_SIGNUP, self.feedback.login_success_delay_ms, async move {
            let result = gateway.login_with_social_provider().await;
            if let UiResult::Success { data: user } = &result {
                record_signup(&gateway, user, &form).await;
            }
            result
        })
        .await
        .is_some()
    }

    /// Sign out and leave for the home page. Navigates exactly once whatever the
    /// backend reported.
    pub async fn logout(&self) -> Destination {
        let outcome = self.gateway.logout().await;
        self.navigate(outcome.destination);
        outcome.destination
    }

    /// Tell the user on the login form that sign-in cannot work.
    pub fn report_unavailable(&self, view: &dyn FormView) {
        view.show_message(FormId::Login, AuthMessage::error(UNAVAILABLE_MESSAGE));
    }

    async fn run<T, F>(&self, view: &dyn FormView, flow: &Flow, delay_ms: u64, call: F) -> Option<T>
    where
        F: Future<Output = UiResult<T>>,
    {
        let form = flow.control.form();
        view.show_message(form, AuthMessage::info(flow.progress));
        view.set_control(flow.control, ControlPhase::Busy);

        match call.await {
            UiResult::Success { data } => {
                view.show_message(form, AuthMessage::success(flow.success));
                view.set_control(flow.control, ControlPhase::Succeeded);
                pause(delay_ms).await;
                view.close_modal();
                self.navigate(Destination::Dashboard);
                Some(data)
            }
            UiResult::Failure { error } => {
                let text = if error.trim().is_empty() {
                    flow.fallback.to_string()
                } else {
                    error
                };
                view.show_message(form, AuthMessage::error(text));
                view.set_control(flow.control, ControlPhase::Idle);
                None
            }
        }
    }
}

/// Merge the signup choices into the profile. The sign-in already succeeded, so
/// a failed write is only logged.
async fn record_signup(gateway: &AuthGateway, user: &SessionUser, form: &SocialSignupForm) {
    if let UiResult::Failure { error } = gateway.store_profile(&user.uid, form.profile(user)).await {
        warn!(uid = %user.uid, error = %error, "Google signup profile not saved");
    }
}

async fn pause(ms: u64) {
    if ms == 0 {
        return;
    }
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(Duration::from_millis(ms)).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use api::memory::BackendCall;
    use api::{MemoryBackend, Role};
    use serde_json::json;

    use super::*;
    use crate::validation::DoctorDetails;

    #[derive(Debug, Clone, PartialEq)]
    enum ViewEvent {
        Message(FormId, AuthMessage),
        Control(Control, ControlPhase),
        CloseModal,
    }

    #[derive(Default)]
    struct RecordingView {
        events: RefCell<Vec<ViewEvent>>,
    }

    impl RecordingView {
        fn events(&self) -> Vec<ViewEvent> {
            self.events.borrow().clone()
        }

        fn last_message(&self) -> Option<AuthMessage> {
            self.events.borrow().iter().rev().find_map(|e| match e {
                ViewEvent::Message(_, m) => Some(m.clone()),
                _ => None,
            })
        }
    }

    impl FormView for RecordingView {
        fn show_message(&self, form: FormId, message: AuthMessage) {
            self.events.borrow_mut().push(ViewEvent::Message(form, message));
        }

        fn set_control(&self, control: Control, phase: ControlPhase) {
            self.events.borrow_mut().push(ViewEvent::Control(control, phase));
        }

        fn close_modal(&self) {
            self.events.borrow_mut().push(ViewEvent::CloseModal);
        }
    }

    #[derive(Default)]
    struct RecordingNavigator {
        visits: RefCell<Vec<String>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, path: &str) {
            self.visits.borrow_mut().push(path.to_string());
        }

        fn current_path(&self) -> String {
            self.visits
                .borrow()
                .last()
                .cloned()
                .unwrap_or_else(|| "/".to_string())
        }
    }

    fn instant_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.feedback.login_success_delay_ms = 0;
        config.feedback.signup_success_delay_ms = 0;
        config
    }

    fn setup(backend: &MemoryBackend) -> (FormController, Rc<RecordingNavigator>) {
        let navigator = Rc::new(RecordingNavigator::default());
        let controller = FormController::new(
            AuthGateway::with_backend(backend.clone()),
            navigator.clone(),
            &instant_config(),
        );
        (controller, navigator)
    }

    fn login_form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    fn signup_form() -> SignupForm {
        SignupForm {
            name: "Ada".to_string(),
            email: "ada@x.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            role: Role::Patient,
            doctor: DoctorDetails::default(),
            terms_accepted: true,
        }
    }

    fn google_user() -> SessionUser {
        SessionUser {
            uid: "g1".to_string(),
            email: "g@x.com".to_string(),
            display_name: Some("Gee".to_string()),
            photo_url: Some("https://img/g.png".to_string()),
        }
    }

    fn default_setup(backend: &MemoryBackend) -> (FormController, Rc<RecordingNavigator>) {
        let navigator = Rc::new(RecordingNavigator::default());
        let controller = FormController::new(
            AuthGateway::with_backend(backend.clone()),
            navigator.clone(),
            &AppConfig::default(),
        );
        (controller, navigator)
    }

    /// Sleep to just before `delay_ms` and check nothing navigated yet, then past it.
    async fn expect_redirect_after(
        delay_ms: u64,
        view: &RecordingView,
        navigator: &RecordingNavigator,
        success: &str,
    ) {
        tokio::time::sleep(Duration::from_millis(delay_ms - 1)).await;
        assert_eq!(view.last_message(), Some(AuthMessage::success(success)));
        assert!(navigator.visits.borrow().is_empty());
        assert!(!view.events().contains(&ViewEvent::CloseModal));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(*navigator.visits.borrow(), vec!["/dashboard/user".to_string()]);
        assert_eq!(view.events().last(), Some(&ViewEvent::CloseModal));
    }

    #[test]
    fn test_console_url_follows_configured_project() {
        let mut config = AppConfig::default();
        config.firebase.project_id = "doc-sab".to_string();
        let controller = FormController::new(
            AuthGateway::new(),
            Rc::new(RecordingNavigator::default()),
            &config,
        );
        assert_eq!(
            controller.console_url(),
            "https://console.firebase.google.com/project/doc-sab/firestore/data"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_redirect_waits_for_default_delay() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", None);
        let (controller, navigator) = default_setup(&backend);
        let view = RecordingView::default();
        assert_eq!(AppConfig::default().feedback.login_success_delay_ms, 1000);

        let form = login_form("a@x.com", "secret1");
        let (ok, ()) = tokio::join!(
            controller.submit_login(&view, &form),
            expect_redirect_after(1000, &view, &navigator, "Login successful!"),
        );
        assert!(ok);
    }

    #[tokio::test(start_paused = true)]
    async fn test_signup_redirect_waits_for_default_delay() {
        let backend = MemoryBackend::new();
        let (controller, navigator) = default_setup(&backend);
        let view = RecordingView::default();
        assert_eq!(AppConfig::default().feedback.signup_success_delay_ms, 1500);

        let form = signup_form();
        let (ok, ()) = tokio::join!(
            controller.submit_signup(&view, &form),
            expect_redirect_after(1500, &view, &navigator, "Account created successfully!"),
        );
        assert!(ok);
    }

    #[tokio::test]
    async fn test_login_success_feedback_and_redirect() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", None);
        let (controller, navigator) = setup(&backend);
        let view = RecordingView::default();

        assert!(controller.submit_login(&view, &login_form("a@x.com", "secret1")).await);

        assert_eq!(
            view.events(),
            vec![
                ViewEvent::Message(FormId::Login, AuthMessage::info("Logging in...")),
                ViewEvent::Control(Control::LoginSubmit, ControlPhase::Busy),
                ViewEvent::Message(FormId::Login, AuthMessage::success("Login successful!")),
                ViewEvent::Control(Control::LoginSubmit, ControlPhase::Succeeded),
                ViewEvent::CloseModal,
            ]
        );
        assert_eq!(*navigator.visits.borrow(), vec!["/dashboard/user".to_string()]);
    }

    #[tokio::test]
    async fn test_login_failure_restores_control() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", None);
        let (controller, navigator) = setup(&backend);
        let view = RecordingView::default();

        assert!(!controller.submit_login(&view, &login_form("a@x.com", "wrong")).await);

        let events = view.events();
        assert_eq!(
            events.last(),
            Some(&ViewEvent::Control(Control::LoginSubmit, ControlPhase::Idle))
        );
        assert_eq!(
            view.last_message(),
            Some(AuthMessage::error("Invalid email or password"))
        );
        assert!(!events.contains(&ViewEvent::CloseModal));
        assert!(navigator.visits.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_login_before_initialization_fails_fast() {
        let navigator = Rc::new(RecordingNavigator::default());
        let controller = FormController::new(AuthGateway::new(), navigator.clone(), &instant_config());
        let view = RecordingView::default();

        assert!(!controller.submit_login(&view, &login_form("a@x.com", "secret1")).await);
        assert_eq!(
            view.last_message(),
            Some(AuthMessage::error(
                "Firebase Auth is not available. Please check your internet connection."
            ))
        );
        assert!(navigator.visits.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_signup_mismatch_never_reaches_backend() {
        let backend = MemoryBackend::new();
        let (controller, navigator) = setup(&backend);
        let view = RecordingView::default();
        let form = SignupForm {
            password: "p1".to_string(),
            confirm_password: "p2".to_string(),
            ..signup_form()
        };

        assert!(!controller.submit_signup(&view, &form).await);
        assert_eq!(
            view.events(),
            vec![ViewEvent::Message(
                FormId::Signup,
                AuthMessage::error("Passwords do not match!")
            )]
        );
        assert!(backend.calls().is_empty());
        assert!(navigator.visits.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_doctor_without_credentials_never_reaches_backend() {
        let backend = MemoryBackend::new();
        let (controller, _) = setup(&backend);
        let view = RecordingView::default();
        let form = SignupForm {
            role: Role::Doctor,
            doctor: DoctorDetails {
                specialization: "Cardiology".to_string(),
                license_number: String::new(),
            },
            ..signup_form()
        };

        assert!(!controller.submit_signup(&view, &form).await);
        assert_eq!(
            view.last_message(),
            Some(AuthMessage::error("Please enter your medical license number!"))
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_signup_creates_account_and_profile() {
        let backend = MemoryBackend::new();
        let (controller, navigator) = setup(&backend);
        let view = RecordingView::default();
        let form = SignupForm {
            role: Role::Doctor,
            doctor: DoctorDetails {
                specialization: "Cardiology".to_string(),
                license_number: "LIC-1".to_string(),
            },
            ..signup_form()
        };

        assert!(controller.submit_signup(&view, &form).await);

        assert_eq!(
            view.events()[0],
            ViewEvent::Message(FormId::Signup, AuthMessage::info("Creating your account..."))
        );
        assert_eq!(
            view.last_message(),
            Some(AuthMessage::success("Account created successfully!"))
        );
        let writes = backend.document_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].collection, "users");
        assert_eq!(writes[0].fields["role"], json!("doctor"));
        assert_eq!(writes[0].fields["approvalStatus"], json!("pending"));
        assert_eq!(*navigator.visits.borrow(), vec!["/dashboard/user".to_string()]);
    }

    #[tokio::test]
    async fn test_signup_with_existing_email_shows_error() {
        let backend = MemoryBackend::new().with_account("ada@x.com", "secret1", None);
        let (controller, navigator) = setup(&backend);
        let view = RecordingView::default();

        assert!(!controller.submit_signup(&view, &signup_form()).await);
        assert_eq!(
            view.last_message(),
            Some(AuthMessage::error("An account with this email already exists"))
        );
        assert!(backend.document_writes().is_empty());
        assert!(navigator.visits.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_social_login_writes_default_profile_only_once() {
        let backend = MemoryBackend::new();
        backend.set_popup_identity(Some(google_user()));
        let (controller, navigator) = setup(&backend);

        let view = RecordingView::default();
        assert!(controller.social_login(&view).await);
        let writes = backend.document_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].id, "g1");
        assert_eq!(writes[0].fields["role"], json!("patient"));
        assert_eq!(
            view.events()[0],
            ViewEvent::Message(FormId::Login, AuthMessage::info("Logging in with Google..."))
        );

        let view = RecordingView::default();
        assert!(controller.social_login(&view).await);
        assert_eq!(backend.document_writes().len(), 1);
        assert_eq!(navigator.visits.borrow().len(), 2);
    }

    #[tokio::test]
    async fn test_social_login_closed_popup() {
        let backend = MemoryBackend::new();
        let (controller, navigator) = setup(&backend);
        let view = RecordingView::default();

        assert!(!controller.social_login(&view).await);
        assert_eq!(
            view.events().last(),
            Some(&ViewEvent::Control(Control::GoogleLogin, ControlPhase::Idle))
        );
        assert_eq!(view.last_message().unwrap().kind, crate::feedback::MessageKind::Error);
        assert!(navigator.visits.borrow().is_empty());
    }

    #[tokio::test]
    async fn test_social_signup_records_role_and_credentials() {
        let backend = MemoryBackend::new();
        backend.set_popup_identity(Some(google_user()));
        let (controller, navigator) = setup(&backend);
        let view = RecordingView::default();
        let form = SocialSignupForm {
            role: Role::Doctor,
            doctor: DoctorDetails {
                specialization: "Dermatology".to_string(),
                license_number: "LIC-9".to_string(),
            },
            terms_accepted: true,
        };

        assert!(controller.social_signup(&view, &form).await);

        let doc = backend.document("users", "g1").unwrap();
        assert_eq!(doc["role"], json!("doctor"));
        assert_eq!(doc["name"], json!("Gee"));
        assert_eq!(doc["photoURL"], json!("https://img/g.png"));
        assert_eq!(doc["specialization"], json!("Dermatology"));
        assert_eq!(doc["approvalStatus"], json!("pending"));
        assert!(doc.contains_key("updatedAt"));
        assert_eq!(view.last_message(), Some(AuthMessage::success("Signup successful!")));
        assert_eq!(*navigator.visits.borrow(), vec!["/dashboard/user".to_string()]);
    }

    #[tokio::test]
    async fn test_social_signup_validation_skips_popup() {
        let backend = MemoryBackend::new();
        backend.set_popup_identity(Some(google_user()));
        let (controller, _) = setup(&backend);
        let view = RecordingView::default();

        let form = SocialSignupForm::default();
        assert!(!controller.social_signup(&view, &form).await);
        assert_eq!(
            view.last_message(),
            Some(AuthMessage::error(
                "Please agree to the Terms of Service and Privacy Policy"
            ))
        );
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_social_signup_survives_profile_write_failure() {
        let backend = MemoryBackend::new();
        backend.set_popup_identity(Some(google_user()));
        let (controller, _) = setup(&backend);
        // The first sign-in writes a default profile; fail only the signup merge.
        let view = RecordingView::default();
        controller.social_login(&view).await;
        backend.fail_document_writes(true);

        let view = RecordingView::default();
        let form = SocialSignupForm {
            terms_accepted: true,
            ..SocialSignupForm::default()
        };
        assert!(controller.social_signup(&view, &form).await);
        assert_eq!(view.last_message(), Some(AuthMessage::success("Signup successful!")));
    }

    #[tokio::test]
    async fn test_logout_navigates_once_on_success() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", None);
        let (controller, navigator) = setup(&backend);
        controller.gateway().login("a@x.com", "secret1").await;

        let destination = controller.logout().await;
        assert_eq!(destination.path(controller.navigation()), "/?logout=success");
        assert_eq!(*navigator.visits.borrow(), vec!["/?logout=success".to_string()]);
        assert!(backend.calls().contains(&BackendCall::SignOut));
    }

    #[tokio::test]
    async fn test_logout_navigates_once_on_failure() {
        let backend = MemoryBackend::new().with_account("a@x.com", "secret1", None);
        backend.fail_sign_out(true);
        let (controller, navigator) = setup(&backend);

        controller.logout().await;
        assert_eq!(*navigator.visits.borrow(), vec!["/?logout=error".to_string()]);
    }

    #[test]
    fn test_report_unavailable() {
        let backend = MemoryBackend::new();
        let (controller, _) = setup(&backend);
        let view = RecordingView::default();

        controller.report_unavailable(&view);
        assert_eq!(
            view.events(),
            vec![ViewEvent::Message(
                FormId::Login,
                AuthMessage::error(UNAVAILABLE_MESSAGE)
            )]
        );
    }
}
