//! Feedback shown while a form submission is in flight.
//!
//! Every submit goes through three phases: busy (info message, disabled control
//! with a spinner label), then either succeeded (success message, check label)
//! or back to idle with an error message.

/// Which form a message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormId {
    Login,
    Signup,
}

impl FormId {
    /// Id of the message element inside the form.
    pub fn message_id(&self) -> &'static str {
        match self {
            FormId::Login => "loginMessage",
            FormId::Signup => "signupMessage",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Success,
    Error,
}

/// Text of `#loginMessage` / `#signupMessage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthMessage {
    pub text: String,
    pub kind: MessageKind,
}

impl AuthMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Info,
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Success,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: MessageKind::Error,
        }
    }

    pub fn class(&self) -> &'static str {
        match self.kind {
            MessageKind::Info => "auth-message info",
            MessageKind::Success => "auth-message success",
            MessageKind::Error => "auth-message error",
        }
    }
}

/// Header button that opens the modal on the login tab.
pub const LOGIN_BUTTON_ID: &str = "loginBtn";
/// Header button that opens the modal on the signup tab.
pub const SIGNUP_BUTTON_ID: &str = "signupBtn";

/// The four controls that trigger a gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    LoginSubmit,
    SignupSubmit,
    GoogleLogin,
    GoogleSignup,
}

impl Control {
    pub fn id(&self) -> &'static str {
        match self {
            Control::LoginSubmit => "loginSubmit",
            Control::SignupSubmit => "signupSubmit",
            Control::GoogleLogin => "googleLogin",
            Control::GoogleSignup => "googleSignup",
        }
    }

    pub fn form(&self) -> FormId {
        match self {
            Control::LoginSubmit | Control::GoogleLogin => FormId::Login,
            Control::SignupSubmit | Control::GoogleSignup => FormId::Signup,
        }
    }

    pub fn idle_label(&self) -> &'static str {
        match self {
            Control::LoginSubmit => "Login",
            Control::SignupSubmit => "Create Account",
            Control::GoogleLogin => "Continue with Google",
            Control::GoogleSignup => "Sign up with Google",
        }
    }

    /// Label next to the spinner while the call runs.
    pub fn busy_label(&self) -> &'static str {
        match self {
            Control::LoginSubmit => "Logging in...",
            Control::SignupSubmit => "Creating account...",
            Control::GoogleLogin | Control::GoogleSignup => "Connecting...",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlPhase {
    #[default]
    Idle,
    Busy,
    Succeeded,
}

impl ControlPhase {
    pub fn disabled(&self) -> bool {
        !matches!(self, ControlPhase::Idle)
    }
}

/// Phase of every control at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControlStates {
    login_submit: ControlPhase,
    signup_submit: ControlPhase,
    google_login: ControlPhase,
    google_signup: ControlPhase,
}

impl ControlStates {
    pub fn get(&self, control: Control) -> ControlPhase {
        match control {
            Control::LoginSubmit => self.login_submit,
            Control::SignupSubmit => self.signup_submit,
            Control::GoogleLogin => self.google_login,
            Control::GoogleSignup => self.google_signup,
        }
    }

    pub fn set(&mut self, control: Control, phase: ControlPhase) {
        let slot = match control {
            Control::LoginSubmit => &mut self.login_submit,
            Control::SignupSubmit => &mut self.signup_submit,
            Control::GoogleLogin => &mut self.google_login,
            Control::GoogleSignup => &mut self.google_signup,
        };
        *slot = phase;
    }
}

/// Where feedback is rendered. The Dioxus signals implement this in the app;
/// tests record the calls.
pub trait FormView {
    fn show_message(&self, form: FormId, message: AuthMessage);
    fn set_control(&self, control: Control, phase: ControlPhase);
    fn close_modal(&self);
}
