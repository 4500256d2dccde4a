//! Session observer: header state and redirects driven by pushed session changes.
//!
//! [`SessionObserver`] is a small state machine fed by the gateway's session
//! stream. It starts in [`SessionState::Pending`] and only moves when the backend
//! reports; the first report (the current state, sent on subscribe) ends the grace
//! period.
//!
//! Entering `LoggedIn` builds the account widget once, closes the auth modal and,
//! on a landing page, redirects to the dashboard. Entering `LoggedOut` brings the
//! login/signup buttons back.

use api::{Destination, NavigationConfig, SessionUser};

/// Shown when the provider has no photo for the user.
pub const AVATAR_PLACEHOLDER: &str = "https://via.placeholder.com/40";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Pending,
    LoggedOut,
    LoggedIn(SessionUser),
}

/// The `.user-account` block in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountWidget {
    pub uid: String,
    pub name: String,
    pub avatar_url: String,
}

impl AccountWidget {
    pub fn for_user(user: &SessionUser) -> Self {
        Self {
            uid: user.uid.clone(),
            name: user.display_name().to_string(),
            avatar_url: user
                .photo_url
                .clone()
                .filter(|url| !url.is_empty())
                .unwrap_or_else(|| AVATAR_PLACEHOLDER.to_string()),
        }
    }
}

/// What the header renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderState {
    pub show_auth_buttons: bool,
    pub account: Option<AccountWidget>,
}

impl Default for HeaderState {
    fn default() -> Self {
        Self {
            show_auth_buttons: true,
            account: None,
        }
    }
}

/// Side effects the caller performs after a transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reaction {
    pub close_modal: bool,
    pub redirect: Option<Destination>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionObserver {
    state: SessionState,
    header: HeaderState,
    navigation: NavigationConfig,
}

impl SessionObserver {
    pub fn new(navigation: NavigationConfig) -> Self {
        Self {
            navigation,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn header(&self) -> &HeaderState {
        &self.header
    }

    pub fn user(&self) -> Option<&SessionUser> {
        match &self.state {
            SessionState::LoggedIn(user) => Some(user),
            _ => None,
        }
    }

    /// Apply one pushed notification while the browser is on `current_path`.
    pub fn apply(&mut self, user: Option<SessionUser>, current_path: &str) -> Reaction {
        match user {
            Some(user) => {
                let widget = AccountWidget::for_user(&user);
                if self.header.account.as_ref() != Some(&widget) {
                    self.header.account = Some(widget);
                }
                self.header.show_auth_buttons = false;
                self.state = SessionState::LoggedIn(user);

                let redirect = self
                    .navigation
                    .is_landing(current_path)
                    .then_some(Destination::Dashboard);
                Reaction {
                    close_modal: true,
                    redirect,
                }
            }
            None => {
                self.header = HeaderState::default();
                self.state = SessionState::LoggedOut;
                Reaction::default()
            }
        }
    }
}
