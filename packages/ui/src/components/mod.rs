//! Auth modal, its two forms, and the header account block.

mod auth_modal;
mod feedback;
mod header;
mod login_panel;
mod signup_panel;

pub use auth_modal::AuthModal;
pub use feedback::{ConsoleButton, ControlLabel, InitErrorBanner, MessageBox};
pub use header::{AuthHeader, LogoutButton};
pub use login_panel::LoginPanel;
pub use signup_panel::SignupPanel;
