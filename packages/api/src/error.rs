//! Errors surfaced by the identity and document backends.

use thiserror::Error;

/// Failure of a backend call or of the gateway precondition.
///
/// The `Display` text of each variant is what ends up in the auth message box,
/// so it is written for the person at the keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Firebase Auth is not available. Please check your internet connection.")]
    Unavailable,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("An account with this email already exists")]
    EmailInUse,
    #[error("Password should be at least 6 characters")]
    WeakPassword,
    #[error("This account has been disabled")]
    UserDisabled,
    #[error("Too many attempts. Please try again later.")]
    TooManyAttempts,
    #[error("The sign-in popup was closed before completing")]
    PopupClosed,
    #[error("The sign-in popup was blocked by the browser")]
    PopupBlocked,
    #[error("{0}")]
    Unsupported(&'static str),
    #[error("User data not found")]
    ProfileNotFound,
    #[error("Network error: {0}")]
    Network(String),
    #[error("{0}")]
    Backend(String),
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AuthError {
    /// Map an Identity Toolkit error code (`error.message` in the REST body).
    ///
    /// Codes may carry a suffix such as `WEAK_PASSWORD : Password should be...`;
    /// only the leading code is matched.
    pub fn from_code(message: &str) -> Self {
        let code = message.split(':').next().unwrap_or(message).trim();
        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "INVALID_EMAIL" => Self::InvalidCredentials,
            "EMAIL_EXISTS" => Self::EmailInUse,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyAttempts,
            _ => Self::Backend(message.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code_maps_known_codes() {
        assert_eq!(AuthError::from_code("EMAIL_EXISTS"), AuthError::EmailInUse);
        assert_eq!(
            AuthError::from_code("INVALID_LOGIN_CREDENTIALS"),
            AuthError::InvalidCredentials
        );
        assert_eq!(
            AuthError::from_code("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthError::WeakPassword
        );
        assert_eq!(
            AuthError::from_code("TOO_MANY_ATTEMPTS_TRY_LATER"),
            AuthError::TooManyAttempts
        );
    }

    #[test]
    fn test_from_code_keeps_unknown_message() {
        let err = AuthError::from_code("OPERATION_NOT_ALLOWED");
        assert_eq!(err, AuthError::Backend("OPERATION_NOT_ALLOWED".to_string()));
        assert_eq!(err.to_string(), "OPERATION_NOT_ALLOWED");
    }

    #[test]
    fn test_unavailable_message() {
        assert_eq!(
            AuthError::Unavailable.to_string(),
            "Firebase Auth is not available. Please check your internet connection."
        );
    }
}
