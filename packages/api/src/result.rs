//! Tagged outcome returned by every gateway operation.

use crate::error::AuthError;

/// Success with data, or failure with a user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub enum UiResult<T> {
    Success { data: T },
    Failure { error: String },
}

impl<T> UiResult<T> {
    pub fn success(data: T) -> Self {
        UiResult::Success { data }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        UiResult::Failure {
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UiResult::Success { .. })
    }

    /// The error message, if this is a failure.
    pub fn error(&self) -> Option<&str> {
        match self {
            UiResult::Success { .. } => None,
            UiResult::Failure { error } => Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match self {
            UiResult::Success { data } => Ok(data),
            UiResult::Failure { error } => Err(error),
        }
    }
}

impl<T> From<Result<T, AuthError>> for UiResult<T> {
    fn from(result: Result<T, AuthError>) -> Self {
        match result {
            Ok(data) => UiResult::success(data),
            Err(e) => UiResult::failure(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_result() {
        let ok: UiResult<u8> = Ok(3).into();
        assert_eq!(ok, UiResult::Success { data: 3 });

        let err: UiResult<u8> = Err(AuthError::InvalidCredentials).into();
        assert!(!err.is_success());
        assert_eq!(err.error(), Some("Invalid email or password"));
        assert_eq!(err.into_result(), Err("Invalid email or password".to_string()));
    }
}
