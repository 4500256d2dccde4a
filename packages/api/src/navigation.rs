//! Where the app sends the user after an auth action.

use crate::config::NavigationConfig;

/// Outcome flag carried in the post-logout URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogoutStatus {
    Success,
    Error,
}

impl LogoutStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogoutStatus::Success => "success",
            LogoutStatus::Error => "error",
        }
    }

    /// Parse the `logout` query value.
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "success" => Some(LogoutStatus::Success),
            "error" => Some(LogoutStatus::Error),
            _ => None,
        }
    }
}

/// A navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Dashboard,
    Home { logout: Option<LogoutStatus> },
}

impl Destination {
    /// Resolve to a URL path using the configured routes.
    pub fn path(&self, nav: &NavigationConfig) -> String {
        match self {
            Destination::Dashboard => nav.dashboard_path.clone(),
            Destination::Home { logout: None } => nav.home_path.clone(),
            Destination::Home {
                logout: Some(status),
            } => format!("{}?logout={}", nav.home_path, status.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let nav = NavigationConfig::default();
        assert_eq!(Destination::Dashboard.path(&nav), "/dashboard/user");
        assert_eq!(Destination::Home { logout: None }.path(&nav), "/");
        assert_eq!(
            Destination::Home {
                logout: Some(LogoutStatus::Success)
            }
            .path(&nav),
            "/?logout=success"
        );
        assert_eq!(
            Destination::Home {
                logout: Some(LogoutStatus::Error)
            }
            .path(&nav),
            "/?logout=error"
        );
    }

    #[test]
    fn test_logout_query() {
        assert_eq!(LogoutStatus::from_query("success"), Some(LogoutStatus::Success));
        assert_eq!(LogoutStatus::from_query("error"), Some(LogoutStatus::Error));
        assert_eq!(LogoutStatus::from_query(""), None);
    }
}
