//! Page navigation.

#[cfg(not(target_arch = "wasm32"))]
use std::cell::RefCell;

use tracing::info;

/// Moves the browser to another page and reports the current one.
pub trait Navigator {
    fn navigate(&self, path: &str);
    fn current_path(&self) -> String;
}

/// Full page navigation through `window.location`.
///
/// Outside the browser there is no window; the path is only remembered.
#[derive(Debug, Default)]
pub struct BrowserNavigator {
    #[cfg(not(target_arch = "wasm32"))]
    path: RefCell<String>,
}

impl BrowserNavigator {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        info!(path, "Navigating");
        #[cfg(target_arch = "wasm32")]
        {
            if let Some(window) = web_sys::window() {
                let _ = window.location().set_href(path);
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            *self.path.borrow_mut() = path.to_string();
        }
    }

    fn current_path(&self) -> String {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|w| w.location().pathname().ok())
                .unwrap_or_else(|| "/".to_string())
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            let path = self.path.borrow();
            match path.split('?').next() {
                Some(p) if !p.is_empty() => p.to_string(),
                _ => "/".to_string(),
            }
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_native_navigator_remembers_path() {
        let nav = BrowserNavigator::new();
        assert_eq!(nav.current_path(), "/");
        nav.navigate("/?logout=success");
        assert_eq!(nav.current_path(), "/");
        nav.navigate("/dashboard/user");
        assert_eq!(nav.current_path(), "/dashboard/user");
    }
}
