//! Landing page of the Google consent popup.
//!
//! The opener reads the token from this window's URL fragment and closes it,
//! so the page only has to stay put.

use dioxus::prelude::*;

#[component]
pub fn AuthCallback() -> Element {
    rsx! {
        p {
            style: "padding: 2rem; text-align: center; color: #787774;",
            "Completing sign-in..."
        }
    }
}
