use dioxus::prelude::*;

use crate::auth::{use_auth_ui, AuthTab};
use crate::components::{LoginPanel, SignupPanel};
use crate::feedback::FormView;

/// The `#authModal` dialog with its login and signup tabs.
/// Clicking outside the card closes it.
#[component]
pub fn AuthModal() -> Element {
    let ui = use_auth_ui();
    let modal = (ui.modal)();

    rsx! {
        div {
            id: "authModal",
            class: "auth-modal",
            style: if modal.open { "display: flex" } else { "display: none" },
            onclick: move |_| ui.close_modal(),

            div {
                class: "auth-modal-content",
                onclick: move |evt: Event<MouseData>| evt.stop_propagation(),

                button {
                    class: "auth-close",
                    r#type: "button",
                    onclick: move |_| ui.close_modal(),
                    "×"
                }

                div {
                    class: "auth-tabs",
                    for tab in [AuthTab::Login, AuthTab::Signup] {
                        button {
                            key: "{tab.data_form()}",
                            class: if modal.tab == tab { "auth-tab active" } else { "auth-tab" },
                            r#type: "button",
                            "data-form": tab.data_form(),
                            onclick: move |_| ui.select_tab(tab),
                            "{tab.label()}"
                        }
                    }
                }

                LoginPanel { active: modal.tab == AuthTab::Login }
                SignupPanel { active: modal.tab == AuthTab::Signup }
            }
        }

        style {
            r#"
            .auth-modal {{
                position: fixed;
                inset: 0;
                align-items: center;
                justify-content: center;
                background: rgba(0, 0, 0, 0.3);
                z-index: 2000;
            }}

            .auth-modal-content {{
                position: relative;
                background: #ffffff;
                border-radius: 8px;
                box-shadow: 0 10px 30px rgba(0, 0, 0, 0.15);
                width: 100%;
                max-width: 420px;
                margin: 0 1rem;
                padding: 1.5rem;
            }}

            .auth-close {{
                position: absolute;
                top: 0.5rem;
                right: 0.75rem;
                border: none;
                background: none;
                font-size: 1.25rem;
                cursor: pointer;
            }}

            .auth-tabs {{
                display: flex;
                margin-bottom: 1rem;
                border-bottom: 1px solid #e5e5e5;
            }}

            .auth-tab {{
                flex: 1;
                padding: 0.625rem;
                border: none;
                background: none;
                cursor: pointer;
                color: #787774;
            }}

            .auth-tab.active {{
                color: #1a73e8;
                border-bottom: 2px solid #1a73e8;
            }}

            .auth-form {{
                display: none;
                flex-direction: column;
                gap: 0.75rem;
            }}

            .auth-form.active {{
                display: flex;
            }}

            .auth-message {{
                font-size: 0.8125rem;
                min-height: 1rem;
            }}

            .auth-message.info {{ color: #1a73e8; }}
            .auth-message.success {{ color: #188038; }}
            .auth-message.error {{ color: #d93025; }}

            .password-strength {{
                height: 4px;
                margin-top: 0.25rem;
                border-radius: 2px;
                background: #e5e5e5;
            }}

            .password-strength.weak {{ background: #d93025; width: 33%; }}
            .password-strength.medium {{ background: #f9ab00; width: 66%; }}
            .password-strength.strong {{ background: #188038; width: 100%; }}

            .doctor-fields {{
                display: none;
            }}

            .doctor-fields.show {{
                display: block;
            }}

            .btn:disabled {{
                opacity: 0.6;
                cursor: not-allowed;
            }}

            .fa-spin {{
                animation: fa-spin 1s linear infinite;
            }}

            @keyframes fa-spin {{
                from {{ transform: rotate(0deg); }}
                to {{ transform: rotate(360deg); }}
            }}
            "#
        }
    }
}
