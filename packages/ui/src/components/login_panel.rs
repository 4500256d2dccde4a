use dioxus::prelude::*;

use crate::auth::{use_auth_ui, use_controller};
use crate::components::{ConsoleButton, ControlLabel, MessageBox};
use crate::feedback::{Control, FormId};
use crate::validation::LoginForm;

/// The `#loginForm` tab of the auth modal.
#[component]
pub fn LoginPanel(active: bool) -> Element {
    let controller = use_controller();
    let ui = use_auth_ui();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);

    let handle_login = {
        let controller = controller.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let controller = controller.clone();
            let form = LoginForm {
                email: email(),
                password: password(),
            };
            spawn(async move {
                controller.submit_login(&ui, &form).await;
            });
        }
    };

    let handle_google = move |_| {
        let controller = controller.clone();
        spawn(async move {
            controller.social_login(&ui).await;
        });
    };

    let submit_disabled = ui.phase(Control::LoginSubmit).disabled();
    let google_disabled = ui.phase(Control::GoogleLogin).disabled();

    rsx! {
        form {
            id: "loginForm",
            class: if active { "auth-form active" } else { "auth-form" },
            onsubmit: handle_login,

            div {
                class: "form-group",
                label { r#for: "loginEmail", "Email" }
                input {
                    id: "loginEmail",
                    r#type: "email",
                    placeholder: "Enter your email",
                    value: "{email}",
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
            }

            div {
                class: "form-group",
                label { r#for: "loginPassword", "Password" }
                input {
                    id: "loginPassword",
                    r#type: "password",
                    placeholder: "Enter your password",
                    value: "{password}",
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
            }

            MessageBox { form: FormId::Login }

            button {
                id: Control::LoginSubmit.id(),
                class: "btn btn-primary auth-submit",
                r#type: "submit",
                disabled: submit_disabled,
                ControlLabel { control: Control::LoginSubmit }
            }

            div { class: "auth-divider", span { "or" } }

            div {
                class: "social-login",
                button {
                    id: Control::GoogleLogin.id(),
                    class: "btn btn-google",
                    r#type: "button",
                    disabled: google_disabled,
                    onclick: handle_google,
                    ControlLabel { control: Control::GoogleLogin }
                }
                ConsoleButton {}
            }
        }
    }
}
