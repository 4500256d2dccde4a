use api::Role;
use dioxus::prelude::*;

use crate::auth::{use_auth_ui, use_controller};
use crate::components::{ConsoleButton, ControlLabel, MessageBox};
use crate::feedback::{Control, FormId};
use crate::password_strength::StrengthTier;
use crate::validation::{DoctorDetails, SignupForm};

/// The `#signupForm` tab of the auth modal.
#[component]
pub fn SignupPanel(active: bool) -> Element {
    let controller = use_controller();
    let ui = use_auth_ui();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut role = use_signal(Role::default);
    let mut specialization = use_signal(String::new);
    let mut license_number = use_signal(String::new);
    let mut terms_accepted = use_signal(|| false);

    let current_form = move || SignupForm {
        name: name(),
        email: email(),
        password: password(),
        confirm_password: confirm_password(),
        role: role(),
        doctor: DoctorDetails {
            specialization: specialization(),
            license_number: license_number(),
        },
        terms_accepted: terms_accepted(),
    };

    let handle_signup = {
        let controller = controller.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let controller = controller.clone();
            let form = current_form();
            spawn(async move {
                controller.submit_signup(&ui, &form).await;
            });
        }
    };

    let handle_google = move |_| {
        let controller = controller.clone();
        let form = current_form().social();
        spawn(async move {
            controller.social_signup(&ui, &form).await;
        });
    };

    let strength = StrengthTier::of(&password.read());
    let is_doctor = role() == Role::Doctor;

    rsx! {
        form {
            id: "signupForm",
            class: if active { "auth-form active" } else { "auth-form" },
            onsubmit: handle_signup,

            div {
                class: "form-group",
                label { r#for: "signupName", "Full Name" }
                input {
                    id: "signupName",
                    r#type: "text",
                    placeholder: "Enter your full name",
                    value: "{name}",
                    oninput: move |evt: FormEvent| name.set(evt.value()),
                }
            }

            div {
                class: "form-group",
                label { r#for: "signupEmail", "Email" }
                input {
                    id: "signupEmail",
                    r#type: "email",
                    placeholder: "Enter your email",
                    value: "{email}",
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
            }

            div {
                class: "form-group",
                label { r#for: "signupPassword", "Password" }
                input {
                    id: "signupPassword",
                    r#type: "password",
                    placeholder: "At least 6 characters",
                    value: "{password}",
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
                div { id: "passwordStrength", class: strength.class() }
            }

            div {
                class: "form-group",
                label { r#for: "signupConfirmPassword", "Confirm Password" }
                input {
                    id: "signupConfirmPassword",
                    r#type: "password",
                    placeholder: "Repeat your password",
                    value: "{confirm_password}",
                    oninput: move |evt: FormEvent| confirm_password.set(evt.value()),
                }
            }

            div {
                class: "form-group role-selection",
                span { "I am a:" }
                label {
                    input {
                        id: "rolePatient",
                        r#type: "radio",
                        name: "userRole",
                        value: "patient",
                        checked: !is_doctor,
                        onchange: move |_| role.set(Role::Patient),
                    }
                    " Patient"
                }
                label {
                    input {
                        id: "roleDoctor",
                        r#type: "radio",
                        name: "userRole",
                        value: "doctor",
                        checked: is_doctor,
                        onchange: move |_| role.set(Role::Doctor),
                    }
                    " Doctor"
                }
            }

            div {
                class: if is_doctor { "doctor-fields show" } else { "doctor-fields" },
                div {
                    class: "form-group",
                    label { r#for: "specialization", "Specialization" }
                    input {
                        id: "specialization",
                        r#type: "text",
                        placeholder: "e.g. Cardiology",
                        value: "{specialization}",
                        oninput: move |evt: FormEvent| specialization.set(evt.value()),
                    }
                }
                div {
                    class: "form-group",
                    label { r#for: "licenseNumber", "Medical License Number" }
                    input {
                        id: "licenseNumber",
                        r#type: "text",
                        value: "{license_number}",
                        oninput: move |evt: FormEvent| license_number.set(evt.value()),
                    }
                }
            }

            div {
                class: "form-group terms",
                input {
                    id: "termsAgreement",
                    r#type: "checkbox",
                    checked: terms_accepted(),
                    onchange: move |evt: FormEvent| terms_accepted.set(evt.checked()),
                }
                label {
                    r#for: "termsAgreement",
                    " I agree to the Terms of Service and Privacy Policy"
                }
            }

            MessageBox { form: FormId::Signup }

            button {
                id: Control::SignupSubmit.id(),
                class: "btn btn-primary auth-submit",
                r#type: "submit",
                disabled: ui.phase(Control::SignupSubmit).disabled(),
                ControlLabel { control: Control::SignupSubmit }
            }

            div { class: "auth-divider", span { "or" } }

            div {
                class: "social-login",
                button {
                    id: Control::GoogleSignup.id(),
                    class: "btn btn-google",
                    r#type: "button",
                    disabled: ui.phase(Control::GoogleSignup).disabled(),
                    onclick: handle_google,
                    ControlLabel { control: Control::GoogleSignup }
                }
                ConsoleButton {}
            }
        }
    }
}
