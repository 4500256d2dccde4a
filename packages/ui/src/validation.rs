//! Client-side validation of the auth forms.
//!
//! Checks run in a fixed order and stop at the first failure, whose message is
//! what the form shows. A form that fails validation never reaches the gateway.

use api::{ProfileUpdate, Role};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Minimum password length accepted at signup.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your name!")]
    MissingName,
    #[error("Please enter your email!")]
    MissingEmail,
    #[error("Passwords do not match!")]
    PasswordMismatch,
    #[error("Password must be at least 6 characters long!")]
    PasswordTooShort,
    #[error("Please agree to the Terms of Service and Privacy Policy")]
    TermsNotAccepted,
    #[error("Please enter your medical specialization!")]
    MissingSpecialization,
    #[error("Please enter your medical license number!")]
    MissingLicense,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Doctor-only fields, shown when the doctor role is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorDetails {
    pub specialization: String,
    pub license_number: String,
}

impl DoctorDetails {
    fn validate(&self) -> Result<(), ValidationError> {
        if self.specialization.trim().is_empty() {
            return Err(ValidationError::MissingSpecialization);
        }
        if self.license_number.trim().is_empty() {
            return Err(ValidationError::MissingLicense);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
    pub doctor: DoctorDetails,
    pub terms_accepted: bool,
}

impl SignupForm {
    /// Name, email, password match, password length, terms, then the doctor
    /// fields when the doctor role is selected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingName);
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingEmail);
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }
        if self.password.encode_utf16().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        if !self.terms_accepted {
            return Err(ValidationError::TermsNotAccepted);
        }
        if self.role == Role::Doctor {
            self.doctor.validate()?;
        }
        Ok(())
    }

    /// Profile document written after the credential is created.
    pub fn profile(&self, now: DateTime<Utc>) -> ProfileUpdate {
        let profile = ProfileUpdate::new_account(&self.name, &self.email, self.role, now);
        match self.role {
            Role::Doctor => profile
                .with_doctor_credentials(&self.doctor.specialization, &self.doctor.license_number),
            Role::Patient => profile,
        }
    }

    /// The subset of fields that signing up through Google uses.
    pub fn social(&self) -> SocialSignupForm {
        SocialSignupForm {
            role: self.role,
            doctor: self.doctor.clone(),
            terms_accepted: self.terms_accepted,
        }
    }
}

/// Signup through the Google button: no name, email or password to check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SocialSignupForm {
    pub role: Role,
    pub doctor: DoctorDetails,
    pub terms_accepted: bool,
}

impl SocialSignupForm {
    /// Doctor fields first, then terms.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.role == Role::Doctor {
            self.doctor.validate()?;
        }
        if !self.terms_accepted {
            return Err(ValidationError::TermsNotAccepted);
        }
        Ok(())
    }

    /// Fields merged into the profile once the popup sign-in succeeded.
    pub fn profile(&self, user: &api::SessionUser) -> ProfileUpdate {
        let profile = ProfileUpdate::social_signup(user, self.role);
        match self.role {
            Role::Doctor => profile
                .with_doctor_credentials(&self.doctor.specialization, &self.doctor.license_number),
            Role::Patient => profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::ApprovalStatus;

    fn valid_patient() -> SignupForm {
        SignupForm {
            name: "Ada".to_string(),
            email: "a@x.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            role: Role::Patient,
            doctor: DoctorDetails::default(),
            terms_accepted: true,
        }
    }

    #[test]
    fn test_valid_patient_passes() {
        assert_eq!(valid_patient().validate(), Ok(()));
    }

    #[test]
    fn test_password_length_in_utf16_units() {
        let form = SignupForm {
            password: "😀😀😀".to_string(),
            confirm_password: "😀😀😀".to_string(),
            ..valid_patient()
        };
        assert_eq!(form.validate(), Ok(()));

        let form = SignupForm {
            password: "😀😀".to_string(),
            confirm_password: "😀😀".to_string(),
            ..valid_patient()
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn test_first_failure_wins() {
        let form = SignupForm {
            name: "  ".to_string(),
            email: String::new(),
            confirm_password: "other".to_string(),
            terms_accepted: false,
            ..valid_patient()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingName));

        let form = SignupForm {
            email: String::new(),
            confirm_password: "other".to_string(),
            ..valid_patient()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingEmail));
    }

    #[test]
    fn test_mismatch_checked_before_length() {
        let form = SignupForm {
            password: "p1".to_string(),
            confirm_password: "p2".to_string(),
            ..valid_patient()
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));
        assert_eq!(
            ValidationError::PasswordMismatch.to_string(),
            "Passwords do not match!"
        );

        let form = SignupForm {
            password: "12345".to_string(),
            confirm_password: "12345".to_string(),
            ..valid_patient()
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordTooShort));
    }

    #[test]
    fn test_terms_before_doctor_fields() {
        let form = SignupForm {
            role: Role::Doctor,
            terms_accepted: false,
            ..valid_patient()
        };
        assert_eq!(form.validate(), Err(ValidationError::TermsNotAccepted));
    }

    #[test]
    fn test_doctor_requires_credentials() {
        let mut form = SignupForm {
            role: Role::Doctor,
            ..valid_patient()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingSpecialization));

        form.doctor.specialization = "Cardiology".to_string();
        assert_eq!(form.validate(), Err(ValidationError::MissingLicense));

        form.doctor.license_number = " ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::MissingLicense));

        form.doctor.license_number = "LIC-1".to_string();
        assert_eq!(form.validate(), Ok(()));
    }

    #[test]
    fn test_doctor_fields_ignored_for_patients() {
        let form = valid_patient();
        let profile = form.profile(Utc::now());
        assert_eq!(profile.role, Some(Role::Patient));
        assert_eq!(profile.specialization, None);
        assert_eq!(profile.approval_status, None);
    }

    #[test]
    fn test_doctor_profile_is_pending() {
        let form = SignupForm {
            role: Role::Doctor,
            doctor: DoctorDetails {
                specialization: "Cardiology".to_string(),
                license_number: "LIC-1".to_string(),
            },
            ..valid_patient()
        };
        let profile = form.profile(Utc::now());
        assert_eq!(profile.name.as_deref(), Some("Ada"));
        assert_eq!(profile.license_number.as_deref(), Some("LIC-1"));
        assert_eq!(profile.approval_status, Some(ApprovalStatus::Pending));
        assert!(profile.created_at.is_some());
    }

    #[test]
    fn test_social_signup_checks_doctor_fields_before_terms() {
        let form = SocialSignupForm {
            role: Role::Doctor,
            doctor: DoctorDetails::default(),
            terms_accepted: false,
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingSpecialization));

        let form = SocialSignupForm {
            role: Role::Patient,
            ..form
        };
        assert_eq!(form.validate(), Err(ValidationError::TermsNotAccepted));
    }
}
