//! # Stored user profile — the `users/{uid}` document
//!
//! Two representations of the same document:
//!
//! ## [`UserProfile`]
//!
//! The full document as read back from the store. Every field tolerates being
//! absent so that documents written by older clients (or by the social sign-in
//! default, which carries no doctor fields) still deserialize. Field names on the
//! wire are camelCase (`photoURL`, `licenseNumber`, `approvalStatus`, `createdAt`,
//! `updatedAt`).
//!
//! ## [`ProfileUpdate`]
//!
//! A partial document used for merge-writes. Only the fields that are `Some` are
//! serialized, so a write never clears a field it did not mention.
//! [`ProfileUpdate::to_fields`] produces the JSON object handed to the store.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AuthError;
use crate::models::SessionUser;

/// Collection holding one profile document per user id.
pub const PROFILES_COLLECTION: &str = "users";

/// Role chosen at signup.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Patient,
    Doctor,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Review state of a doctor account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }
}

/// Profile document as stored under `users/{uid}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "photoURL", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Parse a stored document.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, AuthError> {
        serde_json::from_value(Value::Object(fields))
            .map_err(|e| AuthError::Backend(format!("Malformed profile document: {e}")))
    }

    /// Doctors may only act as such once an administrator approved them.
    pub fn is_approved_doctor(&self) -> bool {
        self.role == Role::Doctor && self.approval_status == Some(ApprovalStatus::Approved)
    }
}

/// A profile together with the user id it is stored under.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEntry {
    pub id: String,
    pub profile: UserProfile,
}

/// Partial profile for merge-writes. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "photoURL", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specialization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProfileUpdate {
    /// Profile for a freshly registered email/password account.
    pub fn new_account(name: &str, email: &str, role: Role, now: DateTime<Utc>) -> Self {
        Self {
            name: Some(name.to_string()),
            email: Some(email.to_string()),
            role: Some(role),
            created_at: Some(now),
            ..Self::default()
        }
    }

    /// Default profile written the first time a social identity signs in.
    pub fn social_default(user: &SessionUser, now: DateTime<Utc>) -> Self {
        Self {
            name: Some(user.display_name.clone().unwrap_or_default()),
            email: Some(user.email.clone()),
            photo_url: Some(user.photo_url.clone().unwrap_or_default()),
            role: Some(Role::Patient),
            created_at: Some(now),
            ..Self::default()
        }
    }

    /// Profile fields recorded when a social identity completes the signup tab.
    pub fn social_signup(user: &SessionUser, role: Role) -> Self {
        Self {
            name: Some(user.display_name.clone().unwrap_or_default()),
            email: Some(user.email.clone()),
            photo_url: Some(user.photo_url.clone().unwrap_or_default()),
            role: Some(role),
            ..Self::default()
        }
    }

    /// Attach doctor credentials; new doctors always start out pending review.
    pub fn with_doctor_credentials(mut self, specialization: &str, license_number: &str) -> Self {
        self.specialization = Some(specialization.to_string());
        self.license_number = Some(license_number.to_string());
        self.approval_status = Some(ApprovalStatus::Pending);
        self
    }

    /// Serialize to the JSON object handed to the document store.
    pub fn to_fields(&self) -> Result<Map<String, Value>, AuthError> {
        match serde_json::to_value(self) {
            Ok(Value::Object(fields)) => Ok(fields),
            Ok(_) => Err(AuthError::Backend("Profile did not serialize to an object".to_string())),
            Err(e) => Err(AuthError::Backend(e.to_string())),
        }
    }
}
