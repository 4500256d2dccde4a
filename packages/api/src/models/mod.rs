//! Data models for sessions and stored profiles.

mod profile;
mod user;

pub use profile::{
    ApprovalStatus, ProfileEntry, ProfileUpdate, Role, UserProfile, PROFILES_COLLECTION,
};
pub use user::{SessionUser, SocialSignIn};
