//! Password strength meter for the signup form.
//!
//! Purely cosmetic: the tier only picks the CSS class of `#passwordStrength` and
//! never blocks a submit.

/// One point each for: at least six UTF-16 units (the browser's string length),
/// an uppercase letter, a digit, and a character that is not an ASCII letter or
/// digit.
pub fn score(password: &str) -> u8 {
    let checks = [
        password.encode_utf16().count() >= 6,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.into_iter().filter(|passed| *passed).count() as u8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum StrengthTier {
    /// Empty input.
    Neutral,
    Weak,
    Medium,
    Strong,
}

impl StrengthTier {
    pub fn of(password: &str) -> Self {
        if password.is_empty() {
            return StrengthTier::Neutral;
        }
        match score(password) {
            0 | 1 => StrengthTier::Weak,
            2 | 3 => StrengthTier::Medium,
            _ => StrengthTier::Strong,
        }
    }

    /// Full `class` attribute for the indicator element.
    pub fn class(&self) -> &'static str {
        match self {
            StrengthTier::Neutral => "password-strength",
            StrengthTier::Weak => "password-strength weak",
            StrengthTier::Medium => "password-strength medium",
            StrengthTier::Strong => "password-strength strong",
        }
    }
}
