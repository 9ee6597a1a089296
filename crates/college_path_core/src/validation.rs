//! crates/college_path_core/src/validation.rs
//!
//! Input rules for registration and onboarding, and the error type shared by
//! those workflows.

use regex::Regex;
use std::sync::OnceLock;

use crate::ports::PortError;
use crate::session::SessionError;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingContact,
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Please enter a valid 10-digit phone number")]
    InvalidPhone,
    #[error("Please enter your first and last name")]
    MissingName,
    #[error("Please enter valid {0} marks (0-100)")]
    InvalidMarks(&'static str),
    #[error("Please select your stream")]
    MissingStream,
    #[error("Invalid OTP")]
    InvalidOtp,
    #[error("No registration is awaiting verification")]
    RegistrationNotStarted,
    #[error("This session is already registered")]
    AlreadyRegistered,
    #[error("Registration is required first")]
    NotRegistered,
    #[error("Onboarding is already complete")]
    AlreadyOnboarded,
}

/// Errors from the registration and onboarding workflows.
#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Passcode service error: {0}")]
    Port(#[from] PortError),
}

pub type FlowResult<T> = Result<T, FlowError>;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[6-9]\d{9}$").expect("valid phone regex"))
}

pub fn validate_contact(email: &str, phone: &str) -> Result<(), ValidationError> {
    if email.is_empty() || phone.is_empty() {
        return Err(ValidationError::MissingContact);
    }
    if !email_pattern().is_match(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !phone_pattern().is_match(phone) {
        return Err(ValidationError::InvalidPhone);
    }
    Ok(())
}

/// Marks must parse as a percentage in `0..=100`.
pub fn validate_marks(raw: &str, label: &'static str) -> Result<f64, ValidationError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|m| (0.0..=100.0).contains(m))
        .ok_or(ValidationError::InvalidMarks(label))
}

/// A passcode is exactly six ASCII digits.
pub fn is_well_formed_otp(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}
