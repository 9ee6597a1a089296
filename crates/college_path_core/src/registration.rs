//! crates/college_path_core/src/registration.rs
//!
//! Registration by one-time passcode. The passcode round trip happens
//! outside the session store; only a verified registration touches it.

use tracing::info;

use crate::domain::{Profile, SessionFlags, FIRST_STEP};
use crate::ports::OtpService;
use crate::session::SessionStore;
use crate::validation::{validate_contact, FlowResult, ValidationError};

/// Contact details waiting for their passcode to be verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRegistration {
    pub email: String,
    pub phone: String,
}

/// A session registers once; it must log out before registering again.
pub fn ensure_unregistered(flags: SessionFlags) -> Result<(), ValidationError> {
    if flags.is_registered {
        return Err(ValidationError::AlreadyRegistered);
    }
    Ok(())
}

/// Validates the contact details and asks the passcode service to send a
/// code to the phone number.
pub async fn request_code(
    otp: &dyn OtpService,
    email: &str,
    phone: &str,
) -> FlowResult<PendingRegistration> {
    validate_contact(email, phone)?;
    otp.send_code(phone).await?;
    info!("OTP sent for pending registration");
    Ok(PendingRegistration {
        email: email.to_string(),
        phone: phone.to_string(),
    })
}

/// Checks the passcode the student entered for a pending registration.
pub async fn verify_code(
    otp: &dyn OtpService,
    pending: Option<&PendingRegistration>,
    code: &str,
) -> FlowResult<PendingRegistration> {
    let pending = pending.ok_or(ValidationError::RegistrationNotStarted)?;
    if !otp.verify_code(&pending.phone, code).await? {
        return Err(ValidationError::InvalidOtp.into());
    }
    Ok(pending.clone())
}

/// Creates the profile for a verified registration, puts onboarding back at
/// the first step, and marks the session as registered.
///
/// `isRegistered` is written last so a failure part way leaves the session
/// unregistered.
pub fn complete_registration(store: &mut SessionStore, verified: PendingRegistration) -> FlowResult<()> {
    ensure_unregistered(store.flags())?;
    store.set_profile(Profile::registered(verified.email, verified.phone))?;
    store.set_onboarding_step(FIRST_STEP)?;
    store.set_onboarded(false)?;
    store.set_registered(true)?;
    info!("Registration complete");
    Ok(())
}
