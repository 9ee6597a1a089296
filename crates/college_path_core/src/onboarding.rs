//! crates/college_path_core/src/onboarding.rs
//!
//! The three-stage onboarding workflow: personal details, intermediate
//! details, then optional scholarship information.

use tracing::info;

use crate::domain::{Profile, ProfilePatch, LAST_STEP};
use crate::session::SessionStore;
use crate::validation::{validate_marks, FlowResult, ValidationError};

/// Where onboarding stands after an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Step(u8),
    Completed,
}

/// Checks the fields a stage requires against the profile as it would look
/// with the stage's form applied.
pub fn validate_step(step: u8, profile: &Profile) -> Result<(), ValidationError> {
    match step {
        1 => {
            if profile.first_name.trim().is_empty() || profile.last_name.trim().is_empty() {
                return Err(ValidationError::MissingName);
            }
            validate_marks(&profile.tenth_marks, "10th")?;
        }
        2 => {
            validate_marks(&profile.inter_marks, "Inter")?;
            if profile.stream.is_none() {
                return Err(ValidationError::MissingStream);
            }
        }
        _ => {}
    }
    Ok(())
}

fn editable_profile(store: &SessionStore) -> Result<&Profile, ValidationError> {
    if store.flags().is_onboarded {
        return Err(ValidationError::AlreadyOnboarded);
    }
    store.profile().ok_or(ValidationError::NotRegistered)
}

/// Validates and saves the current stage, then moves to the next one or
/// finishes onboarding after the last.
pub fn advance(store: &mut SessionStore, form: ProfilePatch) -> FlowResult<Progress> {
    let step = store.flags().current_step;
    let mut preview = editable_profile(store)?.clone();
    preview.apply(form.clone());
    validate_step(step, &preview)?;

    store.update_profile(form)?;
    if step < LAST_STEP {
        store.set_onboarding_step(step + 1)?;
        Ok(Progress::Step(step + 1))
    } else {
        store.set_onboarded(true)?;
        info!("Onboarding completed");
        Ok(Progress::Completed)
    }
}

/// Returns to the previous stage; stays put on the first.
pub fn back(store: &mut SessionStore) -> FlowResult<Progress> {
    editable_profile(store)?;
    let step = store.flags().current_step;
    if step > 1 {
        store.set_onboarding_step(step - 1)?;
        return Ok(Progress::Step(step - 1));
    }
    Ok(Progress::Step(step))
}

/// Saves whatever was entered and finishes onboarding without validation.
pub fn skip(store: &mut SessionStore, form: ProfilePatch) -> FlowResult<Progress> {
    editable_profile(store)?;
    store.update_profile(form)?;
    store.set_onboarded(true)?;
    info!("Onboarding skipped");
    Ok(Progress::Completed)
}
