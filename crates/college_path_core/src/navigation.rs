//! crates/college_path_core/src/navigation.rs
//!
//! Which screen a session belongs on, decided from the progress flags alone.

use serde::Serialize;

use crate::domain::SessionFlags;

/// Where the student lands on startup and after logout.
pub const ENTRY_POINT: &str = "/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Register,
    Onboarding,
    Dashboard,
}

impl Screen {
    pub fn path(&self) -> &'static str {
        match self {
            Screen::Register => "/register",
            Screen::Onboarding => "/onboarding",
            Screen::Dashboard => "/dashboard",
        }
    }
}

/// An unregistered session always starts at registration, whatever the
/// other flags say. A logout interrupted after `isRegistered` was removed
/// can leave `isOnboarded` behind.
pub fn entry_screen(flags: SessionFlags) -> Screen {
    if !flags.is_registered {
        Screen::Register
    } else if flags.is_onboarded {
        Screen::Dashboard
    } else {
        Screen::Onboarding
    }
}
