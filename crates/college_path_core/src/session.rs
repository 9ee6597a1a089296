//! crates/college_path_core/src/session.rs
//!
//! The session store: the single owner of the student's durable state.
//!
//! State is split into five independently persisted slices (profile,
//! bookmarks, and the three progress flags). Each mutating operation writes
//! its own slice to the backing store before updating the in-memory copy, so
//! a failed write leaves both sides as they were. There is no transaction
//! spanning slices.

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::domain::{Bookmark, Profile, ProfilePatch, SessionFlags, FIRST_STEP, LAST_STEP};
use crate::ports::{KeyValueStore, PortError};

/// Backing-store key for each slice.
pub mod keys {
    pub const PROFILE: &str = "studentData";
    pub const BOOKMARKS: &str = "markedColleges";
    pub const IS_REGISTERED: &str = "isRegistered";
    pub const CURRENT_STEP: &str = "currentStep";
    pub const IS_ONBOARDED: &str = "isOnboarded";

    /// Removal order on logout. `isRegistered` goes first so an interrupted
    /// logout reloads as an unregistered session.
    pub const LOGOUT_ORDER: [&str; 5] = [IS_REGISTERED, IS_ONBOARDED, CURRENT_STEP, BOOKMARKS, PROFILE];
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Storage error: {0}")]
    Storage(#[from] PortError),
    #[error("Stored value for '{key}' is malformed: {reason}")]
    MalformedSlice { key: &'static str, reason: String },
    #[error("Onboarding step {0} is outside 1..=3")]
    InvalidStep(u8),
}

pub type SessionResult<T> = Result<T, SessionError>;

/// What to do when a stored slice cannot be decoded at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadPolicy {
    /// Fail initialization with [`SessionError::MalformedSlice`].
    #[default]
    Abort,
    /// Discard the stored value, remove its key, and use the slice default.
    ResetToDefault,
}

pub struct SessionStore {
    backend: Box<dyn KeyValueStore>,
    profile: Option<Profile>,
    bookmarks: Vec<Bookmark>,
    flags: SessionFlags,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("profile", &self.profile)
            .field("bookmarks", &self.bookmarks)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Hydrates every slice from `backend`, falling back to slice defaults
    /// for absent keys. This is the only way to obtain a store, so no
    /// operation can run against un-hydrated state.
    pub fn initialize(mut backend: Box<dyn KeyValueStore>, policy: LoadPolicy) -> SessionResult<Self> {
        let profile = load_slice(backend.as_mut(), keys::PROFILE, policy, decode_json::<Profile>)?;
        let bookmarks = load_slice(backend.as_mut(), keys::BOOKMARKS, policy, decode_json::<Vec<Bookmark>>)?
            .unwrap_or_default();
        let is_registered =
            load_slice(backend.as_mut(), keys::IS_REGISTERED, policy, decode_bool)?.unwrap_or(false);
        let current_step =
            load_slice(backend.as_mut(), keys::CURRENT_STEP, policy, decode_step)?.unwrap_or(FIRST_STEP);
        let is_onboarded =
            load_slice(backend.as_mut(), keys::IS_ONBOARDED, policy, decode_bool)?.unwrap_or(false);

        let flags = SessionFlags {
            is_registered,
            is_onboarded,
            current_step,
        };
        info!(
            has_profile = profile.is_some(),
            bookmarks = bookmarks.len(),
            ?flags,
            "Session state hydrated"
        );

        Ok(Self {
            backend,
            profile,
            bookmarks,
            flags,
        })
    }

    pub fn profile(&self) -> Option<&Profile> {
        self.profile.as_ref()
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    pub fn flags(&self) -> SessionFlags {
        self.flags
    }

    pub fn backend(&self) -> &dyn KeyValueStore {
        self.backend.as_ref()
    }

    /// Gives the backing store back, e.g. to re-hydrate a fresh store from it.
    pub fn into_backend(self) -> Box<dyn KeyValueStore> {
        self.backend
    }

    /// Replaces the profile wholesale. Called once, when registration completes.
    pub fn set_profile(&mut self, profile: Profile) -> SessionResult<()> {
        self.write_json(keys::PROFILE, &profile)?;
        self.profile = Some(profile);
        Ok(())
    }

    /// Merges `patch` into the existing profile. Returns `false` without
    /// touching anything when there is no profile yet.
    pub fn update_profile(&mut self, patch: ProfilePatch) -> SessionResult<bool> {
        let Some(current) = &self.profile else {
            debug!("Ignoring profile update: no profile exists yet");
            return Ok(false);
        };
        let mut merged = current.clone();
        merged.apply(patch);
        self.write_json(keys::PROFILE, &merged)?;
        self.profile = Some(merged);
        Ok(true)
    }

    /// Adds `college_id` to the bookmark set if absent, removes it if present.
    /// Returns whether the college is bookmarked afterwards.
    pub fn toggle_bookmark(&mut self, college_id: &str) -> SessionResult<bool> {
        let mut next = self.bookmarks.clone();
        let now_bookmarked = match next.iter().position(|b| b.college_id == college_id) {
            Some(index) => {
                next.remove(index);
                false
            }
            None => {
                next.push(Bookmark {
                    college_id: college_id.to_string(),
                    marked_at: Utc::now(),
                });
                true
            }
        };
        self.write_json(keys::BOOKMARKS, &next)?;
        self.bookmarks = next;
        Ok(now_bookmarked)
    }

    pub fn is_bookmarked(&self, college_id: &str) -> bool {
        self.bookmarks.iter().any(|b| b.college_id == college_id)
    }

    pub fn set_registered(&mut self, value: bool) -> SessionResult<()> {
        self.write(keys::IS_REGISTERED, &value.to_string())?;
        self.flags.is_registered = value;
        Ok(())
    }

    pub fn set_onboarding_step(&mut self, step: u8) -> SessionResult<()> {
        if !(FIRST_STEP..=LAST_STEP).contains(&step) {
            return Err(SessionError::InvalidStep(step));
        }
        self.write(keys::CURRENT_STEP, &step.to_string())?;
        self.flags.current_step = step;
        Ok(())
    }

    pub fn set_onboarded(&mut self, value: bool) -> SessionResult<()> {
        self.write(keys::IS_ONBOARDED, &value.to_string())?;
        self.flags.is_onboarded = value;
        Ok(())
    }

    /// Resets every slice to its default and removes all keys from the
    /// backing store. In-memory state is reset even if a removal fails; the
    /// first failure is returned after that.
    pub fn logout(&mut self) -> SessionResult<()> {
        self.profile = None;
        self.bookmarks.clear();
        self.flags = SessionFlags::default();

        for key in keys::LOGOUT_ORDER {
            self.backend.remove(key)?;
        }
        info!("Session cleared on logout");
        Ok(())
    }

    fn write_json<T: serde::Serialize>(&mut self, key: &'static str, value: &T) -> SessionResult<()> {
        let encoded = serde_json::to_string(value).map_err(|e| PortError::Unexpected(e.to_string()))?;
        self.write(key, &encoded)
    }

    fn write(&mut self, key: &'static str, value: &str) -> SessionResult<()> {
        self.backend.set(key, value)?;
        debug!(key, bytes = value.len(), "Persisted session slice");
        Ok(())
    }
}

//=========================================================================================
// Slice Decoding
//=========================================================================================

fn load_slice<T>(
    backend: &mut dyn KeyValueStore,
    key: &'static str,
    policy: LoadPolicy,
    decode: impl FnOnce(&str) -> Result<T, String>,
) -> SessionResult<Option<T>> {
    let Some(raw) = backend.get(key)? else {
        return Ok(None);
    };
    match decode(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(reason) => match policy {
            LoadPolicy::Abort => Err(SessionError::MalformedSlice { key, reason }),
            LoadPolicy::ResetToDefault => {
                warn!(key, %reason, "Discarding malformed session slice");
                backend.remove(key)?;
                Ok(None)
            }
        },
    }
}

fn decode_json<T: DeserializeOwned>(raw: &str) -> Result<T, String> {
    serde_json::from_str(raw).map_err(|e| e.to_string())
}

fn decode_bool(raw: &str) -> Result<bool, String> {
    match raw {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(format!("expected \"true\" or \"false\", found {:?}", other)),
    }
}

fn decode_step(raw: &str) -> Result<u8, String> {
    let step: u8 = raw
        .trim()
        .parse()
        .map_err(|_| format!("expected a step number, found {:?}", raw))?;
    if (FIRST_STEP..=LAST_STEP).contains(&step) {
        Ok(step)
    } else {
        Err(format!("step {} is outside 1..=3", step))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Stream;
    use crate::memory::MemoryKeyValueStore;

    fn fresh() -> SessionStore {
        SessionStore::initialize(Box::new(MemoryKeyValueStore::new()), LoadPolicy::Abort).unwrap()
    }

    fn stored(store: &SessionStore, key: &str) -> Option<String> {
        store.backend().get(key).unwrap()
    }

    #[test]
    fn empty_backend_yields_defaults() {
        let store = fresh();
        assert!(store.profile().is_none());
        assert!(store.bookmarks().is_empty());
        assert_eq!(store.flags(), SessionFlags::default());
        assert_eq!(store.flags().current_step, 1);
    }

    #[test]
    fn flags_are_persisted_as_plain_strings() {
        let mut store = fresh();
        store.set_registered(true).unwrap();
        store.set_onboarding_step(2).unwrap();
        store.set_onboarded(false).unwrap();

        assert_eq!(stored(&store, keys::IS_REGISTERED).as_deref(), Some("true"));
        assert_eq!(stored(&store, keys::CURRENT_STEP).as_deref(), Some("2"));
        assert_eq!(stored(&store, keys::IS_ONBOARDED).as_deref(), Some("false"));
    }

    #[test]
    fn update_without_profile_is_a_noop() {
        let mut store = fresh();
        let applied = store
            .update_profile(ProfilePatch {
                first_name: Some("Sita".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(!applied);
        assert!(store.profile().is_none());
        assert!(stored(&store, keys::PROFILE).is_none());
    }

    #[test]
    fn update_merges_and_persists() {
        let mut store = fresh();
        store.set_profile(Profile::registered("s@x.in", "9123456789")).unwrap();
        store
            .update_profile(ProfilePatch {
                stream: Some(Some(Stream::BiPc)),
                ..Default::default()
            })
            .unwrap();

        let raw = stored(&store, keys::PROFILE).unwrap();
        let on_disk: Profile = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk.stream, Some(Stream::BiPc));
        assert_eq!(Some(&on_disk), store.profile());
    }

    #[test]
    fn toggle_adds_then_removes() {
        let mut store = fresh();
        assert!(store.toggle_bookmark("c1").unwrap());
        assert!(store.is_bookmarked("c1"));
        assert!(store.toggle_bookmark("c2").unwrap());
        assert!(!store.toggle_bookmark("c1").unwrap());

        let ids: Vec<_> = store.bookmarks().iter().map(|b| b.college_id.as_str()).collect();
        assert_eq!(ids, ["c2"]);
        let raw = stored(&store, keys::BOOKMARKS).unwrap();
        let on_disk: Vec<Bookmark> = serde_json::from_str(&raw).unwrap();
        assert_eq!(on_disk, store.bookmarks());
    }

    #[test]
    fn out_of_range_step_is_rejected_without_writing() {
        let mut store = fresh();
        assert!(matches!(store.set_onboarding_step(0), Err(SessionError::InvalidStep(0))));
        assert!(matches!(store.set_onboarding_step(4), Err(SessionError::InvalidStep(4))));
        assert!(stored(&store, keys::CURRENT_STEP).is_none());
    }

    #[test]
    fn failed_write_leaves_memory_untouched() {
        let backend = MemoryKeyValueStore::with_quota(64);
        let mut store = SessionStore::initialize(Box::new(backend), LoadPolicy::Abort).unwrap();

        let err = store
            .set_profile(Profile::registered("someone.with.a.long.address@example.com", "9876543210"))
            .unwrap_err();
        assert!(matches!(err, SessionError::Storage(PortError::QuotaExceeded { .. })));
        assert!(store.profile().is_none());
    }

    #[test]
    fn malformed_slice_aborts_by_default() {
        let backend = MemoryKeyValueStore::new().seed(keys::PROFILE, "{not json");
        let err = SessionStore::initialize(Box::new(backend), LoadPolicy::Abort).unwrap_err();
        assert!(matches!(err, SessionError::MalformedSlice { key: keys::PROFILE, .. }));
    }

    #[test]
    fn malformed_slices_reset_when_requested() {
        let backend = MemoryKeyValueStore::new()
            .seed(keys::BOOKMARKS, "[{\"id\": 7}]")
            .seed(keys::IS_REGISTERED, "yes")
            .seed(keys::CURRENT_STEP, "9")
            .seed(keys::IS_ONBOARDED, "true");
        let store = SessionStore::initialize(Box::new(backend), LoadPolicy::ResetToDefault).unwrap();

        assert!(store.bookmarks().is_empty());
        assert!(!store.flags().is_registered);
        assert_eq!(store.flags().current_step, 1);
        assert!(store.flags().is_onboarded);
        assert!(stored(&store, keys::BOOKMARKS).is_none());
        assert!(stored(&store, keys::CURRENT_STEP).is_none());
        assert_eq!(stored(&store, keys::IS_ONBOARDED).as_deref(), Some("true"));
    }

    #[test]
    fn legacy_bookmark_field_name_is_accepted() {
        let backend = MemoryKeyValueStore::new().seed(
            keys::BOOKMARKS,
            r#"[{"collegeId":"c9","markedAt":"2024-05-01T10:00:00Z"}]"#,
        );
        let store = SessionStore::initialize(Box::new(backend), LoadPolicy::Abort).unwrap();
        assert!(store.is_bookmarked("c9"));
    }
}
