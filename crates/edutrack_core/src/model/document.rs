//! Multi-profile document model.
//!
//! # Responsibility
//! - Define the single persisted unit (`Document`) and its profiles.
//! - Express every profile-level change as a value transformation that
//!   consumes the current document and yields the next one.
//!
//! # Invariants
//! - `active_profile_id` references an entry of `profiles`.
//! - `profiles` is never empty once the store is initialized.
//! - Profile ids are unique and never rewritten.

use crate::model::record::StudentRecord;
use serde::{Deserialize, Serialize};

/// Opaque profile identifier.
pub type ProfileId = String;

/// One isolated named student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    /// Display label, mirrored from `data.student.name` on every save.
    pub name: String,
    pub data: StudentRecord,
}

/// `{id, name}` projection used by profile pickers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSummary {
    pub id: ProfileId,
    pub name: String,
}

/// The entire persisted unit.
///
/// Fields are private; callers go through the consuming `with_*` helpers so
/// each change produces a complete new value for a single save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    active_profile_id: ProfileId,
    profiles: Vec<Profile>,
}

impl Document {
    /// Creates a document holding only `profile`, which becomes active.
    pub fn with_single_profile(profile: Profile) -> Self {
        Self {
            active_profile_id: profile.id.clone(),
            profiles: vec![profile],
        }
    }

    pub fn active_profile_id(&self) -> &str {
        &self.active_profile_id
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn profile(&self, id: &str) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    /// Returns the active profile, or `None` when the pointer dangles.
    pub fn active_profile(&self) -> Option<&Profile> {
        self.profile(&self.active_profile_id)
    }

    pub fn summaries(&self) -> Vec<ProfileSummary> {
        self.profiles
            .iter()
            .map(|profile| ProfileSummary {
                id: profile.id.clone(),
                name: profile.name.clone(),
            })
            .collect()
    }

    /// Appends `profile` and makes it active.
    pub fn with_profile_appended(mut self, profile: Profile) -> Self {
        self.active_profile_id = profile.id.clone();
        self.profiles.push(profile);
        self
    }

    /// Activates profile `id`. Returns `None` when no such profile exists.
    pub fn with_active(mut self, id: &str) -> Option<Self> {
        self.profile(id)?;
        self.active_profile_id = id.to_string();
        Some(self)
    }

    /// Removes profile `id`.
    ///
    /// Returns `None` when only one profile is left. When the active profile
    /// is removed, the first remaining profile becomes active.
    pub fn without_profile(mut self, id: &str) -> Option<Self> {
        if self.profiles.len() <= 1 {
            return None;
        }

        self.profiles.retain(|profile| profile.id != id);
        if self.active_profile_id == id {
            let first = self.profiles.first()?;
            self.active_profile_id = first.id.clone();
        }
        Some(self)
    }

    /// Replaces the active profile's record and syncs its display name.
    ///
    /// Returns `None` when the active pointer dangles.
    pub fn with_active_data(mut self, data: StudentRecord) -> Option<Self> {
        let active_id = self.active_profile_id.clone();
        let profile = self
            .profiles
            .iter_mut()
            .find(|profile| profile.id == active_id)?;
        profile.name = data.student.name.clone();
        profile.data = data;
        Some(self)
    }
}
