// Profile Registry
// Immutable set of profile definitions, injected into the adapter

use std::collections::BTreeMap;

use super::error::{DomainError, Result};
use super::profile::{definition_key, Profile, ProfileField};

/// Immutable mapping of definition key (`ILLDB_<PROFILE>_<FIELD>`) to value
///
/// Built once at startup. Keys are stored uppercased so lookups are
/// case-insensitive on the profile name.
#[derive(Debug, Clone, Default)]
pub struct ProfileRegistry {
    definitions: BTreeMap<String, String>,
}

impl ProfileRegistry {
    /// Build a registry from (key, value) definitions; later keys win
    pub fn from_definitions<I, K, V>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let definitions = definitions
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_uppercase(), v.into()))
            .collect();
        Self { definitions }
    }

    /// Merge `other` on top of `self` (other's definitions win)
    pub fn overlay(mut self, other: ProfileRegistry) -> Self {
        self.definitions.extend(other.definitions);
        self
    }

    /// Resolve a profile, requiring all four fields
    ///
    /// # Errors
    /// - DomainError::UnknownServer if the name is empty or any field is missing
    pub fn lookup(&self, profile: &str) -> Result<Profile> {
        let unknown = || DomainError::UnknownServer {
            profile: profile.to_string(),
        };

        if profile.trim().is_empty() {
            return Err(unknown());
        }

        let field = |f: ProfileField| {
            self.definitions
                .get(&definition_key(profile, f))
                .cloned()
                .ok_or_else(unknown)
        };

        Ok(Profile {
            name: profile.to_uppercase(),
            host: field(ProfileField::Host)?,
            port: field(ProfileField::Port)?,
            user: field(ProfileField::User)?,
            password: field(ProfileField::Password)?,
        })
    }

    /// Names of profiles that define all four fields
    pub fn profile_names(&self) -> Vec<String> {
        let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
        for key in self.definitions.keys() {
            if let Some((name, _)) = ProfileField::parse_key(key) {
                *seen.entry(name).or_default() += 1;
            }
        }

        seen.into_iter()
            .filter(|(_, count)| *count == ProfileField::ALL.len())
            .map(|(name, _)| name.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
