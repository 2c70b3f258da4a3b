//! # Profile slice & cache
//!
//! The user profile is the only slice persisted across restarts. It is
//! hydrated from `~/.tutorly/profile.json` at startup and written back on
//! every successful fetch, so the app can show who is signed in before the
//! first round-trip completes.
//!
//! All writes use atomic rename (write `.tmp`, then `rename()`) for crash
//! safety.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;

use crate::api::types::Profile;

/// Returns `~/.tutorly/`, creating it if needed.
pub fn data_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".tutorly");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn profile_path() -> io::Result<PathBuf> {
    Ok(data_dir()?.join("profile.json"))
}

/// Atomically write `data` as JSON to `path` (via `.tmp` + rename).
fn atomic_write_json<T: Serialize>(path: &Path, data: &T) -> io::Result<()> {
    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(&tmp_path, json)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Loads the cached profile from disk, if one exists.
pub fn load_cached_profile() -> Option<Profile> {
    let path = profile_path().ok()?;
    if !path.exists() {
        return None;
    }
    let json = fs::read_to_string(&path).ok()?;
    match serde_json::from_str(&json) {
        Ok(profile) => {
            debug!("hydrated profile from {}", path.display());
            Some(profile)
        }
        Err(e) => {
            warn!("cached profile unreadable, ignoring: {}", e);
            None
        }
    }
}

/// Writes the profile cache. Failures are logged, never fatal - the cache
/// is a convenience, not a source of truth.
pub fn store_cached_profile(profile: &Profile) {
    let path = match profile_path() {
        Ok(p) => p,
        Err(e) => {
            warn!("cannot resolve profile cache path: {}", e);
            return;
        }
    };
    if let Err(e) = atomic_write_json(&path, profile) {
        warn!("failed to write profile cache: {}", e);
    } else {
        debug!("profile cache updated: {}", path.display());
    }
}

/// The in-memory user slice. Same replace-on-success / stale-on-error
/// contract as `ResourceState`, for a single record instead of a list.
#[derive(Debug, Default)]
pub struct ProfileSlice {
    pub profile: Option<Profile>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ProfileSlice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slice from the disk cache before any fetch.
    pub fn hydrate(&mut self, cached: Option<Profile>) {
        if self.profile.is_none() {
            self.profile = cached;
        }
    }

    pub fn begin(&mut self) {
        self.loading = true;
    }

    pub fn fulfill(&mut self, profile: Profile) {
        self.profile = Some(profile);
        self.loading = false;
        self.error = None;
    }

    pub fn reject(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str) -> Profile {
        Profile {
            id: 1,
            name: name.to_string(),
            email: "a@b.c".to_string(),
            role: "student".to_string(),
            country: None,
        }
    }

    #[test]
    fn test_hydrate_does_not_clobber_fetched_profile() {
        let mut slice = ProfileSlice::new();
        slice.fulfill(profile("fresh"));
        slice.hydrate(Some(profile("stale")));
        assert_eq!(slice.profile.as_ref().unwrap().name, "fresh");
    }

    #[test]
    fn test_reject_keeps_hydrated_profile() {
        let mut slice = ProfileSlice::new();
        slice.hydrate(Some(profile("cached")));
        slice.begin();
        slice.reject("network error: offline".to_string());
        assert_eq!(slice.profile.as_ref().unwrap().name, "cached");
        assert!(slice.error.is_some());
    }
}
