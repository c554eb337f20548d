//! Best 1-player rally
//!
//! A single number persisted to LocalStorage under `rallyCount`.

use crate::error::StoreError;
use crate::platform::RallyStore;

/// LocalStorage key
pub const STORAGE_KEY: &str = "rallyCount";

/// Interpret a raw stored value; absent or garbage reads as 0
pub fn parse_stored(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else { return 0 };
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    match raw.parse::<u32>() {
        Ok(n) => n,
        Err(_) => {
            log::warn!("Ignoring unreadable {} value {:?}", STORAGE_KEY, raw);
            0
        }
    }
}

/// Result of closing out a 1-player match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RallyRecord {
    /// Best before this match
    pub prior: u32,
    /// Best after this match
    pub best: u32,
    pub new_best: bool,
}

/// Store `rally` if it beats both the stored best and `session_best`.
///
/// A failed write is logged; callers carry `best` forward as their session
/// best so the new record holds for the rest of the session.
pub fn record_rally<S: RallyStore + ?Sized>(
    store: &mut S,
    session_best: u32,
    rally: u32,
) -> RallyRecord {
    let prior = session_best.max(store.max_rally());
    if rally <= prior {
        return RallyRecord {
            prior,
            best: prior,
            new_best: false,
        };
    }

    match store.set_max_rally(rally) {
        Ok(()) => log::info!("New best rally: {} (was {})", rally, prior),
        Err(e) => log::warn!("Could not save best rally {}: {}", rally, e),
    }
    RallyRecord {
        prior,
        best: rally,
        new_best: true,
    }
}

/// In-memory store (native and tests)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    value: Option<String>,
    read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_rally(rally: u32) -> Self {
        Self {
            value: Some(rally.to_string()),
            read_only: false,
        }
    }

    /// Start from a raw stored string, as LocalStorage would hold it
    pub fn with_raw(raw: &str) -> Self {
        Self {
            value: Some(raw.to_string()),
            read_only: false,
        }
    }

    /// Reject every write (simulates a full or blocked storage)
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }
}

impl RallyStore for MemoryStore {
    fn max_rally(&self) -> u32 {
        parse_stored(self.value.as_deref())
    }

    fn set_max_rally(&mut self, rally: u32) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::Write {
                key: STORAGE_KEY,
                reason: "store is read-only".into(),
            });
        }
        self.value = Some(rally.to_string());
        Ok(())
    }
}

/// LocalStorage-backed store (WASM only)
#[cfg(target_arch = "wasm32")]
pub struct LocalStorageStore {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable, best rally will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl RallyStore for LocalStorageStore {
    fn max_rally(&self) -> u32 {
        let raw = self
            .storage
            .as_ref()
            .and_then(|s| s.get_item(STORAGE_KEY).ok())
            .flatten();
        parse_stored(raw.as_deref())
    }

    fn set_max_rally(&mut self, rally: u32) -> Result<(), StoreError> {
        let storage = self.storage.as_ref().ok_or(StoreError::Unavailable)?;
        storage
            .set_item(STORAGE_KEY, &rally.to_string())
            .map_err(|e| StoreError::Write {
                key: STORAGE_KEY,
                reason: format!("{:?}", e),
            })
    }
}
