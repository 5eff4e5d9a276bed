//! Process-local session persistence for tests and embedders.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::{Session, SessionPersistence};
use crate::error::{Error, Result};

/// Session persistence backed by shared memory.
///
/// Clones share the same slot, so a clone can be handed to a second
/// [`SessionStore`](super::SessionStore) to simulate a restart. The value is
/// kept serialized, matching what a durable backend would hold.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    slot: Arc<Mutex<Option<String>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        let store = Self::default();
        if let Ok(raw) = serde_json::to_string(&session) {
            store.set_raw(raw);
        }
        store
    }

    /// Make subsequent `save`/`clear` calls fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Overwrite the stored value without validation.
    pub fn set_raw(&self, raw: impl Into<String>) {
        if let Ok(mut guard) = self.slot.lock() {
            *guard = Some(raw.into());
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|guard| guard.clone())
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(Error::Storage("session storage is read-only".to_string()))
        } else {
            Ok(())
        }
    }
}

impl SessionPersistence for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        match guard.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, session: &Session) -> Result<()> {
        self.check_writable()?;
        let raw = serde_json::to_string(session)?;
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = Some(raw);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.check_writable()?;
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}
