//! Session lifecycle: the token and identity of the signed-in user.
//!
//! A [`SessionStore`] owns the in-memory session and keeps it mirrored in a
//! durable [`SessionPersistence`] backend so it survives restarts. It is an
//! explicit value handed to whoever needs credentials; nothing here is global.

mod memory;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::User;

pub use memory::MemorySessionStore;

/// Proof of authentication plus the identity it represents.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: User,
}

impl Session {
    #[must_use]
    pub fn new(token: impl Into<String>, user: User) -> Self {
        Self {
            token: token.into(),
            user,
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

/// Durable storage for the single persisted session value.
pub trait SessionPersistence {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Authentication state of a [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Durable storage has not been read yet.
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

/// Single owner of the current session.
///
/// Transitions: `Loading -> Authenticated | Unauthenticated` through
/// [`restore`](Self::restore), `Unauthenticated -> Authenticated` through
/// [`login`](Self::login), and `Authenticated -> Unauthenticated` through
/// [`logout`](Self::logout). Anything else is rejected and leaves the state
/// untouched.
pub struct SessionStore<P: SessionPersistence> {
    persistence: P,
    state: SessionState,
}

impl<P: SessionPersistence> SessionStore<P> {
    /// Create a store in the `Loading` state. Call [`restore`](Self::restore)
    /// once before using it.
    pub const fn new(persistence: P) -> Self {
        Self {
            persistence,
            state: SessionState::Loading,
        }
    }

    /// Create a store and immediately rehydrate it from durable storage.
    pub fn restored(persistence: P) -> Result<Self> {
        let mut store = Self::new(persistence);
        store.restore()?;
        Ok(store)
    }

    /// Rehydrate from durable storage.
    ///
    /// A stored session is trusted as-is; the token is not checked against the
    /// backend, so an expired token only surfaces on the next failed call.
    pub fn restore(&mut self) -> Result<()> {
        if self.state != SessionState::Loading {
            return Err(Error::SessionState("session has already been restored"));
        }

        self.state = match self.persistence.load() {
            Ok(Some(session)) => {
                tracing::debug!("Restored session for user {}", session.user.username);
                SessionState::Authenticated(session)
            }
            Ok(None) => SessionState::Unauthenticated,
            Err(error) => {
                tracing::warn!("Discarding unreadable stored session: {}", error);
                if let Err(clear_error) = self.persistence.clear() {
                    tracing::warn!("Failed to clear stored session: {}", clear_error);
                }
                SessionState::Unauthenticated
            }
        };
        Ok(())
    }

    /// Store credentials durably and in memory.
    pub fn login(&mut self, session: Session) -> Result<()> {
        match self.state {
            SessionState::Loading => {
                return Err(Error::SessionState("cannot log in before restore"));
            }
            SessionState::Authenticated(_) => {
                return Err(Error::SessionState("already logged in; log out first"));
            }
            SessionState::Unauthenticated => {}
        }

        self.persistence.save(&session)?;
        tracing::info!("Logged in as {}", session.user.username);
        self.state = SessionState::Authenticated(session);
        Ok(())
    }

    /// Clear credentials from durable storage and memory.
    ///
    /// Logging out while already unauthenticated still clears storage.
    pub fn logout(&mut self) -> Result<()> {
        if self.state == SessionState::Loading {
            return Err(Error::SessionState("cannot log out before restore"));
        }

        self.persistence.clear()?;
        if let SessionState::Authenticated(session) = &self.state {
            tracing::info!("Logged out {}", session.user.username);
        }
        self.state = SessionState::Unauthenticated;
        Ok(())
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub const fn is_loading(&self) -> bool {
        matches!(self.state, SessionState::Loading)
    }

    pub const fn is_authenticated(&self) -> bool {
        matches!(self.state, SessionState::Authenticated(_))
    }

    pub const fn session(&self) -> Option<&Session> {
        match &self.state {
            SessionState::Authenticated(session) => Some(session),
            _ => None,
        }
    }

    /// Token to attach to outbound calls, if signed in.
    pub fn token(&self) -> Option<&str> {
        self.session().map(|session| session.token.as_str())
    }

    pub fn user(&self) -> Option<&User> {
        self.session().map(|session| &session.user)
    }

    pub const fn persistence(&self) -> &P {
        &self.persistence
    }
}
