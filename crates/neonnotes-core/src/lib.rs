//! neonnotes-core - Core library for NeonNotes
//!
//! This crate contains the session store, the HTTP gateway to the notes
//! backend, and the in-memory note collection used by every NeonNotes
//! interface.

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod notes;
pub mod search;
pub mod util;

pub use error::{Error, Result};
pub use gateway::{ApiError, ApiResult};
pub use models::{ImageUpload, Note, NoteDraft, NoteId, User};
