//! Data models for NeonNotes

mod note;
mod user;

pub use note::{ImageUpload, Note, NoteDraft, NoteId};
pub use user::User;
