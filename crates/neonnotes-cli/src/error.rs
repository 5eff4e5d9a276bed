use std::io;

use neonnotes_core::NoteId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] neonnotes_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("No note content provided")]
    EmptyContent,
    #[error("Edited note content cannot be empty")]
    EmptyEditedContent,
    #[error("Search query cannot be empty")]
    EmptySearchQuery,
    #[error("Invalid note id '{0}': expected a number")]
    InvalidNoteId(String),
    #[error("Note {0} not found")]
    NoteNotFound(NoteId),
    #[error("Editor command failed: {0}")]
    EditorFailed(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Profile '{0}' is not signed in. Run `neonnotes auth login` first.")]
    NotSignedIn(String),
    #[error(
        "Profile '{profile}' is already signed in as {username}. Run `neonnotes auth logout` first."
    )]
    AlreadySignedIn { profile: String, username: String },
    #[error("Refusing to delete without confirmation; pass --yes to skip the prompt")]
    ConfirmationRequired,
}
