//! Note model

use std::fmt;
use std::num::ParseIntError;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Server-assigned note identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(i64);

impl NoteId {
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for NoteId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self(s.trim().parse()?))
    }
}

impl From<i64> for NoteId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A note as stored by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Unique identifier, assigned by the server
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Server-hosted cover image URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(deserialize_with = "server_time::deserialize")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "server_time::deserialize")]
    pub updated_at: DateTime<Utc>,
}

/// Backend timestamps: RFC 3339, or naive ISO 8601 (Django with `USE_TZ =
/// False`), which is read as UTC.
mod server_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
            .map(|naive| naive.and_utc())
    }
}

impl Note {
    /// Copy the server-owned mutable fields from an update response.
    ///
    /// `id` and `created_at` stay as they were.
    pub fn apply_update(&mut self, updated: Note) {
        self.title = updated.title;
        self.content = updated.content;
        self.image = updated.image;
        self.updated_at = updated.updated_at;
    }

    /// Case-insensitive substring match against title or content.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        needle.is_empty()
            || self.title.to_lowercase().contains(needle)
            || self.content.to_lowercase().contains(needle)
    }

    #[must_use]
    pub const fn has_image(&self) -> bool {
        self.image.is_some()
    }
}

/// Title, content, and optional attachment submitted on create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub image: Option<ImageUpload>,
}

impl NoteDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            image: None,
        }
    }

    /// Start a full-replacement draft from an existing note.
    ///
    /// The existing image URL is not re-sent; only a new upload replaces it.
    #[must_use]
    pub fn from_note(note: &Note) -> Self {
        Self::new(note.title.clone(), note.content.clone())
    }

    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }

    /// Reject drafts with a blank title or content.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Title is required".to_string()));
        }
        if self.content.trim().is_empty() {
            return Err(Error::InvalidInput("Content is required".to_string()));
        }
        Ok(())
    }
}

/// Binary image attached to a note submission. Bytes are sent as-is.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Build an upload, guessing the MIME type from the file name.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Read an image from disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| {
                Error::InvalidInput(format!("Image path has no file name: {}", path.display()))
            })?
            .to_string();
        let bytes = std::fs::read(path)?;
        if bytes.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Image file is empty: {}",
                path.display()
            )));
        }
        Ok(Self::new(file_name, bytes))
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    fn timestamp(raw: &str) -> DateTime<Utc> {
        raw.parse().unwrap()
    }

    fn sample_note() -> Note {
        Note {
            id: NoteId::new(7),
            title: "Groceries".to_string(),
            content: "Milk, eggs".to_string(),
            image: None,
            created_at: timestamp("2024-03-01T10:00:00Z"),
            updated_at: timestamp("2024-03-01T10:00:00Z"),
        }
    }

    #[test]
    fn test_note_id_parse() {
        let id: NoteId = " 42 ".parse().unwrap();
        assert_eq!(id, NoteId::new(42));
        assert!("abc".parse::<NoteId>().is_err());
    }

    #[test]
    fn test_note_deserializes_backend_payload() {
        let payload = r#"{
            "id": 1,
            "title": "Groceries",
            "content": "Milk, eggs",
            "image": "http://127.0.0.1:8000/media/notes/cover.png",
            "created_at": "2024-03-01T10:00:00.123456Z",
            "updated_at": "2024-03-01T12:30:00.000000+00:00"
        }"#;
        let note: Note = serde_json::from_str(payload).unwrap();
        assert_eq!(note.id, NoteId::new(1));
        assert_eq!(
            note.image.as_deref(),
            Some("http://127.0.0.1:8000/media/notes/cover.png")
        );
        assert!(note.updated_at > note.created_at);
    }

    #[test]
    fn test_note_deserializes_naive_timestamps_as_utc() {
        let payload = r#"{"id":3,"title":"t","content":"c","image":null,
            "created_at":"2024-03-01T10:00:00.123456",
            "updated_at":"2024-03-01 12:30:00"}"#;
        let note: Note = serde_json::from_str(payload).unwrap();
        assert_eq!(note.created_at, timestamp("2024-03-01T10:00:00.123456Z"));
        assert_eq!(note.updated_at, timestamp("2024-03-01T12:30:00Z"));
    }

    #[test]
    fn test_note_rejects_garbage_timestamp() {
        let payload = r#"{"id":3,"title":"t","content":"c",
            "created_at":"yesterday","updated_at":"2024-03-01T10:00:00Z"}"#;
        assert!(serde_json::from_str::<Note>(payload).is_err());
    }

    #[test]
    fn test_note_serializes_rfc3339() {
        let value = serde_json::to_value(sample_note()).unwrap();
        assert_eq!(value["created_at"], "2024-03-01T10:00:00Z");
        let back: Note = serde_json::from_value(value).unwrap();
        assert_eq!(back, sample_note());
    }

    #[test]
    fn test_note_deserializes_null_image() {
        let payload = r#"{"id":2,"title":"t","content":"c","image":null,
            "created_at":"2024-03-01T10:00:00Z","updated_at":"2024-03-01T10:00:00Z"}"#;
        let note: Note = serde_json::from_str(payload).unwrap();
        assert!(!note.has_image());
    }

    #[test]
    fn test_apply_update_keeps_identity_and_creation_time() {
        let mut note = sample_note();
        let server = Note {
            id: NoteId::new(999),
            title: "Groceries (weekend)".to_string(),
            content: "Milk, eggs, bread".to_string(),
            image: Some("http://host/media/bread.jpg".to_string()),
            created_at: timestamp("2030-01-01T00:00:00Z"),
            updated_at: timestamp("2024-03-02T09:00:00Z"),
        };

        note.apply_update(server);

        assert_eq!(note.id, NoteId::new(7));
        assert_eq!(note.created_at, timestamp("2024-03-01T10:00:00Z"));
        assert_eq!(note.title, "Groceries (weekend)");
        assert_eq!(note.content, "Milk, eggs, bread");
        assert_eq!(note.image.as_deref(), Some("http://host/media/bread.jpg"));
        assert_eq!(note.updated_at, timestamp("2024-03-02T09:00:00Z"));
    }

    #[test]
    fn test_matches_title_or_content() {
        let note = sample_note();
        assert!(note.matches("milk"));
        assert!(note.matches("groc"));
        assert!(note.matches(""));
        assert!(!note.matches("taxes"));
    }

    #[test]
    fn test_draft_validation() {
        assert!(NoteDraft::new("Groceries", "Milk, eggs").validate().is_ok());
        assert!(matches!(
            NoteDraft::new("  ", "Milk").validate(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            NoteDraft::new("Groceries", "\n\t").validate(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_draft_from_note_drops_image_url() {
        let mut note = sample_note();
        note.image = Some("http://host/media/a.png".to_string());
        let draft = NoteDraft::from_note(&note);
        assert_eq!(draft.title, "Groceries");
        assert_eq!(draft.content, "Milk, eggs");
        assert!(draft.image.is_none());
    }

    #[test]
    fn test_image_upload_guesses_mime() {
        let upload = ImageUpload::new("cover.png", vec![1, 2, 3]);
        assert_eq!(upload.mime_type, "image/png");
        let unknown = ImageUpload::new("cover.unknownext", vec![1]);
        assert_eq!(unknown.mime_type, "application/octet-stream");
    }

    #[test]
    fn test_image_upload_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpg");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF]).unwrap();

        let upload = ImageUpload::from_path(&path).unwrap();
        assert_eq!(upload.file_name, "photo.jpg");
        assert_eq!(upload.mime_type, "image/jpeg");
        assert_eq!(upload.bytes, vec![0xFF, 0xD8, 0xFF]);
    }

    #[test]
    fn test_image_upload_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");
        std::fs::File::create(&path).unwrap();
        assert!(matches!(
            ImageUpload::from_path(&path),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_image_upload_debug_omits_bytes() {
        let upload = ImageUpload::new("cover.png", vec![0; 4096]);
        let rendered = format!("{upload:?}");
        assert!(rendered.contains("len: 4096"));
        assert!(!rendered.contains("[0, 0"));
    }
}
