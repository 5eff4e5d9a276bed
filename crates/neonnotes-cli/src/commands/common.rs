use std::env;
use std::io::{self, BufRead, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Utc};
use neonnotes_core::auth::SessionStore;
use neonnotes_core::config::{ClientConfig, ENV_API_URL, ENV_AUTH_SCHEME};
use neonnotes_core::gateway::ApiClient;
use neonnotes_core::notes::NoteCollection;
use neonnotes_core::util::normalize_text_option;
use neonnotes_core::{ImageUpload, Note, NoteId};
use serde::Serialize;

use crate::auth::{restore_profile_session, KeyringSessionStore};
use crate::cli::GlobalArgs;
use crate::config_profiles::{default_config_path, CliProfile, CliProfilesConfig};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct NoteListItem {
    pub id: i64,
    pub title: String,
    pub preview: String,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub relative_time: String,
}

/// Everything a command needs to talk to the backend for one profile.
pub struct CliContext {
    pub profile_name: String,
    pub session: SessionStore<KeyringSessionStore>,
    pub client: ApiClient,
}

impl CliContext {
    pub fn load(globals: &GlobalArgs) -> Result<Self, CliError> {
        let config_path = default_config_path().map_err(CliError::Config)?;
        let config = CliProfilesConfig::load_from_path(&config_path).map_err(CliError::Config)?;
        let profile_name = config.resolve_profile_name(globals.profile.as_deref());
        let client_config =
            resolve_client_config(globals.api_url.clone(), config.profile(&profile_name))?;
        tracing::debug!(
            "Using profile '{}' against {}",
            profile_name,
            client_config.api_base_url
        );
        Self::new(profile_name, client_config)
    }

    /// Restore the profile's stored session and build a client for it.
    pub fn new(profile_name: String, client_config: ClientConfig) -> Result<Self, CliError> {
        let session = restore_profile_session(&profile_name)?;
        let client = ApiClient::new(client_config)?;
        Ok(Self {
            profile_name,
            session,
            client,
        })
    }

    /// Fail before any network call when the profile already holds a session.
    pub fn require_signed_out(&self) -> Result<(), CliError> {
        match self.session.user() {
            Some(user) => Err(CliError::AlreadySignedIn {
                profile: self.profile_name.clone(),
                username: user.username.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn require_token(&self) -> Result<&str, CliError> {
        self.session
            .token()
            .ok_or_else(|| CliError::NotSignedIn(self.profile_name.clone()))
    }

    pub fn collection(&self) -> NoteCollection<ApiClient> {
        NoteCollection::new(self.client.clone())
    }

    /// Fresh collection populated from the backend with the stored token.
    pub async fn load_collection(&self) -> Result<NoteCollection<ApiClient>, CliError> {
        let token = self.require_token()?;
        let mut collection = self.collection();
        collection.load_all(Some(token)).await?;
        Ok(collection)
    }
}

/// API settings in effect: `--api-url`, then environment, then the profile,
/// then built-in defaults.
pub fn resolve_client_config(
    api_url: Option<String>,
    profile: Option<&CliProfile>,
) -> Result<ClientConfig, CliError> {
    resolve_client_config_with(api_url, profile, |key| env::var(key).ok())
}

pub fn resolve_client_config_with(
    api_url: Option<String>,
    profile: Option<&CliProfile>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, CliError> {
    let profile = profile.cloned().unwrap_or_default();
    let config = ClientConfig::resolve_with(api_url, None, |key| {
        normalize_text_option(env(key)).or_else(|| match key {
            ENV_API_URL => profile.api_base_url.clone(),
            ENV_AUTH_SCHEME => profile.auth_scheme.clone(),
            _ => None,
        })
    })?;
    Ok(config)
}

pub fn parse_note_id(raw: &str) -> Result<NoteId, CliError> {
    raw.parse::<NoteId>()
        .map_err(|_| CliError::InvalidNoteId(raw.trim().to_string()))
}

pub fn load_image(path: Option<&Path>) -> Result<Option<ImageUpload>, CliError> {
    Ok(path.map(ImageUpload::from_path).transpose()?)
}

/// At most `limit` notes; every note when no limit is given.
pub fn take_limit<'a>(
    notes: impl IntoIterator<Item = &'a Note>,
    limit: Option<usize>,
) -> Vec<&'a Note> {
    notes.into_iter().take(limit.unwrap_or(usize::MAX)).collect()
}

pub fn print_notes(notes: &[&Note], as_json: bool) -> Result<(), CliError> {
    if as_json {
        let json_items = notes
            .iter()
            .map(|note| note_to_list_item(note))
            .collect::<Vec<NoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if notes.is_empty() {
        println!("No notes found.");
    } else {
        for line in format_note_lines(notes) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_note_lines(notes: &[&Note]) -> Vec<String> {
    let now_ms = Utc::now().timestamp_millis();
    notes
        .iter()
        .map(|note| {
            let id = note.id.to_string();
            let title = truncate_chars(&collapse_whitespace(&note.title), 24);
            let preview = note_preview(note, 40);
            let relative_time = format_relative_time(note.updated_at.timestamp_millis(), now_ms);

            if note.has_image() {
                format!("{id:>6}  {title:<24}  {preview:<40}  {relative_time:<10}  [image]")
            } else {
                format!("{id:>6}  {title:<24}  {preview:<40}  {relative_time}")
            }
        })
        .collect()
}

pub fn note_to_list_item(note: &Note) -> NoteListItem {
    let now_ms = Utc::now().timestamp_millis();

    NoteListItem {
        id: note.id.get(),
        title: note.title.clone(),
        preview: note_preview(note, 80),
        content: note.content.clone(),
        image: note.image.clone(),
        created_at: note.created_at,
        updated_at: note.updated_at,
        relative_time: format_relative_time(note.updated_at.timestamp_millis(), now_ms),
    }
}

pub fn note_preview(note: &Note, max_chars: usize) -> String {
    let first_line = note.content.lines().next().unwrap_or("").trim();
    truncate_chars(&collapse_whitespace(first_line), max_chars)
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        value.to_string()
    } else {
        let take_len = max_chars.saturating_sub(3);
        let mut truncated = value.chars().take(take_len).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}

pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let diff = now_ms.saturating_sub(timestamp_ms);
    let minute = 60_000;
    let hour = 60 * minute;
    let day = 24 * hour;
    let week = 7 * day;
    let month = 30 * day;
    let year = 365 * day;

    if diff < minute {
        "just now".to_string()
    } else if diff < hour {
        format!("{}m ago", diff / minute)
    } else if diff < day {
        format!("{}h ago", diff / hour)
    } else if diff < week {
        format!("{}d ago", diff / day)
    } else if diff < month {
        format!("{}w ago", diff / week)
    } else if diff < year {
        format!("{}mo ago", diff / month)
    } else {
        format!("{}y ago", diff / year)
    }
}

/// Note body from `--content`, then piped stdin, then `$EDITOR`.
pub fn resolve_note_content(content: Option<&str>) -> Result<String, CliError> {
    if let Some(content) = content {
        return normalize_content(content).ok_or(CliError::EmptyContent);
    }

    if let Some(content) = read_piped_stdin()? {
        return Ok(content);
    }

    if let Some(content) = capture_editor_input()? {
        return Ok(content);
    }

    Err(CliError::EmptyContent)
}

pub fn normalize_content(content: &str) -> Option<String> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn normalize_search_query(query: &str) -> Result<String, CliError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptySearchQuery)
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn read_piped_stdin() -> Result<Option<String>, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut buffer = String::new();
    stdin.lock().read_to_string(&mut buffer)?;
    Ok(normalize_content(&buffer))
}

/// Ask a yes/no question on the terminal. Defaults to no.
pub fn confirm(prompt: &str) -> Result<bool, CliError> {
    let stdin = io::stdin();
    if !stdin.is_terminal() {
        return Err(CliError::ConfirmationRequired);
    }

    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    stdin.lock().read_line(&mut answer)?;
    Ok(is_affirmative(&answer))
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

pub fn capture_editor_input() -> Result<Option<String>, CliError> {
    capture_editor_input_with_initial("")
}

pub fn capture_editor_input_with_initial(
    initial_content: &str,
) -> Result<Option<String>, CliError> {
    let editor = preferred_editor();
    let temp_file = create_temp_note_file_path();
    std::fs::write(&temp_file, initial_content)?;

    let launch_result = launch_editor(&editor, &temp_file);
    let note_content = std::fs::read_to_string(&temp_file)?;
    let _ = std::fs::remove_file(&temp_file);

    launch_result?;
    Ok(normalize_content(&note_content))
}

pub fn launch_editor(editor: &str, file_path: &Path) -> Result<(), CliError> {
    match Command::new(editor).arg(file_path).status() {
        Ok(status) => {
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            // EDITOR values like "code --wait" carry arguments.
            let mut parts = editor.split_whitespace();
            let Some(program) = parts.next() else {
                return Err(CliError::EditorFailed("empty EDITOR command".into()));
            };

            let status = Command::new(program).args(parts).arg(file_path).status()?;
            if status.success() {
                Ok(())
            } else {
                Err(CliError::EditorFailed(format!(
                    "`{editor}` exited with status {status}"
                )))
            }
        }
        Err(err) => Err(CliError::Io(err)),
    }
}

pub fn preferred_editor() -> String {
    env::var("VISUAL")
        .or_else(|_| env::var("EDITOR"))
        .unwrap_or_else(|_| default_editor().to_string())
}

pub const fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "vi"
    }
}

pub fn create_temp_note_file_path() -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_nanos());
    env::temp_dir().join(format!("neonnotes-note-{}-{now}.md", std::process::id()))
}
