//! HTTP gateway to the NeonNotes backend.
//!
//! Translates session and note operations into REST calls, attaches the
//! session token, and normalizes every failure into an [`ApiError`].

mod error;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{multipart, Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::auth::Session;
use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::models::{Note, NoteDraft, NoteId, User};
use crate::notes::NotesBackend;
use crate::util::compact_text;

pub use error::{extract_error_message, ApiError, ApiResult, GENERIC_ERROR_MESSAGE};

/// Whether a submission creates a new note or fully replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    Create,
    Update(NoteId),
}

impl SubmitTarget {
    fn method(self) -> Method {
        match self {
            Self::Create => Method::POST,
            Self::Update(_) => Method::PUT,
        }
    }

    fn path(self) -> String {
        match self {
            Self::Create => "/notes/".to_string(),
            Self::Update(id) => note_path(id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ClientConfig,
    client: Client,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|error| Error::Config(format!("Failed to construct HTTP client: {error}")))?;
        Ok(Self { config, client })
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Exchange credentials for a session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        validate_credentials(username, password)?;

        let payload = serde_json::json!({
            "username": username,
            "password": password,
        });
        let request = self
            .request(Method::POST, "/login/", None)
            .json(&payload);
        let response = send(request, "login").await?;
        let status = response.status().as_u16();
        let login: LoginResponse = decode(response).await?;
        tracing::debug!("Login accepted for user id {}", login.user_id);
        Ok(login.into_session(status)?)
    }

    /// Create an account. Does not sign in.
    pub async fn register(&self, username: &str, password: &str) -> Result<()> {
        validate_credentials(username, password)?;

        let payload = serde_json::json!({
            "username": username,
            "password": password,
        });
        let request = self
            .request(Method::POST, "/register/", None)
            .json(&payload);
        send(request, "register").await?;
        Ok(())
    }

    pub async fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>> {
        let request = self.request(Method::GET, "/notes/", token);
        let response = send(request, "list notes").await?;
        Ok(decode(response).await?)
    }

    /// Create or fully replace a note. Always sent as multipart form data.
    pub async fn submit_note(
        &self,
        token: Option<&str>,
        target: SubmitTarget,
        draft: &NoteDraft,
    ) -> Result<Note> {
        let request = self.submit_request(token, target, draft)?;
        let response = send(request, "submit note").await?;
        Ok(decode(response).await?)
    }

    pub async fn delete_note(&self, token: Option<&str>, id: NoteId) -> Result<()> {
        let request = self.request(Method::DELETE, &note_path(id), token);
        send(request, "delete note").await?;
        Ok(())
    }

    fn submit_request(
        &self,
        token: Option<&str>,
        target: SubmitTarget,
        draft: &NoteDraft,
    ) -> Result<RequestBuilder> {
        draft.validate()?;

        let mut form = multipart::Form::new()
            .text("title", draft.title.clone())
            .text("content", draft.content.clone());
        if let Some(image) = &draft.image {
            let part = multipart::Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime_type)
                .map_err(|error| {
                    Error::InvalidInput(format!(
                        "Unsupported image type '{}': {error}",
                        image.mime_type
                    ))
                })?;
            form = form.part("image", part);
        }

        Ok(self
            .request(target.method(), &target.path(), token)
            .multipart(form))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let request = self
            .client
            .request(method, self.config.endpoint(path))
            .header(ACCEPT, "application/json");
        match token {
            Some(token) => request.header(
                AUTHORIZATION,
                format!("{} {}", self.config.auth_scheme, token),
            ),
            None => request,
        }
    }
}

impl NotesBackend for ApiClient {
    async fn list_notes(&self, token: Option<&str>) -> Result<Vec<Note>> {
        Self::list_notes(self, token).await
    }

    async fn submit_note(
        &self,
        token: Option<&str>,
        target: SubmitTarget,
        draft: &NoteDraft,
    ) -> Result<Note> {
        Self::submit_note(self, token, target, draft).await
    }

    async fn delete_note(&self, token: Option<&str>, id: NoteId) -> Result<()> {
        Self::delete_note(self, token, id).await
    }
}

async fn send(request: RequestBuilder, operation: &'static str) -> ApiResult<Response> {
    let response = request.send().await.map_err(|error| ApiError::network(&error))?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    tracing::warn!(
        "{} rejected with HTTP {}: {}",
        operation,
        status.as_u16(),
        compact_text(&body)
    );
    Err(ApiError::from_response(status.as_u16(), &body))
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let status = response.status().as_u16();
    response
        .json::<T>()
        .await
        .map_err(|error| ApiError::undecodable(status, &error))
}

fn note_path(id: NoteId) -> String {
    format!("/notes/{id}/")
}

fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(Error::InvalidInput("Username is required".to_string()));
    }
    if password.is_empty() {
        return Err(Error::InvalidInput("Password is required".to_string()));
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    user_id: i64,
    username: String,
}

impl LoginResponse {
    /// A login without a usable token is treated as an undecodable body.
    fn into_session(self, status: u16) -> ApiResult<Session> {
        if self.token.trim().is_empty() {
            return Err(ApiError::malformed(status, "login response carried an empty token"));
        }
        Ok(Session::new(self.token, User::new(self.user_id, self.username)))
    }
}
