use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Shown when a required field is missing at submit time.
pub const MSG_FILL_ALL_FIELDS: &str = "Please fill in all fields";
/// Shown when the service answered but the generation itself failed.
pub const MSG_GENERATION_FAILED: &str = "An error occurred while generating the podcast";
/// Shown when the service could not be reached at all.
pub const MSG_CONNECTION_FAILED: &str = "An error occurred while connecting to the server";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PodcastStyle {
    Expert,
    Casual,
    Narrative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentMode {
    Text,
    File,
    Url,
}

/// Body of `POST /generate-podcast`. Built fresh on every submit and
/// never mutated after send.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub content: String,
    pub style: PodcastStyle,
    pub content_type: ContentMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice: Option<String>,
}

/// A narration profile from the service's voice directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    /// The voice-enabled variant: a voice selection is required before submit.
    pub require_voice: bool,
    pub default_style: Option<PodcastStyle>,
    pub default_mode: Option<ContentMode>,
    pub default_voice: Option<String>,
    /// Write `podcast-script.txt` automatically on every successful generation.
    pub auto_save_script: bool,
    /// Target for saved artifacts. Falls back to the user download directory.
    pub download_dir: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Self {
            base_url,
            require_voice: false,
            default_style: None,
            default_mode: None,
            default_voice: None,
            auto_save_script: false,
            download_dir: None,
        }
    }

    pub fn from_env() -> Self {
        let base = std::env::var("PODSTUDIO_BASE_URL")
            .ok()
            .and_then(|u| {
                let t = u.trim().to_string();
                if t.is_empty() {
                    None
                } else {
                    Some(t)
                }
            })
            .unwrap_or_else(|| "http://localhost:8000".to_string());
        Self::new(base)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::new("http://localhost:8000")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl ApiError {
    /// Collapse to the single string the presentation layer is allowed to see.
    /// Structured detail from the service wins; otherwise the generic message
    /// for the failure class.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Http(_) => MSG_CONNECTION_FAILED.to_string(),
            ApiError::Service { message, .. } => message.clone(),
            ApiError::Parse(_) => MSG_GENERATION_FAILED.to_string(),
        }
    }
}
