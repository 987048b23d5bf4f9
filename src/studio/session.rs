use super::artifacts::{ArtifactError, ArtifactStore, AudioArtifact};
use super::client::{GenerationOutcome, PodcastClient};
use super::content::ContentBuffer;
use super::types::{
    ApiError, ContentMode, GenerationRequest, PodcastStyle, ServiceConfig, Voice,
    MSG_FILL_ALL_FIELDS,
};

use log::{debug, warn};
use std::path::{Path, PathBuf};

/// What the shell must do after a selection, beyond repainting. Picking
/// the file content mode opens the OS file picker as part of the same
/// action, not as a follow-up the user could skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEffect {
    None,
    OpenFilePicker,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The request went out and settled, successfully or not.
    Settled,
    /// Pre-flight validation failed; no request was made.
    Rejected,
    /// A request is already in flight; this call did nothing.
    AlreadyRunning,
}

/// Snapshot of everything the presentation layer renders.
#[derive(Debug, Clone)]
pub struct SessionView {
    pub selected_style: Option<PodcastStyle>,
    pub selected_mode: Option<ContentMode>,
    pub selected_voice: Option<String>,
    pub content: String,
    pub is_loading: bool,
    pub error: Option<String>,
    pub audio_url: Option<String>,
    pub script: Option<String>,
}

/// One generation form: input assembly, selections, the single-flight
/// submission lifecycle, and the resulting artifacts.
pub struct Session {
    config: ServiceConfig,
    client: PodcastClient,
    content: ContentBuffer,
    voices: Vec<Voice>,
    voices_fetched: bool,
    selected_style: Option<PodcastStyle>,
    selected_mode: Option<ContentMode>,
    selected_voice: Option<String>,
    is_loading: bool,
    request_seq: u64,
    error: Option<String>,
    artifacts: ArtifactStore,
}

impl Session {
    pub fn new(config: ServiceConfig) -> Result<Self, ApiError> {
        let client = PodcastClient::new(&config)?;
        let artifacts = ArtifactStore::new(config.auto_save_script, config.download_dir.clone());
        Ok(Self {
            selected_style: config.default_style,
            selected_mode: config.default_mode,
            selected_voice: config.default_voice.clone(),
            config,
            client,
            content: ContentBuffer::new(),
            voices: Vec::new(),
            voices_fetched: false,
            is_loading: false,
            request_seq: 0,
            error: None,
            artifacts,
        })
    }

    pub fn content(&self) -> &ContentBuffer {
        &self.content
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn artifacts(&self) -> &ArtifactStore {
        &self.artifacts
    }

    /// Populate the voice directory. The fetch happens once per session;
    /// later calls return the held directory without contacting the
    /// service. Failure is soft: the directory stays empty and selection
    /// falls back to the default.
    pub async fn load_voices(&mut self) -> &[Voice] {
        if self.voices_fetched {
            return &self.voices;
        }
        self.voices_fetched = true;

        match self.client.fetch_voices().await {
            Ok(voices) => {
                debug!("voice directory loaded ({} voices)", voices.len());
                self.voices = voices;
            }
            Err(e) => {
                warn!("voice directory unavailable: {e}");
            }
        }
        &self.voices
    }

    pub fn select_style(&mut self, style: PodcastStyle) {
        self.selected_style = Some(style);
    }

    pub fn select_mode(&mut self, mode: ContentMode) -> SelectionEffect {
        self.selected_mode = Some(mode);
        match mode {
            ContentMode::File => SelectionEffect::OpenFilePicker,
            _ => SelectionEffect::None,
        }
    }

    pub fn select_voice(&mut self, voice_id: impl Into<String>) {
        self.selected_voice = Some(voice_id.into());
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.content.set_text(text);
    }

    pub async fn load_file(&self, path: &Path) {
        self.content.load_file(path).await;
    }

    /// Validate, issue exactly one generation request, and settle.
    ///
    /// No-op while a request is in flight: the loading flag doubles as
    /// the mutual-exclusion guard. On a validation failure the error is
    /// set synchronously and the service is never contacted. The loading
    /// flag is cleared on every settlement path.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if self.is_loading {
            return SubmitOutcome::AlreadyRunning;
        }

        let request = match self.build_request() {
            Some(request) => request,
            None => {
                self.error = Some(MSG_FILL_ALL_FIELDS.to_string());
                return SubmitOutcome::Rejected;
            }
        };

        // Release the previous result before the new request goes out.
        self.error = None;
        self.artifacts.clear();
        self.is_loading = true;
        self.request_seq += 1;
        let seq = self.request_seq;

        let result = self.client.generate(&request).await;
        self.settle(seq, result);
        SubmitOutcome::Settled
    }

    /// All required fields non-empty, voice included when the config
    /// demands one.
    fn build_request(&self) -> Option<GenerationRequest> {
        let content = self.content.payload();
        if content.trim().is_empty() {
            return None;
        }
        let style = self.selected_style?;
        let content_type = self.selected_mode?;

        let voice = self
            .selected_voice
            .clone()
            .filter(|v| !v.trim().is_empty());
        if self.config.require_voice && voice.is_none() {
            return None;
        }

        Some(GenerationRequest {
            content,
            style,
            content_type,
            voice,
        })
    }

    /// Apply a settled response. Only the settlement of the most recent
    /// request may touch presentation state.
    fn settle(&mut self, seq: u64, result: Result<GenerationOutcome, ApiError>) {
        if seq != self.request_seq {
            debug!("ignoring stale settlement for request {seq}");
            return;
        }
        self.is_loading = false;

        match result {
            Ok(GenerationOutcome::AudioClip {
                bytes,
                mime_type,
                script,
            }) => {
                let handle = self.artifacts.new_local(bytes, mime_type);
                let script = if script.is_empty() { None } else { Some(script) };
                self.artifacts
                    .install(Some(AudioArtifact::Local(handle)), script);
            }
            Ok(GenerationOutcome::AudioReference { script, audio_url }) => {
                self.artifacts.install(
                    Some(AudioArtifact::Remote { url: audio_url }),
                    Some(script),
                );
            }
            Ok(GenerationOutcome::ScriptOnly { script }) => {
                self.artifacts.install(None, Some(script));
            }
            Err(e) => {
                warn!("generation failed: {e}");
                self.error = Some(e.user_message());
            }
        }
    }

    pub fn save_audio(&self, dir: Option<&Path>) -> Result<PathBuf, ArtifactError> {
        self.artifacts.save_audio(dir)
    }

    pub fn save_script(&self, dir: Option<&Path>) -> Result<PathBuf, ArtifactError> {
        self.artifacts.save_script(dir)
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            selected_style: self.selected_style,
            selected_mode: self.selected_mode,
            selected_voice: self.selected_voice.clone(),
            content: self.content.payload(),
            is_loading: self.is_loading,
            error: self.error.clone(),
            audio_url: self.artifacts.audio().map(|a| a.locator()),
            script: self.artifacts.script().map(|s| s.to_string()),
        }
    }
}
