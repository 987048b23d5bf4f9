use super::types::{ApiError, GenerationRequest, ServiceConfig, Voice, MSG_GENERATION_FAILED};

use serde_json::Value;
use std::time::Duration;

/// Response header carrying the script text in the binary-first protocol.
const SCRIPT_HEADER: &str = "x-script";

/// What a settled generation request resolved to, before presentation.
/// The failure arm travels separately as `Err(ApiError)`.
#[derive(Debug)]
pub enum GenerationOutcome {
    /// Binary-first protocol: the response body is the audio itself and
    /// the script rides along in the `x-script` header.
    AudioClip {
        bytes: Vec<u8>,
        mime_type: String,
        script: String,
    },
    /// JSON-reference protocol: the service wrote the audio to disk and
    /// handed back a path; we own only the derived URL.
    AudioReference { script: String, audio_url: String },
    /// Script without audio. A partial success, not an error.
    ScriptOnly { script: String },
}

pub struct PodcastClient {
    client: reqwest::Client,
    base_url: String,
}

impl PodcastClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn generate_url(&self) -> String {
        format!("{}/generate-podcast", self.base_url)
    }

    pub fn voices_url(&self) -> String {
        format!("{}/voices", self.base_url)
    }

    /// Playable URL for a server-side audio path: the service exposes the
    /// file under `/audio/` by its basename.
    pub fn audio_url(&self, audio_path: &str) -> String {
        format!("{}/audio/{}", self.base_url, basename(audio_path))
    }

    /// Fetch the narration voice directory. Callers treat failure as a
    /// soft condition; the directory simply stays empty.
    pub async fn fetch_voices(&self) -> Result<Vec<Voice>, ApiError> {
        let response = self.client.get(self.voices_url()).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Service {
                status: status.as_u16(),
                message: error_detail(&body).unwrap_or(body),
            });
        }

        let reply: VoicesReply = response.json().await?;
        Ok(reply.voices)
    }

    /// Connectivity probe against the service's health endpoint.
    pub async fn check_health(&self) -> Result<String, ApiError> {
        let response = self
            .client
            .get(format!("{}/api/health", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Service {
                status: status.as_u16(),
                message: error_detail(&body).unwrap_or(body),
            });
        }

        let reply: HealthReply = response.json().await?;
        Ok(reply.status)
    }

    /// Issue one generation request and classify the response.
    ///
    /// The service has shipped two response shapes and this is the single
    /// place that tells them apart, by declared content type rather than
    /// by assuming a protocol version:
    /// - a JSON body is either an application error, a script plus an
    ///   `audio_path` reference, or a script alone;
    /// - anything else is raw audio with the script in `x-script`.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationOutcome, ApiError> {
        let response = self
            .client
            .post(self.generate_url())
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Service {
                status: status.as_u16(),
                message: error_detail(&body)
                    .unwrap_or_else(|| MSG_GENERATION_FAILED.to_string()),
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("application/json") {
            let body = response.text().await?;
            return parse_json_reply(&body, |path| self.audio_url(path));
        }

        // Binary-first protocol: body is the audio, script is out of band.
        let script = response
            .headers()
            .get(SCRIPT_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        let mime_type = if content_type.is_empty() {
            "audio/mp3".to_string()
        } else {
            content_type
        };

        Ok(GenerationOutcome::AudioClip {
            bytes,
            mime_type,
            script,
        })
    }
}

/// Classify a structurally successful JSON body. An embedded `error`
/// field still means failure; otherwise the presence of `audio_path`
/// decides between the reference and script-only outcomes.
fn parse_json_reply(
    body: &str,
    to_audio_url: impl Fn(&str) -> String,
) -> Result<GenerationOutcome, ApiError> {
    let excerpt = excerpt(body);

    let reply: GenerateReply = serde_json::from_str(body)
        .map_err(|e| ApiError::Parse(format!("JSON parse: {} | output: {}", e, excerpt)))?;

    if let Some(error) = reply.error.filter(|e| !e.trim().is_empty()) {
        return Err(ApiError::Service {
            status: 200,
            message: error,
        });
    }

    let script = reply
        .script
        .ok_or_else(|| ApiError::Parse(format!("response missing `script` | output: {}", excerpt)))?;

    match reply.audio_path.filter(|p| !p.trim().is_empty()) {
        Some(path) => Ok(GenerationOutcome::AudioReference {
            audio_url: to_audio_url(&path),
            script,
        }),
        None => Ok(GenerationOutcome::ScriptOnly { script }),
    }
}

/// Body excerpt for parse errors, truncated on a char boundary so long
/// multibyte scripts cannot make the cut land mid-character.
fn excerpt(body: &str) -> String {
    const LIMIT: usize = 800;
    if body.len() <= LIMIT {
        return body.to_string();
    }
    let mut end = LIMIT;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

/// Pull the human-readable `detail`/`error` string out of a service error
/// body, if there is one.
fn error_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .or_else(|| value.get("error"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .filter(|s| !s.trim().is_empty())
}

/// Final path segment, accepting either separator since the path comes
/// from the server's filesystem, not ours.
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\'])
        .find(|s| !s.is_empty())
        .unwrap_or(path)
}

#[derive(serde::Deserialize)]
struct GenerateReply {
    #[serde(default)]
    script: Option<String>,
    #[serde(default)]
    audio_path: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(serde::Deserialize)]
struct VoicesReply {
    #[serde(default)]
    voices: Vec<Voice>,
}

#[derive(serde::Deserialize)]
struct HealthReply {
    status: String,
}
