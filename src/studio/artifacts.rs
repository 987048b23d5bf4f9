use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use log::warn;

pub const AUDIO_FILENAME: &str = "podcast.mp3";
pub const SCRIPT_FILENAME: &str = "podcast-script.txt";

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("No artifact available to save")]
    NothingToSave,

    #[error("Audio is served remotely; fetch it from {url}")]
    RemoteAudio { url: String },

    #[error("No download directory available")]
    NoDownloadDir,

    #[error("Write failed: {0}")]
    Io(#[from] std::io::Error),
}

/// An owned in-memory audio blob. Creation and drop are tracked through a
/// shared counter so the at-most-one-live-handle invariant is observable.
#[derive(Debug)]
pub struct AudioHandle {
    id: u64,
    bytes: Vec<u8>,
    mime_type: String,
    live: Arc<AtomicUsize>,
}

impl AudioHandle {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Transient locator for the blob, the session-local analogue of an
    /// object URL. Valid only while the handle is live.
    pub fn locator(&self) -> String {
        format!("memory://audio/{}", self.id)
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Playable audio from a successful generation: bytes we own, or a URL the
/// service owns.
#[derive(Debug)]
pub enum AudioArtifact {
    Local(AudioHandle),
    Remote { url: String },
}

impl AudioArtifact {
    pub fn locator(&self) -> String {
        match self {
            AudioArtifact::Local(handle) => handle.locator(),
            AudioArtifact::Remote { url } => url.clone(),
        }
    }
}

/// Holds the artifacts of the most recent successful generation.
///
/// Installing a new result always releases the previous one first, so at
/// most one locally owned audio handle is ever live.
#[derive(Debug)]
pub struct ArtifactStore {
    audio: Option<AudioArtifact>,
    script: Option<String>,
    live: Arc<AtomicUsize>,
    next_id: AtomicU64,
    auto_save_script: bool,
    download_dir: Option<PathBuf>,
}

impl ArtifactStore {
    pub fn new(auto_save_script: bool, download_dir: Option<PathBuf>) -> Self {
        Self {
            audio: None,
            script: None,
            live: Arc::new(AtomicUsize::new(0)),
            next_id: AtomicU64::new(1),
            auto_save_script,
            download_dir,
        }
    }

    /// Wrap raw audio bytes in a tracked handle.
    pub fn new_local(&self, bytes: Vec<u8>, mime_type: impl Into<String>) -> AudioHandle {
        self.live.fetch_add(1, Ordering::Relaxed);
        AudioHandle {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            bytes,
            mime_type: mime_type.into(),
            live: self.live.clone(),
        }
    }

    /// Release the held artifacts. Dropping the audio handle releases its
    /// bytes and decrements the live count.
    pub fn clear(&mut self) {
        self.audio = None;
        self.script = None;
    }

    /// Replace the held artifacts with a new settlement. The previous
    /// audio handle is released before the new one is installed.
    pub fn install(&mut self, audio: Option<AudioArtifact>, script: Option<String>) {
        self.clear();
        self.audio = audio;
        self.script = script;

        if self.auto_save_script && self.script.is_some() {
            if let Err(e) = self.save_script(None) {
                warn!("automatic script save failed: {e}");
            }
        }
    }

    pub fn audio(&self) -> Option<&AudioArtifact> {
        self.audio.as_ref()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn live_handles(&self) -> usize {
        self.live.load(Ordering::Relaxed)
    }

    /// Save the held audio as `podcast.mp3`. Remote references are not
    /// downloaded here; the shell plays or fetches them by URL.
    pub fn save_audio(&self, dir: Option<&Path>) -> Result<PathBuf, ArtifactError> {
        let handle = match &self.audio {
            Some(AudioArtifact::Local(handle)) => handle,
            Some(AudioArtifact::Remote { url }) => {
                return Err(ArtifactError::RemoteAudio { url: url.clone() })
            }
            None => return Err(ArtifactError::NothingToSave),
        };

        let path = self.resolve_dir(dir)?.join(AUDIO_FILENAME);
        fs::write(&path, handle.bytes())?;
        Ok(path)
    }

    /// Save the held script as `podcast-script.txt`.
    pub fn save_script(&self, dir: Option<&Path>) -> Result<PathBuf, ArtifactError> {
        let script = self.script.as_deref().ok_or(ArtifactError::NothingToSave)?;

        let path = self.resolve_dir(dir)?.join(SCRIPT_FILENAME);
        // The byte buffer for the download exists only for this write.
        fs::write(&path, script.as_bytes())?;
        Ok(path)
    }

    fn resolve_dir(&self, dir: Option<&Path>) -> Result<PathBuf, ArtifactError> {
        if let Some(dir) = dir {
            return Ok(dir.to_path_buf());
        }
        if let Some(dir) = &self.download_dir {
            return Ok(dir.clone());
        }
        dirs::download_dir().ok_or(ArtifactError::NoDownloadDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn install_releases_previous_handle() {
        let mut store = ArtifactStore::new(false, None);

        let first = store.new_local(vec![1, 2, 3], "audio/mp3");
        store.install(Some(AudioArtifact::Local(first)), None);
        assert_eq!(store.live_handles(), 1);

        let second = store.new_local(vec![4, 5, 6], "audio/mp3");
        store.install(Some(AudioArtifact::Local(second)), None);
        assert_eq!(store.live_handles(), 1);

        store.clear();
        assert_eq!(store.live_handles(), 0);
    }

    #[test]
    fn locators_distinguish_local_and_remote() {
        let store = ArtifactStore::new(false, None);
        let handle = store.new_local(vec![0xff], "audio/mpeg");
        assert!(handle.locator().starts_with("memory://audio/"));

        let remote = AudioArtifact::Remote {
            url: "http://localhost:8000/audio/out.mp3".to_string(),
        };
        assert_eq!(remote.locator(), "http://localhost:8000/audio/out.mp3");
    }

    #[test]
    fn save_writes_fixed_filenames() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ArtifactStore::new(false, None);

        let handle = store.new_local(b"mp3 bytes".to_vec(), "audio/mp3");
        store.install(
            Some(AudioArtifact::Local(handle)),
            Some("SPEAKER 1: hello\nSPEAKER 2: hi".to_string()),
        );

        let audio_path = store.save_audio(Some(dir.path())).unwrap();
        assert_eq!(audio_path.file_name().unwrap(), AUDIO_FILENAME);
        assert_eq!(fs::read(&audio_path).unwrap(), b"mp3 bytes");

        let script_path = store.save_script(Some(dir.path())).unwrap();
        assert_eq!(script_path.file_name().unwrap(), SCRIPT_FILENAME);
        assert_eq!(
            fs::read_to_string(&script_path).unwrap(),
            "SPEAKER 1: hello\nSPEAKER 2: hi"
        );
    }

    #[test]
    fn remote_audio_is_not_saved_locally() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ArtifactStore::new(false, None);
        store.install(
            Some(AudioArtifact::Remote {
                url: "http://localhost:8000/audio/x.mp3".to_string(),
            }),
            None,
        );

        let err = store.save_audio(Some(dir.path())).unwrap_err();
        assert!(matches!(err, ArtifactError::RemoteAudio { .. }));
    }

    #[test]
    fn auto_save_writes_script_on_install() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ArtifactStore::new(true, Some(dir.path().to_path_buf()));

        store.install(None, Some("auto".to_string()));
        assert_eq!(
            fs::read_to_string(dir.path().join(SCRIPT_FILENAME)).unwrap(),
            "auto"
        );
    }
}
