use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, warn};
use uuid::Uuid;

/// Case-sensitive suffix check on the uploaded filename. Returns the bare
/// extension used for the saved artifact, or `None` for anything else.
pub fn accepted_extension(filename: &str) -> Option<&'static str> {
    if filename.ends_with(".mp3") {
        Some("mp3")
    } else if filename.ends_with(".wav") {
        Some("wav")
    } else {
        None
    }
}

/// A saved upload that lives for one request only.
///
/// The file name carries a uuid so concurrent requests can never collide,
/// and the file is removed when the guard drops, on every exit path.
pub struct TransientAudio {
    path: PathBuf,
}

impl TransientAudio {
    pub fn save(bytes: &[u8], extension: &str) -> Result<Self> {
        let path =
            std::env::temp_dir().join(format!("mood-scribe-{}.{extension}", Uuid::new_v4()));
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to save upload to {}", path.display()))?;
        debug!(
            "Saved transient audio artifact: {} ({} bytes)",
            path.display(),
            bytes.len()
        );
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TransientAudio {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            warn!(
                "Failed to remove transient audio artifact {}: {e}",
                self.path.display()
            );
        } else {
            debug!("Removed transient audio artifact: {}", self.path.display());
        }
    }
}
