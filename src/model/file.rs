use std::path::{Path, PathBuf};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// SelectedFile: the blob a user dropped or picked
// ---------------------------------------------------------------------------

/// Where the bytes of a selected file live.
#[derive(Debug, Clone)]
pub enum FileContent {
    /// Bytes already held in memory (drag-and-drop, tests).
    Memory(Arc<[u8]>),
    /// A file on disk, read lazily by the encoder.
    Path(PathBuf),
}

/// Handle to a user-chosen audio/video file.
///
/// A new pick replaces the whole value; it is never edited in place, so the
/// fields are only reachable through accessors.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    size_bytes: u64,
    mime: String,
    content: FileContent,
}

impl SelectedFile {
    /// Wrap bytes held in memory. The content type is guessed from `name`.
    pub fn from_bytes(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let name = name.into();
        let bytes: Vec<u8> = bytes.into();
        let bytes: Arc<[u8]> = bytes.into();
        Self {
            mime: guess_mime(&name),
            size_bytes: bytes.len() as u64,
            content: FileContent::Memory(bytes),
            name,
        }
    }

    /// Refer to a file on disk whose size has already been read by the picker.
    pub fn from_path(path: impl Into<PathBuf>, size_bytes: u64) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            mime: guess_mime(&name),
            size_bytes,
            content: FileContent::Path(path),
            name,
        }
    }

    /// Override the guessed content type.
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = mime.into();
        self
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Content type, e.g. `audio/mpeg`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }

    /// On-disk location, if the content is not held in memory.
    pub fn path(&self) -> Option<&Path> {
        match &self.content {
            FileContent::Path(p) => Some(p),
            FileContent::Memory(_) => None,
        }
    }
}

fn guess_mime(name: &str) -> String {
    mime_guess::from_path(name)
        .first_raw()
        .unwrap_or("application/octet-stream")
        .to_string()
}
