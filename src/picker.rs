use std::path::Path;

use crate::config::PickerConfig;
use crate::error::{SyftError, SyftResult};
use crate::model::file::SelectedFile;

pub const EMPTY_LABEL: &str = "Drag 'n' drop a file, or click to get started";

// ---------------------------------------------------------------------------
// AcceptFilter: `audio/*,video/*` style accept lists
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum AcceptRule {
    /// `audio/*`
    TopLevel(String),
    /// `audio/mpeg`
    Exact(String),
    /// `.mp3`
    Extension(String),
}

/// Parsed accept list. An empty list accepts everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptFilter {
    rules: Vec<AcceptRule>,
}

impl AcceptFilter {
    pub fn parse(accept: &str) -> Self {
        let rules = accept
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| {
                if let Some(ext) = s.strip_prefix('.') {
                    AcceptRule::Extension(ext.to_string())
                } else if let Some(top) = s.strip_suffix("/*") {
                    AcceptRule::TopLevel(top.to_string())
                } else {
                    AcceptRule::Exact(s)
                }
            })
            .collect();
        Self { rules }
    }

    pub fn accepts(&self, file: &SelectedFile) -> bool {
        if self.rules.is_empty() {
            return true;
        }
        let mime = file.mime().to_ascii_lowercase();
        let top = mime.split('/').next().unwrap_or_default();
        let ext = Path::new(file.name())
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());

        self.rules.iter().any(|rule| match rule {
            AcceptRule::TopLevel(t) => t == top,
            AcceptRule::Exact(m) => *m == mime,
            AcceptRule::Extension(e) => ext.as_deref() == Some(e.as_str()),
        })
    }
}

// ---------------------------------------------------------------------------
// FilePicker: the boundary a file crosses before the controller sees it
// ---------------------------------------------------------------------------

/// What the drop zone reports to the view.
#[derive(Debug, Clone)]
pub struct PickerState<'a> {
    pub file: Option<&'a SelectedFile>,
    pub is_drag_active: bool,
}

/// Single-file drop zone with a type filter and a size bound.
///
/// Files that fail either check are rejected here and never reach the
/// encoder.
#[derive(Debug, Clone)]
pub struct FilePicker {
    accept: AcceptFilter,
    max_size_bytes: u64,
    drag_active: bool,
    file: Option<SelectedFile>,
}

impl FilePicker {
    pub fn new(accept: &str, max_size_bytes: u64) -> Self {
        Self {
            accept: AcceptFilter::parse(accept),
            max_size_bytes,
            drag_active: false,
            file: None,
        }
    }

    pub fn from_config(config: &PickerConfig) -> Self {
        Self::new(&config.accept, config.max_size_bytes)
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }

    /// Validate a file against the type filter and the size bound.
    pub fn check(&self, file: &SelectedFile) -> SyftResult<()> {
        if !self.accept.accepts(file) {
            return Err(SyftError::Rejected(format!(
                "{} has unsupported type {}",
                file.name(),
                file.mime()
            )));
        }
        if file.size_bytes() > self.max_size_bytes {
            return Err(SyftError::Rejected(format!(
                "{} is {} bytes, limit is {}",
                file.name(),
                file.size_bytes(),
                self.max_size_bytes
            )));
        }
        Ok(())
    }

    /// Accept a dropped file. A rejected drop keeps the previous selection.
    pub fn drop_file(&mut self, file: SelectedFile) -> SyftResult<SelectedFile> {
        self.drag_active = false;
        if let Err(err) = self.check(&file) {
            tracing::warn!(file = file.name(), error = %err, "rejected dropped file");
            return Err(err);
        }
        self.file = Some(file.clone());
        Ok(file)
    }

    /// Pick a file from disk. Only metadata is read here; the bytes are read
    /// by the encoder on submit.
    pub async fn pick_path(&mut self, path: impl AsRef<Path>) -> SyftResult<SelectedFile> {
        let path = path.as_ref();
        let meta = tokio::fs::metadata(path).await?;
        if !meta.is_file() {
            return Err(SyftError::Rejected(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        self.drop_file(SelectedFile::from_path(path, meta.len()))
    }

    pub fn state(&self) -> PickerState<'_> {
        PickerState {
            file: self.file.as_ref(),
            is_drag_active: self.drag_active,
        }
    }

    /// Text shown inside the drop zone.
    pub fn label(&self) -> String {
        match &self.file {
            Some(file) => file.name().to_string(),
            None => EMPTY_LABEL.to_string(),
        }
    }

    /// Forget the current selection (start over).
    pub fn clear(&mut self) {
        self.file = None;
        self.drag_active = false;
    }
}

impl Default for FilePicker {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_ACCEPT,
            crate::config::DEFAULT_MAX_SIZE_BYTES,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_audio_and_video() {
        let filter = AcceptFilter::parse("audio/*,video/*");
        assert!(filter.accepts(&SelectedFile::from_bytes("a.mp3", b"".to_vec())));
        assert!(filter.accepts(&SelectedFile::from_bytes("b.mp4", b"".to_vec())));
        assert!(!filter.accepts(&SelectedFile::from_bytes("c.pdf", b"".to_vec())));
        assert!(!filter.accepts(&SelectedFile::from_bytes("d", b"".to_vec())));
    }

    #[test]
    fn test_exact_and_extension_rules() {
        let filter = AcceptFilter::parse("audio/wav, .FLAC");
        let wav = SelectedFile::from_bytes("x.bin", b"".to_vec()).with_mime("audio/wav");
        assert!(filter.accepts(&wav));
        assert!(filter.accepts(&SelectedFile::from_bytes("song.flac", b"".to_vec())));
        assert!(!filter.accepts(&SelectedFile::from_bytes("song.mp3", b"".to_vec())));
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = AcceptFilter::parse("");
        assert!(filter.accepts(&SelectedFile::from_bytes("notes.txt", b"".to_vec())));
    }

    #[test]
    fn test_oversize_file_is_rejected() {
        let mut picker = FilePicker::new("audio/*", 4);
        let err = picker
            .drop_file(SelectedFile::from_bytes("clip.mp3", vec![0u8; 5]))
            .unwrap_err();
        assert!(matches!(err, SyftError::Rejected(_)));
        assert!(picker.state().file.is_none());
    }

    #[test]
    fn test_rejected_drop_keeps_previous_selection() {
        let mut picker = FilePicker::default();
        picker.drop_file(SelectedFile::from_bytes("clip.mp3", vec![1u8, 2])).unwrap();
        picker.drag_enter();
        assert!(picker.state().is_drag_active);

        assert!(picker.drop_file(SelectedFile::from_bytes("doc.pdf", b"".to_vec())).is_err());
        assert_eq!(picker.label(), "clip.mp3");
        assert!(!picker.state().is_drag_active);
    }

    #[test]
    fn test_label_and_clear() {
        let mut picker = FilePicker::default();
        assert_eq!(picker.label(), EMPTY_LABEL);
        picker.drop_file(SelectedFile::from_bytes("clip.mp3", vec![1u8])).unwrap();
        assert_eq!(picker.label(), "clip.mp3");
        picker.clear();
        assert_eq!(picker.label(), EMPTY_LABEL);
    }

    #[tokio::test]
    async fn test_pick_path_reads_size() {
        let tmp = tempfile::Builder::new().suffix(".wav").tempfile().unwrap();
        std::fs::write(tmp.path(), vec![0u8; 16]).unwrap();

        let mut picker = FilePicker::default();
        let file = picker.pick_path(tmp.path()).await.unwrap();
        assert_eq!(file.size_bytes(), 16);
        assert_eq!(file.path(), Some(tmp.path()));
    }

    #[tokio::test]
    async fn test_pick_missing_path_fails() {
        let mut picker = FilePicker::default();
        let err = picker.pick_path("/nonexistent/clip.mp3").await.unwrap_err();
        assert!(matches!(err, SyftError::Io(_)));
    }
}
