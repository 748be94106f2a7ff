use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::{SyftError, SyftResult};
use crate::model::file::{FileContent, SelectedFile};

// ---------------------------------------------------------------------------
// Encoder trait: selected file -> transmittable payload
// ---------------------------------------------------------------------------

/// Turns a selected file into the string sent as `file_input`.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Read the whole file once and encode it. Read failures come back as
    /// [`SyftError::Encoding`].
    async fn encode(&self, file: &SelectedFile) -> SyftResult<String>;
}

/// Encodes files as `data:<mime>;base64,<bytes>` URIs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriEncoder;

#[async_trait]
impl Encoder for DataUriEncoder {
    async fn encode(&self, file: &SelectedFile) -> SyftResult<String> {
        let uri = match file.content() {
            FileContent::Memory(bytes) => to_data_uri(file.mime(), bytes),
            FileContent::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    SyftError::Encoding(format!("failed to read {}: {e}", path.display()))
                })?;
                to_data_uri(file.mime(), &bytes)
            }
        };

        tracing::debug!(
            file = file.name(),
            size_bytes = file.size_bytes(),
            encoded_len = uri.len(),
            "encoded file"
        );
        Ok(uri)
    }
}

/// Format raw bytes as a base64 data URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FailureKind;
    use std::io::Write;

    #[tokio::test]
    async fn test_encode_memory_content() {
        let file = SelectedFile::from_bytes("clip.mp3", b"hello".to_vec());
        let uri = DataUriEncoder.encode(&file).await.unwrap();
        assert_eq!(uri, "data:audio/mpeg;base64,aGVsbG8=");
    }

    #[tokio::test]
    async fn test_encode_is_idempotent() {
        let bytes: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let file = SelectedFile::from_bytes("clip.wav", bytes);
        let first = DataUriEncoder.encode(&file).await.unwrap();
        let second = DataUriEncoder.encode(&file).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_encode_reads_from_disk() {
        let mut tmp = tempfile::Builder::new().suffix(".ogg").tempfile().unwrap();
        tmp.write_all(b"OggS").unwrap();
        let file = SelectedFile::from_path(tmp.path(), 4);

        let uri = DataUriEncoder.encode(&file).await.unwrap();
        assert_eq!(uri, format!("data:{};base64,T2dnUw==", file.mime()));
    }

    #[tokio::test]
    async fn test_unreadable_file_is_an_encoding_failure() {
        let file = SelectedFile::from_path("/nonexistent/syft/clip.mp3", 2048);
        let err = DataUriEncoder.encode(&file).await.unwrap_err();
        assert!(matches!(err, SyftError::Encoding(_)));
        assert_eq!(err.kind(), FailureKind::EncodingFailure);
    }
}
