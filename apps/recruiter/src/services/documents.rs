//! Resume text extraction from PDF or plain-text sources.

use std::path::Path;

use bytes::Bytes;
use tracing::debug;

use crate::errors::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    Text,
}

impl DocumentKind {
    /// Classifies by file name extension; anything that is not `.pdf` is read as text.
    pub fn from_file_name(name: &str) -> Self {
        let is_pdf = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            DocumentKind::Pdf
        } else {
            DocumentKind::Text
        }
    }
}

/// Extracts the text of an uploaded document held in memory.
pub async fn extract_text_from_bytes(file_name: &str, data: Bytes) -> Result<String, AppError> {
    match DocumentKind::from_file_name(file_name) {
        DocumentKind::Pdf => {
            let name = file_name.to_string();
            let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&data))
                .await
                .map_err(|e| AppError::Internal(e.into()))?
                .map_err(|e| AppError::Validation(format!("Could not read PDF '{name}': {e}")))?;
            debug!("Extracted {} chars from {file_name}", text.len());
            Ok(text)
        }
        DocumentKind::Text => String::from_utf8(data.to_vec()).map_err(|_| {
            AppError::Validation(format!("'{file_name}' is not valid UTF-8 text"))
        }),
    }
}

/// Reads a document from disk and extracts its text.
pub async fn extract_text_from_path(path: &Path) -> Result<String, AppError> {
    let data = Bytes::from(tokio::fs::read(path).await?);
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    extract_text_from_bytes(file_name, data).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_file_name() {
        assert_eq!(DocumentKind::from_file_name("cv.PDF"), DocumentKind::Pdf);
        assert_eq!(DocumentKind::from_file_name("cv.txt"), DocumentKind::Text);
        assert_eq!(DocumentKind::from_file_name("cv"), DocumentKind::Text);
    }

    #[tokio::test]
    async fn test_text_document_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jane.txt");
        std::fs::write(&path, "Jane Doe\nRust, Go").unwrap();

        let text = extract_text_from_path(&path).await.unwrap();
        assert_eq!(text, "Jane Doe\nRust, Go");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_a_validation_error() {
        let result = extract_text_from_bytes("bad.txt", Bytes::from_static(&[0xff, 0xfe, 0x00])).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
