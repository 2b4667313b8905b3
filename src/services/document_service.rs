use std::sync::Arc;

use crate::errors::{AppResult, DocumentError};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Pulls raw text out of a document that already passed the cheap checks.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Result<String, DocumentError>;
}

pub struct PdfTextExtractor;

impl TextExtractor for PdfTextExtractor {
    fn extract(&self, bytes: &[u8]) -> Result<String, DocumentError> {
        pdf_extract::extract_text_from_mem(bytes).map_err(|e| DocumentError::Unreadable(e.to_string()))
    }
}

/// Turns uploaded PDF bytes into plain study text.
#[derive(Clone)]
pub struct DocumentService {
    max_bytes: usize,
    extractor: Arc<dyn TextExtractor>,
}

impl DocumentService {
    pub fn new(max_bytes: usize) -> Self {
        Self::with_extractor(max_bytes, Arc::new(PdfTextExtractor))
    }

    pub fn with_extractor(max_bytes: usize, extractor: Arc<dyn TextExtractor>) -> Self {
        Self {
            max_bytes,
            extractor,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Cheap checks that need no parsing.
    pub fn check(&self, bytes: &[u8]) -> Result<(), DocumentError> {
        if bytes.is_empty() {
            return Err(DocumentError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(DocumentError::TooLarge {
                limit: self.max_bytes,
            });
        }
        if !bytes.starts_with(PDF_MAGIC) {
            return Err(DocumentError::Unsupported);
        }
        Ok(())
    }

    pub async fn extract_text(&self, bytes: Vec<u8>) -> AppResult<String> {
        self.check(&bytes)?;

        // Extraction is CPU bound and can panic on broken files.
        let extractor = self.extractor.clone();
        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| DocumentError::Unreadable(format!("extraction aborted: {}", e)))??;

        let text = normalize_text(&extracted);
        if text.is_empty() {
            return Err(DocumentError::Empty.into());
        }

        log::info!("Extracted {} characters of study text", text.chars().count());
        Ok(text)
    }
}

/// Turns page breaks into paragraph gaps and drops trailing whitespace.
fn normalize_text(raw: &str) -> String {
    raw.replace('\x0c', "\n\n")
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AppError;

    #[test]
    fn test_check_rejects_non_pdf() {
        let service = DocumentService::new(1024);

        assert_eq!(service.check(b"hello"), Err(DocumentError::Unsupported));
    }

    #[test]
    fn test_check_rejects_oversized() {
        let service = DocumentService::new(8);

        assert_eq!(
            service.check(b"%PDF-1.7 and more"),
            Err(DocumentError::TooLarge { limit: 8 })
        );
    }

    #[test]
    fn test_check_rejects_empty() {
        let service = DocumentService::new(8);

        assert_eq!(service.check(b""), Err(DocumentError::Empty));
    }

    #[tokio::test]
    async fn test_truncated_pdf_is_unreadable() {
        let service = DocumentService::new(1024);
        let result = service.extract_text(b"%PDF-1.4\n%broken".to_vec()).await;

        assert!(matches!(
            result,
            Err(AppError::Document(DocumentError::Unreadable(_)))
        ));
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("  \n a  \x0cb \n\n"), "a\n\nb");
    }

    #[test]
    fn test_page_break_becomes_paragraph_gap() {
        assert_eq!(
            normalize_text("Chlorophyll absorbs light.\x0cThe Calvin cycle fixes carbon."),
            "Chlorophyll absorbs light.\n\nThe Calvin cycle fixes carbon."
        );
    }

    struct FixedText(&'static str);

    impl TextExtractor for FixedText {
        fn extract(&self, _bytes: &[u8]) -> Result<String, DocumentError> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn test_extracted_text_is_normalized() {
        let service = DocumentService::with_extractor(1024, Arc::new(FixedText(" one \x0ctwo ")));
        let text = service.extract_text(b"%PDF-1.4".to_vec()).await.expect("text");

        assert_eq!(text, "one\n\ntwo");
    }

    #[tokio::test]
    async fn test_whitespace_only_text_is_empty() {
        let service = DocumentService::with_extractor(1024, Arc::new(FixedText(" \x0c \n")));
        let result = service.extract_text(b"%PDF-1.4".to_vec()).await;

        assert!(matches!(result, Err(AppError::Document(DocumentError::Empty))));
    }
}
