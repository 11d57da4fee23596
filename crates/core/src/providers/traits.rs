use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::candidate::Candidate;

/// Turns statement text into transaction candidates (the AI step).
///
/// Implementations return raw candidates; validation happens in the import
/// pipeline so every extractor is held to the same rules. Swap in a stub to
/// test without network access.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait TransactionExtractor: Send + Sync {
    /// Human-readable name of this extractor (for logs/errors).
    fn name(&self) -> &str;

    /// Extract candidates from plain statement text.
    ///
    /// Errors when the call fails or the response is not a JSON array.
    async fn extract(&self, text: &str) -> Result<Vec<Candidate>, CoreError>;
}

/// Extracts plain text from a PDF document. The PDF library itself lives
/// outside this crate.
pub trait PdfTextExtractor: Send + Sync {
    fn extract_text(&self, pdf_bytes: &[u8]) -> Result<String, CoreError>;
}
