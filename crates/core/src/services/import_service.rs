use tracing::{error, info};

use crate::errors::CoreError;
use crate::models::candidate::validate_candidates;
use crate::models::transaction::NewTransaction;
use crate::providers::traits::{PdfTextExtractor, TransactionExtractor};

use super::statement_parser::StatementParser;

/// Outcome of an import attempt that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportOutcome {
    /// Validated transactions, ready to be added as one batch.
    Ready(Vec<NewTransaction>),
    /// The source was processed successfully but contained no transactions.
    NothingFound,
}

impl ImportOutcome {
    fn from_inputs(inputs: Vec<NewTransaction>) -> Self {
        if inputs.is_empty() {
            ImportOutcome::NothingFound
        } else {
            ImportOutcome::Ready(inputs)
        }
    }
}

/// Statement import pipeline: pasted text, or PDF → text → AI → validation.
///
/// Every stage fails at most once and aborts the import; nothing partial is
/// ever returned.
pub struct ImportService {
    parser: StatementParser,
}

impl ImportService {
    pub fn new() -> Self {
        Self {
            parser: StatementParser::new(),
        }
    }

    /// Import pasted `Date,Description,Category,Amount,Type` lines.
    ///
    /// All-or-nothing: a single bad line rejects the whole batch.
    pub fn import_pasted(&self, text: &str) -> Result<ImportOutcome, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::NoImportData);
        }

        let parsed = self.parser.parse(text);
        if parsed.has_errors() {
            return Err(CoreError::StatementParse(parsed.errors));
        }

        Ok(ImportOutcome::from_inputs(parsed.accepted))
    }

    /// Run already-extracted statement text through the AI extractor.
    pub async fn import_statement_text(
        &self,
        text: &str,
        extractor: &dyn TransactionExtractor,
    ) -> Result<ImportOutcome, CoreError> {
        if text.trim().is_empty() {
            return Err(CoreError::EmptyStatementText);
        }

        let candidates = extractor.extract(text).await.map_err(|e| {
            error!(extractor = extractor.name(), error = %e, "Error processing statement with AI");
            e
        })?;
        let inputs = validate_candidates(&candidates);
        info!(
            extractor = extractor.name(),
            candidates = candidates.len(),
            accepted = inputs.len(),
            "Statement extraction finished"
        );

        Ok(ImportOutcome::from_inputs(inputs))
    }

    /// PDF bytes → text → AI → validated transactions.
    pub async fn import_pdf_bytes(
        &self,
        pdf_bytes: &[u8],
        pdf: &dyn PdfTextExtractor,
        extractor: &dyn TransactionExtractor,
    ) -> Result<ImportOutcome, CoreError> {
        let text = pdf.extract_text(pdf_bytes).map_err(|e| {
            error!(error = %e, "Error extracting text from PDF");
            match e {
                CoreError::TextExtraction(_) => e,
                other => CoreError::TextExtraction(other.to_string()),
            }
        })?;

        self.import_statement_text(&text, extractor).await
    }

    /// Read a PDF from disk, then as [`ImportService::import_pdf_bytes`] (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub async fn import_pdf_file(
        &self,
        path: impl AsRef<std::path::Path>,
        pdf: &dyn PdfTextExtractor,
        extractor: &dyn TransactionExtractor,
    ) -> Result<ImportOutcome, CoreError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            error!(path = %path.display(), error = %e, "Error reading statement file");
            CoreError::FileRead(format!("{}: {e}", path.display()))
        })?;

        self.import_pdf_bytes(&bytes, pdf, extractor).await
    }
}

impl Default for ImportService {
    fn default() -> Self {
        Self::new()
    }
}
