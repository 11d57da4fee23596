use thiserror::Error;

/// Unified error type for the entire finance-tracker-core library.
/// Every fallible public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Storage ─────────────────────────────────────────────────────
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    // ── File I/O (native only) ──────────────────────────────────────
    #[error("File I/O error: {0}")]
    FileIO(String),

    // ── Validation ──────────────────────────────────────────────────
    #[error("{0}")]
    ValidationError(String),

    /// All line errors of a pasted statement. The batch is rejected as a whole.
    #[error("Error parsing manually entered data:\n{}", .0.join("\n"))]
    StatementParse(Vec<String>),

    #[error("No data to import. Please upload a PDF or paste transaction data.")]
    NoImportData,

    // ── Statement import stages ─────────────────────────────────────
    #[error("Failed to read statement file: {0}")]
    FileRead(String),

    #[error("Failed to read PDF content: {0}.")]
    TextExtraction(String),

    #[error("PDF text extraction resulted in empty content. Cannot process with AI.")]
    EmptyStatementText,

    // ── AI extraction / Network ─────────────────────────────────────
    #[error("AI processing is unavailable: no API key configured")]
    MissingApiKey,

    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("AI processing failed: could not parse the response: {0}")]
    InvalidExtractionResponse(String),

    #[error("AI failed to return a valid list of transactions. The format was incorrect.")]
    NotAList,

    // ── Export ──────────────────────────────────────────────────────
    #[error("Export failed: {0}")]
    Export(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::Export(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Request URLs may carry credentials in the query; keep them out of messages.
        CoreError::Network(redact_query(&e.to_string()))
    }
}

/// Strip everything after the first `?` so URLs never leak query secrets.
pub(crate) fn redact_query(msg: &str) -> String {
    match msg.find('?') {
        Some(idx) => format!("{}?<query redacted>", &msg[..idx]),
        None => msg.to_string(),
    }
}
