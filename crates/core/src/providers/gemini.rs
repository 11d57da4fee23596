use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::{debug, error, warn};

use crate::errors::CoreError;
use crate::models::candidate::Candidate;
use crate::models::settings::Settings;
use super::traits::TransactionExtractor;

const PROVIDER: &str = "Gemini";

/// Google Gemini extractor for bank and credit card statements.
///
/// - **Endpoint**: `POST {base}/models/{model}:generateContent`
/// - **Auth**: API key in the `x-goog-api-key` header
/// - **Output**: JSON mode (`responseMimeType: application/json`), a JSON
///   array of `{date, description, category, amount, type}` objects
///
/// One request per call. No retries; the client timeout is the only limit.
pub struct GeminiExtractor {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiExtractor {
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::with_timeout(api_key, model, base_url, 120)
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::with_timeout(
            settings.gemini_api_key.clone(),
            settings.gemini_model.clone(),
            settings.gemini_base_url.clone(),
            settings.request_timeout_secs,
        )
    }

    fn with_timeout(
        api_key: Option<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        #[cfg_attr(target_arch = "wasm32", allow(unused_variables))] timeout_secs: u64,
    ) -> Self {
        let base_url: String = base_url.into();
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(timeout_secs));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            api_key,
            model: model.into(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

// ── Gemini API request/response types ───────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: Option<ResponseContent>,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl TransactionExtractor for GeminiExtractor {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn extract(&self, text: &str) -> Result<Vec<Candidate>, CoreError> {
        let api_key = self.api_key.as_deref().ok_or(CoreError::MissingApiKey)?;

        let prompt = build_prompt(text);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: &prompt }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        };
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!(model = %self.model, chars = text.len(), "Requesting transaction extraction");

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let detail = resp.text().await.unwrap_or_default();
            error!(%status, "Gemini request failed");
            return Err(CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("HTTP {status}: {}", detail.trim()),
            });
        }

        let response: GenerateResponse = resp.json().await.map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to parse response: {e}"),
        })?;

        parse_response_text(&response.text())
    }
}

fn fence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)^```(\w*)?\s*\n?(.*?)\n?\s*```$").expect("invalid fence regex"))
}

/// Remove a surrounding markdown code fence, if any.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match fence().captures(trimmed).and_then(|c| c.get(2)) {
        Some(inner) if !inner.as_str().is_empty() => inner.as_str().trim(),
        _ => trimmed,
    }
}

/// Parse the model's text output into raw candidates.
///
/// Unparseable text ⇒ `InvalidExtractionResponse`; valid JSON that is not
/// an array ⇒ `NotAList`.
pub fn parse_response_text(raw: &str) -> Result<Vec<Candidate>, CoreError> {
    let json = strip_code_fence(raw);
    let parsed: Value = serde_json::from_str(json).map_err(|e| {
        error!(error = %e, payload = %json, "Problematic JSON string received from AI");
        CoreError::InvalidExtractionResponse(e.to_string())
    })?;

    match parsed {
        Value::Array(items) => Ok(items),
        other => {
            warn!(payload = %other, "Gemini response is not a JSON array");
            Err(CoreError::NotAList)
        }
    }
}

/// Extraction prompt sent along with the statement text.
pub fn build_prompt(statement_text: &str) -> String {
    format!(
        r#"You are an expert financial assistant. Analyze the following text extracted from a bank or credit card statement and extract all financial transactions.
For each transaction, provide:
1. date: The date of the transaction in YYYY-MM-DD format. Infer the year from the statement period if it is mentioned. If only month and day are present, use the inferred year. If no year can be inferred, use the current year.
2. description: A concise description of the transaction, as a valid JSON string.
3. category: A relevant category (e.g., Groceries, Transportation, Utilities, Dining Out, Shopping, Travel, Health, Entertainment, Services, Credit Card Payment, Salary, Investment, Refund, Other). If unsure, use "Other".
4. amount: The transaction amount as a positive JSON number (e.g., 123.45), without currency symbols or thousands separators.
5. type: Either "income" or "expense".
   - Credit card statements: purchases and cash advances are "expense"; payments to the card and merchant refunds are "income" (payments use the category "Credit Card Payment").
   - Bank statements: deposits and incoming transfers are "income"; withdrawals, payments and outgoing transfers are "expense".

Return STRICTLY a JSON array of objects shaped like:
{{ "date": "YYYY-MM-DD", "description": "string", "category": "string", "amount": number, "type": "income" | "expense" }}

If no transactions can be reliably extracted, or the text is not a financial statement, return an empty array [].
Do not include any text outside of the JSON array.

Statement Text:
---
{statement_text}
---
"#
    )
}
