use serde::{Deserialize, Serialize};

/// Key under which the serialized transaction list is stored.
pub const DEFAULT_STORAGE_KEY: &str = "financeTrackerTransactions";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Runtime configuration for the tracker and its statement extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Key-value store key holding the transaction list.
    pub storage_key: String,

    /// Gemini API key. AI import is unavailable without it.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    pub gemini_model: String,

    pub gemini_base_url: String,

    /// HTTP timeout for the extraction call, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl Settings {
    /// Defaults overridden by environment variables:
    /// `API_KEY` (or `GEMINI_API_KEY`), `GEMINI_MODEL`, `FINANCE_TRACKER_STORAGE_KEY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`Settings::from_env`] with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
        let mut settings = Self::default();

        settings.gemini_api_key = non_empty("API_KEY").or_else(|| non_empty("GEMINI_API_KEY"));
        if let Some(model) = non_empty("GEMINI_MODEL") {
            settings.gemini_model = model;
        }
        if let Some(key) = non_empty("FINANCE_TRACKER_STORAGE_KEY") {
            settings.storage_key = key;
        }
        settings
    }
}
