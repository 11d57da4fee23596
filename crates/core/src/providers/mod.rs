pub mod traits;

// Extractor implementations
pub mod gemini;
