mod gemini;
mod summarizer;

pub use gemini::GeminiSummarizer;
pub use summarizer::{truncate_chars, Summarizer, SummarizerError, SummaryMode};
