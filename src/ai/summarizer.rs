use std::{fmt, str::FromStr};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub(super) const SYSTEM_INSTRUCTION: &str =
    "당신은 전문적인 문서 요약 전문가입니다. 한국어로 명확하고 구조화된 요약을 제공해주세요.";

const BASIC_INSTRUCTION: &str = "다음 문서의 핵심 내용을 간단하고 명료하게 요약해주세요. \
주요 포인트들을 불릿 포인트 형태로 정리하고, 전체적인 결론을 제시해주세요:";

const DETAILED_INSTRUCTION: &str = "다음 문서의 내용을 자세하고 포괄적으로 요약해주세요. \
주요 섹션별로 구분하여 설명하고, 세부적인 내용과 중요한 데이터, 결론을 포함해주세요:";

pub(super) const TEMPERATURE: f32 = 0.3;

#[derive(Debug, Error)]
pub enum SummarizerError {
    /// No API credential configured.
    #[error("summarization provider is not configured")]
    Unavailable,
    #[error("summarization provider failed: {0}")]
    Upstream(String),
}

/// Caller-selected verbosity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryMode {
    Basic,
    Detailed,
}

impl SummaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMode::Basic => "basic",
            SummaryMode::Detailed => "detailed",
        }
    }

    /// Characters of document text sent upstream.
    pub fn input_char_limit(&self) -> usize {
        match self {
            SummaryMode::Basic => 10_000,
            SummaryMode::Detailed => 15_000,
        }
    }

    pub fn max_output_tokens(&self) -> u32 {
        match self {
            SummaryMode::Basic => 500,
            SummaryMode::Detailed => 1_500,
        }
    }

    fn instruction(&self) -> &'static str {
        match self {
            SummaryMode::Basic => BASIC_INSTRUCTION,
            SummaryMode::Detailed => DETAILED_INSTRUCTION,
        }
    }
}

impl fmt::Display for SummaryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SummaryMode {
    type Err = anyhow::Error;

    /// Exact, case-sensitive match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(SummaryMode::Basic),
            "detailed" => Ok(SummaryMode::Detailed),
            other => anyhow::bail!("unknown summary mode {other:?}"),
        }
    }
}

/// Fully assembled prompt, ready for any provider.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizeRequest {
    pub system_instruction: &'static str,
    pub prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

impl SummarizeRequest {
    pub fn new(text: &str, mode: SummaryMode) -> Self {
        let body = truncate_chars(text, mode.input_char_limit());
        Self {
            system_instruction: SYSTEM_INSTRUCTION,
            prompt: format!("{}\n\n{}", mode.instruction(), body),
            max_output_tokens: mode.max_output_tokens(),
            temperature: TEMPERATURE,
        }
    }
}

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str, mode: SummaryMode) -> Result<String, SummarizerError>;
}

/// Prefix of at most `max` characters, cut on a char boundary.
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
