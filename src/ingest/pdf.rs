use bytes::Bytes;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::warn;

use super::IngestError;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Runs the page-aware extractor on the blocking pool.
///
/// `pdf-extract` can panic on malformed input; the panic surfaces as a
/// `JoinError` and is reported the same way as a parse error.
pub(super) async fn extract_text(bytes: Bytes) -> Result<String, IngestError> {
    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&bytes)
    })
    .await
    .map_err(|e| {
        warn!(error = %e, "pdf extractor panicked");
        corrupt()
    })?
    .map_err(|e| {
        warn!(error = ?e, "pdf extractor failed");
        corrupt()
    })?;

    if pages.is_empty() {
        return Err(IngestError::EmptyDocument(
            "PDF 파일에 텍스트가 없습니다.".into(),
        ));
    }

    assemble_pages(&pages).ok_or_else(|| {
        IngestError::EmptyDocument("PDF 파일에서 텍스트를 추출할 수 없습니다.".into())
    })
}

fn corrupt() -> IngestError {
    IngestError::CorruptDocument("PDF 파일을 읽을 수 없습니다.".into())
}

/// Collapses whitespace inside each line and drops blank lines.
fn normalize_page(raw: &str) -> String {
    raw.lines()
        .map(|line| WHITESPACE_RUN.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Joins non-empty pages with a blank line. `None` when nothing is left.
fn assemble_pages(pages: &[String]) -> Option<String> {
    let text = pages
        .iter()
        .map(|p| normalize_page(p))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n");
    (!text.is_empty()).then_some(text)
}
