//! Turns an uploaded file into plain text plus a display title.
//!
//! Dispatch is by extension first and declared content type second. PDF
//! extraction runs on the blocking pool; HWP is recognized but has no parser.

mod pdf;
mod title;

#[cfg(test)]
pub(crate) mod fixtures;

use std::{fmt, path::Path, str::FromStr};

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

pub use title::derive_title;

const PDF_MIME: &str = "application/pdf";
const HWP_MIMES: &[&str] = &[
    "application/x-hwp",
    "application/haansofthwp",
    "application/vnd.hancom.hwp",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IngestError {
    #[error("{0}")]
    UnsupportedFormat(String),
    #[error("{0}")]
    EmptyDocument(String),
    #[error("{0}")]
    CorruptDocument(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Pdf,
    Hwp,
}

impl FileType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Pdf => "pdf",
            FileType::Hwp => "hwp",
        }
    }

    /// Works out the format from the original filename and the declared mime type.
    pub fn detect(filename: &str, content_type: Option<&str>) -> Result<Self, IngestError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        let mime = content_type
            .map(|ct| ct.split(';').next().unwrap_or(ct).trim().to_ascii_lowercase());

        match (ext.as_deref(), mime.as_deref()) {
            (Some("pdf"), _) => Ok(FileType::Pdf),
            (Some("hwp"), _) => Ok(FileType::Hwp),
            (_, Some(PDF_MIME)) => Ok(FileType::Pdf),
            (_, Some(m)) if HWP_MIMES.contains(&m) => Ok(FileType::Hwp),
            _ => Err(IngestError::UnsupportedFormat(
                "PDF 또는 HWP 파일만 업로드할 수 있습니다.".into(),
            )),
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pdf" => Ok(FileType::Pdf),
            "hwp" => Ok(FileType::Hwp),
            other => anyhow::bail!("unknown file type {other:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub text: String,
    pub title: String,
}

/// Extracts text from an already classified upload.
#[instrument(skip(bytes), fields(size = bytes.len()))]
pub async fn extract(
    bytes: Bytes,
    filename: &str,
    file_type: FileType,
) -> Result<ExtractedDocument, IngestError> {
    let text = match file_type {
        FileType::Pdf => pdf::extract_text(bytes).await?,
        FileType::Hwp => {
            return Err(IngestError::UnsupportedFormat(
                "HWP 파일 처리가 지원되지 않습니다. PDF 파일을 사용해주세요.".into(),
            ))
        }
    };
    let title = derive_title(&text, filename);
    debug!(chars = text.chars().count(), %title, "document extracted");
    Ok(ExtractedDocument { text, title })
}
