use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::{ai::SummarizerError, ingest::IngestError};

/// Body returned by every endpoint on failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("file exceeds {limit} bytes")]
    OversizedFile { limit: usize },
    #[error("document has no extractable text: {0}")]
    EmptyDocument(String),
    #[error("document could not be parsed: {0}")]
    CorruptDocument(String),
    #[error("summarization is not configured")]
    SummarizationUnavailable,
    #[error("upstream failure: {0}")]
    Upstream(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedFormat(_)
            | AppError::OversizedFile { .. }
            | AppError::EmptyDocument(_)
            | AppError::CorruptDocument(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::SummarizationUnavailable
            | AppError::Upstream(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AppError::OversizedFile { .. } => "OVERSIZED_FILE",
            AppError::EmptyDocument(_) => "EMPTY_DOCUMENT",
            AppError::CorruptDocument(_) => "CORRUPT_DOCUMENT",
            AppError::SummarizationUnavailable => "SUMMARIZATION_UNAVAILABLE",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message shown to the end user.
    fn user_message(&self) -> String {
        match self {
            AppError::UnsupportedFormat(msg)
            | AppError::EmptyDocument(msg)
            | AppError::CorruptDocument(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Unauthorized(msg) => msg.clone(),
            AppError::OversizedFile { limit } => format!(
                "파일 크기가 너무 큽니다. 최대 {}까지 업로드할 수 있습니다.",
                human_size(*limit)
            ),
            AppError::SummarizationUnavailable => {
                "요약 서비스가 설정되지 않았습니다. 관리자에게 문의해주세요.".into()
            }
            AppError::Upstream(_) => "문서 요약 중 오류가 발생했습니다.".into(),
            AppError::Internal(_) => "서버 내부 오류가 발생했습니다.".into(),
        }
    }
}

/// `10MB`, `1.5MB`, `512KB` or `900B`.
fn human_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * 1024;
    if bytes >= MB {
        let (whole, tenth) = (bytes / MB, (bytes % MB) * 10 / MB);
        if tenth == 0 {
            format!("{whole}MB")
        } else {
            format!("{whole}.{tenth}MB")
        }
    } else if bytes >= KB {
        format!("{}KB", bytes / KB)
    } else {
        format!("{bytes}B")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, code = self.code(), "request failed");
        }
        let body = ErrorBody {
            code: self.code(),
            message: self.user_message(),
        };
        (status, Json(body)).into_response()
    }
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::UnsupportedFormat(msg) => AppError::UnsupportedFormat(msg),
            IngestError::EmptyDocument(msg) => AppError::EmptyDocument(msg),
            IngestError::CorruptDocument(msg) => AppError::CorruptDocument(msg),
        }
    }
}

impl From<SummarizerError> for AppError {
    fn from(e: SummarizerError) -> Self {
        match e {
            SummarizerError::Unavailable => AppError::SummarizationUnavailable,
            SummarizerError::Upstream(msg) => AppError::Upstream(msg),
        }
    }
}
