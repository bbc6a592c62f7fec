use tracing::{info, instrument};

use super::{
    dto::{UploadForm, ValidatedUpload},
    repo_types::{NewSummary, Summary},
};
use crate::{
    ai::{truncate_chars, SummaryMode},
    auth::claims::Claims,
    error::AppError,
    ingest::{self, FileType},
    state::AppState,
};

/// Checks the form fields. Nothing is parsed or sent upstream yet.
pub fn validate_upload(form: UploadForm) -> Result<ValidatedUpload, AppError> {
    let file = form
        .file
        .ok_or_else(|| AppError::Validation("업로드된 파일이 없습니다.".into()))?;

    let mode = form
        .summary_mode
        .as_deref()
        .and_then(|m| m.parse::<SummaryMode>().ok())
        .ok_or_else(|| {
            AppError::Validation("요약 모드는 basic 또는 detailed 여야 합니다.".into())
        })?;

    let file_type = FileType::detect(&file.filename, file.content_type.as_deref())?;

    Ok(ValidatedUpload {
        file,
        file_type,
        mode,
    })
}

/// Extract, summarize, then persist in a single insert. Any failure leaves
/// no summary row behind.
#[instrument(skip(state, claims, upload), fields(user_id = %claims.sub, filename = %upload.file.filename, mode = %upload.mode))]
pub async fn create_summary(
    state: &AppState,
    claims: &Claims,
    upload: ValidatedUpload,
) -> Result<Summary, AppError> {
    let ValidatedUpload {
        file,
        file_type,
        mode,
    } = upload;

    // owner row must exist for the FK; the profile itself is synced by auth
    state.store.ensure_user(&claims.sub).await?;

    let doc = ingest::extract(file.bytes, &file.filename, file_type).await?;

    let summary_content = state.summarizer.summarize(&doc.text, mode).await?;

    let max_chars = state.config.upload.original_content_max_chars;
    let summary = state
        .store
        .create_summary(NewSummary {
            user_id: claims.sub.clone(),
            title: doc.title,
            filename: file.filename,
            file_type,
            summary_mode: mode,
            original_content: truncate_chars(&doc.text, max_chars).to_string(),
            summary_content,
        })
        .await?;

    info!(summary_id = summary.id, "summary created");
    Ok(summary)
}
