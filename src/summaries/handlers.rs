use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use bytes::BytesMut;
use tracing::{info, instrument, warn};

use super::{
    dto::{MessageResponse, UploadForm, UploadedFile},
    repo_types::Summary,
    services,
};
use crate::{auth::extractors::AuthUser, error::AppError, state::AppState};

/// Multipart framing allowance on top of the file size limit.
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/summaries", get(list_summaries))
        .route("/summaries/:id", get(get_summary).delete(delete_summary))
}

pub fn write_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/summaries", axum::routing::post(create_summary))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_add(FORM_OVERHEAD_BYTES),
        ))
}

#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn list_summaries(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Summary>>, AppError> {
    let summaries = state.store.list_summaries(user.id()).await?;
    Ok(Json(summaries))
}

#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn get_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Summary>, AppError> {
    let id = parse_id(&id)?;
    match state.store.get_summary(id, user.id()).await? {
        Some(summary) => Ok(Json(summary)),
        None => Err(AppError::NotFound("요약을 찾을 수 없습니다.".into())),
    }
}

/// POST /summaries (multipart)
/// Fields: `file` (pdf or hwp), `summaryMode` (`basic` | `detailed`); anything else is ignored.
#[instrument(skip(state, user, mp), fields(user_id = %user.id()))]
pub async fn create_summary(
    State(state): State<AppState>,
    user: AuthUser,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<Json<Summary>, AppError> {
    let mut mp = mp.map_err(|e| {
        warn!(error = %e, "multipart rejected");
        AppError::Validation("multipart/form-data 요청이어야 합니다.".into())
    })?;

    let limit = state.config.upload.max_upload_bytes;
    let form = read_form(&mut mp, limit).await?;
    let upload = services::validate_upload(form)?;

    // 5xx are logged once, in AppError::into_response
    let summary = services::create_summary(&state, &user.0, upload)
        .await
        .inspect_err(|e| {
            if !e.status().is_server_error() {
                warn!(error = %e, "upload rejected");
            }
        })?;

    Ok(Json(summary))
}

#[instrument(skip(state, user), fields(user_id = %user.id()))]
pub async fn delete_summary(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let id = parse_id(&id)?;
    let removed = state.store.delete_summary(id, user.id()).await?;
    info!(%id, removed, "delete_summary");
    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Summary deleted successfully",
        }),
    ))
}

fn parse_id(raw: &str) -> Result<i64, AppError> {
    raw.parse::<i64>()
        .map_err(|_| AppError::Validation("잘못된 요약 ID입니다.".into()))
}

async fn read_form(mp: &mut Multipart, limit: usize) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    while let Some(field) = mp.next_field().await.map_err(|e| multipart_error(e, limit))? {
        match field.name() {
            Some("file") if form.file.is_none() => {
                form.file = Some(read_file(field, limit).await?);
            }
            Some("summaryMode") => {
                let text = field.text().await.map_err(|e| multipart_error(e, limit))?;
                form.summary_mode = Some(text);
            }
            _ => {}
        }
    }
    Ok(form)
}

/// Buffers the file part, failing as soon as the running size passes `limit`.
async fn read_file(mut field: Field<'_>, limit: usize) -> Result<UploadedFile, AppError> {
    let filename = field.file_name().unwrap_or_default().to_string();
    let content_type = field.content_type().map(str::to_owned);

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await.map_err(|e| multipart_error(e, limit))? {
        if buf.len() + chunk.len() > limit {
            return Err(AppError::OversizedFile { limit });
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(UploadedFile {
        filename,
        content_type,
        bytes: buf.freeze(),
    })
}

fn multipart_error(e: MultipartError, limit: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::OversizedFile { limit }
    } else {
        warn!(error = %e, "malformed multipart body");
        AppError::Validation("잘못된 업로드 요청입니다.".into())
    }
}
