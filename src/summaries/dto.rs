use bytes::Bytes;
use serde::Serialize;

use crate::{ai::SummaryMode, ingest::FileType};

/// File part of the upload form, fully buffered (bounded by the size limit).
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

/// Raw multipart fields as received.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub summary_mode: Option<String>,
}

/// Upload that passed validation and is ready for extraction.
#[derive(Debug)]
pub struct ValidatedUpload {
    pub file: UploadedFile,
    pub file_type: FileType,
    pub mode: SummaryMode,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
