use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::{ai::SummaryMode, ingest::FileType};

#[derive(Debug, FromRow)]
pub struct SummaryRow {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub filename: String,
    pub file_type: String,
    pub summary_mode: String,
    pub original_content: String,
    pub summary_content: String,
    pub created_at: OffsetDateTime,
}

/// Persisted summary. Never updated after insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub id: i64,
    pub user_id: String,
    pub title: String,
    pub filename: String,
    pub file_type: FileType,
    pub summary_mode: SummaryMode,
    pub original_content: String,
    pub summary_content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<SummaryRow> for Summary {
    type Error = anyhow::Error;

    fn try_from(r: SummaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            filename: r.filename,
            file_type: r.file_type.parse()?,
            summary_mode: r.summary_mode.parse()?,
            original_content: r.original_content,
            summary_content: r.summary_content,
            created_at: r.created_at,
        })
    }
}

/// Insert payload; id and created_at are assigned by the database.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSummary {
    pub user_id: String,
    pub title: String,
    pub filename: String,
    pub file_type: FileType,
    pub summary_mode: SummaryMode,
    pub original_content: String,
    pub summary_content: String,
}
