use anyhow::Context;
use sqlx::PgPool;

use super::repo_types::{NewSummary, Summary, SummaryRow};

const COLUMNS: &str = "id, user_id, title, filename, file_type, summary_mode, \
                       original_content, summary_content, created_at";

pub async fn insert(db: &PgPool, s: &NewSummary) -> anyhow::Result<Summary> {
    let row = sqlx::query_as::<_, SummaryRow>(&format!(
        r#"
        INSERT INTO summaries
            (user_id, title, filename, file_type, summary_mode, original_content, summary_content)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING {COLUMNS}
        "#
    ))
    .bind(&s.user_id)
    .bind(&s.title)
    .bind(&s.filename)
    .bind(s.file_type.as_str())
    .bind(s.summary_mode.as_str())
    .bind(&s.original_content)
    .bind(&s.summary_content)
    .fetch_one(db)
    .await
    .context("insert summary")?;
    row.try_into()
}

pub async fn list_by_user(db: &PgPool, user_id: &str) -> anyhow::Result<Vec<Summary>> {
    let rows = sqlx::query_as::<_, SummaryRow>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM summaries
         WHERE user_id = $1
         ORDER BY created_at DESC, id DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .context("list summaries by user")?;
    rows.into_iter().map(Summary::try_from).collect()
}

/// Scoped by owner: a foreign id behaves exactly like a missing one.
pub async fn get_for_user(db: &PgPool, id: i64, user_id: &str) -> anyhow::Result<Option<Summary>> {
    let row = sqlx::query_as::<_, SummaryRow>(&format!(
        r#"
        SELECT {COLUMNS}
          FROM summaries
         WHERE id = $1 AND user_id = $2
        "#
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
    .context("get summary")?;
    row.map(Summary::try_from).transpose()
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete_for_user(db: &PgPool, id: i64, user_id: &str) -> anyhow::Result<u64> {
    let res = sqlx::query(
        r#"
        DELETE FROM summaries
         WHERE id = $1 AND user_id = $2
        "#,
    )
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await
    .context("delete summary")?;
    Ok(res.rows_affected())
}
