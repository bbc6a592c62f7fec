use sqlx::PgPool;

use crate::auth::repo_types::{UpsertUser, User};

impl User {
    /// Find a user by provider id.
    pub async fn find_by_id(db: &PgPool, id: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, first_name, last_name, profile_image_url, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Insert the id alone if missing. An existing profile is left as is.
    pub async fn ensure_exists(db: &PgPool, id: &str) -> anyhow::Result<()> {
        sqlx::query("INSERT INTO users (id) VALUES ($1) ON CONFLICT (id) DO NOTHING")
            .bind(id)
            .execute(db)
            .await?;
        Ok(())
    }

    /// Insert or refresh a user keyed on id. Claims missing from the token
    /// keep their stored value.
    pub async fn upsert(db: &PgPool, u: &UpsertUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
               SET email = COALESCE(EXCLUDED.email, users.email),
                   first_name = COALESCE(EXCLUDED.first_name, users.first_name),
                   last_name = COALESCE(EXCLUDED.last_name, users.last_name),
                   profile_image_url = COALESCE(EXCLUDED.profile_image_url, users.profile_image_url),
                   updated_at = now()
            RETURNING id, email, first_name, last_name, profile_image_url, created_at, updated_at
            "#,
        )
        .bind(&u.id)
        .bind(&u.email)
        .bind(&u.first_name)
        .bind(&u.last_name)
        .bind(&u.profile_image_url)
        .fetch_one(db)
        .await?;
        Ok(user)
    }
}
