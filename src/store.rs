use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    auth::repo_types::{UpsertUser, User},
    summaries::{
        repo,
        repo_types::{NewSummary, Summary},
    },
};

/// Persistence operations used by the handlers. Every summary operation is
/// scoped by the owning user's id.
#[async_trait]
pub trait Store: Send + Sync {
    async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>>;
    async fn upsert_user(&self, user: UpsertUser) -> anyhow::Result<User>;
    /// Creates a bare row for `id` if none exists; never touches the profile.
    async fn ensure_user(&self, id: &str) -> anyhow::Result<()>;

    async fn create_summary(&self, summary: NewSummary) -> anyhow::Result<Summary>;
    async fn list_summaries(&self, user_id: &str) -> anyhow::Result<Vec<Summary>>;
    async fn get_summary(&self, id: i64, user_id: &str) -> anyhow::Result<Option<Summary>>;
    /// Idempotent; returns how many rows were removed.
    async fn delete_summary(&self, id: i64, user_id: &str) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgStore {
    db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> anyhow::Result<()> {
        sqlx::migrate!("./migrations").run(&self.db).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>> {
        User::find_by_id(&self.db, id).await
    }

    async fn upsert_user(&self, user: UpsertUser) -> anyhow::Result<User> {
        User::upsert(&self.db, &user).await
    }

    async fn ensure_user(&self, id: &str) -> anyhow::Result<()> {
        User::ensure_exists(&self.db, id).await
    }

    async fn create_summary(&self, summary: NewSummary) -> anyhow::Result<Summary> {
        repo::insert(&self.db, &summary).await
    }

    async fn list_summaries(&self, user_id: &str) -> anyhow::Result<Vec<Summary>> {
        repo::list_by_user(&self.db, user_id).await
    }

    async fn get_summary(&self, id: i64, user_id: &str) -> anyhow::Result<Option<Summary>> {
        repo::get_for_user(&self.db, id, user_id).await
    }

    async fn delete_summary(&self, id: i64, user_id: &str) -> anyhow::Result<u64> {
        repo::delete_for_user(&self.db, id, user_id).await
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;

    use time::{Duration, OffsetDateTime};
    use tokio::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Tables {
        users: HashMap<String, User>,
        summaries: Vec<Summary>,
        next_id: i64,
        clock: Option<OffsetDateTime>,
    }

    /// In-process stand-in for Postgres with the same scoping rules.
    #[derive(Default)]
    pub struct MemoryStore {
        tables: Mutex<Tables>,
    }

    impl MemoryStore {
        pub async fn summary_count(&self) -> usize {
            self.tables.lock().await.summaries.len()
        }
    }

    impl Tables {
        /// Strictly increasing timestamps so ordering is deterministic.
        fn tick(&mut self) -> OffsetDateTime {
            let next = match self.clock {
                Some(t) => t + Duration::milliseconds(1),
                None => OffsetDateTime::now_utc(),
            };
            self.clock = Some(next);
            next
        }
    }

    #[async_trait]
    impl Store for MemoryStore {
        async fn get_user(&self, id: &str) -> anyhow::Result<Option<User>> {
            Ok(self.tables.lock().await.users.get(id).cloned())
        }

        async fn upsert_user(&self, u: UpsertUser) -> anyhow::Result<User> {
            let mut t = self.tables.lock().await;
            if let Some(email) = &u.email {
                anyhow::ensure!(
                    !t.users
                        .values()
                        .any(|o| o.id != u.id && o.email.as_ref() == Some(email)),
                    "unique violation: users.email"
                );
            }
            let now = t.tick();
            let prev = t.users.get(&u.id).cloned();
            let user = User {
                id: u.id.clone(),
                email: u.email.or_else(|| prev.as_ref().and_then(|p| p.email.clone())),
                first_name: u
                    .first_name
                    .or_else(|| prev.as_ref().and_then(|p| p.first_name.clone())),
                last_name: u
                    .last_name
                    .or_else(|| prev.as_ref().and_then(|p| p.last_name.clone())),
                profile_image_url: u
                    .profile_image_url
                    .or_else(|| prev.as_ref().and_then(|p| p.profile_image_url.clone())),
                created_at: prev.as_ref().map(|p| p.created_at).unwrap_or(now),
                updated_at: now,
            };
            t.users.insert(u.id, user.clone());
            Ok(user)
        }

        async fn ensure_user(&self, id: &str) -> anyhow::Result<()> {
            let mut t = self.tables.lock().await;
            if !t.users.contains_key(id) {
                let now = t.tick();
                t.users.insert(
                    id.to_string(),
                    User {
                        id: id.to_string(),
                        email: None,
                        first_name: None,
                        last_name: None,
                        profile_image_url: None,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
            Ok(())
        }

        async fn create_summary(&self, s: NewSummary) -> anyhow::Result<Summary> {
            let mut t = self.tables.lock().await;
            anyhow::ensure!(t.users.contains_key(&s.user_id), "foreign key violation: user_id");
            t.next_id += 1;
            let created_at = t.tick();
            let summary = Summary {
                id: t.next_id,
                user_id: s.user_id,
                title: s.title,
                filename: s.filename,
                file_type: s.file_type,
                summary_mode: s.summary_mode,
                original_content: s.original_content,
                summary_content: s.summary_content,
                created_at,
            };
            t.summaries.push(summary.clone());
            Ok(summary)
        }

        async fn list_summaries(&self, user_id: &str) -> anyhow::Result<Vec<Summary>> {
            let t = self.tables.lock().await;
            let mut out: Vec<Summary> = t
                .summaries
                .iter()
                .filter(|s| s.user_id == user_id)
                .cloned()
                .collect();
            out.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            Ok(out)
        }

        async fn get_summary(&self, id: i64, user_id: &str) -> anyhow::Result<Option<Summary>> {
            let t = self.tables.lock().await;
            Ok(t.summaries
                .iter()
                .find(|s| s.id == id && s.user_id == user_id)
                .cloned())
        }

        async fn delete_summary(&self, id: i64, user_id: &str) -> anyhow::Result<u64> {
            let mut t = self.tables.lock().await;
            let before = t.summaries.len();
            t.summaries.retain(|s| !(s.id == id && s.user_id == user_id));
            Ok((before - t.summaries.len()) as u64)
        }
    }
}
