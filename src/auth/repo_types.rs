use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use super::claims::Claims;

/// User record in the database, synced from the identity provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,                        // provider subject
    pub email: Option<String>,             // unique when present
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields written on every login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertUser {
    pub id: String,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub profile_image_url: Option<String>,
}

impl From<&Claims> for UpsertUser {
    fn from(c: &Claims) -> Self {
        Self {
            id: c.sub.clone(),
            email: c.email.as_ref().map(|e| e.trim().to_lowercase()),
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            profile_image_url: c.profile_image_url.clone(),
        }
    }
}
