use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_ORIGINAL_CONTENT_MAX_CHARS: usize = 100_000;

/// How incoming bearer tokens are verified.
#[derive(Debug, Clone, Deserialize)]
pub enum JwtVerifier {
    /// HS256 shared secret.
    Secret(String),
    /// RS256 public key of the identity provider (PEM).
    RsaPublicKey(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub verifier: JwtVerifier,
    pub issuer: String,
    pub audience: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    pub max_upload_bytes: usize,
    pub original_content_max_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt: JwtConfig,
    pub gemini: GeminiConfig,
    pub upload: UploadConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;

        let verifier = match (
            std::env::var("JWT_PUBLIC_KEY_PEM").ok(),
            std::env::var("JWT_SECRET").ok(),
        ) {
            (Some(pem), _) => JwtVerifier::RsaPublicKey(pem),
            (None, Some(secret)) => JwtVerifier::Secret(secret),
            (None, None) => anyhow::bail!("either JWT_PUBLIC_KEY_PEM or JWT_SECRET must be set"),
        };
        let jwt = JwtConfig {
            verifier,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "docsum-auth".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "docsum".into()),
        };

        let gemini = GeminiConfig {
            api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".into()),
            base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com".into()),
        };

        let upload = UploadConfig {
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            original_content_max_chars: env_parse("ORIGINAL_CONTENT_MAX_CHARS")
                .unwrap_or(DEFAULT_ORIGINAL_CONTENT_MAX_CHARS),
        };

        Ok(Self {
            database_url,
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(10),
            jwt,
            gemini,
            upload,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
