use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub s3: S3Settings,
    pub email: EmailSettings,
    pub jobs: JobSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: Vec<String>,
    pub guest_email: Option<String>,
    pub guest_password: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub name: String,
    pub max_pool_size: Option<u32>,
    pub min_pool_size: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    pub access_token_ttl_secs: u64,
    pub issuer: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct S3Settings {
    pub endpoint: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub region: String,
    /// TTL for presigned GET URLs handed out to clients (48h by default).
    pub presign_ttl_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailSettings {
    /// HTTP endpoint of the transactional mail API. Empty disables delivery
    /// (sends are logged and dropped).
    pub api_url: String,
    pub api_key: String,
    pub sender: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JobSettings {
    pub url_refresh_enabled: bool,
    pub url_refresh_cron: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .prefix("TASKWISE"),
            )
            .set_default("app.host", "0.0.0.0")?
            .set_default("app.port", 8080)?
            .set_default("app.cors_origins", Vec::<String>::new())?
            .set_default("app.guest_email", None::<String>)?
            .set_default("app.guest_password", None::<String>)?
            .set_default("database.url", "mongodb://localhost:27017")?
            .set_default("database.name", "taskwise")?
            .set_default("jwt.secret", "change-me-in-production")?
            .set_default("jwt.access_token_ttl_secs", 3600)?
            .set_default("jwt.issuer", "taskwise")?
            .set_default("s3.endpoint", "http://localhost:9000")?
            .set_default("s3.access_key", "minioadmin")?
            .set_default("s3.secret_key", "minioadmin")?
            .set_default("s3.bucket", "taskwise")?
            .set_default("s3.region", "us-east-1")?
            .set_default("s3.presign_ttl_secs", 172_800)?
            .set_default("email.api_url", "")?
            .set_default("email.api_key", "")?
            .set_default("email.sender", "noreply@taskwise.local")?
            .set_default("jobs.url_refresh_enabled", false)?
            .set_default("jobs.url_refresh_cron", "0 0 0 * * *")?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::load().expect("Failed to load default settings")
    }
}
