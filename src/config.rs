use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub secret: String,
    pub admin_ttl_minutes: i64,
    pub employee_ttl_minutes: i64,
    pub cookie_secure: bool,
}

/// Credentials for the external media host. Optional so the rest of the app
/// can run without them; the signature endpoint checks before signing.
#[derive(Debug, Clone, Deserialize)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub upload_folder: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub session: SessionConfig,
    pub cloudinary: Option<CloudinaryConfig>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let session = SessionConfig {
            secret: std::env::var("SESSION_SECRET")?,
            admin_ttl_minutes: std::env::var("SESSION_ADMIN_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 8),
            employee_ttl_minutes: std::env::var("SESSION_EMPLOYEE_TTL_MINUTES")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(60 * 24 * 30),
            cookie_secure: std::env::var("COOKIE_SECURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        };
        Ok(Self {
            database_url,
            session,
            cloudinary: Self::cloudinary_from_env(),
        })
    }

    fn cloudinary_from_env() -> Option<CloudinaryConfig> {
        let cloud_name = std::env::var("CLOUDINARY_CLOUD_NAME").ok()?;
        let api_key = std::env::var("CLOUDINARY_API_KEY").ok()?;
        let api_secret = std::env::var("CLOUDINARY_API_SECRET").ok()?;
        if cloud_name.trim().is_empty() || api_key.trim().is_empty() || api_secret.trim().is_empty()
        {
            return None;
        }
        Some(CloudinaryConfig {
            cloud_name,
            api_key,
            api_secret,
            upload_folder: std::env::var("CLOUDINARY_UPLOAD_FOLDER")
                .unwrap_or_else(|_| "work-images".into()),
        })
    }
}
