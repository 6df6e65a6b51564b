use std::{net::SocketAddr, path::PathBuf};

use anyhow::{Context, Result, bail};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_JWT_TTL_DAYS: i64 = 7;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_UPLOAD_DIR: &str = "uploads";
pub const DEFAULT_CLOUDINARY_FOLDER: &str = "youtube_clone/avatars";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub auth: AuthConfig,
    pub upload_dir: PathBuf,
    pub cloudinary: Option<CloudinaryConfig>,
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub upload_preset: String,
    pub folder: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from a variable lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let port = match get("PORT") {
            Some(value) => value
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT is not a valid port: {value}"))?,
            None => DEFAULT_PORT,
        };

        let max_connections = match get("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS is invalid: {value}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let token_ttl_days = match get("JWT_TTL_DAYS") {
            Some(value) => value
                .trim()
                .parse::<i64>()
                .with_context(|| format!("JWT_TTL_DAYS is invalid: {value}"))?,
            None => DEFAULT_JWT_TTL_DAYS,
        };
        if token_ttl_days <= 0 {
            bail!("JWT_TTL_DAYS must be positive");
        }

        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|cost| (4..=31).contains(cost))
                .with_context(|| format!("BCRYPT_COST must be between 4 and 31: {value}"))?,
            None => bcrypt::DEFAULT_COST,
        };

        let jwt_secret = get("JWT_SECRET").context("JWT_SECRET must be set")?;

        let cloudinary = match (get("CLOUDINARY_CLOUD_NAME"), get("CLOUDINARY_UPLOAD_PRESET")) {
            (Some(cloud_name), Some(upload_preset)) => Some(CloudinaryConfig {
                cloud_name,
                upload_preset,
                folder: get("CLOUDINARY_FOLDER")
                    .unwrap_or_else(|| DEFAULT_CLOUDINARY_FOLDER.to_string()),
            }),
            (None, None) => None,
            _ => bail!("CLOUDINARY_CLOUD_NAME and CLOUDINARY_UPLOAD_PRESET must be set together"),
        };

        Ok(Self {
            host: get("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            database_url: get("DATABASE_URL"),
            max_connections,
            auth: AuthConfig {
                jwt_secret,
                token_ttl_days,
                bcrypt_cost,
            },
            upload_dir: get("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_DIR)),
            cloudinary,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
