use actix_web::cookie::Key;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
    #[error("SECRET_KEY must be at least 32 bytes long")]
    ShortSecret,
}

/// Runtime settings, read from the process environment (and `.env`).
#[derive(Clone)]
pub struct EnvConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Signs and encrypts the session and remember-me cookies.
    pub secret_key: Key,
    pub static_dir: PathBuf,
    pub cookie_secure: bool,
    pub bcrypt_cost: u32,
}

impl EnvConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let secret_key = match lookup("SECRET_KEY") {
            Some(secret) if secret.len() < MIN_SECRET_LEN => return Err(ConfigError::ShortSecret),
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => {
                log::warn!("SECRET_KEY not set, generating a random key; sessions will not survive a restart");
                Key::generate()
            }
        };

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        Ok(EnvConfig {
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8000)?,
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "sqlite://site.db".to_string()),
            secret_key,
            static_dir: lookup("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("static")),
            cookie_secure: parse_or(&lookup, "COOKIE_SECURE", false)?,
            bcrypt_cost,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn profile_pics_dir(&self) -> PathBuf {
        self.static_dir.join("profile_pics")
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&'static str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}
