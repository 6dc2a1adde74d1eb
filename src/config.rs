use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use actix_web::cookie::Key;
use anyhow::{anyhow, bail, Context, Result};

use crate::constants::{
    DEFAULT_ADMIN_PASSWORD, DEFAULT_BLOB_DIR, DEFAULT_DATABASE_URL, DEFAULT_HOST,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Records and blobs live in process memory.
    Memory,
    /// Records in SQLite, blob content on disk.
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "sqlite" => Ok(StorageBackend::Sqlite),
            other => bail!("unknown storage backend {:?}, expected \"memory\" or \"sqlite\"", other),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub admin_password: String,
    pub storage: StorageBackend,
    pub database_url: String,
    pub blob_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub session_key: Key,
    pub cookie_secure: bool,
}

impl Config {
    /// Reads the process environment (after `.env`, if present).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let session_key = match lookup("SESSION_KEY") {
            Some(raw) => Key::try_from(raw.as_bytes())
                .map_err(|e| anyhow!("SESSION_KEY must be at least 64 bytes: {}", e))?,
            None => {
                log::warn!("SESSION_KEY not set, using a random key; admin sessions end on restart");
                Key::generate()
            }
        };

        Ok(Self {
            host: var("HOST", DEFAULT_HOST),
            port: parse("PORT", lookup("PORT"), DEFAULT_PORT)?,
            admin_password: var("ADMIN_PASSWORD", DEFAULT_ADMIN_PASSWORD),
            storage: parse("STORAGE_BACKEND", lookup("STORAGE_BACKEND"), StorageBackend::Memory)?,
            database_url: var("DATABASE_URL", DEFAULT_DATABASE_URL),
            blob_dir: PathBuf::from(var("BLOB_DIR", DEFAULT_BLOB_DIR)),
            max_upload_bytes: parse("MAX_UPLOAD_BYTES", lookup("MAX_UPLOAD_BYTES"), DEFAULT_MAX_UPLOAD_BYTES)?,
            session_key,
            cookie_secure: parse("COOKIE_SECURE", lookup("COOKIE_SECURE"), false)?,
        })
    }

    pub fn bind_addr(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| anyhow!("{}", e))
            .with_context(|| format!("invalid value {:?} for {}", raw, name)),
    }
}
