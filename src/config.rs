// src/config.rs
use crate::error::ConfigError;
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const SESSION_FILE_NAME: &str = ".networth_session.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeout: Option<Duration>,
    pub log_level: LevelFilter,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("NETWORTH_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_file = match lookup("NETWORTH_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => match lookup("HOME") {
                Some(home) => PathBuf::from(home).join(SESSION_FILE_NAME),
                None => PathBuf::from(SESSION_FILE_NAME),
            },
        };

        let timeout = match lookup("NETWORTH_TIMEOUT_SECS") {
            Some(value) => {
                let secs: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidTimeout {
                    name: "NETWORTH_TIMEOUT_SECS",
                    value: value.clone(),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        let log_level = match lookup("NETWORTH_LOG") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidLogLevel {
                name: "NETWORTH_LOG",
                value: value.clone(),
            })?,
            None => LevelFilter::Info,
        };

        Ok(Config {
            api_url: api_url.trim_end_matches('/').to_string(),
            session_file,
            timeout,
            log_level,
        })
    }
}
