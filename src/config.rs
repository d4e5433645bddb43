use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 5000;

/// The only browser origin allowed to talk to the hub.
pub const ALLOWED_ORIGIN: &str = "http://localhost:5173";

/// Endpoint the chat client dials. Not configurable at runtime.
pub const HUB_ENDPOINT: &str = "ws://localhost:5000/ws";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a number between 0 and 65535, got {0:?}")]
    InvalidPort(String),
    #[error("HUB_TLS_CERT and HUB_TLS_KEY must be set together")]
    IncompleteTls,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPaths {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubConfig {
    pub port: u16,
    pub allowed_origin: String,
    pub tls: Option<TlsPaths>,
}

impl Default for HubConfig {
    fn default() -> Self {
        HubConfig {
            port: DEFAULT_PORT,
            allowed_origin: ALLOWED_ORIGIN.to_string(),
            tls: None,
        }
    }
}

impl HubConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) if !raw.trim().is_empty() => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw.clone()))?,
            _ => DEFAULT_PORT,
        };

        let tls = match (lookup("HUB_TLS_CERT"), lookup("HUB_TLS_KEY")) {
            (Some(cert), Some(key)) => Some(TlsPaths {
                cert_path: cert.into(),
                key_path: key.into(),
            }),
            (None, None) => None,
            _ => return Err(ConfigError::IncompleteTls),
        };

        Ok(HubConfig {
            port,
            tls,
            ..HubConfig::default()
        })
    }
}
