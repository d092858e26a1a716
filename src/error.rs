use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
    #[error("Environment variable fetching error: {0}")]
    EnvVarNotSet(#[from] dotenvy::Error),
    #[error("HTTP client error: {0}")]
    HttpRequest(#[from] reqwest::Error),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
    #[error("reading state file {}: {source}", path.display())]
    StateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state file {} is not valid hex: {source}", path.display())]
    StateDecode {
        path: PathBuf,
        #[source]
        source: hex::FromHexError,
    },
    #[error("writing state file {}: {source}", path.display())]
    StateWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("webhook returned status {0}")]
    NotifyStatus(StatusCode),
    #[error("webhook request failed: {0}")]
    NotifyTransport(#[source] reqwest::Error),
}

impl Error {
    pub fn selector(selector: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
