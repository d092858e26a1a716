use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use url::Url;

use crate::error::Error;

pub const DEFAULT_WEBHOOK_BASE_URL: &str = "https://maker.ifttt.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const WEBHOOK_EVENT_VAR: &str = "GABRIEL_WEBHOOK_EVENT";
const WEBHOOK_KEY_VAR: &str = "GABRIEL_WEBHOOK_KEY";

#[derive(Debug, Deserialize)]
pub struct Config {
    pub target: Target,
    pub webhook: WebhookConfig,
    pub state: StateConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// The page fragment being watched.
#[derive(Debug, Clone, Deserialize)]
pub struct Target {
    pub url: String,
    pub selector: String,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookConfig {
    #[serde(default)]
    pub event_name: String,
    #[serde(default)]
    pub key: String,
    #[serde(default = "default_webhook_base_url")]
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
pub struct StateConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

fn default_webhook_base_url() -> String {
    DEFAULT_WEBHOOK_BASE_URL.to_string()
}

/// Flat layout of the older `config.json` files.
///
/// Those files were read with case-insensitive key matching, so the usual
/// spellings of each key are accepted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LegacyConfig {
    #[serde(alias = "sumFilePath", alias = "sumfilepath", alias = "SUMFILEPATH")]
    sum_file_path: PathBuf,
    #[serde(default, alias = "token", alias = "TOKEN")]
    token: String,
    #[serde(default, alias = "eventName", alias = "eventname", alias = "EVENTNAME")]
    event_name: String,
    #[serde(alias = "URL", alias = "url")]
    url: String,
    #[serde(alias = "selector", alias = "SELECTOR")]
    selector: String,
    #[serde(default, alias = "userAgent", alias = "useragent", alias = "USERAGENT")]
    user_agent: Option<String>,
}

impl From<LegacyConfig> for Config {
    fn from(legacy: LegacyConfig) -> Self {
        Self {
            target: Target {
                url: legacy.url,
                selector: legacy.selector,
                user_agent: legacy.user_agent,
            },
            webhook: WebhookConfig {
                event_name: legacy.event_name,
                key: legacy.token,
                base_url: default_webhook_base_url(),
            },
            state: StateConfig {
                path: legacy.sum_file_path,
            },
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Default location: `<config dir>/gabriel/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gabriel").join("config.toml"))
    }

    /// Reads a TOML config, or the legacy flat JSON layout for `.json` files.
    ///
    /// Webhook secrets left out of the file are taken from
    /// `GABRIEL_WEBHOOK_EVENT` and `GABRIEL_WEBHOOK_KEY` (a `.env` file works too).
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, a secret is missing
    /// everywhere, or a URL is malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, Error> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let mut config: Config = if is_json {
            serde_json::from_str::<LegacyConfig>(&content)?.into()
        } else {
            toml::from_str(&content)?
        };

        // if the webhook secrets are not set use env with dotenvy
        if config.webhook.event_name.is_empty() {
            config.webhook.event_name = dotenvy::var(WEBHOOK_EVENT_VAR)?;
        }
        if config.webhook.key.is_empty() {
            config.webhook.key = dotenvy::var(WEBHOOK_KEY_VAR)?;
        }

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Error> {
        Url::parse(&self.target.url)?;
        Url::parse(&self.webhook.base_url)?;
        if self.target.selector.trim().is_empty() {
            return Err(Error::config("target selector is empty"));
        }
        if self.webhook.event_name.is_empty() || self.webhook.key.is_empty() {
            return Err(Error::config("webhook event name and key must not be empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::config("http timeout must be at least one second"));
        }
        Ok(())
    }
}
