use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::utils::error::{BotError, BotResult};

/// Maximum time a page navigation may take
pub const PAGE_LOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum time to wait for the expected element after navigation
pub const ELEMENT_WAIT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_COMMAND_PREFIX: &str = "!";
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

pub const TOKEN_VAR: &str = "DISCORD_TOKEN";
pub const PREFIX_VAR: &str = "COMMAND_PREFIX";
pub const RENDERER_VAR: &str = "LIVEPRICES_RENDERER";
pub const WEBDRIVER_URL_VAR: &str = "WEBDRIVER_URL";
pub const HEADLESS_VAR: &str = "LIVEPRICES_HEADLESS";
pub const USER_AGENT_VAR: &str = "LIVEPRICES_USER_AGENT";

/// Which page renderer backs the fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    /// Headless browser driven over WebDriver
    #[value(name = "webdriver")]
    WebDriver,
    /// Plain HTTP GET, no JavaScript
    Http,
}

impl std::fmt::Display for RendererKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RendererKind::WebDriver => write!(f, "webdriver"),
            RendererKind::Http => write!(f, "http"),
        }
    }
}

impl std::str::FromStr for RendererKind {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "webdriver" => Ok(RendererKind::WebDriver),
            "http" => Ok(RendererKind::Http),
            other => Err(BotError::Configuration(format!(
                "Unknown renderer '{}', expected 'webdriver' or 'http'",
                other
            ))),
        }
    }
}

/// Runtime configuration of the bot
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    #[serde(skip)]
    pub discord_token: Option<String>,
    pub command_prefix: String,
    pub renderer: RendererKind,
    pub webdriver_url: String,
    pub headless: bool,
    /// Sent with every page fetch; renderer default when unset
    pub user_agent: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            discord_token: None,
            command_prefix: DEFAULT_COMMAND_PREFIX.to_string(),
            renderer: RendererKind::WebDriver,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            user_agent: None,
        }
    }
}

impl BotConfig {
    /// Load `.env` if present, then read the process environment
    pub fn from_env() -> BotResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        config.discord_token = lookup(TOKEN_VAR).filter(|t| !t.trim().is_empty());

        if let Some(prefix) = lookup(PREFIX_VAR).filter(|p| !p.trim().is_empty()) {
            config.command_prefix = prefix.trim().to_string();
        }
        if let Some(renderer) = lookup(RENDERER_VAR) {
            config.renderer = renderer.parse()?;
        }
        if let Some(url) = lookup(WEBDRIVER_URL_VAR) {
            config.webdriver_url = url.trim().to_string();
        }
        if let Some(headless) = lookup(HEADLESS_VAR) {
            config.headless = parse_flag(&headless).ok_or_else(|| {
                BotError::Configuration(format!("{} must be true or false, got '{}'", HEADLESS_VAR, headless))
            })?;
        }

        config.user_agent = lookup(USER_AGENT_VAR)
            .map(|ua| ua.trim().to_string())
            .filter(|ua| !ua.is_empty());

        config.validate()?;
        Ok(config)
    }

    /// Check values that would only fail later at connect time
    pub fn validate(&self) -> BotResult<()> {
        Url::parse(&self.webdriver_url).map_err(|e| {
            BotError::Configuration(format!("Invalid WebDriver URL '{}': {}", self.webdriver_url, e))
        })?;
        if self.command_prefix.chars().any(char::is_whitespace) {
            return Err(BotError::Configuration(
                "Command prefix must not contain whitespace".to_string(),
            ));
        }
        Ok(())
    }

    /// The chat token; starting the bot without one is fatal
    pub fn require_token(&self) -> BotResult<&str> {
        self.discord_token
            .as_deref()
            .ok_or_else(|| BotError::Configuration(format!("{} is not set", TOKEN_VAR)))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
