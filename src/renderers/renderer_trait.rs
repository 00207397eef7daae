use async_trait::async_trait;
use std::time::Duration;

use crate::engine::market_extractor::MarketDocument;
use crate::utils::{
    config::{ELEMENT_WAIT_TIMEOUT, PAGE_LOAD_TIMEOUT},
    error::BotResult,
};

/// What a renderer waits for before it hands back the page markup
#[derive(Debug, Clone, PartialEq)]
pub enum WaitTarget {
    /// Any element matching a CSS selector
    Css(String),
    /// An element whose own text is exactly this string
    ExactText(String),
}

impl WaitTarget {
    pub fn css(selector: &str) -> Self {
        WaitTarget::Css(selector.to_string())
    }

    pub fn exact_text(text: &str) -> Self {
        WaitTarget::ExactText(text.to_string())
    }

    /// Human readable form used in logs and timeout errors
    pub fn describe(&self) -> String {
        match self {
            WaitTarget::Css(selector) => format!("selector '{}'", selector),
            WaitTarget::ExactText(text) => format!("text \"{}\"", text),
        }
    }

    /// Check already-fetched markup for the target
    pub fn is_present_in(&self, markup: &str) -> bool {
        let document = MarketDocument::parse(markup);
        match self {
            WaitTarget::Css(selector) => document.has_selector(selector).unwrap_or(false),
            WaitTarget::ExactText(text) => document.has_text_node(text),
        }
    }
}

/// A single page fetch
#[derive(Debug, Clone, PartialEq)]
pub struct RenderRequest {
    pub url: String,
    pub wait_for: WaitTarget,
    pub page_load_timeout: Duration,
    pub element_timeout: Duration,
}

impl RenderRequest {
    /// Create a request with the fixed page-load and element-wait timeouts
    pub fn new(url: impl Into<String>, wait_for: WaitTarget) -> Self {
        Self {
            url: url.into(),
            wait_for,
            page_load_timeout: PAGE_LOAD_TIMEOUT,
            element_timeout: ELEMENT_WAIT_TIMEOUT,
        }
    }
}

/// Configuration for renderer initialization
#[derive(Debug, Clone)]
pub struct RendererInitConfig {
    pub webdriver_url: Option<String>,
    pub headless: bool,
    pub user_agent: Option<String>,
}

impl RendererInitConfig {
    /// Create a new renderer configuration
    pub fn new() -> Self {
        Self {
            webdriver_url: None,
            headless: true,
            user_agent: None,
        }
    }

    /// Set the WebDriver endpoint
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.webdriver_url = Some(url.to_string());
        self
    }

    /// Run the browser with or without a visible window
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = Some(user_agent.to_string());
        self
    }
}

impl Default for RendererInitConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Turns a URL into fully rendered page markup
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Prepare the renderer; called once at startup
    async fn connect(&mut self, config: RendererInitConfig) -> BotResult<()>;

    /// Load the page, wait for the target and return the document markup.
    /// Each call is attempted exactly once.
    async fn render(&self, request: RenderRequest) -> BotResult<String>;

    /// Release resources; called once at shutdown
    async fn disconnect(&mut self) -> BotResult<()>;

    /// Short name for logs
    fn renderer_name(&self) -> &'static str;

    /// Check if the renderer is ready to fetch
    fn is_connected(&self) -> bool;

    /// Whether pages are executed before their markup is returned
    fn executes_javascript(&self) -> bool;
}
