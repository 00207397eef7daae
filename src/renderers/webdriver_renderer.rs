use async_trait::async_trait;
use fantoccini::{wd::TimeoutConfiguration, Client, ClientBuilder, Locator};
use log::{debug, info, warn};
use serde_json::{json, Map, Value as JsonValue};
use std::time::Duration;
use url::Url;

use crate::renderers::{PageRenderer, RenderRequest, RendererInitConfig, WaitTarget};
use crate::utils::{
    config::DEFAULT_WEBDRIVER_URL,
    error::{BotError, BotResult, RenderError},
};

/// Extra time the client waits past the session page-load limit before it
/// gives up on the driver answering
const NAVIGATION_GRACE: Duration = Duration::from_secs(5);

/// Renders pages in a headless browser driven over WebDriver.
///
/// Every render opens a fresh browser session and closes it afterwards, so
/// concurrent invocations never share page state.
pub struct WebDriverRenderer {
    webdriver_url: Option<String>,
    headless: bool,
    user_agent: Option<String>,
    connected: bool,
}

impl WebDriverRenderer {
    /// Create a new, unconnected WebDriver renderer
    pub fn new() -> Self {
        Self {
            webdriver_url: None,
            headless: true,
            user_agent: None,
            connected: false,
        }
    }

    /// Browser capabilities requested for every session
    pub fn capabilities(&self) -> Map<String, JsonValue> {
        let mut chrome_args: Vec<String> = Vec::new();
        let mut firefox_args: Vec<String> = Vec::new();
        let mut firefox_prefs = Map::new();

        if self.headless {
            chrome_args.extend(["--headless=new", "--disable-gpu", "--no-sandbox"].map(String::from));
            firefox_args.push("-headless".to_string());
        }
        if let Some(user_agent) = &self.user_agent {
            chrome_args.push(format!("--user-agent={}", user_agent));
            firefox_prefs.insert(
                "general.useragent.override".to_string(),
                JsonValue::String(user_agent.clone()),
            );
        }

        let mut capabilities = Map::new();
        if !chrome_args.is_empty() {
            capabilities.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
        }
        if !firefox_args.is_empty() || !firefox_prefs.is_empty() {
            capabilities.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": firefox_args, "prefs": firefox_prefs }),
            );
        }
        capabilities
    }

    async fn open_session(&self) -> BotResult<Client> {
        let url = self
            .webdriver_url
            .as_deref()
            .ok_or(RenderError::NotConnected)?;

        ClientBuilder::native()
            .capabilities(self.capabilities())
            .connect(url)
            .await
            .map_err(|e| RenderError::SessionFailed(e.to_string()).into())
    }

    async fn load(client: &Client, request: &RenderRequest) -> BotResult<String> {
        client
            .update_timeouts(session_timeouts(request))
            .await
            .map_err(|e| RenderError::SessionFailed(format!("Failed to set timeouts: {}", e)))?;

        let deadline = request.page_load_timeout + NAVIGATION_GRACE;
        match tokio::time::timeout(deadline, client.goto(&request.url)).await {
            Err(_) => {
                return Err(RenderError::Timeout {
                    target: request.url.clone(),
                    seconds: request.page_load_timeout.as_secs(),
                }
                .into())
            }
            Ok(Err(e)) => {
                return Err(RenderError::NavigationFailed {
                    url: request.url.clone(),
                    reason: e.to_string(),
                }
                .into())
            }
            Ok(Ok(())) => {}
        }

        let xpath;
        let locator = match &request.wait_for {
            WaitTarget::Css(selector) => Locator::Css(selector.as_str()),
            WaitTarget::ExactText(text) => {
                xpath = exact_text_xpath(text);
                Locator::XPath(xpath.as_str())
            }
        };

        if let Err(e) = client
            .wait()
            .at_most(request.element_timeout)
            .for_element(locator)
            .await
        {
            debug!("Wait for {} on {} failed: {}", request.wait_for.describe(), request.url, e);
            return Err(RenderError::Timeout {
                target: request.wait_for.describe(),
                seconds: request.element_timeout.as_secs(),
            }
            .into());
        }

        client
            .source()
            .await
            .map_err(|e| RenderError::SourceUnavailable(e.to_string()).into())
    }
}

impl Default for WebDriverRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Session timeouts for a request. The driver aborts a navigation at the
/// page-load limit, so the session is free again for `close`.
pub fn session_timeouts(request: &RenderRequest) -> TimeoutConfiguration {
    TimeoutConfiguration::new(None, Some(request.page_load_timeout), None)
}

/// XPath matching any element whose own text equals `text`, ignoring
/// surrounding whitespace
pub fn exact_text_xpath(text: &str) -> String {
    format!("//*[text()[normalize-space(.)={}]]", xpath_literal(text))
}

/// XPath string literal for `text`. XPath 1.0 has no escapes, so text with
/// both quote kinds is spliced together with `concat()`.
fn xpath_literal(text: &str) -> String {
    if !text.contains('\'') {
        return format!("'{}'", text);
    }
    if !text.contains('"') {
        return format!("\"{}\"", text);
    }

    let pieces: Vec<String> = text
        .split('\'')
        .map(|piece| format!("'{}'", piece))
        .collect();
    format!("concat({})", pieces.join(", \"'\", "))
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn connect(&mut self, config: RendererInitConfig) -> BotResult<()> {
        let url = config
            .webdriver_url
            .unwrap_or_else(|| DEFAULT_WEBDRIVER_URL.to_string());
        Url::parse(&url).map_err(|e| {
            BotError::Configuration(format!("Invalid WebDriver URL '{}': {}", url, e))
        })?;

        self.webdriver_url = Some(url);
        self.headless = config.headless;
        self.user_agent = config.user_agent;

        // Probe once so a missing driver fails at startup instead of on the first command
        let probe = self.open_session().await?;
        if let Err(e) = probe.close().await {
            warn!("Failed to close WebDriver probe session: {}", e);
        }

        self.connected = true;
        info!(
            "WebDriver renderer ready at {}",
            self.webdriver_url.as_deref().unwrap_or_default()
        );
        Ok(())
    }

    async fn render(&self, request: RenderRequest) -> BotResult<String> {
        if !self.connected {
            return Err(RenderError::NotConnected.into());
        }

        debug!("Rendering {} (waiting for {})", request.url, request.wait_for.describe());
        let client = self.open_session().await?;
        let result = Self::load(&client, &request).await;

        if let Err(e) = client.close().await {
            warn!("Failed to close browser session for {}: {}", request.url, e);
        }

        result
    }

    async fn disconnect(&mut self) -> BotResult<()> {
        self.connected = false;
        Ok(())
    }

    fn renderer_name(&self) -> &'static str {
        "webdriver"
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn executes_javascript(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webdriver_renderer_creation() {
        let renderer = WebDriverRenderer::new();

        assert!(!renderer.is_connected());
        assert!(renderer.executes_javascript());
        assert_eq!(renderer.renderer_name(), "webdriver");
    }

    #[test]
    fn test_headless_capabilities() {
        let renderer = WebDriverRenderer::new();
        let capabilities = renderer.capabilities();

        let chrome_args = &capabilities["goog:chromeOptions"]["args"];
        assert!(chrome_args
            .as_array()
            .unwrap()
            .iter()
            .any(|a| a == "--headless=new"));
        assert!(capabilities.contains_key("moz:firefoxOptions"));
    }

    #[test]
    fn test_user_agent_capabilities() {
        let mut renderer = WebDriverRenderer::new();
        renderer.headless = false;
        assert!(renderer.capabilities().is_empty());

        renderer.user_agent = Some("liveprices-test/1.0".to_string());
        let capabilities = renderer.capabilities();

        assert_eq!(
            capabilities["goog:chromeOptions"]["args"],
            json!(["--user-agent=liveprices-test/1.0"])
        );
        assert_eq!(
            capabilities["moz:firefoxOptions"]["prefs"]["general.useragent.override"],
            "liveprices-test/1.0"
        );
    }

    #[test]
    fn test_session_timeouts_carry_page_load_limit() {
        let request = RenderRequest::new("https://example.com", WaitTarget::css("h1"));
        let timeouts = session_timeouts(&request);

        assert_eq!(timeouts.page_load(), Some(Duration::from_secs(60)));
        assert_eq!(timeouts.script(), None);
        assert_eq!(timeouts.implicit(), None);
    }

    #[test]
    fn test_exact_text_xpath() {
        assert_eq!(
            exact_text_xpath("Best Buy"),
            "//*[text()[normalize-space(.)='Best Buy']]"
        );
        assert_eq!(
            exact_text_xpath("Player's Page"),
            "//*[text()[normalize-space(.)=\"Player's Page\"]]"
        );
        assert_eq!(
            exact_text_xpath(r#"O'Neil "Big" Cruz"#),
            r#"//*[text()[normalize-space(.)=concat('O', "'", 'Neil "Big" Cruz')]]"#
        );
    }

    #[tokio::test]
    async fn test_render_requires_connect() {
        let renderer = WebDriverRenderer::new();
        let request = RenderRequest::new("https://example.com", WaitTarget::css("h1"));

        match renderer.render(request).await {
            Err(BotError::Render(RenderError::NotConnected)) => {}
            other => panic!("Expected NotConnected, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_url() {
        let mut renderer = WebDriverRenderer::new();
        let config = RendererInitConfig::new().with_webdriver_url("::not a url::");

        let result = renderer.connect(config).await;
        assert!(matches!(result, Err(BotError::Configuration(_))));
        assert!(!renderer.is_connected());
    }
}
