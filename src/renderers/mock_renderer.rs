use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use crate::renderers::{PageRenderer, RenderRequest, RendererInitConfig};
use crate::utils::error::{BotResult, RenderError};

/// Renderer serving canned pages from memory, for tests and offline runs.
///
/// Unknown URLs behave like a page whose wait target never appears.
#[derive(Debug)]
pub struct MockRenderer {
    connected: bool,
    pages: HashMap<String, String>,
    failing_urls: HashSet<String>,
    requests: Mutex<Vec<RenderRequest>>,
    render_delay_ms: u64,
}

impl MockRenderer {
    /// Create an empty mock renderer
    pub fn new() -> Self {
        Self {
            connected: false,
            pages: HashMap::new(),
            failing_urls: HashSet::new(),
            requests: Mutex::new(Vec::new()),
            render_delay_ms: 0,
        }
    }

    /// Create a mock renderer that sleeps before every render
    pub fn with_delay(delay_ms: u64) -> Self {
        let mut renderer = Self::new();
        renderer.render_delay_ms = delay_ms;
        renderer
    }

    /// Serve `markup` for `url`
    pub fn with_page(mut self, url: &str, markup: &str) -> Self {
        self.add_page(url, markup);
        self
    }

    /// Fail every render of `url` with a navigation error
    pub fn with_failure(mut self, url: &str) -> Self {
        self.failing_urls.insert(url.to_string());
        self
    }

    pub fn add_page(&mut self, url: &str, markup: &str) {
        self.pages.insert(url.to_string(), markup.to_string());
    }

    /// URLs requested so far, in request order
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.iter().map(|r| r.url.clone()).collect())
            .unwrap_or_default()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Markup of a market movers page with one table row per `(name, buy, sell)`
    pub fn market_page(rows: &[(&str, &str, &str)]) -> String {
        let body: String = rows
            .iter()
            .map(|(name, buy, sell)| {
                format!(
                    "<tr><td><a href=\"#\">{}</a></td><td>{}</td><td>{}</td><td>+3%</td></tr>",
                    name, buy, sell
                )
            })
            .collect();

        format!(
            "<html><body><table class=\"market-trends\">\
             <thead><tr><th>Name</th><th>Buy</th><th>Sell</th><th>Change</th></tr></thead>\
             <tbody>{}</tbody></table></body></html>",
            body
        )
    }

    /// Markup of a player page showing the given best buy/sell prices
    pub fn player_page(best_buy: &str, best_sell: &str) -> String {
        format!(
            "<html><body><section id=\"market\">\
             <div class=\"stat\"><span>Best Buy</span><div><h3> {} </h3></div></div>\
             <div class=\"stat\"><span>Best Sell</span><div><h3> {} </h3></div></div>\
             </section></body></html>",
            best_buy, best_sell
        )
    }
}

impl Default for MockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRenderer for MockRenderer {
    async fn connect(&mut self, _config: RendererInitConfig) -> BotResult<()> {
        self.connected = true;
        Ok(())
    }

    async fn render(&self, request: RenderRequest) -> BotResult<String> {
        if !self.connected {
            return Err(RenderError::NotConnected.into());
        }

        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if self.render_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.render_delay_ms)).await;
        }

        if self.failing_urls.contains(&request.url) {
            return Err(RenderError::NavigationFailed {
                url: request.url.clone(),
                reason: "net::ERR_CONNECTION_REFUSED".to_string(),
            }
            .into());
        }

        match self.pages.get(&request.url) {
            Some(markup) if request.wait_for.is_present_in(markup) => Ok(markup.clone()),
            _ => Err(RenderError::Timeout {
                target: request.wait_for.describe(),
                seconds: request.element_timeout.as_secs(),
            }
            .into()),
        }
    }

    async fn disconnect(&mut self) -> BotResult<()> {
        self.connected = false;
        Ok(())
    }

    fn renderer_name(&self) -> &'static str {
        "mock"
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn executes_javascript(&self) -> bool {
        false
    }
}
