use async_trait::async_trait;
use log::{debug, info};
use reqwest::Client;

use crate::renderers::{PageRenderer, RenderRequest, RendererInitConfig};
use crate::utils::{
    config::PAGE_LOAD_TIMEOUT,
    error::{BotResult, RenderError},
};

const DEFAULT_USER_AGENT: &str = concat!("liveprices-bot/", env!("CARGO_PKG_VERSION"));

/// Fetches pages with a plain HTTP GET.
///
/// No JavaScript runs, so the wait target must already be present in the
/// served markup; otherwise the fetch fails as if the wait had timed out.
pub struct HttpRenderer {
    client: Option<Client>,
}

impl HttpRenderer {
    pub fn new() -> Self {
        Self { client: None }
    }
}

impl Default for HttpRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PageRenderer for HttpRenderer {
    async fn connect(&mut self, config: RendererInitConfig) -> BotResult<()> {
        let user_agent = config
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(PAGE_LOAD_TIMEOUT)
            .build()
            .map_err(|e| RenderError::SessionFailed(format!("Failed to create HTTP client: {}", e)))?;

        self.client = Some(client);
        info!("HTTP renderer ready");
        Ok(())
    }

    async fn render(&self, request: RenderRequest) -> BotResult<String> {
        let client = self.client.as_ref().ok_or(RenderError::NotConnected)?;

        debug!("Fetching {}", request.url);
        let response = client
            .get(&request.url)
            .timeout(request.page_load_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RenderError::Timeout {
                        target: request.url.clone(),
                        seconds: request.page_load_timeout.as_secs(),
                    }
                } else {
                    RenderError::NavigationFailed {
                        url: request.url.clone(),
                        reason: e.to_string(),
                    }
                }
            })?;

        if !response.status().is_success() {
            return Err(RenderError::NavigationFailed {
                url: request.url.clone(),
                reason: format!("HTTP status {}", response.status()),
            }
            .into());
        }

        let markup = response
            .text()
            .await
            .map_err(|e| RenderError::SourceUnavailable(e.to_string()))?;

        if !request.wait_for.is_present_in(&markup) {
            return Err(RenderError::TargetMissing(request.wait_for.describe()).into());
        }

        Ok(markup)
    }

    async fn disconnect(&mut self) -> BotResult<()> {
        self.client = None;
        Ok(())
    }

    fn renderer_name(&self) -> &'static str {
        "http"
    }

    fn is_connected(&self) -> bool {
        self.client.is_some()
    }

    fn executes_javascript(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::WaitTarget;
    use crate::utils::error::BotError;

    #[tokio::test]
    async fn test_http_renderer_lifecycle() {
        let mut renderer = HttpRenderer::new();
        assert!(!renderer.is_connected());
        assert!(!renderer.executes_javascript());

        renderer.connect(RendererInitConfig::new()).await.unwrap();
        assert!(renderer.is_connected());

        renderer.disconnect().await.unwrap();
        assert!(!renderer.is_connected());
    }

    #[tokio::test]
    async fn test_render_requires_connect() {
        let renderer = HttpRenderer::new();
        let request = RenderRequest::new("https://example.com", WaitTarget::css("h1"));

        match renderer.render(request).await {
            Err(BotError::Render(RenderError::NotConnected)) => {}
            other => panic!("Expected NotConnected, got {:?}", other),
        }
    }
}
