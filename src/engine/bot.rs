use std::sync::Arc;

use log::{info, warn};
use tokio::sync::RwLock;

use crate::chat::{run_gateway, DiscordHandler};
use crate::engine::command::LivePricesCommand;
use crate::renderers::{HttpRenderer, PageRenderer, RendererInitConfig, WebDriverRenderer};
use crate::utils::{
    config::{BotConfig, RendererKind},
    error::BotResult,
};

/// Long-lived bot: one renderer and one chat session, created at startup
/// and torn down at exit
pub struct Bot {
    config: BotConfig,
    renderer: Arc<RwLock<dyn PageRenderer>>,
}

impl Bot {
    /// Create a bot using the renderer named in the configuration
    pub fn new(config: BotConfig) -> Self {
        let renderer = create_renderer(config.renderer);
        Self { config, renderer }
    }

    /// Create a bot with a custom renderer
    pub fn with_renderer(config: BotConfig, renderer: Arc<RwLock<dyn PageRenderer>>) -> Self {
        Self { config, renderer }
    }

    pub fn config(&self) -> &BotConfig {
        &self.config
    }

    /// Connect the renderer
    pub async fn initialize(&self) -> BotResult<()> {
        let mut renderer = self.renderer.write().await;
        renderer.connect(self.renderer_init_config()).await?;
        info!(
            "Renderer '{}' connected (javascript: {})",
            renderer.renderer_name(),
            renderer.executes_javascript()
        );
        Ok(())
    }

    /// Command bound to this bot's renderer
    pub fn command(&self) -> BotResult<LivePricesCommand> {
        LivePricesCommand::new(self.renderer.clone())
    }

    /// Start the chat session and serve commands until shutdown
    pub async fn run(&self) -> BotResult<()> {
        let token = self.config.require_token()?.to_string();
        self.initialize().await?;

        let handler = DiscordHandler::new(&self.config.command_prefix, Arc::new(self.command()?));
        info!(
            "Listening for {}liveprices commands",
            self.config.command_prefix
        );
        let served = run_gateway(&token, handler).await;

        if let Err(e) = self.shutdown().await {
            warn!("Renderer shutdown failed: {}", e);
        }
        served
    }

    /// Disconnect the renderer
    pub async fn shutdown(&self) -> BotResult<()> {
        let mut renderer = self.renderer.write().await;
        if renderer.is_connected() {
            renderer.disconnect().await?;
            info!("Renderer '{}' disconnected", renderer.renderer_name());
        }
        Ok(())
    }

    fn renderer_init_config(&self) -> RendererInitConfig {
        let init = RendererInitConfig::new()
            .with_webdriver_url(&self.config.webdriver_url)
            .with_headless(self.config.headless);
        match &self.config.user_agent {
            Some(user_agent) => init.with_user_agent(user_agent),
            None => init,
        }
    }
}

/// Build an unconnected renderer of the given kind
pub fn create_renderer(kind: RendererKind) -> Arc<RwLock<dyn PageRenderer>> {
    match kind {
        RendererKind::WebDriver => Arc::new(RwLock::new(WebDriverRenderer::new())),
        RendererKind::Http => Arc::new(RwLock::new(HttpRenderer::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::MockRenderer;
    use crate::utils::error::BotError;

    #[tokio::test]
    async fn test_create_renderer_kinds() {
        let webdriver = create_renderer(RendererKind::WebDriver);
        assert_eq!(webdriver.read().await.renderer_name(), "webdriver");

        let http = create_renderer(RendererKind::Http);
        assert_eq!(http.read().await.renderer_name(), "http");
    }

    #[tokio::test]
    async fn test_bot_lifecycle_with_mock_renderer() {
        let mock = Arc::new(RwLock::new(MockRenderer::new()));
        let bot = Bot::with_renderer(BotConfig::default(), mock.clone());
        assert_eq!(bot.config().command_prefix, "!");

        bot.initialize().await.unwrap();
        assert!(mock.read().await.is_connected());

        bot.shutdown().await.unwrap();
        assert!(!mock.read().await.is_connected());
    }

    #[test]
    fn test_renderer_init_config_follows_bot_config() {
        let config = BotConfig {
            webdriver_url: "http://driver:9515".to_string(),
            headless: false,
            user_agent: Some("liveprices-test/1.0".to_string()),
            ..BotConfig::default()
        };
        let bot = Bot::with_renderer(config, Arc::new(RwLock::new(MockRenderer::new())));

        let init = bot.renderer_init_config();
        assert_eq!(init.webdriver_url.as_deref(), Some("http://driver:9515"));
        assert!(!init.headless);
        assert_eq!(init.user_agent.as_deref(), Some("liveprices-test/1.0"));

        let plain = Bot::with_renderer(BotConfig::default(), Arc::new(RwLock::new(MockRenderer::new())));
        assert!(plain.renderer_init_config().user_agent.is_none());
    }

    #[tokio::test]
    async fn test_run_without_token_fails_before_connecting() {
        let mock = Arc::new(RwLock::new(MockRenderer::new()));
        let bot = Bot::with_renderer(BotConfig::default(), mock.clone());

        let result = bot.run().await;
        assert!(matches!(result, Err(BotError::Configuration(_))));
        assert!(!mock.read().await.is_connected());
    }
}
