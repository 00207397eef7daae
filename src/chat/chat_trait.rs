use async_trait::async_trait;

use crate::utils::{
    error::BotResult,
    types::{Outgoing, Reply},
};

/// Channel a command invocation answers in
#[async_trait]
pub trait ChatChannel: Send {
    /// Show a typing/progress indicator until [`ChatChannel::stop_typing`]
    async fn start_typing(&mut self) -> BotResult<()>;

    async fn stop_typing(&mut self);

    /// Send a plain text message
    async fn send_text(&mut self, text: &str) -> BotResult<()>;

    /// Send an embed with title, fields and footer
    async fn send_reply(&mut self, reply: &Reply) -> BotResult<()>;

    async fn send(&mut self, outgoing: &Outgoing) -> BotResult<()> {
        match outgoing {
            Outgoing::Text(text) => self.send_text(text).await,
            Outgoing::Embed(reply) => self.send_reply(reply).await,
        }
    }
}
