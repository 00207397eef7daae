use async_trait::async_trait;

use crate::chat::ChatChannel;
use crate::cli::{OutputFormat, OutputFormatter};
use crate::utils::{
    error::BotResult,
    types::{Outgoing, Reply},
};

/// Terminal stand-in for a chat channel, used by `liveprices query`
pub struct ConsoleChannel {
    format: OutputFormat,
    sent: Vec<Outgoing>,
}

impl ConsoleChannel {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            sent: Vec::new(),
        }
    }

    /// Messages sent so far
    pub fn sent(&self) -> &[Outgoing] {
        &self.sent
    }

    fn emit(&mut self, outgoing: Outgoing) {
        println!("{}", OutputFormatter::format_outgoing(&outgoing, &self.format));
        self.sent.push(outgoing);
    }
}

#[async_trait]
impl ChatChannel for ConsoleChannel {
    async fn start_typing(&mut self) -> BotResult<()> {
        if matches!(self.format, OutputFormat::Text) {
            eprintln!("{}", OutputFormatter::format_info("Fetching prices..."));
        }
        Ok(())
    }

    async fn stop_typing(&mut self) {}

    async fn send_text(&mut self, text: &str) -> BotResult<()> {
        self.emit(Outgoing::Text(text.to_string()));
        Ok(())
    }

    async fn send_reply(&mut self, reply: &Reply) -> BotResult<()> {
        self.emit(Outgoing::Embed(reply.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_channel_records_messages() {
        let mut channel = ConsoleChannel::new(OutputFormat::Json);

        channel.send_text("hello").await.unwrap();
        channel.send(&Outgoing::Embed(Reply::new("Prices"))).await.unwrap();

        assert_eq!(channel.sent().len(), 2);
        assert_eq!(channel.sent()[0].as_text(), Some("hello"));
        assert!(channel.sent()[1].is_embed());
    }

    #[test]
    fn test_json_channel_typing_is_silent() {
        let mut channel = ConsoleChannel::new(OutputFormat::Json);

        tokio_test::assert_ok!(tokio_test::block_on(channel.start_typing()));
        tokio_test::block_on(channel.stop_typing());

        assert!(channel.sent().is_empty());
    }
}
