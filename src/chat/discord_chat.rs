use std::sync::Arc;

use async_trait::async_trait;
use log::{error, info, warn};
use serenity::builder::{CreateEmbed, CreateEmbedFooter, CreateMessage};
use serenity::http::{Http, Typing};
use serenity::model::channel::Message;
use serenity::model::gateway::Ready;
use serenity::model::id::ChannelId;
use serenity::prelude::{Client, Context, EventHandler, GatewayIntents};

use crate::chat::ChatChannel;
use crate::engine::{
    command::{parse_invocation, Invocation, LivePricesCommand},
    reply_formatter::ReplyFormatter,
};
use crate::utils::{
    error::{BotResult, ChatError},
    types::Reply,
};

/// Discord text channel a message arrived in
pub struct DiscordChannel {
    http: Arc<Http>,
    channel_id: ChannelId,
    typing: Option<Typing>,
}

impl DiscordChannel {
    pub fn new(http: Arc<Http>, channel_id: ChannelId) -> Self {
        Self {
            http,
            channel_id,
            typing: None,
        }
    }

    /// Embed builder for a reply
    pub fn embed(reply: &Reply) -> CreateEmbed {
        let mut embed = CreateEmbed::new().title(reply.title.as_str());
        for field in &reply.fields {
            embed = embed.field(field.name.as_str(), field.value.as_str(), field.inline);
        }
        if let Some(footer) = &reply.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer.as_str()));
        }
        embed
    }
}

#[async_trait]
impl ChatChannel for DiscordChannel {
    async fn start_typing(&mut self) -> BotResult<()> {
        self.typing = Some(self.channel_id.start_typing(&self.http));
        Ok(())
    }

    async fn stop_typing(&mut self) {
        if let Some(typing) = self.typing.take() {
            typing.stop();
        }
    }

    async fn send_text(&mut self, text: &str) -> BotResult<()> {
        self.channel_id
            .say(&self.http, text)
            .await
            .map_err(|e| ChatError::SendFailed(e.to_string()))?;
        Ok(())
    }

    async fn send_reply(&mut self, reply: &Reply) -> BotResult<()> {
        let message = CreateMessage::new().embed(Self::embed(reply));
        self.channel_id
            .send_message(&self.http, message)
            .await
            .map_err(|e| ChatError::SendFailed(e.to_string()))?;
        Ok(())
    }
}

/// Gateway event handler routing prefixed messages to the command
pub struct DiscordHandler {
    prefix: String,
    command: Arc<LivePricesCommand>,
}

impl DiscordHandler {
    pub fn new(prefix: &str, command: Arc<LivePricesCommand>) -> Self {
        Self {
            prefix: prefix.to_string(),
            command,
        }
    }
}

#[serenity::async_trait]
impl EventHandler for DiscordHandler {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("We are ready to go, {}", ready.user.name);
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }
        let Some(invocation) = parse_invocation(&self.prefix, &msg.content) else {
            return;
        };

        let mut channel = DiscordChannel::new(ctx.http.clone(), msg.channel_id);
        let result = match invocation {
            Invocation::LivePrices(argument) => {
                self.command.run(argument.as_deref(), &mut channel).await
            }
            Invocation::Help => channel.send_text(&ReplyFormatter::usage(&self.prefix)).await,
        };

        if let Err(e) = result {
            error!("Failed to answer message {} in {}: {}", msg.id, msg.channel_id, e);
        }
    }
}

/// Intents the bot needs to read prefixed commands
pub fn gateway_intents() -> GatewayIntents {
    GatewayIntents::GUILD_MESSAGES | GatewayIntents::DIRECT_MESSAGES | GatewayIntents::MESSAGE_CONTENT
}

/// Connect to the gateway and serve events until Ctrl+C
pub async fn run_gateway(token: &str, handler: DiscordHandler) -> BotResult<()> {
    let mut client = Client::builder(token, gateway_intents())
        .event_handler(handler)
        .await
        .map_err(|e| ChatError::ClientFailed(e.to_string()))?;

    let shard_manager = client.shard_manager.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested, closing gateway connection");
            shard_manager.shutdown_all().await;
        } else {
            warn!("Could not listen for Ctrl+C; stop the process to shut down");
        }
    });

    client
        .start()
        .await
        .map_err(|e| ChatError::ClientFailed(e.to_string()))?;
    Ok(())
}
