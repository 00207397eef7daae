use std::sync::Arc;

use log::{debug, info, warn};
use tokio::sync::RwLock;

use crate::chat::ChatChannel;
use crate::engine::{
    market_extractor::{
        extract_best_prices, extract_market_rows, find_player_row, BEST_BUY_LABEL,
        MARKET_ROW_SELECTOR,
    },
    query_parser::QueryParser,
    reply_formatter::ReplyFormatter,
    showzone::{self, Slugifier},
};
use crate::renderers::{PageRenderer, RenderRequest, WaitTarget};
use crate::utils::{
    error::{BotError, BotResult},
    types::{LiveQuery, Outgoing, QueryMode, Reply},
};

/// Rows taken per rarity when no player is given
pub const TOP_MOVERS_LIMIT: usize = 10;

pub const LIVEPRICES_COMMAND: &str = "liveprices";
pub const HELP_COMMAND: &str = "help";

/// A recognised chat command
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// `liveprices` with its optional argument
    LivePrices(Option<String>),
    /// `help` or `help liveprices`
    Help,
}

/// Recognise a command in a chat message. Returns `None` for anything that
/// is not addressed to the bot.
pub fn parse_invocation(prefix: &str, content: &str) -> Option<Invocation> {
    let body = content.trim_start().strip_prefix(prefix)?;
    let mut parts = body.splitn(2, char::is_whitespace);
    let name = parts.next()?;
    let argument = parts
        .next()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    match name {
        LIVEPRICES_COMMAND => Some(Invocation::LivePrices(argument)),
        HELP_COMMAND => match argument.as_deref() {
            None | Some(LIVEPRICES_COMMAND) => Some(Invocation::Help),
            Some(_) => None,
        },
        _ => None,
    }
}

/// The `liveprices` command: classify, fetch, extract, format
pub struct LivePricesCommand {
    parser: QueryParser,
    slugifier: Slugifier,
    renderer: Arc<RwLock<dyn PageRenderer>>,
}

impl LivePricesCommand {
    pub fn new(renderer: Arc<RwLock<dyn PageRenderer>>) -> BotResult<Self> {
        Ok(Self {
            parser: QueryParser::new()?,
            slugifier: Slugifier::new()?,
            renderer,
        })
    }

    /// Run one invocation and send exactly one message to `channel`
    pub async fn run(&self, argument: Option<&str>, channel: &mut dyn ChatChannel) -> BotResult<()> {
        if let Err(e) = channel.start_typing().await {
            warn!("Could not start typing indicator: {}", e);
        }
        let outgoing = self.execute(argument).await;
        channel.stop_typing().await;
        channel.send(&outgoing).await
    }

    /// Resolve an argument into the message to send. Every failure becomes
    /// the user-facing text for that failure.
    pub async fn execute(&self, argument: Option<&str>) -> Outgoing {
        info!("liveprices invoked with {:?}", argument);
        match self.resolve(argument).await {
            Ok(outgoing) => outgoing,
            Err(e) => {
                warn!("liveprices {:?} failed: {}", argument, e);
                Outgoing::Text(e.user_message())
            }
        }
    }

    async fn resolve(&self, argument: Option<&str>) -> BotResult<Outgoing> {
        let query = self.parser.parse(argument)?;
        debug!("Classified {:?} as {:?}", argument, query);

        match query.mode {
            QueryMode::DirectPlayer => self.lookup_player(&query).await.map(Outgoing::Embed),
            QueryMode::FilteredMovers | QueryMode::TopMovers => Ok(self.collect_movers(&query).await),
        }
    }

    async fn lookup_player(&self, query: &LiveQuery) -> BotResult<Reply> {
        let (overall_tag, player_name) = match (&query.overall_tag, &query.player_name) {
            (Some(tag), Some(name)) => (tag.as_str(), name.as_str()),
            _ => {
                return Err(BotError::Internal(
                    "Direct player query without tag or name".to_string(),
                ))
            }
        };

        let url = showzone::player_url(overall_tag, &self.slugifier.slugify(player_name));
        let markup = self
            .render(RenderRequest::new(url, WaitTarget::exact_text(BEST_BUY_LABEL)))
            .await?;
        let prices = extract_best_prices(&markup)?;

        Ok(ReplyFormatter::player_reply(player_name, overall_tag, &prices))
    }

    /// Walk the rarities one after another. A rarity whose page fails to
    /// load or has no rows is left out of the result.
    async fn collect_movers(&self, query: &LiveQuery) -> Outgoing {
        let mut fields = Vec::new();

        for rarity in &query.rarities {
            let url = showzone::market_movers_url(*rarity);
            let markup = match self
                .render(RenderRequest::new(url.as_str(), WaitTarget::css(MARKET_ROW_SELECTOR)))
                .await
            {
                Ok(markup) => markup,
                Err(e) => {
                    warn!("Skipping {}: {}", rarity, e);
                    continue;
                }
            };

            // Top movers look at the first rows of the table, well formed or not
            let window = match query.player_name {
                Some(_) => None,
                None => Some(TOP_MOVERS_LIMIT),
            };
            let rows = match extract_market_rows(&markup, *rarity, window) {
                Ok(rows) if !rows.is_empty() => rows,
                Ok(_) => {
                    debug!("No market rows on {}", url);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", rarity, e);
                    continue;
                }
            };

            match query.player_name.as_deref() {
                Some(player) => {
                    if let Some(row) = find_player_row(&rows, player) {
                        fields.push(ReplyFormatter::market_field(row));
                    }
                }
                None => fields.extend(rows.iter().map(ReplyFormatter::market_field)),
            }
        }

        info!("liveprices collected {} result(s)", fields.len());
        ReplyFormatter::movers_outcome(query.player_name.as_deref(), fields)
    }

    async fn render(&self, request: RenderRequest) -> BotResult<String> {
        let url = request.url.clone();
        let renderer = self.renderer.read().await;
        let result = renderer.render(request).await;
        match &result {
            Ok(markup) => debug!("Fetched {} ({} bytes)", url, markup.len()),
            Err(e) => debug!("Fetch of {} failed: {}", url, e),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invocation() {
        assert_eq!(
            parse_invocation("!", "!liveprices"),
            Some(Invocation::LivePrices(None))
        );
        assert_eq!(
            parse_invocation("!", "!liveprices   golds  Judge "),
            Some(Invocation::LivePrices(Some("golds  Judge".to_string())))
        );
        assert_eq!(parse_invocation("!", "!help"), Some(Invocation::Help));
        assert_eq!(parse_invocation("!", "!help liveprices"), Some(Invocation::Help));
    }

    #[test]
    fn test_parse_invocation_ignores_other_messages() {
        assert_eq!(parse_invocation("!", "liveprices"), None);
        assert_eq!(parse_invocation("!", "!livepricesx"), None);
        assert_eq!(parse_invocation("!", "!help ping"), None);
        assert_eq!(parse_invocation("?", "!liveprices"), None);
        assert_eq!(parse_invocation("!", ""), None);
    }
}
