use crate::utils::{
    error::BotError,
    types::{BestPrices, MarketRow, Outgoing, Reply, ReplyField},
};

pub const MOVERS_TITLE: &str = "Live Series Prices";

/// Builds the replies sent back for a `liveprices` invocation
pub struct ReplyFormatter;

impl ReplyFormatter {
    /// Reply for a direct player page lookup.
    ///
    /// The site's "Best Sell" price is shown as "Buy Now" and its "Best Buy"
    /// price as "Sell Now".
    pub fn player_reply(player_name: &str, overall_tag: &str, prices: &BestPrices) -> Reply {
        let mut reply = Reply::new(format!(
            "{} ({}) Prices",
            title_case(player_name),
            overall_tag
        ));
        reply.add_field(ReplyField::new("Buy Now", prices.sell.as_str(), true));
        reply.add_field(ReplyField::new("Sell Now", prices.buy.as_str(), true));
        reply
    }

    /// Field for one market movers row; buy and sell are swapped like the
    /// player reply
    pub fn market_field(row: &MarketRow) -> ReplyField {
        ReplyField::new(
            format!("{} – {}", row.rarity.title(), row.name),
            format!("Buy Now: {}\nSell Now: {}", row.sell_price, row.buy_price),
            false,
        )
    }

    pub fn movers_title(player: Option<&str>) -> String {
        match player {
            Some(player) => format!("{} for “{}”", MOVERS_TITLE, player),
            None => MOVERS_TITLE.to_string(),
        }
    }

    pub fn results_footer(count: usize) -> String {
        format!(
            "Showing {} result{}",
            count,
            if count != 1 { "s" } else { "" }
        )
    }

    /// Final message of a movers lookup: the no-results line when nothing
    /// matched, otherwise an embed of every collected field
    pub fn movers_outcome(player: Option<&str>, fields: Vec<ReplyField>) -> Outgoing {
        if fields.is_empty() {
            let error = BotError::NoResults {
                player: player.map(str::to_string),
            };
            return Outgoing::Text(error.user_message());
        }

        let count = fields.len();
        let mut reply = Reply::new(Self::movers_title(player));
        for field in fields {
            reply.add_field(field);
        }
        Outgoing::Embed(reply.with_footer(Self::results_footer(count)))
    }

    /// Help text for the command, using the configured prefix
    pub fn usage(prefix: &str) -> String {
        [
            "Get Buy/Sell Now prices for Live Series players.".to_string(),
            format!("• `{}liveprices` → top 10 commons", prefix),
            format!("• `{}liveprices silvers` → top 10 silvers", prefix),
            format!("• `{}liveprices golds <player>` → that player’s golds", prefix),
            format!("• `{}liveprices <player>` → that player across all rarities", prefix),
            format!(
                "• `{}liveprices 25-<overall> <player>` → direct player page (MLB The Show 25)",
                prefix
            ),
        ]
        .join("\n")
    }
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut previous_is_letter = false;

    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                result.extend(c.to_lowercase());
            } else {
                result.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            result.push(c);
            previous_is_letter = false;
        }
    }

    result
}
