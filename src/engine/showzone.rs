//! URLs of the showzone.gg pages the bot scrapes, and player slugs.

use regex::Regex;

use crate::utils::{
    error::{BotResult, QueryParsingError},
    types::Rarity,
};

pub const MARKET_MOVERS_BASE: &str = "https://showzone.gg/market/market-movers/live-series-";
pub const PLAYER_PAGE_BASE: &str = "https://showzone.gg/players/";

/// Market movers listing for one rarity
pub fn market_movers_url(rarity: Rarity) -> String {
    format!("{}{}", MARKET_MOVERS_BASE, rarity.as_str())
}

/// Player detail page, anchored at its market section
pub fn player_url(overall_tag: &str, slug: &str) -> String {
    format!("{}{}-live-{}#market", PLAYER_PAGE_BASE, overall_tag, slug)
}

/// Turns player names into URL slugs: trimmed, lowercased, whitespace runs
/// turned into single hyphens, anything outside `[a-z0-9-]` dropped.
pub struct Slugifier {
    whitespace_regex: Regex,
    disallowed_regex: Regex,
}

impl Slugifier {
    pub fn new() -> BotResult<Self> {
        let whitespace_regex = Regex::new(r"\s+").map_err(|e| {
            QueryParsingError::InvalidPattern(format!("Failed to compile whitespace regex: {}", e))
        })?;
        let disallowed_regex = Regex::new(r"[^a-z0-9-]").map_err(|e| {
            QueryParsingError::InvalidPattern(format!("Failed to compile slug regex: {}", e))
        })?;

        Ok(Self {
            whitespace_regex,
            disallowed_regex,
        })
    }

    pub fn slugify(&self, name: &str) -> String {
        let lowered = name.trim().to_lowercase();
        let hyphenated = self.whitespace_regex.replace_all(&lowered, "-");
        self.disallowed_regex.replace_all(&hyphenated, "").into_owned()
    }
}
