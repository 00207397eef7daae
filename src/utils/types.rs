use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::QueryParsingError;

/// Card tier listed on the market movers pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Commons,
    Silvers,
    Golds,
    Diamonds,
}

impl Rarity {
    /// Every rarity, in the order a player search walks them
    pub const ALL: [Rarity; 4] = [
        Rarity::Commons,
        Rarity::Silvers,
        Rarity::Golds,
        Rarity::Diamonds,
    ];

    /// Lowercase form used in URLs and commands
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Commons => "commons",
            Rarity::Silvers => "silvers",
            Rarity::Golds => "golds",
            Rarity::Diamonds => "diamonds",
        }
    }

    /// Capitalized form used in reply field names
    pub fn title(&self) -> &'static str {
        match self {
            Rarity::Commons => "Commons",
            Rarity::Silvers => "Silvers",
            Rarity::Golds => "Golds",
            Rarity::Diamonds => "Diamonds",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Rarity {
    type Err = QueryParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "commons" => Ok(Rarity::Commons),
            "silvers" => Ok(Rarity::Silvers),
            "golds" => Ok(Rarity::Golds),
            "diamonds" => Ok(Rarity::Diamonds),
            _ => Err(QueryParsingError::UnknownRarity(s.to_string())),
        }
    }
}

/// How a command argument is answered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum QueryMode {
    /// Direct lookup on a single player page
    DirectPlayer,
    /// Market movers filtered by rarity and/or player
    FilteredMovers,
    /// Top commons, no argument given
    TopMovers,
}

/// Parsed form of a `liveprices` argument
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveQuery {
    pub mode: QueryMode,
    pub overall_tag: Option<String>,
    pub player_name: Option<String>,
    pub rarities: Vec<Rarity>,
}

impl LiveQuery {
    pub fn direct_player(overall_tag: &str, player_name: &str) -> Self {
        Self {
            mode: QueryMode::DirectPlayer,
            overall_tag: Some(overall_tag.to_string()),
            player_name: Some(player_name.to_string()),
            rarities: vec![Rarity::Commons],
        }
    }

    pub fn filtered_movers(rarities: Vec<Rarity>, player_name: Option<String>) -> Self {
        Self {
            mode: QueryMode::FilteredMovers,
            overall_tag: None,
            player_name,
            rarities,
        }
    }

    pub fn top_movers() -> Self {
        Self {
            mode: QueryMode::TopMovers,
            overall_tag: None,
            player_name: None,
            rarities: vec![Rarity::Commons],
        }
    }
}

/// One row scraped from a market movers table
#[derive(Debug, Clone, PartialEq)]
pub struct MarketRow {
    pub name: String,
    pub buy_price: String,
    pub sell_price: String,
    pub rarity: Rarity,
}

/// Prices found under the "Best Buy" / "Best Sell" labels of a player page
#[derive(Debug, Clone, PartialEq)]
pub struct BestPrices {
    pub buy: String,
    pub sell: String,
}

/// A name/value pair rendered in an embed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplyField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl ReplyField {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Formatted reply: title, ordered fields and an optional footer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reply {
    pub title: String,
    pub fields: Vec<ReplyField>,
    pub footer: Option<String>,
}

impl Reply {
    /// Create an empty reply with the given title
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            fields: Vec::new(),
            footer: None,
        }
    }

    /// Append a field; display order is insertion order
    pub fn add_field(&mut self, field: ReplyField) {
        self.fields.push(field);
    }

    /// Set the footer text
    pub fn with_footer(mut self, footer: impl Into<String>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field value by its name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// The single message an invocation sends back
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "body", rename_all = "lowercase")]
pub enum Outgoing {
    Text(String),
    Embed(Reply),
}

impl Outgoing {
    pub fn is_embed(&self) -> bool {
        matches!(self, Outgoing::Embed(_))
    }

    /// The embed, if this is one
    pub fn as_reply(&self) -> Option<&Reply> {
        match self {
            Outgoing::Embed(reply) => Some(reply),
            Outgoing::Text(_) => None,
        }
    }

    /// The plain text, if this is one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Outgoing::Text(text) => Some(text),
            Outgoing::Embed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rarity_from_str_is_case_insensitive() {
        assert_eq!("Silvers".parse::<Rarity>().unwrap(), Rarity::Silvers);
        assert_eq!("DIAMONDS".parse::<Rarity>().unwrap(), Rarity::Diamonds);
        assert!("bronzes".parse::<Rarity>().is_err());
    }

    #[test]
    fn test_rarity_order() {
        let names: Vec<&str> = Rarity::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(names, vec!["commons", "silvers", "golds", "diamonds"]);
        assert_eq!(Rarity::Golds.title(), "Golds");
    }

    #[test]
    fn test_reply_preserves_field_order() {
        let mut reply = Reply::new("Prices");
        reply.add_field(ReplyField::new("Buy Now", "$15", true));
        reply.add_field(ReplyField::new("Sell Now", "$10", true));

        assert_eq!(reply.field_count(), 2);
        assert_eq!(reply.fields[0].name, "Buy Now");
        assert_eq!(reply.field("Sell Now"), Some("$10"));
        assert!(reply.footer.is_none());
    }

    #[test]
    fn test_outgoing_accessors() {
        let text = Outgoing::Text("hello".to_string());
        assert!(!text.is_embed());
        assert_eq!(text.as_text(), Some("hello"));
        assert!(text.as_reply().is_none());

        let embed = Outgoing::Embed(Reply::new("t").with_footer("f"));
        assert!(embed.is_embed());
        assert_eq!(embed.as_reply().unwrap().footer.as_deref(), Some("f"));
    }
}
