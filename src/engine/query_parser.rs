use regex::Regex;

use crate::utils::{
    error::{BotResult, QueryParsingError},
    types::{LiveQuery, Rarity},
};

/// Classifies the free-text argument of `liveprices` into a [`LiveQuery`]
pub struct QueryParser {
    overall_tag_regex: Regex,
}

impl QueryParser {
    /// Create a new query parser instance
    pub fn new() -> BotResult<Self> {
        let overall_tag_regex = Regex::new(r"^25-[0-9]{1,2}$").map_err(|e| {
            QueryParsingError::InvalidPattern(format!("Failed to compile overall tag regex: {}", e))
        })?;

        Ok(Self { overall_tag_regex })
    }

    /// Whether `token` looks like `25-<overall>`
    pub fn is_overall_tag(&self, token: &str) -> bool {
        self.overall_tag_regex.is_match(token)
    }

    /// Classify an argument. Checked in order: overall tag, rarity, player
    /// name, nothing. A blank argument counts as no argument.
    pub fn parse(&self, argument: Option<&str>) -> BotResult<LiveQuery> {
        let argument = match argument.map(str::trim).filter(|a| !a.is_empty()) {
            Some(argument) => argument,
            None => return Ok(LiveQuery::top_movers()),
        };

        let tokens: Vec<&str> = argument.split_whitespace().collect();
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(LiveQuery::top_movers());
        };

        if self.is_overall_tag(first) {
            if rest.is_empty() {
                return Err(QueryParsingError::MissingPlayerName(first.to_string()).into());
            }
            return Ok(LiveQuery::direct_player(first, &rest.join(" ")));
        }

        if let Ok(rarity) = first.parse::<Rarity>() {
            let player = if rest.is_empty() {
                None
            } else {
                Some(rest.join(" "))
            };
            return Ok(LiveQuery::filtered_movers(vec![rarity], player));
        }

        Ok(LiveQuery::filtered_movers(
            Rarity::ALL.to_vec(),
            Some(argument.to_string()),
        ))
    }
}
