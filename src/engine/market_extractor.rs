use log::warn;
use scraper::{ElementRef, Html, Selector};

use crate::utils::{
    error::{BotResult, ExtractionError},
    types::{BestPrices, MarketRow, Rarity},
};

/// Rows of the market movers table
pub const MARKET_ROW_SELECTOR: &str = "table.market-trends tbody tr";
pub const BEST_BUY_LABEL: &str = "Best Buy";
pub const BEST_SELL_LABEL: &str = "Best Sell";
/// Element holding the price that follows a label on a player page
pub const PRICE_HEADING_TAG: &str = "h3";

/// Parsed page markup with the lookups the bot needs
pub struct MarketDocument {
    html: Html,
}

impl MarketDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Cell texts of every element matching `selector`, one `Vec` per match
    pub fn select_rows(&self, selector: &str) -> BotResult<Vec<Vec<String>>> {
        let row_selector = parse_selector(selector)?;
        let cell_selector = parse_selector("td")?;

        Ok(self
            .html
            .select(&row_selector)
            .map(|row| row.select(&cell_selector).map(stripped_text).collect())
            .collect())
    }

    pub fn has_selector(&self, selector: &str) -> BotResult<bool> {
        let selector = parse_selector(selector)?;
        Ok(self.html.select(&selector).next().is_some())
    }

    /// Whether some text node equals `text` exactly
    pub fn has_text_node(&self, text: &str) -> bool {
        self.html
            .tree
            .root()
            .descendants()
            .any(|node| node.value().as_text().is_some_and(|t| &**t == text))
    }

    /// Text of the first `tag` element that follows, in document order, the
    /// first text node equal to `label`
    pub fn text_after(&self, label: &str, tag: &str) -> BotResult<String> {
        let mut label_seen = false;

        for node in self.html.tree.root().descendants() {
            if !label_seen {
                label_seen = node.value().as_text().is_some_and(|t| &**t == label);
                continue;
            }
            if let Some(element) = ElementRef::wrap(node) {
                if element.value().name() == tag {
                    return Ok(stripped_text(element));
                }
            }
        }

        let missing = if label_seen {
            format!("<{}> after \"{}\"", tag, label)
        } else {
            format!("\"{}\"", label)
        };
        Err(ExtractionError::NotFound(missing).into())
    }
}

fn parse_selector(selector: &str) -> BotResult<Selector> {
    Selector::parse(selector).map_err(|e| {
        ExtractionError::InvalidSelector {
            selector: selector.to_string(),
            reason: format!("{:?}", e),
        }
        .into()
    })
}

/// Concatenated text of an element with every text piece trimmed
fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Read the market movers table. With a `window`, only the first `window`
/// rows in document order are considered. Rows with fewer than three cells
/// are skipped after the window is applied.
pub fn extract_market_rows(
    markup: &str,
    rarity: Rarity,
    window: Option<usize>,
) -> BotResult<Vec<MarketRow>> {
    let document = MarketDocument::parse(markup);
    let rows = document.select_rows(MARKET_ROW_SELECTOR)?;

    Ok(rows
        .into_iter()
        .take(window.unwrap_or(usize::MAX))
        .enumerate()
        .filter_map(|(index, mut cells)| {
            if cells.len() < 3 {
                warn!(
                    "Skipping {} row {} with {} cell(s)",
                    rarity,
                    index,
                    cells.len()
                );
                return None;
            }
            cells.truncate(3);
            let sell_price = cells.pop()?;
            let buy_price = cells.pop()?;
            let name = cells.pop()?;
            Some(MarketRow {
                name,
                buy_price,
                sell_price,
                rarity,
            })
        })
        .collect())
}

/// Read the "Best Buy" and "Best Sell" prices of a player page
pub fn extract_best_prices(markup: &str) -> BotResult<BestPrices> {
    let document = MarketDocument::parse(markup);

    if !document.has_text_node(BEST_BUY_LABEL) || !document.has_text_node(BEST_SELL_LABEL) {
        return Err(ExtractionError::NotFound(format!(
            "\"{}\" / \"{}\" labels",
            BEST_BUY_LABEL, BEST_SELL_LABEL
        ))
        .into());
    }

    Ok(BestPrices {
        buy: document.text_after(BEST_BUY_LABEL, PRICE_HEADING_TAG)?,
        sell: document.text_after(BEST_SELL_LABEL, PRICE_HEADING_TAG)?,
    })
}

/// First row, in table order, whose name contains `player` ignoring case
pub fn find_player_row<'a>(rows: &'a [MarketRow], player: &str) -> Option<&'a MarketRow> {
    let needle = player.to_lowercase();
    rows.iter().find(|row| row.name.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::BotError;

    #[test]
    fn test_stripped_text_joins_trimmed_pieces() {
        let document = MarketDocument::parse(
            "<table class=\"market-trends\"><tbody><tr><td>\n  <b>Mike</b>\n <i>Trout</i> </td><td> 1,000 </td><td>1,100</td></tr></tbody></table>",
        );
        let rows = document.select_rows(MARKET_ROW_SELECTOR).unwrap();

        assert_eq!(rows, vec![vec!["MikeTrout", "1,000", "1,100"]]);
    }

    #[test]
    fn test_text_after_skips_to_next_heading() {
        let document = MarketDocument::parse(
            "<div><h3>Header</h3><p>Best Buy</p><h4>ignored</h4><div><h3>$10</h3></div></div>",
        );

        assert_eq!(document.text_after("Best Buy", "h3").unwrap(), "$10");
    }

    #[test]
    fn test_text_after_requires_exact_label() {
        let document = MarketDocument::parse("<p>Best Buy Now</p><h3>$10</h3>");

        assert!(!document.has_text_node("Best Buy"));
        match document.text_after("Best Buy", "h3") {
            Err(BotError::Extraction(ExtractionError::NotFound(what))) => {
                assert_eq!(what, "\"Best Buy\"")
            }
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_text_after_without_following_heading() {
        let document = MarketDocument::parse("<h3>$10</h3><p>Best Buy</p>");

        assert!(matches!(
            document.text_after("Best Buy", "h3"),
            Err(BotError::Extraction(ExtractionError::NotFound(_)))
        ));
    }

    #[test]
    fn test_window_counts_short_rows() {
        let markup = "<table class=\"market-trends\"><tbody>\
            <tr><td>A</td><td>1</td><td>2</td></tr>\
            <tr><td>sponsored</td></tr>\
            <tr><td>B</td><td>3</td><td>4</td></tr>\
            <tr><td>C</td><td>5</td><td>6</td></tr>\
            </tbody></table>";

        let windowed = extract_market_rows(markup, Rarity::Commons, Some(3)).unwrap();
        let names: Vec<&str> = windowed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        let all = extract_market_rows(markup, Rarity::Commons, None).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_invalid_selector() {
        let document = MarketDocument::parse("<p></p>");
        assert!(matches!(
            document.has_selector("tr[["),
            Err(BotError::Extraction(ExtractionError::InvalidSelector { .. }))
        ));
    }

    #[test]
    fn test_find_player_row_is_case_insensitive_first_match() {
        let rows = vec![
            MarketRow {
                name: "Aaron Judge".to_string(),
                buy_price: "1".to_string(),
                sell_price: "2".to_string(),
                rarity: Rarity::Golds,
            },
            MarketRow {
                name: "Aaron Judge (Rookie)".to_string(),
                buy_price: "3".to_string(),
                sell_price: "4".to_string(),
                rarity: Rarity::Golds,
            },
        ];

        let found = find_player_row(&rows, "JUDGE").unwrap();
        assert_eq!(found.buy_price, "1");
        assert!(find_player_row(&rows, "Ohtani").is_none());
    }
}
