use thiserror::Error;

/// Main error type for the live prices bot
#[derive(Debug, Error)]
pub enum BotError {
    #[error("Query parsing error: {0}")]
    QueryParsing(#[from] QueryParsingError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("No results found for {}", .player.as_deref().unwrap_or_default())]
    NoResults { player: Option<String> },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors raised while classifying the command argument
#[derive(Debug, Error)]
pub enum QueryParsingError {
    #[error("Missing player name after overall tag '{0}'")]
    MissingPlayerName(String),

    #[error("Unknown rarity: {0}")]
    UnknownRarity(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

/// Errors raised by a page renderer
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Renderer is not connected")]
    NotConnected,

    #[error("Failed to open browser session: {0}")]
    SessionFailed(String),

    #[error("Navigation to {url} failed: {reason}")]
    NavigationFailed { url: String, reason: String },

    #[error("Timed out after {seconds}s waiting for {target}")]
    Timeout { target: String, seconds: u64 },

    #[error("Wait target not present on page: {0}")]
    TargetMissing(String),

    #[error("Failed to read page source: {0}")]
    SourceUnavailable(String),
}

/// Errors raised while extracting data from rendered markup
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Expected node not found: {0}")]
    NotFound(String),

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },
}

/// Errors raised by a chat channel
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Failed to send message: {0}")]
    SendFailed(String),

    #[error("Failed to start chat client: {0}")]
    ClientFailed(String),
}

/// Result type alias for bot operations
pub type BotResult<T> = Result<T, BotError>;

impl BotError {
    /// The single line shown in the chat channel when a command ends in this error
    pub fn user_message(&self) -> String {
        match self {
            BotError::QueryParsing(QueryParsingError::MissingPlayerName(_)) => {
                "❌ Please provide a player name after the rating.".to_string()
            }
            BotError::Render(e) => format!("⚠️ Error loading player page: {}", e),
            BotError::Extraction(_) => {
                "❌ Could not find market data on that player’s page.".to_string()
            }
            BotError::NoResults { player } => format!(
                "❌ No results found for “{}.”",
                player.as_deref().unwrap_or_default()
            ),
            other => format!("⚠️ {}", other),
        }
    }
}
