use clap::{Parser, Subcommand, ValueEnum};

use crate::utils::config::RendererKind;

/// Live Series market prices bot
#[derive(Parser, Debug)]
#[command(name = "liveprices")]
#[command(about = "Chat bot reporting Live Series card market prices from showzone.gg")]
#[command(version)]
pub struct CliArgs {
    /// Page renderer (overrides LIVEPRICES_RENDERER)
    #[arg(long, global = true)]
    pub renderer: Option<RendererKind>,

    /// WebDriver endpoint (overrides WEBDRIVER_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub webdriver_url: Option<String>,

    /// Show the browser window instead of running headless
    #[arg(long, global = true)]
    pub headed: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and answer liveprices commands
    Run,

    /// Answer one liveprices command in the terminal
    Query {
        /// Command argument, e.g. `golds Judge` or `25-99 Shohei Ohtani`
        #[arg(value_name = "ARGUMENT")]
        argument: Vec<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the chat command help
    Usage,
}

/// Output format options
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    /// Colored terminal output
    Text,
    /// JSON output
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
