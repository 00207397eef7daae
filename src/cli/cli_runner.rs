use clap::Parser;
use log::info;

use crate::chat::ConsoleChannel;
use crate::cli::{CliArgs, Commands, OutputFormat, OutputFormatter};
use crate::engine::{Bot, ReplyFormatter};
use crate::utils::{
    config::BotConfig,
    error::{BotError, BotResult},
    types::Outgoing,
};

/// Main CLI runner that handles command execution
pub struct CliRunner {
    config: BotConfig,
}

impl CliRunner {
    /// Build the runner from the environment plus command-line overrides
    pub fn new(args: &CliArgs) -> BotResult<Self> {
        let mut config = BotConfig::from_env()?;
        Self::apply_overrides(&mut config, args);
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a runner with an explicit configuration
    pub fn with_config(config: BotConfig) -> Self {
        Self { config }
    }

    pub fn apply_overrides(config: &mut BotConfig, args: &CliArgs) {
        if let Some(renderer) = args.renderer {
            config.renderer = renderer;
        }
        if let Some(url) = &args.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if args.headed {
            config.headless = false;
        }
    }

    /// Start the chat bot and block until it shuts down
    pub async fn run_bot(&self) -> BotResult<()> {
        info!("Starting liveprices bot with {} renderer", self.config.renderer);
        Bot::new(self.config.clone()).run().await
    }

    /// Answer a single command in the terminal
    pub async fn run_query(&self, argument: &[String], format: OutputFormat) -> BotResult<Outgoing> {
        let bot = Bot::new(self.config.clone());
        bot.initialize().await?;

        let joined = argument.join(" ");
        let argument = if joined.trim().is_empty() {
            None
        } else {
            Some(joined.as_str())
        };

        let mut channel = ConsoleChannel::new(format);
        let result = bot.command()?.run(argument, &mut channel).await;
        bot.shutdown().await?;
        result?;

        channel
            .sent()
            .last()
            .cloned()
            .ok_or_else(|| BotError::Internal("No reply was produced".to_string()))
    }

    /// Help text of the chat command
    pub fn usage(&self) -> String {
        ReplyFormatter::usage(&self.config.command_prefix)
    }
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Main entry point for CLI execution
pub async fn run_cli() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logger();

    let runner = match CliRunner::new(&args) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("{}", OutputFormatter::format_error(&e));
            std::process::exit(1);
        }
    };

    let result = match &args.command {
        Commands::Run => runner.run_bot().await,
        Commands::Query { argument, format } => runner.run_query(argument, *format).await.map(|_| ()),
        Commands::Usage => {
            println!("{}", runner.usage());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", OutputFormatter::format_error(&e));
        std::process::exit(1);
    }

    Ok(())
}
