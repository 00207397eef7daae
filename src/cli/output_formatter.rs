use colored::*;

use crate::cli::cli_args::OutputFormat;
use crate::utils::{
    error::BotError,
    types::{Outgoing, Reply},
};

/// Formats bot replies for terminal output
pub struct OutputFormatter;

impl OutputFormatter {
    /// Format an outgoing message according to the specified format
    pub fn format_outgoing(outgoing: &Outgoing, format: &OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format_text(outgoing),
            OutputFormat::Json => Self::format_json(outgoing),
        }
    }

    fn format_text(outgoing: &Outgoing) -> String {
        match outgoing {
            Outgoing::Text(text) => text.yellow().to_string(),
            Outgoing::Embed(reply) => Self::format_reply(reply),
        }
    }

    /// Format an embed as a titled block of fields
    fn format_reply(reply: &Reply) -> String {
        let mut output = String::new();
        output.push_str(&format!("{}\n", reply.title.bold().cyan()));
        output.push_str(&format!("{}\n", "=".repeat(reply.title.chars().count())));

        for field in &reply.fields {
            output.push_str(&format!("{} {}\n", "•".green(), field.name.bold()));
            for line in field.value.lines() {
                output.push_str(&format!("    {}\n", line));
            }
        }

        if let Some(footer) = &reply.footer {
            output.push_str(&format!("\n{}\n", footer.dimmed()));
        }

        output
    }

    fn format_json(outgoing: &Outgoing) -> String {
        serde_json::to_string_pretty(outgoing).unwrap_or_else(|_| "{}".to_string())
    }

    /// Format error message for CLI display
    pub fn format_error(error: &BotError) -> String {
        format!("{} {}", "Error:".red().bold(), error.to_string().red())
    }

    /// Format info message for CLI display
    pub fn format_info(message: &str) -> String {
        format!("{} {}", "Info:".blue().bold(), message)
    }
}
