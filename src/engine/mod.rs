// Command resolution components
pub mod bot;
pub mod command;
pub mod market_extractor;
pub mod query_parser;
pub mod reply_formatter;
pub mod showzone;

pub use bot::*;
pub use command::*;
pub use market_extractor::*;
pub use query_parser::*;
pub use reply_formatter::*;
pub use showzone::*;
