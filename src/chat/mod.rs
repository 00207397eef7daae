// Chat channel implementations
pub mod chat_trait;
pub mod discord_chat;
pub mod console_chat;

pub use chat_trait::*;
pub use discord_chat::*;
pub use console_chat::*;
