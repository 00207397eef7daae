pub mod engine;
pub mod renderers;
pub mod chat;
pub mod cli;
pub mod utils;

pub use engine::*;
pub use renderers::*;
pub use chat::*;
pub use cli::*;
pub use utils::*;
