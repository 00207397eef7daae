// Page renderer implementations
pub mod renderer_trait;
pub mod mock_renderer;
pub mod webdriver_renderer;
pub mod http_renderer;

pub use renderer_trait::*;
pub use mock_renderer::*;
pub use webdriver_renderer::*;
pub use http_renderer::*;
