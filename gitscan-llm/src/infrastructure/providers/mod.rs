//! Backend provider implementations

pub mod anthropic;
pub mod google_ai;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use google_ai::GoogleAiProvider;
pub use openai::OpenAiProvider;
