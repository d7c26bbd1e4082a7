//! Anthropic Messages API adapter for the text-generation port.

pub mod client;
pub mod retry;
pub mod types;

pub use client::AnthropicTextGenerator;
pub use retry::RetryPolicy;
pub use types::{ContentBlock, Message, MessageRequest, MessageResponse, Usage};
