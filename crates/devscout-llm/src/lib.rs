//! OpenAI-compatible chat-completions client used for repository selection,
//! profile reports, and candidate rankings.

pub mod client;
pub mod error;

mod service;

pub use client::ChatClient;
pub use error::LlmError;
