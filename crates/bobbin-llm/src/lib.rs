//! OpenAI-compatible chat plugin for bobbin.
//!
//! [`OpenAiChatter`] talks to any endpoint that follows the OpenAI chat
//! completion format -- OpenAI itself, Groq, DeepSeek, Mistral, OpenRouter,
//! and so on -- by changing the base URL. It fulfills the full `Model`
//! capability: blocking chat, SSE token streaming, and model listing.
//!
//! [`OpenAiFactory`] is the matching plugin factory: it materializes a
//! configured chat stage from the `ApiKey` / `ApiBaseUrl` / `Model` settings
//! resolved by the configurator.

pub mod error;
pub mod openai;
pub mod sse;
pub mod types;

pub use error::{ProviderError, Result};
pub use openai::{OpenAiChatter, OpenAiFactory};
