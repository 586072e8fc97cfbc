//! Opaque scoring/generation oracles.
//!
//! The engine treats embedding and text generation as narrow external
//! interfaces: [`EmbeddingOracle`] and [`GenerationOracle`]. The one shipped
//! implementation speaks the OpenAI-compatible HTTP dialect.

mod openai;
mod provider;

pub use openai::OpenAiCompatOracle;
pub use provider::{EmbeddingOracle, GenerationOracle};
