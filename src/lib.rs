//! casefile — query-adaptive multi-retriever fusion engine for answering
//! questions against a single ingested document.
//!
//! Ingest once (segment, chunk, build three indexes), ask many times
//! (classify, fan out to the indexes concurrently, fuse, assemble evidence,
//! generate). The embedding and generation models are opaque oracles behind
//! the [`oracle`] traits.

pub mod chunk;
pub mod chunking;
pub mod classify;
pub mod config;
pub mod context;
pub mod engine;
pub mod errors;
pub mod fusion;
pub mod index;
pub mod logging;
pub mod oracle;
pub mod prompt;

#[cfg(test)]
pub(crate) mod testing;

pub use chunk::{Chunk, MetaValue, Segment};
pub use classify::{classify, QueryClass, RetrievalProfile};
pub use config::EngineConfig;
pub use engine::{EngineStatus, RagEngine, NO_DOCUMENT_ANSWER};
pub use errors::EngineError;
