//! Context-aware completion for HIVE XML files
//!
//! The completion system works on the raw text of an XML buffer that is
//! usually malformed because the user is in the middle of typing. Nothing is
//! parsed into a tree; every request looks at the unfinished tag left of the
//! cursor and at the tags around it.
//!
//! # Architecture
//!
//! - **token_stream**: splits tag text into markup tokens
//! - **context**: what kind of token is being typed
//! - **classifier**: maps the tokens of the current tag to a context
//! - **provider**: candidate data from the schema and HiveAPIQuery
//! - **engine**: orchestrates one completion request
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use hive_complete::buffer::TextBuffer;
//! use hive_complete::completion::{CompletionEngine, EngineSettings, HiveDataProvider};
//! use hive_complete::query::ProcessQuery;
//! use hive_complete::schema::SchemaRegistry;
//!
//! let provider = HiveDataProvider::new(
//!     SchemaRegistry::hive(),
//!     Box::new(ProcessQuery::new("HiveAPIQuery")),
//! );
//! let engine = CompletionEngine::new(Arc::new(provider), EngineSettings::default());
//!
//! let mut buffer = TextBuffer::new("<hive>\n  <object type=\"");
//! let location = buffer.text().chars().count();
//! let response = engine.complete(&mut buffer, location, "");
//! // Object types reported by HiveAPIQuery
//! ```

pub mod classifier;
pub mod context;
mod engine;
mod provider;
pub mod token_stream;

#[cfg(test)]
mod tests;

pub use classifier::{MAX_TAG_SCAN, classify, classify_text};
pub use context::CompletionContext;
pub use engine::{CompletionEngine, CompletionHandler, CompletionResponse, EngineSettings};
pub use provider::{
    CompletionDataProvider, CompletionPair, DIS_ENUMERATION, HiveDataProvider, MIN_DIS_PREFIX,
    ParamInfo, ParamValue,
};
