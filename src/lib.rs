//! HIVE XML completion library
//!
//! Context-aware autocompletion for HIVE XML configuration files. Given the
//! text of a (usually half-typed) document and a cursor position, the library
//! works out what is being typed and suggests candidates for it.
//!
//! # Modules
//!
//! - `buffer`: The editor buffer capabilities completion relies on
//! - `tags`: Locating and walking tags in raw markup
//! - `completion`: Context classification and the completion engine
//! - `query`: Client for the HiveAPIQuery executable
//! - `schema`: Known elements and their children and attributes
//! - `config`: Configuration management
//! - `formatter`: Output formatting for the command-line tool
//! - `cli`: Command-line interface and argument parsing
//! - `error`: Error types and handling
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use hive_complete::{CompletionEngine, Config, HiveDataProvider, TextBuffer};
//!
//! let config = Config::load_from_file(None)?;
//! let provider = HiveDataProvider::new(
//!     config.schema_registry(),
//!     Box::new(config.process_query()),
//! );
//! let engine = CompletionEngine::new(Arc::new(provider), config.engine_settings());
//!
//! let mut buffer = TextBuffer::new("<hive>\n  <object type=\"Sensor::");
//! let location = buffer.text().chars().count();
//! for item in engine.complete(&mut buffer, location, "").items {
//!     println!("{}", item.label);
//! }
//! # Ok::<(), hive_complete::HiveError>(())
//! ```

pub mod buffer;
pub mod cli;
pub mod completion;
pub mod config;
pub mod error;
pub mod formatter;
pub mod query;
pub mod schema;
pub mod tags;

// Re-export commonly used types
pub use buffer::{Buffer, BufferEditor, TextBuffer};
pub use completion::{CompletionContext, CompletionEngine, CompletionResponse, HiveDataProvider};
pub use config::Config;
pub use error::{HiveError, Result};
pub use formatter::Formatter;
pub use query::ProcessQuery;
pub use schema::SchemaRegistry;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library version string
pub fn version() -> &'static str {
    VERSION
}
