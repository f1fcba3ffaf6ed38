//! Error handling for hive-complete.
//!
//! The completion path itself never surfaces errors to the editor: provider
//! failures are logged and turned into empty completion lists at the engine
//! boundary. The types here are used by the configuration layer, the query
//! process client, and the command-line front end.
//!
//! # Example
//!
//! ```rust,no_run
//! use hive_complete::error::{HiveError, QueryError, Result};
//!
//! fn lookup() -> Result<Vec<String>> {
//!     Err(QueryError::NotFound("HiveAPIQuery".into()).into())
//! }
//!
//! if let Err(HiveError::Query(e)) = lookup() {
//!     eprintln!("{e}");
//! }
//! ```

pub mod kinds;

pub use kinds::{ConfigError, HiveError, QueryError, Result};
