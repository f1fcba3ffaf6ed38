use std::{fmt, io, time::Duration};

/// Crate-wide `Result` type using [`HiveError`] as the error.
pub type Result<T> = std::result::Result<T, HiveError>;

/// Top-level error type for hive-complete operations.
#[derive(Debug)]
pub enum HiveError {
    /// Configuration errors.
    Config(ConfigError),

    /// API query process errors.
    Query(QueryError),

    /// I/O errors.
    Io(io::Error),

    /// Generic error with a free-form message.
    Generic(String),
}

/// Configuration-specific errors.
#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read or written.
    Unreadable { path: String, reason: String },

    /// Invalid config format.
    InvalidFormat(String),

    /// Invalid field value.
    InvalidValue { field: String, value: String },
}

/// Errors raised while talking to the API query executable.
///
/// Every variant is a "provider unavailable" condition: the engine logs it and
/// answers with an empty completion list.
#[derive(Debug)]
pub enum QueryError {
    /// The executable does not exist (or is not on `PATH`).
    NotFound(String),

    /// The path exists but cannot be executed.
    NotExecutable(String),

    /// Spawning or waiting on the process failed.
    Spawn(io::Error),

    /// The process did not finish within the allowed time.
    Timeout(Duration),

    /// The process exited unsuccessfully.
    Failed { status: Option<i32>, stderr: String },

    /// Standard output was not the expected JSON.
    InvalidOutput(String),
}

/* ========================= Display & Error impls ========================= */

impl fmt::Display for HiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HiveError::Config(e) => write!(f, "Configuration error: {e}"),
            HiveError::Query(e) => write!(f, "API query error: {e}"),
            HiveError::Io(e) => write!(f, "I/O error: {e}"),
            HiveError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { path, reason } => {
                write!(f, "Cannot access config file {path}: {reason}")
            }
            ConfigError::InvalidFormat(msg) => write!(f, "Invalid config format: {msg}"),
            ConfigError::InvalidValue { field, value } => {
                write!(f, "Invalid value '{value}' for field '{field}'")
            }
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::NotFound(path) => write!(f, "HiveAPIQuery binary was not found: {path}"),
            QueryError::NotExecutable(path) => write!(f, "HiveAPIQuery binary is not executable: {path}"),
            QueryError::Spawn(e) => write!(f, "Failed to run HiveAPIQuery: {e}"),
            QueryError::Timeout(limit) => {
                write!(f, "HiveAPIQuery did not answer within {}ms", limit.as_millis())
            }
            QueryError::Failed { status, stderr } => match status {
                Some(code) => write!(f, "HiveAPIQuery exited with status {code}: {stderr}"),
                None => write!(f, "HiveAPIQuery was terminated by a signal: {stderr}"),
            },
            QueryError::InvalidOutput(msg) => {
                write!(f, "HiveAPIQuery returned output that is not valid JSON: {msg}")
            }
        }
    }
}

impl std::error::Error for HiveError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for QueryError {}

/* ========================= Conversions to HiveError ========================= */

impl From<io::Error> for HiveError {
    fn from(err: io::Error) -> Self {
        HiveError::Io(err)
    }
}

impl From<ConfigError> for HiveError {
    fn from(err: ConfigError) -> Self {
        HiveError::Config(err)
    }
}

impl From<QueryError> for HiveError {
    fn from(err: QueryError) -> Self {
        HiveError::Query(err)
    }
}

impl From<String> for HiveError {
    fn from(msg: String) -> Self {
        HiveError::Generic(msg)
    }
}

impl From<&str> for HiveError {
    fn from(msg: &str) -> Self {
        HiveError::Generic(msg.to_owned())
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::InvalidFormat(err.to_string())
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::InvalidOutput(err.to_string())
    }
}
