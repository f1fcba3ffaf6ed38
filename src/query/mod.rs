//! HiveAPIQuery invocation
//!
//! The HIVE data dictionary is served by an external executable that answers
//! one query per run with a JSON array on stdout. [`ApiQuery`] is the seam the
//! completion provider talks to; [`ProcessQuery`] is the real implementation
//! and runs the executable under a hard timeout.

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::process::Command;
use tokio::runtime::{Handle, RuntimeFlavor};

use crate::error::QueryError;

/// Upper bound on a single query
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Executable name looked up on `PATH` when nothing else is configured
#[cfg(windows)]
pub const DEFAULT_BINARY: &str = "HiveAPIQuery.exe";
#[cfg(not(windows))]
pub const DEFAULT_BINARY: &str = "HiveAPIQuery";

/// Query sub-command understood by HiveAPIQuery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Object types, optionally filtered by namespace prefix
    Type,
    /// Parameters (channels) of an object type
    Channel,
    /// Known values of a parameter
    Value,
    /// Enumerations matching a DIS prefix
    Dis,
}

impl QueryMode {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryMode::Type => "type",
            QueryMode::Channel => "channel",
            QueryMode::Value => "value",
            QueryMode::Dis => "dis",
        }
    }
}

/// One HiveAPIQuery call
///
/// Empty filters are never passed on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub mode: QueryMode,
    pub type_filter: Option<String>,
    pub channel: Option<String>,
    pub value: Option<String>,
    pub dis: Option<String>,
}

impl QueryRequest {
    pub fn new(mode: QueryMode) -> Self {
        Self {
            mode,
            type_filter: None,
            channel: None,
            value: None,
            dis: None,
        }
    }

    pub fn object_type(mut self, object_type: impl Into<String>) -> Self {
        self.type_filter = non_empty(object_type.into());
        self
    }

    pub fn channel(mut self, channel: impl Into<String>) -> Self {
        self.channel = non_empty(channel.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = non_empty(value.into());
        self
    }

    pub fn dis(mut self, dis: impl Into<String>) -> Self {
        self.dis = non_empty(dis.into());
        self
    }

    /// Command-line arguments, starting with the mode
    pub fn args(&self) -> Vec<String> {
        let filters = [
            ("type", &self.type_filter),
            ("channel", &self.channel),
            ("value", &self.value),
            ("dis", &self.dis),
        ];

        let mut args = vec![self.mode.as_str().to_string()];
        for (flag, filter) in filters {
            if let Some(filter) = filter {
                args.push(format!("--{flag}={filter}"));
            }
        }
        args
    }
}

fn non_empty(s: String) -> Option<String> {
    (!s.is_empty()).then_some(s)
}

/// Backend answering data dictionary queries
pub trait ApiQuery: Send + Sync {
    fn query(&self, request: &QueryRequest) -> Result<Value, QueryError>;
}

/// Resolve the configured binary to an executable file.
///
/// A bare program name is searched on `PATH`; anything containing a path
/// separator must exist and be executable as given.
pub fn resolve_binary(binary: &Path) -> Result<PathBuf, QueryError> {
    let shown = || binary.display().to_string();

    if binary.components().count() == 1 && !binary.is_file() {
        let paths = std::env::var_os("PATH").ok_or_else(|| QueryError::NotFound(shown()))?;
        return std::env::split_paths(&paths)
            .map(|dir| PathBuf::from(dir.to_string_lossy().trim_matches('"')).join(binary))
            .find(|candidate| candidate.is_file() && is_executable(candidate))
            .ok_or_else(|| QueryError::NotFound(shown()));
    }

    if !binary.is_file() {
        return Err(QueryError::NotFound(shown()));
    }
    if !is_executable(binary) {
        return Err(QueryError::NotExecutable(shown()));
    }
    Ok(binary.to_path_buf())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Runs HiveAPIQuery as a child process
#[derive(Debug, Clone)]
pub struct ProcessQuery {
    binary: PathBuf,
    timeout: Duration,
}

impl ProcessQuery {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn run(program: PathBuf, args: Vec<String>, limit: Duration) -> Result<Value, QueryError> {
        let output = Command::new(&program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(limit, output)
            .await
            .map_err(|_| QueryError::Timeout(limit))?
            .map_err(QueryError::Spawn)?;

        if !output.status.success() {
            return Err(QueryError::Failed {
                status: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(serde_json::from_str(stdout.trim())?)
    }
}

impl ApiQuery for ProcessQuery {
    fn query(&self, request: &QueryRequest) -> Result<Value, QueryError> {
        let program = resolve_binary(&self.binary)?;
        let args = request.args();
        tracing::debug!(binary = %program.display(), ?args, "running HiveAPIQuery");

        block_on(Self::run(program, args, self.timeout))?
    }
}

/// Drive `future` to completion from synchronous code, inside or outside a
/// tokio runtime.
fn block_on<F>(future: F) -> Result<F::Output, QueryError>
where
    F: Future + Send,
    F::Output: Send,
{
    match Handle::try_current() {
        Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
            Ok(tokio::task::block_in_place(|| handle.block_on(future)))
        }
        // A current-thread runtime cannot be blocked from within
        Ok(_) => std::thread::scope(|scope| {
            scope
                .spawn(|| standalone_block_on(future))
                .join()
                .map_err(|_| QueryError::Spawn(io::Error::other("query thread panicked")))?
        }),
        Err(_) => standalone_block_on(future),
    }
}

fn standalone_block_on<F: Future>(future: F) -> Result<F::Output, QueryError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(QueryError::Spawn)?;
    Ok(runtime.block_on(future))
}
