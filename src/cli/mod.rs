//! Command-line interface for hive-complete
//!
//! This module handles:
//! - Command-line argument parsing using clap
//! - Configuration loading and validation
//! - Running one completion request against a file
//! - Managing the HiveAPIQuery location

pub mod completion;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::buffer::{Buffer, BufferEditor, Scope, Syntax, TextBuffer};
use crate::completion::{
    CompletionContext, CompletionEngine, CompletionResponse, HiveDataProvider, classify,
};
use crate::config::{Config, LogLevel, OutputFormat};
use crate::error::{HiveError, Result};
use crate::formatter::Formatter;
use crate::query::resolve_binary;

/// Context-aware completion for HIVE XML configuration files
#[derive(Parser, Debug)]
#[command(
    name = "hive-complete",
    version,
    about = "Context-aware completion for HIVE XML configuration files",
    long_about = "Suggests object types, parameter names, parameter values, elements and
attributes at a cursor position in a HIVE XML file. Object and parameter data
comes from the HiveAPIQuery tool."
)]
pub struct CliArgs {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config_file: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, value_name = "FORMAT", global = true)]
    pub format: Option<OutputFormat>,

    /// HiveAPIQuery executable (overrides the configuration)
    #[arg(long, value_name = "PATH", global = true)]
    pub query_binary: Option<PathBuf>,

    /// HiveAPIQuery timeout in seconds
    #[arg(long, value_name = "SECONDS", global = true)]
    pub timeout: Option<u64>,

    /// Quiet mode (errors only)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Verbose mode (detailed logging)
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Very verbose mode (trace logging)
    #[arg(long = "vv", global = true)]
    pub very_verbose: bool,

    /// Subcommands
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Where in which document to complete
#[derive(Args, Debug, Clone)]
pub struct CursorArgs {
    /// XML file, or `-` for standard input
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Cursor offset in characters (defaults to the end of the file)
    #[arg(long, value_name = "N", conflicts_with_all = ["line", "column"])]
    pub offset: Option<usize>,

    /// Cursor line, 1-based
    #[arg(long, value_name = "N", requires = "column")]
    pub line: Option<usize>,

    /// Cursor column in characters, 1-based
    #[arg(long, value_name = "N", requires = "line")]
    pub column: Option<usize>,

    /// Word being typed (derived from the text left of the cursor if omitted)
    #[arg(long, value_name = "TEXT")]
    pub prefix: Option<String>,

    /// Treat the document as plain text rather than XML
    #[arg(long)]
    pub plain_text: bool,
}

/// Subcommands for hive-complete
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List completions at a cursor position
    Complete {
        #[command(flatten)]
        cursor: CursorArgs,

        /// Print the document after completion instead of the candidates
        #[arg(long)]
        emit_buffer: bool,
    },

    /// Show how a cursor position is classified
    Context {
        #[command(flatten)]
        cursor: CursorArgs,
    },

    /// Show or change configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Validate the configuration and check the HiveAPIQuery executable
        #[arg(long)]
        check: bool,

        /// Save a new HiveAPIQuery location to the configuration file
        #[arg(long, value_name = "PATH")]
        set_query_binary: Option<PathBuf>,
    },

    /// Generate shell completion script
    Completion {
        /// Shell type (bash, zsh, fish, powershell, elvish)
        #[arg(value_name = "SHELL")]
        shell: String,
    },

    /// Show version information
    Version,
}

/// CLI interface handler
pub struct CliInterface {
    /// Parsed command-line arguments
    args: CliArgs,

    /// Loaded configuration
    config: Config,
}

impl CliInterface {
    /// Parse the process arguments and load configuration
    pub fn new() -> Result<Self> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let config = Self::load_config(&args)?;
        Ok(Self { args, config })
    }

    /// Load configuration from file and merge with arguments
    fn load_config(args: &CliArgs) -> Result<Config> {
        let mut config = Config::load_from_file(args.config_file.as_deref())?;

        // Logging is not up yet, so report directly
        if let Err(e) = config.validate() {
            eprintln!("Warning: Configuration validation failed: {}", e);
            eprintln!("Using default configuration instead.");
            config = Config::default();
            config.apply_env();
        }

        Self::apply_args(&mut config, args);
        Ok(config)
    }

    /// Override configuration values with the ones given on the command line
    fn apply_args(config: &mut Config, args: &CliArgs) {
        if let Some(format) = args.format {
            config.display.format = format;
        }

        if let Some(binary) = &args.query_binary {
            config.query.binary = binary.clone();
        }

        if let Some(timeout) = args.timeout.filter(|&t| t > 0) {
            config.query.timeout_secs = timeout;
        }

        config.logging.level = if args.very_verbose {
            LogLevel::Trace
        } else if args.verbose {
            LogLevel::Debug
        } else if args.quiet {
            LogLevel::Error
        } else {
            config.logging.level
        };
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn args(&self) -> &CliArgs {
        &self.args
    }

    /// The file configuration is read from and saved to
    pub fn config_path(&self) -> PathBuf {
        self.args
            .config_file
            .clone()
            .unwrap_or_else(Config::default_config_path)
    }

    /// Completion engine backed by the configured schema and HiveAPIQuery
    pub fn build_engine(&self) -> CompletionEngine {
        let provider = HiveDataProvider::new(
            self.config.schema_registry(),
            Box::new(self.config.process_query()),
        );
        CompletionEngine::new(Arc::new(provider), self.config.engine_settings())
    }

    fn formatter(&self) -> Formatter {
        Formatter::new(self.config.display.format)
    }

    /// Handle the subcommand
    ///
    /// # Returns
    /// * `Result<bool>` - True if a subcommand ran, false if none was given
    pub fn handle_command(&self) -> Result<bool> {
        match &self.args.command {
            Some(Commands::Complete {
                cursor,
                emit_buffer,
            }) => {
                self.run_complete(cursor, *emit_buffer)?;
                Ok(true)
            }
            Some(Commands::Context { cursor }) => {
                self.run_context(cursor)?;
                Ok(true)
            }
            Some(Commands::Config {
                show,
                check,
                set_query_binary,
            }) => {
                self.handle_config_command(*show, *check, set_query_binary.as_deref())?;
                Ok(true)
            }
            Some(Commands::Completion { shell }) => {
                completion::generate_completion(shell, &mut io::stdout())?;
                Ok(true)
            }
            Some(Commands::Version) => {
                self.show_version();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn run_complete(&self, cursor: &CursorArgs, emit_buffer: bool) -> Result<()> {
        let (mut buffer, location, prefix) = load_cursor(cursor)?;
        let response = self.complete(&mut buffer, location, &prefix);

        if emit_buffer {
            print!("{}", buffer.text());
        } else {
            let output = self.formatter().format(&response)?;
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Ok(())
    }

    fn complete(&self, buffer: &mut TextBuffer, location: usize, prefix: &str) -> CompletionResponse {
        let before = buffer.len();
        let response = self.build_engine().complete(buffer, location, prefix);
        if buffer.len() != before {
            tracing::info!(cursor = buffer.cursor(), "quotes inserted around value");
        }
        response
    }

    fn run_context(&self, cursor: &CursorArgs) -> Result<()> {
        let (buffer, location, prefix) = load_cursor(cursor)?;
        let context = if buffer.in_scope(location, Scope::Xml) {
            classify(&buffer, location, &prefix)
        } else {
            CompletionContext::None
        };
        println!("{}", self.formatter().format_context(context)?);
        Ok(())
    }

    /// Handle config subcommand
    fn handle_config_command(
        &self,
        show: bool,
        check: bool,
        set_query_binary: Option<&Path>,
    ) -> Result<()> {
        if let Some(binary) = set_query_binary {
            self.set_query_binary(binary)?;
        }

        if check {
            self.check_config();
        }

        if show || (!check && set_query_binary.is_none()) {
            self.show_config()?;
        }

        Ok(())
    }

    /// Persist a new HiveAPIQuery location, then verify it
    fn set_query_binary(&self, binary: &Path) -> Result<()> {
        let path = self.config_path();

        // Start from the file itself so overrides from the command line and
        // the environment are not persisted
        let mut stored = if path.is_file() {
            Config::from_file(&path)?
        } else {
            Config::default()
        };
        stored.query.binary = binary.to_path_buf();
        stored.save(&path)?;
        println!("Saved query binary to {}", path.display());

        match resolve_binary(binary) {
            Ok(resolved) => println!("✅ HiveAPIQuery found at {}", resolved.display()),
            Err(e) => println!("❌ {}", e),
        }
        Ok(())
    }

    /// Validate the configuration and locate the HiveAPIQuery executable
    fn check_config(&self) {
        println!("Configuration file: {}", self.config_path().display());

        match self.config.validate() {
            Ok(()) => println!("✅ Configuration is valid"),
            Err(e) => println!("❌ Configuration is invalid: {}", e),
        }

        match resolve_binary(&self.config.query.binary) {
            Ok(resolved) => println!("✅ HiveAPIQuery found at {}", resolved.display()),
            Err(e) => {
                println!("❌ {}", e);
                println!("   Object and parameter completions are disabled until this is fixed.");
                println!("   Use `hive-complete config --set-query-binary <PATH>` to set it.");
            }
        }
    }

    fn show_config(&self) -> Result<()> {
        println!("# {}", self.config_path().display());
        print!("{}", self.config.to_toml()?);
        Ok(())
    }

    fn show_version(&self) {
        println!("hive-complete version {}", env!("CARGO_PKG_VERSION"));
    }
}

/// Read the document and work out the cursor and the word being typed
fn load_cursor(cursor: &CursorArgs) -> Result<(TextBuffer, usize, String)> {
    let text = read_document(&cursor.file)?;
    let location = resolve_location(&text, cursor.offset, cursor.line.zip(cursor.column))?;

    let syntax = if cursor.plain_text {
        Syntax::Plain
    } else {
        Syntax::Xml
    };
    let mut buffer = TextBuffer::with_syntax(text, syntax);
    buffer.set_cursor(location);

    let prefix = match &cursor.prefix {
        Some(prefix) => prefix.clone(),
        None => derive_prefix(buffer.text(), location),
    };
    Ok((buffer, location, prefix))
}

fn read_document(file: &Path) -> Result<String> {
    if file == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    Ok(std::fs::read_to_string(file)?)
}

/// Character offset of the cursor
///
/// An explicit offset wins; otherwise a 1-based line and column; otherwise
/// the end of the text.
pub fn resolve_location(
    text: &str,
    offset: Option<usize>,
    line_column: Option<(usize, usize)>,
) -> Result<usize> {
    let len = text.chars().count();

    if let Some(offset) = offset {
        if offset > len {
            return Err(HiveError::Generic(format!(
                "offset {} is past the end of the document ({} characters)",
                offset, len
            )));
        }
        return Ok(offset);
    }

    let Some((line, column)) = line_column else {
        return Ok(len);
    };
    if line == 0 || column == 0 {
        return Err(HiveError::Generic(
            "line and column are 1-based".to_string(),
        ));
    }

    let mut start = 0;
    for (index, content) in text.split('\n').enumerate() {
        let width = content.chars().count();
        if index + 1 == line {
            if column > width + 1 {
                return Err(HiveError::Generic(format!(
                    "column {} is past the end of line {}",
                    column, line
                )));
            }
            return Ok(start + column - 1);
        }
        start += width + 1;
    }

    Err(HiveError::Generic(format!(
        "line {} is past the end of the document",
        line
    )))
}

/// The word left of `location`, the way editors split words for completion
pub fn derive_prefix(text: &str, location: usize) -> String {
    let before: Vec<char> = text.chars().take(location).collect();
    let start = before
        .iter()
        .rposition(|c| !(c.is_alphanumeric() || *c == '_'))
        .map_or(0, |i| i + 1);
    before[start..].iter().collect()
}
