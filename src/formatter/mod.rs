//! Output formatting for the command-line tool
//!
//! This module renders completion responses and contexts:
//! - Plain text, one candidate per line (for editor integrations)
//! - JSON documents
//! - ASCII tables for reading in a terminal

mod table;

use serde_json::{Value, json};

use crate::completion::{CompletionContext, CompletionResponse};
use crate::config::OutputFormat;
use crate::error::{HiveError, Result};

pub use table::{TableFormatter, TableStyle};

/// Main formatter for completion output
pub struct Formatter {
    /// Output format type
    format_type: OutputFormat,

    /// Used for [`OutputFormat::Table`]
    table: TableFormatter,
}

impl Formatter {
    pub fn new(format_type: OutputFormat) -> Self {
        Self {
            format_type,
            table: TableFormatter::new(),
        }
    }

    pub fn with_table(mut self, table: TableFormatter) -> Self {
        self.table = table;
        self
    }

    /// Format a completion response according to the configured format
    pub fn format(&self, response: &CompletionResponse) -> Result<String> {
        match self.format_type {
            OutputFormat::Plain => Ok(self.format_plain(response)),
            OutputFormat::Json => pretty(&Self::response_json(response)),
            OutputFormat::Table => Ok(self.table.format(&response.items)),
        }
    }

    /// Format a bare classification result
    pub fn format_context(&self, context: CompletionContext) -> Result<String> {
        match self.format_type {
            OutputFormat::Plain => Ok(context.name().to_string()),
            OutputFormat::Json => pretty(&Self::context_json(context)),
            OutputFormat::Table => Ok(self.table.format_context(context)),
        }
    }

    /// `insert<TAB>label` per line; labels may themselves contain a tab
    fn format_plain(&self, response: &CompletionResponse) -> String {
        response
            .items
            .iter()
            .map(|pair| format!("{}\t{}", pair.insert, pair.label))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn context_json(context: CompletionContext) -> Value {
        json!({
            "context": context.name(),
            "code": context.code(),
        })
    }

    fn response_json(response: &CompletionResponse) -> Value {
        json!({
            "context": response.context.name(),
            "code": response.context.code(),
            "inhibit_host_completions": response.inhibit_host_completions,
            "items": response.items,
        })
    }
}

fn pretty(value: &Value) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(|e| HiveError::Generic(e.to_string()))
}
