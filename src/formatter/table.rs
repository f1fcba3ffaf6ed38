//! Table formatting for completion candidates using tabled

use tabled::{
    Table,
    builder::Builder,
    settings::{
        Alignment, Modify,
        object::{Columns, Rows},
        width::Width,
        Style,
    },
};

use crate::completion::{CompletionContext, CompletionPair};

/// Maximum width for a single column (characters)
const DEFAULT_MAX_COLUMN_WIDTH: usize = 48;

/// Available table styles
#[derive(Debug, Clone, Copy)]
pub enum TableStyle {
    /// Modern style with box-drawing characters
    Modern,
    /// ASCII style with basic characters
    Ascii,
    /// Markdown style
    Markdown,
}

/// Table formatter for completion candidates
pub struct TableFormatter {
    /// Maximum column width
    max_column_width: usize,

    /// Table style
    style: TableStyle,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            style: TableStyle::Modern,
        }
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    /// One row per candidate: name, description and insertion text
    pub fn format(&self, items: &[CompletionPair]) -> String {
        if items.is_empty() {
            return "(no completions)".to_string();
        }

        let mut builder = Builder::default();
        builder.push_record(["Candidate", "Description", "Inserts"]);
        for pair in items {
            let (name, description) = pair
                .label
                .split_once('\t')
                .unwrap_or((pair.label.as_str(), ""));
            builder.push_record([name, description, pair.insert.as_str()]);
        }

        self.finish(builder.build(), 3)
    }

    /// Single-row table for a classification result
    pub fn format_context(&self, context: CompletionContext) -> String {
        let mut builder = Builder::default();
        builder.push_record(["Context", "Code"]);
        builder.push_record([context.name().to_string(), context.code().to_string()]);
        self.finish(builder.build(), 2)
    }

    fn finish(&self, mut table: Table, columns: usize) -> String {
        self.apply_style(&mut table);

        // Wrap long values instead of truncating them
        for i in 0..columns {
            table.with(Modify::new(Columns::new(i..=i)).with(Width::wrap(self.max_column_width)));
        }
        table.with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    fn apply_style(&self, table: &mut Table) {
        match self.style {
            TableStyle::Modern => table.with(Style::modern()),
            TableStyle::Ascii => table.with(Style::ascii()),
            TableStyle::Markdown => table.with(Style::markdown()),
        };
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}
