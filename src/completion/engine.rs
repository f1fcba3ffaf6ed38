//! Completion engine - orchestrates the completion flow
//!
//! Ties the classifier, the tag helpers and the data provider together and
//! answers one completion request at a time. The engine is the explicit
//! session object: it is built once with its provider and settings and then
//! handed every request.

use std::sync::Arc;

use super::classifier::classify;
use super::context::CompletionContext;
use super::provider::{CompletionDataProvider, CompletionPair, ParamInfo, ParamValue};
use crate::buffer::{Buffer, BufferEditor, Scope};
use crate::error::QueryError;
use crate::tags::{
    TagCursor, current_element, current_param_name, parent_element, parent_object_type,
    value_prefix,
};

/// Engine settings read from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Ask the host to hide its own completions when we have results
    pub inhibit_other_completions: bool,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            inhibit_other_completions: true,
        }
    }
}

/// Answer to a completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Context the cursor was classified as
    pub context: CompletionContext,
    /// Candidates, sorted by label
    pub items: Vec<CompletionPair>,
    /// Whether the host should suppress its word completions
    pub inhibit_host_completions: bool,
}

impl CompletionResponse {
    fn empty(context: CompletionContext) -> Self {
        Self {
            context,
            items: Vec::new(),
            inhibit_host_completions: false,
        }
    }
}

/// Host boundary: the editor adapter forwards completion requests here
pub trait CompletionHandler {
    fn on_query_completions(
        &self,
        buffer: &mut dyn BufferEditor,
        location: usize,
        prefix: &str,
    ) -> CompletionResponse;
}

/// Main completion engine
pub struct CompletionEngine {
    provider: Arc<dyn CompletionDataProvider>,
    settings: EngineSettings,
}

impl CompletionEngine {
    pub fn new(provider: Arc<dyn CompletionDataProvider>, settings: EngineSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> EngineSettings {
        self.settings
    }

    /// Complete at `location` in `buffer`
    ///
    /// # Arguments
    /// * `buffer` - The buffer; only edited to add missing quotes
    /// * `location` - Cursor offset in characters
    /// * `prefix` - The word the host will replace with the chosen candidate
    pub fn complete<E: BufferEditor + ?Sized>(
        &self,
        buffer: &mut E,
        location: usize,
        prefix: &str,
    ) -> CompletionResponse {
        // 1. Only XML buffers get completions
        if !buffer.in_scope(location, Scope::Xml) {
            return CompletionResponse::empty(CompletionContext::None);
        }

        // 2. Classify the cursor position
        let context = classify(&*buffer, location, prefix);

        // 3. Look up candidates, adding quotes to the buffer where needed
        let mut items = match self.fetch(buffer, context, location, prefix) {
            Ok(items) => items,
            Err(err) => {
                tracing::warn!(context = context.name(), error = %err, "completion data unavailable");
                Vec::new()
            }
        };

        // 4. Sort and decide whether to hide the host's completions
        items.sort();
        let inhibit_host_completions = self.settings.inhibit_other_completions && !items.is_empty();

        tracing::debug!(context = context.name(), count = items.len(), "completion finished");
        CompletionResponse {
            context,
            items,
            inhibit_host_completions,
        }
    }

    fn fetch<E: BufferEditor + ?Sized>(
        &self,
        buffer: &mut E,
        context: CompletionContext,
        location: usize,
        prefix: &str,
    ) -> Result<Vec<CompletionPair>, QueryError> {
        // One tag scan per request; the cursor is released before any edit
        let items = {
            let mut tags = TagCursor::new(&*buffer, location);
            self.lookup(&mut tags, context, location, prefix)
        };

        // The value was typed without quotes: add them whatever the lookup gave
        if matches!(
            context,
            CompletionContext::ParamValueNoQuotes | CompletionContext::ObjectTypeColonNoQuotes
        ) {
            let typed = value_prefix(&*buffer, location, prefix);
            wrap_in_quotes(buffer, location, typed.chars().count() + prefix.chars().count());
        }

        items
    }

    fn lookup<B: Buffer + ?Sized>(
        &self,
        tags: &mut TagCursor<'_, B>,
        context: CompletionContext,
        location: usize,
        prefix: &str,
    ) -> Result<Vec<CompletionPair>, QueryError> {
        let buffer = tags.buffer();
        match context {
            CompletionContext::ObjectType => self.provider.object_types(""),
            CompletionContext::ObjectTypeNoQuotes => Ok(quote_all(self.provider.object_types("")?)),
            CompletionContext::ParamName | CompletionContext::ParamNameNoQuotes => {
                let object_type = parent_object_type(tags, location).unwrap_or_default();
                let pairs: Vec<_> = self
                    .provider
                    .param_names(&object_type)?
                    .iter()
                    .map(ParamInfo::to_pair)
                    .collect();
                Ok(if context.needs_quotes() {
                    quote_all(pairs)
                } else {
                    pairs
                })
            }
            CompletionContext::Element => {
                let parent = parent_element(tags, location);
                Ok(words(self.provider.element_children(&parent)?))
            }
            CompletionContext::Attribute => match current_element(buffer, location) {
                Some(element) => Ok(words(self.provider.element_attributes(&element)?)),
                None => Ok(Vec::new()),
            },
            CompletionContext::ParamValue | CompletionContext::ParamValueNoQuotes => {
                let typed = value_prefix(buffer, location, prefix);
                let param_name = current_param_name(buffer, location).unwrap_or_default();
                let object_type = parent_object_type(tags, location).unwrap_or_default();
                Ok(self
                    .provider
                    .param_values(&param_name, &object_type, &typed)?
                    .iter()
                    .map(ParamValue::to_pair)
                    .collect())
            }
            CompletionContext::ObjectTypeColon | CompletionContext::ObjectTypeColonNoQuotes => {
                let namespace = value_prefix(buffer, location, prefix);
                if namespace.ends_with("::") {
                    self.provider.object_types(&namespace)
                } else {
                    Ok(Vec::new())
                }
            }
            CompletionContext::AttributeValue
            | CompletionContext::AttributeValueNoQuotes
            | CompletionContext::None => Ok(Vec::new()),
        }
    }
}

impl CompletionHandler for CompletionEngine {
    fn on_query_completions(
        &self,
        buffer: &mut dyn BufferEditor,
        location: usize,
        prefix: &str,
    ) -> CompletionResponse {
        self.complete(buffer, location, prefix)
    }
}

fn words(names: Vec<String>) -> Vec<CompletionPair> {
    names.into_iter().map(CompletionPair::word).collect()
}

fn quote_all(pairs: Vec<CompletionPair>) -> Vec<CompletionPair> {
    pairs.into_iter().map(CompletionPair::quoted).collect()
}

/// Put quotes around the `typed_len` characters before `location` and leave
/// the cursor before the closing quote.
fn wrap_in_quotes<E: BufferEditor + ?Sized>(buffer: &mut E, location: usize, typed_len: usize) {
    let start = location.saturating_sub(typed_len);
    buffer.insert(start, "\"");
    // The opening quote shifted the cursor position by one
    buffer.insert(location + 1, "\"");
    buffer.move_cursor(-1);
}
