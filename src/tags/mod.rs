//! Tag-level navigation without a DOM
//!
//! - **locator**: finds tag and comment regions with a single regex scan
//! - **cursor**: steps through those regions and matches open/close tags
//!
//! The free functions below answer the questions the completion engine asks
//! about the tag being typed and its enclosing element.

mod cursor;
mod locator;

pub use cursor::{Direction, Skip, TagCursor};
pub use locator::{TAG_PATTERN, TagKind, locate};

use crate::buffer::{Buffer, Region};
use crate::completion::token_stream::{attribute_value, tokenize};

/// Element name used when a tag has no enclosing element
pub const ROOT_ELEMENT: &str = "root";

/// Offset of the unmatched `<` left of `location`.
///
/// Scans backward until a `<` (found) or a `>` (the cursor is between tags).
/// With `limit`, at most `limit + 1` characters are examined.
pub fn tag_start_before<B: Buffer + ?Sized>(
    buffer: &B,
    location: usize,
    limit: Option<usize>,
) -> Option<usize> {
    for (steps, offset) in (0..location).rev().enumerate() {
        match buffer.char_at(offset) {
            Some('<') => return Some(offset),
            Some('>') => return None,
            _ => {}
        }
        if limit.is_some_and(|max| steps >= max) {
            return None;
        }
    }
    None
}

/// Tokens of the (possibly unfinished) tag the cursor is in
fn open_tag_tokens<B: Buffer + ?Sized>(buffer: &B, location: usize) -> Option<Vec<String>> {
    let start = tag_start_before(buffer, location, None)?;
    Some(tokenize(&buffer.substr(Region::new(start, location))))
}

/// Element name of the tag the cursor is in
pub fn current_element<B: Buffer + ?Sized>(buffer: &B, location: usize) -> Option<String> {
    open_tag_tokens(buffer, location)?.get(1).cloned()
}

/// Value of the `name` attribute typed so far in the tag the cursor is in.
///
/// Does not check that the tag is a `param` tag.
pub fn current_param_name<B: Buffer + ?Sized>(buffer: &B, location: usize) -> Option<String> {
    attribute_value(&open_tag_tokens(buffer, location)?, "name")
}

/// Element name of the tag enclosing `location`, or [`ROOT_ELEMENT`].
///
/// `tags` is re-seeked to `location`; its regions are reused as they are.
pub fn parent_element<B: Buffer + ?Sized>(tags: &mut TagCursor<'_, B>, location: usize) -> String {
    tags.reinitialize(location);
    match tags.parent() {
        Some(parent) => tokenize(&tags.buffer().substr(parent))
            .into_iter()
            .nth(1)
            .unwrap_or_default(),
        None => ROOT_ELEMENT.to_string(),
    }
}

/// `type` attribute of the tag enclosing `location`.
///
/// The parent is not checked to be an `object` tag. An empty `type=""` is
/// `None`.
pub fn parent_object_type<B: Buffer + ?Sized>(
    tags: &mut TagCursor<'_, B>,
    location: usize,
) -> Option<String> {
    tags.reinitialize(location);
    let parent = tags.parent()?;
    attribute_value(&tokenize(&tags.buffer().substr(parent)), "type")
}

/// Text of the attribute value typed before `location`, minus the word being
/// completed.
///
/// For `type="Sensor::Ra` with prefix `Ra` this is `Sensor::`.
pub fn value_prefix<B: Buffer + ?Sized>(buffer: &B, location: usize, prefix: &str) -> String {
    let start = (0..location)
        .rev()
        .find(|&offset| matches!(buffer.char_at(offset), Some('=' | '"')))
        .map_or(0, |offset| offset + 1);

    let typed = buffer.substr(Region::new(start, location));
    match typed.strip_suffix(prefix) {
        Some(head) => head.to_string(),
        None => typed,
    }
}
