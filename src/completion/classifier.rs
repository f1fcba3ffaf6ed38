//! Context classification
//!
//! Decides what is being typed at the cursor from the text of the current,
//! unfinished tag. The decision is a fixed list of pattern rules over the tail
//! of the token stream, tried in priority order; the first match wins. The
//! input is expected to be malformed (the user is mid-edit), so every rule only
//! looks at tokens it can see and anything unrecognised falls through to
//! [`CompletionContext::None`].

use super::context::CompletionContext;
use super::token_stream::tokenize;
use crate::buffer::{Buffer, Region, TextBuffer};
use crate::tags::tag_start_before;

/// How far back from the cursor to look for the `<` of the current tag
pub const MAX_TAG_SCAN: usize = 9000;

/// Classify the cursor position in `buffer`.
///
/// `prefix` is the word the host considers "being typed", which is dropped
/// from the token stream before matching.
pub fn classify<B: Buffer + ?Sized>(buffer: &B, location: usize, prefix: &str) -> CompletionContext {
    let Some(start) = tag_start_before(buffer, location, Some(MAX_TAG_SCAN)) else {
        return CompletionContext::None;
    };

    let tokens = tokenize(&buffer.substr(Region::new(start, location)));
    let prefix_len = prefix.chars().count();
    let colon_before_prefix = location
        .checked_sub(prefix_len + 1)
        .and_then(|offset| buffer.char_at(offset))
        == Some(':');

    let context = classify_tokens(tokens, prefix, colon_before_prefix);
    tracing::debug!(location, prefix, context = context.name(), "classified cursor");
    context
}

/// Classify the end of `text_before_cursor`
pub fn classify_text(text_before_cursor: &str, prefix: &str) -> CompletionContext {
    let buffer = TextBuffer::new(text_before_cursor);
    classify(&buffer, buffer.len(), prefix)
}

/// Rule table over the tokens of the unfinished tag
pub fn classify_tokens(
    mut tokens: Vec<String>,
    prefix: &str,
    colon_before_prefix: bool,
) -> CompletionContext {
    use CompletionContext::*;

    let typing_last = tokens.last().is_some_and(|last| last == prefix);
    // The host split the word at a colon, so the token is longer than the
    // prefix: `Sensor::Ra` vs `Ra`.
    let colon_in_word = !typing_last
        && colon_before_prefix
        && tokens.last().is_some_and(|last| last.ends_with(prefix));
    if typing_last || colon_in_word {
        tokens.pop();
    }

    let tokens: Vec<&str> = tokens.iter().map(String::as_str).collect();
    let is_object = matches!(tokens[..], ["<", "object", ..]);
    let is_param = matches!(tokens[..], ["<", "param", ..]);
    let quotes = tokens.iter().filter(|&&t| t == "\"").count();
    let len = tokens.len();

    match tokens[..] {
        [.., "type", "=", "\""] if len >= 5 && is_object => {
            if colon_in_word {
                ObjectTypeColon
            } else {
                ObjectType
            }
        }
        [.., "type", "="] if len >= 4 && is_object => {
            if colon_in_word {
                ObjectTypeColonNoQuotes
            } else {
                ObjectTypeNoQuotes
            }
        }
        [.., "name", "=", "\""] if len >= 5 && is_param => ParamName,
        [.., "name", "="] if len >= 4 && is_param => ParamNameNoQuotes,
        [.., "value", "=", "\""] if is_param => ParamValue,
        [.., "value", "="] if is_param => ParamValueNoQuotes,
        // Odd number of quotes: inside some other quoted value
        _ if quotes % 2 == 1 => AttributeValue,
        [.., "<"] => Element,
        ["<", .., "=", "\""] => AttributeValue,
        ["<", .., last] if last != "=" => Attribute,
        ["<", .., "="] => AttributeValueNoQuotes,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CompletionContext::*;

    #[test]
    fn test_object_type_context() {
        assert_eq!(classify_text("<object type=\"", ""), ObjectType);
        assert_eq!(classify_text("<object id=\"1\" type=\"", ""), ObjectType);
        assert_eq!(classify_text("<object type=\"Rad", "Rad"), ObjectType);
    }

    #[test]
    fn test_object_type_no_quotes() {
        assert_eq!(classify_text("<object type=", ""), ObjectTypeNoQuotes);
        assert_eq!(classify_text("<object type = ", ""), ObjectTypeNoQuotes);
    }

    #[test]
    fn test_object_type_colon_variants() {
        assert_eq!(classify_text("<object type=\"Foo::Ba", "Ba"), ObjectTypeColon);
        assert_eq!(classify_text("<object type=Foo::Ba", "Ba"), ObjectTypeColonNoQuotes);
        assert_eq!(classify_text("<object type=\"Foo::", ""), ObjectTypeColon);
    }

    #[test]
    fn test_param_contexts() {
        assert_eq!(classify_text("<param name=\"", ""), ParamName);
        assert_eq!(classify_text("<param name=", ""), ParamNameNoQuotes);
        assert_eq!(classify_text("<param name=\"range\" value=\"", ""), ParamValue);
        assert_eq!(classify_text("<param name=\"range\" value=", ""), ParamValueNoQuotes);
        assert_eq!(classify_text("<param name=\"range\" value=\"sc", "sc"), ParamValue);
    }

    #[test]
    fn test_param_name_tail_on_object_tag_is_attribute_value() {
        assert_eq!(classify_text("<object name=\"", ""), AttributeValue);
        assert_eq!(classify_text("<object name=", ""), AttributeValueNoQuotes);
    }

    #[test]
    fn test_odd_quotes_is_attribute_value() {
        assert_eq!(classify_text("<object foo=\"bar", ""), AttributeValue);
        assert_eq!(classify_text("<object foo=\"bar baz", "baz"), AttributeValue);
    }

    #[test]
    fn test_element_context() {
        assert_eq!(classify_text("<", ""), Element);
        assert_eq!(classify_text("<hive>\n  <", ""), Element);
        assert_eq!(classify_text("<hive>\n  <obj", "obj"), Element);
    }

    #[test]
    fn test_attribute_context() {
        assert_eq!(classify_text("<object ", ""), Attribute);
        assert_eq!(classify_text("<object type=\"A\" ", ""), Attribute);
        assert_eq!(classify_text("<object ty", "ty"), Attribute);
    }

    #[test]
    fn test_attribute_value_no_quotes() {
        assert_eq!(classify_text("<object id=", ""), AttributeValueNoQuotes);
    }

    #[test]
    fn test_outside_tag_is_none() {
        assert_eq!(classify_text("", ""), None);
        assert_eq!(classify_text("<hive>", ""), None);
        assert_eq!(classify_text("<hive>\n  some text", "text"), None);
    }

    #[test]
    fn test_scan_bound() {
        let text = format!("<{}", " ".repeat(9001));
        assert_eq!(classify_text(&text, ""), None);

        let text = format!("<{}", " ".repeat(9000));
        assert_eq!(classify_text(&text, ""), Element);
    }

    #[test]
    fn test_classify_in_buffer_middle() {
        let text = "<hive>\n  <object type=\"\">\n  </object>\n</hive>";
        let buffer = TextBuffer::new(text);
        let location = text.find("\"\"").unwrap() + 1;
        assert_eq!(classify(&buffer, location, ""), ObjectType);
    }

    #[test]
    fn test_classify_tokens_directly() {
        let tokens = tokenize("<object type=\"Foo::Ba");
        assert_eq!(classify_tokens(tokens, "Ba", true), ObjectTypeColon);

        let tokens = tokenize("<object type=\"Foo::Ba");
        assert_eq!(classify_tokens(tokens, "Ba", false), AttributeValue);
    }
}
