//! Completion context definitions
//!
//! A context says what kind of token is being typed at the cursor. It is
//! computed fresh for every completion request and carries no state.

use std::fmt;

/// What is being typed at the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionContext {
    /// Not inside a tag, or nothing recognisable
    None,

    /// `<object type="|`
    ObjectType,

    /// `<object type=|`
    ObjectTypeNoQuotes,

    /// `<param name="|`
    ParamName,

    /// `<param name=|`
    ParamNameNoQuotes,

    /// `<param value="|`
    ParamValue,

    /// `<param value=|`
    ParamValueNoQuotes,

    /// `<|`
    Element,

    /// `<object |`
    Attribute,

    /// Inside any other quoted attribute value
    AttributeValue,

    /// `<object id=|`
    AttributeValueNoQuotes,

    /// `<object type="Sensor::Ra|`, where the colons are part of the word
    ObjectTypeColon,

    /// `<object type=Sensor::Ra|`
    ObjectTypeColonNoQuotes,
}

impl CompletionContext {
    /// All contexts, indexed by [`code`](Self::code)
    pub const ALL: [CompletionContext; 13] = [
        Self::None,
        Self::ObjectType,
        Self::ObjectTypeNoQuotes,
        Self::ParamName,
        Self::ParamNameNoQuotes,
        Self::ParamValue,
        Self::ParamValueNoQuotes,
        Self::Element,
        Self::Attribute,
        Self::AttributeValue,
        Self::AttributeValueNoQuotes,
        Self::ObjectTypeColon,
        Self::ObjectTypeColonNoQuotes,
    ];

    /// Stable numeric code (0 for `None`)
    pub fn code(self) -> u8 {
        Self::ALL.iter().position(|&c| c == self).unwrap_or(0) as u8
    }

    /// Diagnostic name
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::ObjectType => "OBJECT_TYPE_CONTEXT",
            Self::ObjectTypeNoQuotes => "OBJECT_TYPE_CONTEXT_NO_QUOTES",
            Self::ParamName => "PARAM_NAME_CONTEXT",
            Self::ParamNameNoQuotes => "PARAM_NAME_CONTEXT_NO_QUOTES",
            Self::ParamValue => "PARAM_VALUE_CONTEXT",
            Self::ParamValueNoQuotes => "PARAM_VALUE_CONTEXT_NO_QUOTES",
            Self::Element => "ELEMENT_CONTEXT",
            Self::Attribute => "ATTRIBUTE_CONTEXT",
            Self::AttributeValue => "ATTRIBUTE_VALUE_CONTEXT",
            Self::AttributeValueNoQuotes => "ATTRIBUTE_VALUE_CONTEXT_NO_QUOTES",
            Self::ObjectTypeColon => "OBJECT_TYPE_COLON_CONTEXT",
            Self::ObjectTypeColonNoQuotes => "OBJECT_TYPE_COLON_CONTEXT_NO_QUOTES",
        }
    }

    /// Check if this is a None context
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether the user has not typed the opening quote yet
    pub fn needs_quotes(self) -> bool {
        matches!(
            self,
            Self::ObjectTypeNoQuotes
                | Self::ParamNameNoQuotes
                | Self::ParamValueNoQuotes
                | Self::AttributeValueNoQuotes
                | Self::ObjectTypeColonNoQuotes
        )
    }
}

impl fmt::Display for CompletionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(CompletionContext::None.code(), 0);
        assert_eq!(CompletionContext::ObjectType.code(), 1);
        assert_eq!(CompletionContext::Element.code(), 7);
        assert_eq!(CompletionContext::ObjectTypeColonNoQuotes.code(), 12);
    }

    #[test]
    fn test_names() {
        assert_eq!(CompletionContext::ParamName.to_string(), "PARAM_NAME_CONTEXT");
        assert_eq!(CompletionContext::None.name(), "None");
    }

    #[test]
    fn test_needs_quotes() {
        assert!(CompletionContext::ParamValueNoQuotes.needs_quotes());
        assert!(!CompletionContext::ParamValue.needs_quotes());
        assert!(!CompletionContext::None.needs_quotes());
        assert!(CompletionContext::None.is_none());
    }
}
