//! Tag tokenizer
//!
//! Splits raw tag text into a flat token stream by putting whitespace around
//! the five markup characters `<`, `>`, `=`, `"` and `/`, then splitting on
//! whitespace runs. There is no escaping: attribute values are assumed not to
//! contain any of those characters. An escaped quote inside a value (or a `/`
//! in a path) therefore breaks the value into several tokens.

/// Characters that always form a token of their own
pub const DELIMITERS: [char; 5] = ['<', '>', '=', '"', '/'];

/// Tokenize a (possibly incomplete) tag
pub fn tokenize(text: &str) -> Vec<String> {
    let mut spaced = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if DELIMITERS.contains(&ch) {
            spaced.push(' ');
            spaced.push(ch);
            spaced.push(' ');
        } else {
            spaced.push(ch);
        }
    }

    spaced.split_whitespace().map(str::to_string).collect()
}

/// Structural facts about a complete tag, read from its tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagShape {
    /// Element name (the token after `<`, or after `</`)
    pub name: Option<String>,
    /// `</name>`
    pub closing: bool,
    /// `<name ... />`
    pub standalone: bool,
}

impl TagShape {
    pub fn from_tokens(tokens: &[String]) -> Self {
        let closing = tokens.get(1).is_some_and(|t| t == "/");
        let standalone = tokens.len() >= 2 && tokens[tokens.len() - 2] == "/";
        let name = (if closing { tokens.get(2) } else { tokens.get(1) }).cloned();

        Self {
            name,
            closing,
            standalone,
        }
    }

    pub fn parse(tag: &str) -> Self {
        Self::from_tokens(&tokenize(tag))
    }

    pub fn is_opening(&self) -> bool {
        !self.closing && !self.standalone
    }
}

/// Value of `attribute` in a token stream: the token three places after the
/// attribute name (`name = " value`). An empty value (`name=""`) is `None`.
pub fn attribute_value(tokens: &[String], attribute: &str) -> Option<String> {
    let idx = tokens.iter().position(|t| t == attribute)?;
    tokens.get(idx + 3).filter(|t| *t != "\"").cloned()
}
