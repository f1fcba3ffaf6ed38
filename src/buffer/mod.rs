//! Editor buffer capabilities
//!
//! The completion core never owns the editor's text. It talks to the host
//! through the [`Buffer`] trait (pattern search, text extraction, character
//! lookup and scope tests) and mutates it only through [`BufferEditor`].
//!
//! All offsets are character offsets, the way editors address text.
//! [`TextBuffer`] is the in-memory implementation used by the command-line
//! front end and the tests.

use once_cell::sync::Lazy;
use regex::Regex;

/// A half-open `[begin, end)` span of character offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Region {
    pub begin: usize,
    pub end: usize,
}

impl Region {
    pub fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Editor containment: both ends inclusive.
    ///
    /// A cursor sitting right after `>` still counts as touching that tag.
    pub fn contains(&self, offset: usize) -> bool {
        self.begin <= offset && offset <= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Syntax scopes the core asks the host about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Anywhere inside an XML document
    Xml,
    /// Inside a `<!-- ... -->` block
    Comment,
    /// Inside a `<? ... ?>` processing instruction
    ProcessingInstruction,
}

/// Read access to an editor buffer
pub trait Buffer {
    /// Number of characters in the buffer
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All non-overlapping matches of `pattern`, in document order
    fn find_all(&self, pattern: &Regex) -> Vec<Region>;

    /// Text covered by `region`, clamped to the buffer
    fn substr(&self, region: Region) -> String;

    /// Character at `offset`, or `None` past the end
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Whether `offset` lies inside the given syntax scope
    fn in_scope(&self, offset: usize, scope: Scope) -> bool;
}

/// The mutation primitives the core is allowed to use
pub trait BufferEditor: Buffer {
    /// Insert literal text at a character offset
    fn insert(&mut self, offset: usize, text: &str);

    /// Move the primary cursor by `delta` characters
    fn move_cursor(&mut self, delta: isize);

    /// Current primary cursor position
    fn cursor(&self) -> usize;
}

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<!--[\s\S]*?-->").unwrap());
static PROCESSING_INSTRUCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<\?[\s\S]*?\?>").unwrap());

/// Syntax the buffer is highlighted as
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Xml,
    Plain,
}

/// In-memory buffer snapshot
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    /// Byte offset of every character, followed by `text.len()`
    char_starts: Vec<usize>,
    comments: Vec<Region>,
    instructions: Vec<Region>,
    syntax: Syntax,
    cursor: usize,
}

impl TextBuffer {
    /// Create an XML buffer with the cursor at the end
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_syntax(text, Syntax::Xml)
    }

    /// Create a buffer that is not highlighted as XML
    pub fn plain(text: impl Into<String>) -> Self {
        Self::with_syntax(text, Syntax::Plain)
    }

    pub fn with_syntax(text: impl Into<String>, syntax: Syntax) -> Self {
        let mut buffer = Self {
            text: text.into(),
            char_starts: Vec::new(),
            comments: Vec::new(),
            instructions: Vec::new(),
            syntax,
            cursor: 0,
        };
        buffer.reindex();
        buffer.cursor = buffer.len();
        buffer
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Place the cursor, clamped to the buffer
    pub fn set_cursor(&mut self, offset: usize) {
        self.cursor = offset.min(self.len());
    }

    fn reindex(&mut self) {
        self.char_starts = self.text.char_indices().map(|(i, _)| i).collect();
        self.char_starts.push(self.text.len());
        self.comments = self.scan(&COMMENT_RE);
        self.instructions = self.scan(&PROCESSING_INSTRUCTION_RE);
    }

    fn scan(&self, pattern: &Regex) -> Vec<Region> {
        pattern
            .find_iter(&self.text)
            .map(|m| Region::new(self.char_offset(m.start()), self.char_offset(m.end())))
            .collect()
    }

    /// Byte offset of a character offset (clamped)
    fn byte_offset(&self, offset: usize) -> usize {
        self.char_starts[offset.min(self.char_starts.len() - 1)]
    }

    /// Character offset of a byte offset that lies on a char boundary
    fn char_offset(&self, byte: usize) -> usize {
        self.char_starts.partition_point(|&start| start < byte)
    }

    fn span_contains(spans: &[Region], offset: usize) -> bool {
        let idx = spans.partition_point(|span| span.end <= offset);
        spans
            .get(idx)
            .is_some_and(|span| span.begin <= offset && offset < span.end)
    }
}

impl Buffer for TextBuffer {
    fn len(&self) -> usize {
        self.char_starts.len() - 1
    }

    fn find_all(&self, pattern: &Regex) -> Vec<Region> {
        self.scan(pattern)
    }

    fn substr(&self, region: Region) -> String {
        let begin = self.byte_offset(region.begin);
        let end = self.byte_offset(region.end.max(region.begin));
        self.text[begin..end].to_string()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.len() {
            return None;
        }
        self.text[self.byte_offset(offset)..].chars().next()
    }

    fn in_scope(&self, offset: usize, scope: Scope) -> bool {
        match scope {
            Scope::Xml => self.syntax == Syntax::Xml,
            Scope::Comment => Self::span_contains(&self.comments, offset),
            Scope::ProcessingInstruction => Self::span_contains(&self.instructions, offset),
        }
    }
}

impl BufferEditor for TextBuffer {
    fn insert(&mut self, offset: usize, text: &str) {
        let offset = offset.min(self.len());
        let byte = self.byte_offset(offset);
        self.text.insert_str(byte, text);
        self.reindex();
        if offset <= self.cursor {
            self.cursor += text.chars().count();
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let target = self.cursor.saturating_add_signed(delta);
        self.set_cursor(target);
    }

    fn cursor(&self) -> usize {
        self.cursor
    }
}
