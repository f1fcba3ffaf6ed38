//! Stateful cursor over the tag regions of one buffer snapshot
//!
//! The cursor is an index into the ordered regions produced by
//! [`locate`](super::locate). It is only valid for the snapshot it was built
//! from; after an edit that touches markup a new cursor must be built.
//!
//! Parent and closing-tag lookups are bracket-matching walks driven by a stack
//! of pending element names. Unbalanced markup never fails: the walks simply
//! run off the end of the document and report "nothing found".

use crate::buffer::{Buffer, Region};
use crate::completion::token_stream::{TagShape, tokenize};

use super::locator::{TagKind, locate};

/// Which kinds of tag a step passes over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Skip {
    pub comments: bool,
    pub processing_instructions: bool,
}

impl Skip {
    pub const NONE: Skip = Skip {
        comments: false,
        processing_instructions: false,
    };

    /// Skip comments and processing instructions
    pub const MARKUP_ONLY: Skip = Skip {
        comments: true,
        processing_instructions: true,
    };
}

/// Walk direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

/// Iterator-like cursor over tag regions
pub struct TagCursor<'a, B: Buffer + ?Sized> {
    buffer: &'a B,
    regions: Vec<Region>,
    /// May sit one before the first or one past the last region
    index: isize,
}

impl<'a, B: Buffer + ?Sized> TagCursor<'a, B> {
    /// Locate all tags in `buffer` and seek to `location`
    pub fn new(buffer: &'a B, location: usize) -> Self {
        let mut cursor = Self {
            buffer,
            regions: locate(buffer),
            index: 0,
        };
        cursor.reinitialize(location);
        cursor
    }

    /// Seek to another location of the same snapshot without rescanning.
    ///
    /// Picks the region containing `location` (the later one when two
    /// adjacent regions share the boundary), otherwise the first region to the
    /// right of it. When every region ends before `location` the cursor sits
    /// one past the last region, so stepping backward reaches the last tag.
    pub fn reinitialize(&mut self, location: usize) {
        let after = self.regions.partition_point(|r| r.begin <= location);
        self.index = match after.checked_sub(1) {
            Some(last) if self.regions[last].contains(location) => last as isize,
            _ => after as isize,
        };
    }

    /// The snapshot the regions were located in
    pub fn buffer(&self) -> &'a B {
        self.buffer
    }

    pub fn index(&self) -> isize {
        self.index
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Region under the cursor, `None` when out of bounds
    pub fn current_tag(&self) -> Option<Region> {
        usize::try_from(self.index)
            .ok()
            .and_then(|i| self.regions.get(i).copied())
    }

    fn current_kind(&self) -> Option<TagKind> {
        self.current_tag().map(|r| TagKind::of(self.buffer, r))
    }

    pub fn is_comment(&self) -> bool {
        self.current_kind() == Some(TagKind::Comment)
    }

    pub fn is_processing_instruction(&self) -> bool {
        self.current_kind() == Some(TagKind::ProcessingInstruction)
    }

    /// Move one region, then keep moving over skipped kinds.
    ///
    /// Returns `None` once the cursor leaves the region list.
    pub fn step(&mut self, direction: Direction, skip: Skip) -> Option<Region> {
        let delta = match direction {
            Direction::Forward => 1,
            Direction::Backward => -1,
        };

        self.index += delta;
        while (skip.processing_instructions && self.is_processing_instruction())
            || (skip.comments && self.is_comment())
        {
            self.index += delta;
        }

        self.current_tag()
    }

    pub fn next_tag(&mut self, skip: Skip) -> Option<Region> {
        self.step(Direction::Forward, skip)
    }

    pub fn previous_tag(&mut self, skip: Skip) -> Option<Region> {
        self.step(Direction::Backward, skip)
    }

    fn shape(&self, region: Region) -> TagShape {
        TagShape::from_tokens(&tokenize(&self.buffer.substr(region)))
    }

    /// Walk backward to the tag that encloses the current one.
    ///
    /// The parent of a closing tag is its opening tag. On success the cursor
    /// is left on the parent.
    pub fn parent(&mut self) -> Option<Region> {
        let mut pending: Vec<String> = Vec::new();

        loop {
            let tag = self.previous_tag(Skip::MARKUP_ONLY)?;
            let shape = self.shape(tag);

            if shape.standalone {
                continue;
            }

            if shape.closing {
                pending.extend(shape.name);
                continue;
            }

            if pending.is_empty() {
                return Some(tag);
            }
            // Opening tags inside an already closed sibling are not checked
            // against anything.
            if pending.last() == shape.name.as_ref() {
                pending.pop();
            }
        }
    }

    /// Walk forward to the tag that closes the current one.
    ///
    /// Comments, processing instructions, closing tags and standalone tags
    /// close themselves: they are returned as-is and the cursor does not move.
    pub fn closing_tag(&mut self) -> Option<Region> {
        if self.is_processing_instruction() || self.is_comment() {
            return self.current_tag();
        }

        if let Some(tag) = self.current_tag() {
            let shape = self.shape(tag);
            if shape.closing || shape.standalone {
                return Some(tag);
            }
        }

        let mut pending: Vec<String> = Vec::new();

        loop {
            let tag = self.next_tag(Skip::MARKUP_ONLY)?;
            let shape = self.shape(tag);

            if shape.standalone {
                continue;
            }

            if !shape.closing {
                pending.extend(shape.name);
                continue;
            }

            if pending.is_empty() {
                return Some(tag);
            }
            // A stray closing tag inside an unclosed child is ignored
            if pending.last() == shape.name.as_ref() {
                pending.pop();
            }
        }
    }
}
