//! Tag region discovery
//!
//! One non-greedy pattern finds every tag-shaped span in the buffer: a whole
//! comment block first, otherwise the shortest run from `<` to the next `>`.
//! Comments and tags cannot nest or overlap in this grammar, so scan order is
//! document order. An unterminated tag at the end of the buffer produces no
//! region at all.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::buffer::{Buffer, Region, Scope};

/// Pattern matching a comment block or a single tag
pub static TAG_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<!--[\s\S]*?-->|<[\s\S]*?>").unwrap());

/// Kind of a tag region, derived from the buffer's scope at its start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Normal,
    Comment,
    ProcessingInstruction,
}

impl TagKind {
    pub fn of<B: Buffer + ?Sized>(buffer: &B, region: Region) -> Self {
        if buffer.in_scope(region.begin, Scope::Comment) {
            TagKind::Comment
        } else if buffer.in_scope(region.begin, Scope::ProcessingInstruction) {
            TagKind::ProcessingInstruction
        } else {
            TagKind::Normal
        }
    }
}

/// All tag regions in document order
pub fn locate<B: Buffer + ?Sized>(buffer: &B) -> Vec<Region> {
    let regions = buffer.find_all(&TAG_PATTERN);
    tracing::trace!(count = regions.len(), "located tag regions");
    regions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::TextBuffer;

    #[test]
    fn test_locate_adjacent_tags_are_not_merged() {
        let buffer = TextBuffer::new("<hive><object/></hive>");
        let regions = locate(&buffer);
        assert_eq!(
            regions,
            vec![Region::new(0, 6), Region::new(6, 15), Region::new(15, 22)]
        );
    }

    #[test]
    fn test_comment_is_one_region() {
        let text = r#"<a><!-- <b attr="x"> --></a>"#;
        let buffer = TextBuffer::new(text);
        let regions = locate(&buffer);
        assert_eq!(regions.len(), 3);
        assert_eq!(buffer.substr(regions[1]), r#"<!-- <b attr="x"> -->"#);
        assert_eq!(TagKind::of(&buffer, regions[1]), TagKind::Comment);
        assert_eq!(TagKind::of(&buffer, regions[0]), TagKind::Normal);
    }

    #[test]
    fn test_processing_instruction_kind() {
        let buffer = TextBuffer::new("<?xml version=\"1.0\"?>\n<hive>");
        let regions = locate(&buffer);
        assert_eq!(TagKind::of(&buffer, regions[0]), TagKind::ProcessingInstruction);
        assert_eq!(TagKind::of(&buffer, regions[1]), TagKind::Normal);
    }

    #[test]
    fn test_regions_strictly_increasing() {
        let text = "<?xml?>\n<hive>\n  <!-- c -->\n  <object type=\"A\">\n    <param name=\"x\" value=\"1\"/>\n  </object>\n</hive>\n";
        let buffer = TextBuffer::new(text);
        let regions = locate(&buffer);
        assert_eq!(regions.len(), 7);
        for pair in regions.windows(2) {
            assert!(pair[0].begin < pair[0].end);
            assert!(pair[0].end <= pair[1].begin);
        }
    }

    #[test]
    fn test_unterminated_tail_has_no_region() {
        let buffer = TextBuffer::new("<hive>\n<object type=\"");
        assert_eq!(locate(&buffer), vec![Region::new(0, 6)]);
    }

    #[test]
    fn test_incomplete_tag_swallows_next_tag() {
        let buffer = TextBuffer::new("<hive><param name=\"\n</hive>");
        let regions = locate(&buffer);
        assert_eq!(regions.len(), 2);
        assert_eq!(buffer.substr(regions[1]), "<param name=\"\n</hive>");
    }
}
