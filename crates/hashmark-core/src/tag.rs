//! Block tags the editor knows how to produce.

use std::fmt;

/// A semantic block element type.
///
/// Variant order matches trigger priority: headings from level 1 to 6,
/// then paragraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BlockTag {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Paragraph,
}

impl BlockTag {
    /// All tags in trigger priority order.
    pub const ALL: [BlockTag; 7] = [
        BlockTag::H1,
        BlockTag::H2,
        BlockTag::H3,
        BlockTag::H4,
        BlockTag::H5,
        BlockTag::H6,
        BlockTag::Paragraph,
    ];

    /// Lowercase element name, as passed to the host's `create_element`.
    pub fn tag_name(self) -> &'static str {
        match self {
            BlockTag::H1 => "h1",
            BlockTag::H2 => "h2",
            BlockTag::H3 => "h3",
            BlockTag::H4 => "h4",
            BlockTag::H5 => "h5",
            BlockTag::H6 => "h6",
            BlockTag::Paragraph => "p",
        }
    }

    /// Parse an element name. Case-insensitive, since DOM `tagName` is
    /// uppercase for HTML documents.
    pub fn from_tag_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tag| tag.tag_name().eq_ignore_ascii_case(name))
    }

    /// The literal marker typed at line start to request this block type.
    pub fn marker(self) -> &'static str {
        match self {
            BlockTag::H1 => "#",
            BlockTag::H2 => "##",
            BlockTag::H3 => "###",
            BlockTag::H4 => "####",
            BlockTag::H5 => "#####",
            BlockTag::H6 => "######",
            BlockTag::Paragraph => ".",
        }
    }
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_roundtrip() {
        for tag in BlockTag::ALL {
            assert_eq!(BlockTag::from_tag_name(tag.tag_name()), Some(tag));
        }
        assert_eq!(BlockTag::from_tag_name("H3"), Some(BlockTag::H3));
        assert_eq!(BlockTag::from_tag_name("P"), Some(BlockTag::Paragraph));
        assert_eq!(BlockTag::from_tag_name("div"), None);
        assert_eq!(BlockTag::from_tag_name("h7"), None);
    }

    #[test]
    fn test_priority_order_is_declaration_order() {
        let mut sorted = BlockTag::ALL;
        sorted.sort();
        assert_eq!(sorted, BlockTag::ALL);
    }
}
