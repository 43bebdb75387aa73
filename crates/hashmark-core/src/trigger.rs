//! Line-start trigger patterns.
//!
//! A trigger is a marker typed at the start of a block (`# `, `## `, `. `)
//! followed by at least one more character. The table is tested in a fixed
//! priority order (h1 through h6, then paragraph) and the first match wins.
//!
//! Each rule is equivalent to the lookahead pattern `^\s*MARKER\s+(?!$)`.
//! `regex` has no lookaround, so the rule is compiled as
//! `^(\s*MARKER\s+)(?:\S|\s$)` and capture group 1 is the trigger span. When
//! the whitespace run reaches the end of the text, the greedy `\s+` gives
//! back one character, which is exactly what a backtracking engine does with
//! the lookahead form.
//!
//! `\s` is Unicode `White_Space`, so the non-breaking space editable surfaces
//! insert for typed spaces counts. It differs from JavaScript's `\s` at two
//! code points: U+0085 (NEL) is whitespace here, U+FEFF (BOM) is not.

use std::borrow::Cow;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::tag::BlockTag;

/// A block tag paired with the pattern that requests it.
#[derive(Debug, Clone)]
pub struct TriggerRule {
    tag: BlockTag,
    pattern: Regex,
}

impl TriggerRule {
    fn for_tag(tag: BlockTag) -> Self {
        let source = format!(r"^(\s*{}\s+)(?:\S|\s$)", regex::escape(tag.marker()));
        Self {
            tag,
            pattern: Regex::new(&source).unwrap(),
        }
    }

    pub fn tag(&self) -> BlockTag {
        self.tag
    }

    /// Whether `text` starts with this rule's trigger and has content after it.
    pub fn is_match(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Byte range of the trigger within `text`, if present.
    pub fn find(&self, text: &str) -> Option<Range<usize>> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.range())
    }

    /// Remove the first occurrence of the trigger from `text`.
    pub fn strip<'t>(&self, text: &'t str) -> Cow<'t, str> {
        match self.find(text) {
            Some(range) => {
                let mut out = String::with_capacity(text.len() - range.len());
                out.push_str(&text[..range.start]);
                out.push_str(&text[range.end..]);
                Cow::Owned(out)
            }
            None => Cow::Borrowed(text),
        }
    }
}

/// Ordered set of trigger rules.
#[derive(Debug, Clone)]
pub struct TriggerTable {
    rules: Vec<TriggerRule>,
}

static STANDARD: LazyLock<TriggerTable> = LazyLock::new(|| TriggerTable {
    rules: BlockTag::ALL.into_iter().map(TriggerRule::for_tag).collect(),
});

impl TriggerTable {
    /// The process-wide table: h1..h6, then paragraph.
    pub fn standard() -> &'static TriggerTable {
        &STANDARD
    }

    /// Rules in priority order.
    pub fn rules(&self) -> &[TriggerRule] {
        &self.rules
    }

    pub fn rule_for(&self, tag: BlockTag) -> Option<&TriggerRule> {
        self.rules.iter().find(|rule| rule.tag == tag)
    }

    /// First rule matching `text`. Later rules are not tested once one matches.
    pub fn detect(&self, text: &str) -> Option<&TriggerRule> {
        self.rules.iter().find(|rule| rule.is_match(text))
    }
}
