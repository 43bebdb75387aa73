//! Block conversion: find the block under the caret, match it against the
//! trigger table, and swap it for the requested element.
//!
//! Elements are replaced wholesale rather than retagged, since DOM elements
//! cannot change their tag name.

use crate::config::{LINE_BREAK_TAG, STRAY_CONTAINER_TAG};
use crate::platform::{CaretTarget, EditorHost, HostError, NodeKind};
use crate::tag::BlockTag;
use crate::trigger::{TriggerRule, TriggerTable};

/// Converts blocks according to a trigger table.
#[derive(Clone, Copy, Debug)]
pub struct BlockConverter {
    table: &'static TriggerTable,
}

impl Default for BlockConverter {
    fn default() -> Self {
        Self::new(TriggerTable::standard())
    }
}

impl BlockConverter {
    pub fn new(table: &'static TriggerTable) -> Self {
        Self { table }
    }

    /// Nearest element enclosing the caret.
    ///
    /// Returns `None` when there is no focus or when the enclosing element is
    /// the document root, which is not a block.
    pub fn resolve_focus_block<H: EditorHost>(&self, host: &H) -> Option<H::Node> {
        let mut node = host.focus_node()?;
        while host.node_kind(&node) != NodeKind::Element {
            node = host.parent(&node)?;
        }
        if host.is_root(&node) {
            return None;
        }
        Some(node)
    }

    /// Resolve the focus block and convert it if it starts with a trigger.
    pub fn test_for_triggers<H: EditorHost>(
        &self,
        host: &mut H,
    ) -> Result<Option<H::Node>, HostError> {
        match self.resolve_focus_block(host) {
            Some(block) => self.detect_and_apply(host, &block),
            None => Ok(None),
        }
    }

    /// Test `block` against each rule in priority order and substitute on the
    /// first match. Returns the new element, or `None` if nothing matched.
    pub fn detect_and_apply<H: EditorHost>(
        &self,
        host: &mut H,
        block: &H::Node,
    ) -> Result<Option<H::Node>, HostError> {
        let text = host.text_content(block);
        let Some(rule) = self.table.detect(&text) else {
            return Ok(None);
        };

        tracing::debug!(
            target: "hashmark::convert",
            tag = %rule.tag(),
            "trigger matched"
        );

        self.substitute(host, block, rule).map(Some)
    }

    /// Replace `block` with an element of the rule's tag, strip the trigger,
    /// patch trailing whitespace and put the caret at the end.
    pub fn substitute<H: EditorHost>(
        &self,
        host: &mut H,
        block: &H::Node,
        rule: &TriggerRule,
    ) -> Result<H::Node, HostError> {
        let element = self.replace_element(host, block, rule.tag())?;
        self.remove_trigger_text(host, &element, rule)?;
        self.fix_trailing_whitespace(host, &element)?;
        self.select_element(host, &element, CaretTarget::End)?;
        Ok(element)
    }

    /// Structural replacement: new element of `tag` with `old`'s text.
    pub fn replace_element<H: EditorHost>(
        &self,
        host: &mut H,
        old: &H::Node,
        tag: BlockTag,
    ) -> Result<H::Node, HostError> {
        let parent = host.parent(old).ok_or(HostError::Detached)?;
        let text = host.text_content(old);

        let element = host.create_element(tag.tag_name())?;
        host.set_text_content(&element, &text)?;
        host.replace_child(&parent, &element, old)?;
        Ok(element)
    }

    fn remove_trigger_text<H: EditorHost>(
        &self,
        host: &mut H,
        element: &H::Node,
        rule: &TriggerRule,
    ) -> Result<(), HostError> {
        let text = host.text_content(element);
        let stripped = rule.strip(&text);
        if stripped.len() != text.len() {
            host.set_text_content(element, &stripped)?;
        }
        Ok(())
    }

    /// Some engines hide trailing whitespace (and the caret after it) unless
    /// the block ends in a line break.
    ///
    /// Uses the same `White_Space` class as the trigger patterns.
    fn fix_trailing_whitespace<H: EditorHost>(
        &self,
        host: &mut H,
        element: &H::Node,
    ) -> Result<(), HostError> {
        let ends_in_space = host
            .text_content(element)
            .chars()
            .next_back()
            .is_some_and(char::is_whitespace);
        if ends_in_space {
            let br = host.create_element(LINE_BREAK_TAG)?;
            host.append_child(element, &br)?;
        }
        Ok(())
    }

    /// Collapse the caret to the start or end of `element`'s content.
    ///
    /// The end is placed before any trailing line-break placeholder so typing
    /// continues on the same line.
    pub fn select_element<H: EditorHost>(
        &self,
        host: &mut H,
        element: &H::Node,
        target: CaretTarget,
    ) -> Result<(), HostError> {
        let offset = match target {
            CaretTarget::Start => 0,
            CaretTarget::End => {
                let content = host
                    .child_nodes(element)
                    .iter()
                    .filter(|child| host.tag_name(child).as_deref() != Some(LINE_BREAK_TAG))
                    .count();
                u32::try_from(content).unwrap_or(u32::MAX)
            }
        };
        host.collapse(element, offset)
    }

    /// Turn a generic container holding the caret back into a paragraph.
    ///
    /// Editable surfaces insert `div`s on some key presses (Enter in an empty
    /// block); the editor only produces semantic blocks.
    pub fn demote_stray_container<H: EditorHost>(
        &self,
        host: &mut H,
    ) -> Result<Option<H::Node>, HostError> {
        let Some(focus) = host.focus_node() else {
            return Ok(None);
        };
        let Some(parent) = host.parent(&focus) else {
            return Ok(None);
        };
        if host.is_root(&parent) || host.tag_name(&parent).as_deref() != Some(STRAY_CONTAINER_TAG)
        {
            return Ok(None);
        }

        tracing::debug!(target: "hashmark::convert", "demoting stray container");

        let element = self.replace_element(host, &parent, BlockTag::Paragraph)?;
        self.select_element(host, &element, CaretTarget::End)?;
        Ok(Some(element))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryDocument, NodeId};
    use crate::platform::{CaretPlatform, DocumentTree};

    fn doc_with_block(tag: &str, text: &str) -> (MemoryDocument, NodeId) {
        let mut doc = MemoryDocument::new();
        let block = doc.push_block(tag, text);
        doc.place_caret_in_text(&block);
        (doc, block)
    }

    #[test]
    fn test_resolve_walks_up_from_text() {
        let (doc, block) = doc_with_block("p", "hello");
        let converter = BlockConverter::default();
        assert_eq!(converter.resolve_focus_block(&doc), Some(block));
    }

    #[test]
    fn test_resolve_none_without_focus() {
        let mut doc = MemoryDocument::new();
        doc.push_block("p", "hello");
        assert_eq!(BlockConverter::default().resolve_focus_block(&doc), None);
    }

    #[test]
    fn test_resolve_none_at_root() {
        let mut doc = MemoryDocument::new();
        let root = doc.root();
        doc.collapse(&root, 0).unwrap();
        assert_eq!(BlockConverter::default().resolve_focus_block(&doc), None);
    }

    #[test]
    fn test_h2_single_substitution() {
        let (mut doc, block) = doc_with_block("p", "## hello");
        let converter = BlockConverter::default();

        let new = converter.detect_and_apply(&mut doc, &block).unwrap().unwrap();

        assert_ne!(new, block);
        assert_eq!(doc.tag_name(&new).as_deref(), Some("h2"));
        assert_eq!(doc.text_content(&new), "hello");
        assert_eq!(doc.parent(&block), None);
        assert_eq!(doc.child_nodes(&doc.root()), vec![new]);
    }

    #[test]
    fn test_no_match_is_noop() {
        let (mut doc, block) = doc_with_block("p", "just text");
        let before = doc.to_html();
        let converter = BlockConverter::default();

        assert_eq!(converter.detect_and_apply(&mut doc, &block).unwrap(), None);
        assert_eq!(doc.to_html(), before);
        assert_eq!(doc.child_nodes(&doc.root()), vec![block]);
    }

    #[test]
    fn test_no_space_after_marker_is_noop() {
        let (mut doc, block) = doc_with_block("p", "#no space");
        let converter = BlockConverter::default();
        assert_eq!(converter.detect_and_apply(&mut doc, &block).unwrap(), None);
        assert_eq!(doc.text_content(&block), "#no space");
    }

    #[test]
    fn test_second_pass_is_noop() {
        let (mut doc, block) = doc_with_block("p", "# Title");
        let converter = BlockConverter::default();

        let new = converter.detect_and_apply(&mut doc, &block).unwrap().unwrap();
        let after_first = doc.to_html();
        assert_eq!(converter.detect_and_apply(&mut doc, &new).unwrap(), None);
        assert_eq!(doc.to_html(), after_first);
    }

    #[test]
    fn test_priority_h3() {
        let (mut doc, block) = doc_with_block("p", "### hello");
        let new = BlockConverter::default()
            .detect_and_apply(&mut doc, &block)
            .unwrap()
            .unwrap();
        assert_eq!(doc.tag_name(&new).as_deref(), Some("h3"));
    }

    #[test]
    fn test_trailing_whitespace_gets_line_break() {
        let (mut doc, block) = doc_with_block("p", "# hello ");
        let new = BlockConverter::default()
            .detect_and_apply(&mut doc, &block)
            .unwrap()
            .unwrap();

        assert_eq!(doc.text_content(&new), "hello ");
        insta::assert_snapshot!(doc.to_html(), @"<h1>hello <br></h1>");
        // Caret sits between the text and the placeholder.
        assert_eq!(doc.caret(), Some((new, 1)));
    }

    #[test]
    fn test_paragraph_trigger_caret_at_end() {
        let (mut doc, block) = doc_with_block("h2", ". Introduction");
        let new = BlockConverter::default()
            .detect_and_apply(&mut doc, &block)
            .unwrap()
            .unwrap();

        insta::assert_snapshot!(doc.to_html(), @"<p>Introduction</p>");
        assert_eq!(doc.caret(), Some((new, 1)));
    }

    #[test]
    fn test_select_element_start() {
        let (mut doc, block) = doc_with_block("p", "hello");
        let converter = BlockConverter::default();
        converter
            .select_element(&mut doc, &block, CaretTarget::Start)
            .unwrap();
        assert_eq!(doc.caret(), Some((block, 0)));
    }

    #[test]
    fn test_test_for_triggers_uses_focus() {
        let mut doc = MemoryDocument::new();
        doc.push_block("p", "first");
        let second = doc.push_block("p", "#### fourth");
        doc.place_caret_in_text(&second);

        let converter = BlockConverter::default();
        let new = converter.test_for_triggers(&mut doc).unwrap().unwrap();

        assert_eq!(doc.tag_name(&new).as_deref(), Some("h4"));
        insta::assert_snapshot!(doc.to_html(), @"<p>first</p><h4>fourth</h4>");
    }

    #[test]
    fn test_test_for_triggers_without_focus() {
        let mut doc = MemoryDocument::new();
        doc.push_block("p", "# hello");
        let converter = BlockConverter::default();
        assert_eq!(converter.test_for_triggers(&mut doc).unwrap(), None);
        insta::assert_snapshot!(doc.to_html(), @"<p># hello</p>");
    }

    #[test]
    fn test_demote_stray_div() {
        let (mut doc, _div) = doc_with_block("div", "typed after enter");
        let new = BlockConverter::default()
            .demote_stray_container(&mut doc)
            .unwrap()
            .unwrap();

        insta::assert_snapshot!(doc.to_html(), @"<p>typed after enter</p>");
        assert_eq!(doc.caret(), Some((new, 1)));
    }

    #[test]
    fn test_demote_keeps_trigger_text() {
        let (mut doc, _div) = doc_with_block("div", "# not stripped");
        BlockConverter::default()
            .demote_stray_container(&mut doc)
            .unwrap()
            .unwrap();
        insta::assert_snapshot!(doc.to_html(), @"<p># not stripped</p>");
    }

    #[test]
    fn test_demote_ignores_semantic_blocks() {
        let (mut doc, block) = doc_with_block("h1", "heading");
        assert_eq!(
            BlockConverter::default()
                .demote_stray_container(&mut doc)
                .unwrap(),
            None
        );
        assert_eq!(doc.parent(&block), Some(doc.root()));
    }

    #[test]
    fn test_demote_ignores_focus_on_div_itself() {
        // Focus on the container element: its parent is the root.
        let mut doc = MemoryDocument::new();
        let div = doc.push_block("div", "");
        doc.collapse(&div, 0).unwrap();
        assert_eq!(
            BlockConverter::default()
                .demote_stray_container(&mut doc)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_demote_never_touches_root_div() {
        let mut doc = MemoryDocument::with_root_tag("div");
        let root = doc.root();
        let text = doc.create_text("loose text");
        doc.append_child(&root, &text).unwrap();
        doc.collapse(&text, 3).unwrap();
        assert_eq!(
            BlockConverter::default()
                .demote_stray_container(&mut doc)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_replace_detached_errors() {
        let mut doc = MemoryDocument::new();
        let orphan = doc.create_element("p").unwrap();
        let err = BlockConverter::default()
            .replace_element(&mut doc, &orphan, BlockTag::H1)
            .unwrap_err();
        assert_eq!(err, HostError::Detached);
    }
}
