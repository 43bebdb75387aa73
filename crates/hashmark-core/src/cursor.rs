//! Fake blinking cursor shown while the document does not have focus.
//!
//! The cursor is an extra paragraph appended to the root, holding a single
//! non-breaking space. The element it trails gets a marker class so styles
//! can pull the two together. Timing lives with the caller: this type only
//! mutates the document, and the caller must stop its blink timer before
//! calling [`BlinkingCursor::remove`].

use crate::config::EditorConfig;
use crate::convert::BlockConverter;
use crate::platform::{CaretTarget, EditorHost, HostError};

const CURSOR_TEXT: &str = "\u{a0}";

#[derive(Debug, Clone)]
pub struct BlinkingCursor<N> {
    element: N,
    anchor: Option<N>,
    before_cursor_class: &'static str,
    visible_class: &'static str,
}

impl<N: Clone + PartialEq + std::fmt::Debug> BlinkingCursor<N> {
    /// Append the cursor element to the root.
    ///
    /// `anchor` is the element the cursor trails; when `None`, the element
    /// just before the cursor is used.
    pub fn show<H>(host: &mut H, anchor: Option<N>, config: &EditorConfig) -> Result<Self, HostError>
    where
        H: EditorHost<Node = N>,
    {
        let element = host.create_element("p")?;
        host.add_class(&element, config.cursor_class)?;
        host.set_text_content(&element, CURSOR_TEXT)?;
        let root = host.root();
        host.append_child(&root, &element)?;

        let anchor = anchor.or_else(|| host.previous_element_sibling(&element));
        if let Some(anchor) = &anchor {
            host.add_class(anchor, config.before_cursor_class)?;
        }

        tracing::trace!(target: "hashmark::cursor", ?anchor, "cursor shown");

        Ok(Self {
            element,
            anchor,
            before_cursor_class: config.before_cursor_class,
            visible_class: config.visible_class,
        })
    }

    pub fn anchor(&self) -> Option<&N> {
        self.anchor.as_ref()
    }

    /// Flip visibility. Returns whether the cursor is now visible.
    pub fn blink<H>(&self, host: &mut H) -> Result<bool, HostError>
    where
        H: EditorHost<Node = N>,
    {
        host.toggle_class(&self.element, self.visible_class)
    }

    /// Take the cursor element out of the document and clear the anchor's
    /// marker class.
    pub fn remove<H>(self, host: &mut H) -> Result<(), HostError>
    where
        H: EditorHost<Node = N>,
    {
        if let Some(parent) = host.parent(&self.element) {
            host.remove_child(&parent, &self.element)?;
        }
        if let Some(anchor) = &self.anchor {
            host.remove_class(anchor, self.before_cursor_class)?;
        }
        tracing::trace!(target: "hashmark::cursor", "cursor removed");
        Ok(())
    }
}

/// Put the real caret at the end of the last block, if there is one.
pub fn caret_to_last_block<H: EditorHost>(
    host: &mut H,
    converter: &BlockConverter,
) -> Result<(), HostError> {
    let root = host.root();
    match host.last_element_child(&root) {
        Some(last) => converter.select_element(host, &last, CaretTarget::End),
        None => Ok(()),
    }
}
