//! Platform abstraction traits for the host document.
//!
//! These traits define the interface between the block conversion logic and
//! whatever owns the actual document tree (the browser DOM, or the in-memory
//! tree used for tests and headless embedding). The conversion logic never
//! touches a concrete tree type.

use std::fmt::Debug;

use smol_str::SmolStr;
use thiserror::Error;

/// Errors reported by a host document.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HostError {
    /// The node has no parent, so it cannot be replaced or removed.
    #[error("node is not attached to the document")]
    Detached,

    /// An element operation was attempted on a text node.
    #[error("node is not an element")]
    NotAnElement,

    /// The host has no selection object to collapse.
    #[error("no selection available")]
    NoSelection,

    /// The host runtime threw.
    #[error("host error: {0}")]
    Js(String),
}

impl From<&str> for HostError {
    fn from(s: &str) -> Self {
        HostError::Js(s.to_string())
    }
}

impl From<String> for HostError {
    fn from(s: String) -> Self {
        HostError::Js(s)
    }
}

/// Coarse node classification; the conversion logic only cares whether a
/// node is structural.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
    Other,
}

/// Where to collapse the caret inside an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CaretTarget {
    Start,
    #[default]
    End,
}

/// Tree-structured document operations.
///
/// Mirrors the subset of the DOM the editor needs. `Node` handles are cheap
/// to clone and compare by identity.
pub trait DocumentTree {
    type Node: Clone + PartialEq + Debug;

    /// The editable root container.
    fn root(&self) -> Self::Node;

    fn is_root(&self, node: &Self::Node) -> bool {
        *node == self.root()
    }

    fn node_kind(&self, node: &Self::Node) -> NodeKind;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Lowercase element name, `None` for non-elements.
    fn tag_name(&self, node: &Self::Node) -> Option<SmolStr>;

    /// Concatenated text of all descendant text nodes.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Replace all children of `node` with a single text node (or nothing,
    /// for empty text).
    fn set_text_content(&mut self, node: &Self::Node, text: &str) -> Result<(), HostError>;

    fn create_element(&mut self, tag: &str) -> Result<Self::Node, HostError>;

    /// Put `new` where `old` is in `parent`. `old` is detached.
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new: &Self::Node,
        old: &Self::Node,
    ) -> Result<(), HostError>;

    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), HostError>;

    fn child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;

    fn previous_element_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    fn last_element_child(&self, node: &Self::Node) -> Option<Self::Node>;

    fn add_class(&mut self, node: &Self::Node, class: &str) -> Result<(), HostError>;

    fn remove_class(&mut self, node: &Self::Node, class: &str) -> Result<(), HostError>;

    /// Toggle a class, returning whether it is now present.
    fn toggle_class(&mut self, node: &Self::Node, class: &str) -> Result<bool, HostError>;

    /// Elements carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<Self::Node>;

    /// Whether the document currently has input focus.
    fn has_focus(&self) -> bool;
}

/// Selection/caret operations.
pub trait CaretPlatform: DocumentTree {
    /// The node the selection's focus is in, if any.
    fn focus_node(&self) -> Option<Self::Node>;

    /// Collapse the selection to `offset` inside `node`. For elements the
    /// offset counts child nodes, for text nodes it counts characters.
    fn collapse(&mut self, node: &Self::Node, offset: u32) -> Result<(), HostError>;
}

/// Everything the editor needs from a host.
pub trait EditorHost: DocumentTree + CaretPlatform {}

impl<T: DocumentTree + CaretPlatform> EditorHost for T {}
