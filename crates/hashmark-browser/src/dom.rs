//! web-sys implementation of the host document traits.
//!
//! `BrowserDocument` wraps the page `Document` and an editable root element
//! (`<body>` unless told otherwise). It holds only JS handles, so clones are
//! cheap and every clone sees the same live DOM.

use hashmark_core::{CaretPlatform, DocumentTree, HostError, NodeKind, SmolStr};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Node};

/// Browser document rooted at an editable element.
#[derive(Clone, Debug)]
pub struct BrowserDocument {
    document: Document,
    root: Element,
}

pub(crate) fn js_err(e: JsValue) -> HostError {
    HostError::Js(format!("{:?}", e))
}

impl BrowserDocument {
    pub fn new(document: Document, root: Element) -> Self {
        Self { document, root }
    }

    /// The current page, rooted at `<body>`.
    pub fn from_window() -> Result<Self, HostError> {
        let document = web_sys::window()
            .ok_or("no window")?
            .document()
            .ok_or("no document")?;
        let body = document.body().ok_or("no body")?;
        Ok(Self::new(document, body.into()))
    }

    /// The current page, rooted at the element with the given id.
    pub fn with_root_id(id: &str) -> Result<Self, HostError> {
        let document = web_sys::window()
            .ok_or("no window")?
            .document()
            .ok_or("no document")?;
        let root = document
            .get_element_by_id(id)
            .ok_or_else(|| format!("element not found: {}", id))?;
        Ok(Self::new(document, root))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn root_element(&self) -> &Element {
        &self.root
    }

    fn root_is_body(&self) -> bool {
        self.document
            .body()
            .is_some_and(|body| AsRef::<Element>::as_ref(&body) == &self.root)
    }

    /// Make the root editable: design mode for the whole page when rooted at
    /// `<body>`, `contenteditable` otherwise.
    pub fn enable_editing(&self) -> Result<(), HostError> {
        if self.root_is_body() {
            self.document
                .unchecked_ref::<web_sys::HtmlDocument>()
                .set_design_mode("on");
        } else {
            self.root
                .set_attribute("contenteditable", "true")
                .map_err(js_err)?;
        }
        tracing::debug!(target: "hashmark::dom", root = %self.root.tag_name(), "editing enabled");
        Ok(())
    }

    fn element<'n>(&self, node: &'n Node) -> Result<&'n Element, HostError> {
        node.dyn_ref::<Element>().ok_or(HostError::NotAnElement)
    }

    fn selection(&self) -> Option<web_sys::Selection> {
        self.document.get_selection().ok().flatten()
    }
}

impl DocumentTree for BrowserDocument {
    type Node = Node;

    fn root(&self) -> Node {
        self.root.clone().into()
    }

    fn is_root(&self, node: &Node) -> bool {
        let root: &Node = self.root.as_ref();
        node == root
    }

    fn node_kind(&self, node: &Node) -> NodeKind {
        match node.node_type() {
            Node::ELEMENT_NODE => NodeKind::Element,
            Node::TEXT_NODE => NodeKind::Text,
            _ => NodeKind::Other,
        }
    }

    fn parent(&self, node: &Node) -> Option<Node> {
        node.parent_node()
    }

    fn tag_name(&self, node: &Node) -> Option<SmolStr> {
        node.dyn_ref::<Element>()
            .map(|element| SmolStr::new(element.tag_name().to_ascii_lowercase()))
    }

    fn text_content(&self, node: &Node) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text_content(&mut self, node: &Node, text: &str) -> Result<(), HostError> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn create_element(&mut self, tag: &str) -> Result<Node, HostError> {
        self.document
            .create_element(tag)
            .map(Into::into)
            .map_err(js_err)
    }

    fn replace_child(&mut self, parent: &Node, new: &Node, old: &Node) -> Result<(), HostError> {
        parent.replace_child(new, old).map(|_| ()).map_err(js_err)
    }

    fn append_child(&mut self, parent: &Node, child: &Node) -> Result<(), HostError> {
        parent.append_child(child).map(|_| ()).map_err(js_err)
    }

    fn remove_child(&mut self, parent: &Node, child: &Node) -> Result<(), HostError> {
        parent.remove_child(child).map(|_| ()).map_err(js_err)
    }

    fn child_nodes(&self, node: &Node) -> Vec<Node> {
        let list = node.child_nodes();
        (0..list.length()).filter_map(|i| list.get(i)).collect()
    }

    fn previous_element_sibling(&self, node: &Node) -> Option<Node> {
        node.dyn_ref::<Element>()?
            .previous_element_sibling()
            .map(Into::into)
    }

    fn last_element_child(&self, node: &Node) -> Option<Node> {
        node.dyn_ref::<Element>()?.last_element_child().map(Into::into)
    }

    fn add_class(&mut self, node: &Node, class: &str) -> Result<(), HostError> {
        self.element(node)?.class_list().add_1(class).map_err(js_err)
    }

    fn remove_class(&mut self, node: &Node, class: &str) -> Result<(), HostError> {
        self.element(node)?
            .class_list()
            .remove_1(class)
            .map_err(js_err)
    }

    fn toggle_class(&mut self, node: &Node, class: &str) -> Result<bool, HostError> {
        self.element(node)?.class_list().toggle(class).map_err(js_err)
    }

    fn elements_with_class(&self, class: &str) -> Vec<Node> {
        let collection = self.root.get_elements_by_class_name(class);
        (0..collection.length())
            .filter_map(|i| collection.item(i))
            .map(Into::into)
            .collect()
    }

    fn has_focus(&self) -> bool {
        self.document.has_focus().unwrap_or(false)
    }
}

impl CaretPlatform for BrowserDocument {
    /// The selection's focus node, ignoring selections outside the root.
    fn focus_node(&self) -> Option<Node> {
        let node = self.selection()?.focus_node()?;
        let root: &Node = self.root.as_ref();
        root.contains(Some(&node)).then_some(node)
    }

    fn collapse(&mut self, node: &Node, offset: u32) -> Result<(), HostError> {
        let selection = self.selection().ok_or(HostError::NoSelection)?;
        tracing::trace!(
            target: "hashmark::dom",
            node_name = %node.node_name(),
            offset,
            "collapsing selection"
        );
        selection
            .collapse_with_offset(Some(node), offset)
            .map_err(js_err)
    }
}
