//! In-memory document tree.
//!
//! `MemoryDocument` implements the host traits over an arena of nodes. It
//! backs the test suite and lets the conversion logic run headless, outside
//! a browser. Selection boundaries follow DOM rules when nodes are removed:
//! a caret inside a removed subtree moves to the removed node's old position
//! in its parent, and element offsets shift as siblings come and go.
//!
//! The arena never frees slots. Detached nodes keep their ids (and stay
//! readable) for the life of the document, so memory grows with every
//! replaced block and every demo keystroke.

use smol_str::SmolStr;

use crate::platform::{CaretPlatform, DocumentTree, HostError, NodeKind};

/// Handle to a node in a [`MemoryDocument`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeData {
    Element {
        tag: SmolStr,
        classes: Vec<SmolStr>,
        children: Vec<NodeId>,
    },
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
}

/// Arena-backed document with a single editable root.
#[derive(Debug, Clone)]
pub struct MemoryDocument {
    nodes: Vec<Node>,
    root: NodeId,
    caret: Option<(NodeId, u32)>,
    focused: bool,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Empty document rooted at a `body` element.
    pub fn new() -> Self {
        Self::with_root_tag("body")
    }

    pub fn with_root_tag(tag: &str) -> Self {
        let root = Node {
            data: NodeData::Element {
                tag: SmolStr::new(tag.to_ascii_lowercase()),
                classes: Vec::new(),
                children: Vec::new(),
            },
            parent: None,
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
            caret: None,
            focused: false,
        }
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.alloc(NodeData::Text(text.to_string()))
    }

    /// Append a `<tag>text</tag>` block to the root.
    pub fn push_block(&mut self, tag: &str, text: &str) -> NodeId {
        let element = self.alloc_element(tag);
        if !text.is_empty() {
            let text = self.create_text(text);
            self.attach(element, text, None);
        }
        self.attach(self.root, element, None);
        element
    }

    /// Put the caret at the end of the first text child of `node`, or at the
    /// start of `node` if it has no text.
    pub fn place_caret_in_text(&mut self, node: &NodeId) {
        let text_child = self
            .children(*node)
            .iter()
            .copied()
            .find(|child| matches!(self.node(*child).data, NodeData::Text(_)));
        self.caret = Some(match text_child {
            Some(text) => (text, char_len(&self.text_content(&text))),
            None => (*node, 0),
        });
    }

    /// Current collapsed caret position.
    pub fn caret(&self) -> Option<(NodeId, u32)> {
        self.caret
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    pub fn classes(&self, node: &NodeId) -> Vec<SmolStr> {
        match &self.node(*node).data {
            NodeData::Element { classes, .. } => classes.clone(),
            NodeData::Text(_) => Vec::new(),
        }
    }

    /// Serialize the root's children as HTML. Non-breaking spaces are
    /// written as `&nbsp;` so they stay visible in assertions.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root) {
            self.write_html(*child, &mut out);
        }
        out
    }

    fn write_html(&self, id: NodeId, out: &mut String) {
        match &self.node(id).data {
            NodeData::Text(text) => {
                for c in text.chars() {
                    match c {
                        '&' => out.push_str("&amp;"),
                        '<' => out.push_str("&lt;"),
                        '>' => out.push_str("&gt;"),
                        '\u{a0}' => out.push_str("&nbsp;"),
                        c => out.push(c),
                    }
                }
            }
            NodeData::Element {
                tag,
                classes,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                if !classes.is_empty() {
                    out.push_str(" class=\"");
                    out.push_str(&classes.join(" "));
                    out.push('"');
                }
                out.push('>');
                if tag == "br" {
                    return;
                }
                for child in children {
                    self.write_html(*child, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node { data, parent: None });
        id
    }

    fn alloc_element(&mut self, tag: &str) -> NodeId {
        self.alloc(NodeData::Element {
            tag: SmolStr::new(tag.to_ascii_lowercase()),
            classes: Vec::new(),
            children: Vec::new(),
        })
    }

    fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.node(id).data {
            NodeData::Element { children, .. } => children,
            NodeData::Text(_) => &[],
        }
    }

    fn children_mut(&mut self, id: NodeId) -> Result<&mut Vec<NodeId>, HostError> {
        match &mut self.node_mut(id).data {
            NodeData::Element { children, .. } => Ok(children),
            NodeData::Text(_) => Err(HostError::NotAnElement),
        }
    }

    fn classes_mut(&mut self, id: NodeId) -> Result<&mut Vec<SmolStr>, HostError> {
        match &mut self.node_mut(id).data {
            NodeData::Element { classes, .. } => Ok(classes),
            NodeData::Text(_) => Err(HostError::NotAnElement),
        }
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, mut node: NodeId) -> bool {
        loop {
            if node == ancestor {
                return true;
            }
            match self.node(node).parent {
                Some(parent) => node = parent,
                None => return false,
            }
        }
    }

    /// Insert `child` into `parent` at `index` (append when `None`).
    fn attach(&mut self, parent: NodeId, child: NodeId, index: Option<usize>) {
        self.node_mut(child).parent = Some(parent);
        let NodeData::Element { children, .. } = &mut self.node_mut(parent).data else {
            return;
        };
        let index = index.unwrap_or(children.len());
        children.insert(index, child);

        if let Some((node, offset)) = self.caret {
            if node == parent && offset as usize > index {
                self.caret = Some((parent, offset + 1));
            }
        }
    }

    /// Unlink `child` from its parent, moving any caret inside it to the
    /// child's old slot.
    fn detach(&mut self, child: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node(child).parent?;
        let children = self.children_mut(parent).ok()?;
        let index = children.iter().position(|c| *c == child)?;
        children.remove(index);
        self.node_mut(child).parent = None;

        match self.caret {
            Some((node, _)) if self.is_inclusive_ancestor(child, node) => {
                self.caret = Some((parent, index as u32));
            }
            Some((node, offset)) if node == parent && offset as usize > index => {
                self.caret = Some((parent, offset - 1));
            }
            _ => {}
        }
        Some((parent, index))
    }
}

fn char_len(text: &str) -> u32 {
    u32::try_from(text.chars().count()).unwrap_or(u32::MAX)
}

impl DocumentTree for MemoryDocument {
    type Node = NodeId;

    fn root(&self) -> NodeId {
        self.root
    }

    fn node_kind(&self, node: &NodeId) -> NodeKind {
        match self.node(*node).data {
            NodeData::Element { .. } => NodeKind::Element,
            NodeData::Text(_) => NodeKind::Text,
        }
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.node(*node).parent
    }

    fn tag_name(&self, node: &NodeId) -> Option<SmolStr> {
        match &self.node(*node).data {
            NodeData::Element { tag, .. } => Some(tag.clone()),
            NodeData::Text(_) => None,
        }
    }

    fn text_content(&self, node: &NodeId) -> String {
        match &self.node(*node).data {
            NodeData::Text(text) => text.clone(),
            NodeData::Element { children, .. } => children
                .iter()
                .map(|child| self.text_content(child))
                .collect(),
        }
    }

    fn set_text_content(&mut self, node: &NodeId, text: &str) -> Result<(), HostError> {
        if let NodeData::Text(existing) = &mut self.node_mut(*node).data {
            *existing = text.to_string();
            if self.caret.is_some_and(|(caret_node, _)| caret_node == *node) {
                self.caret = Some((*node, 0));
            }
            return Ok(());
        }

        // Every old child goes, so any caret at or below `node` ends up at 0.
        if self
            .caret
            .is_some_and(|(caret_node, _)| self.is_inclusive_ancestor(*node, caret_node))
        {
            self.caret = Some((*node, 0));
        }
        let old_children = std::mem::take(self.children_mut(*node)?);
        for child in &old_children {
            self.node_mut(*child).parent = None;
        }

        if !text.is_empty() {
            let text = self.create_text(text);
            self.attach(*node, text, None);
        }
        Ok(())
    }

    fn create_element(&mut self, tag: &str) -> Result<NodeId, HostError> {
        Ok(self.alloc_element(tag))
    }

    fn replace_child(
        &mut self,
        parent: &NodeId,
        new: &NodeId,
        old: &NodeId,
    ) -> Result<(), HostError> {
        if self.node(*old).parent != Some(*parent) {
            return Err(HostError::Detached);
        }
        if self.is_inclusive_ancestor(*new, *parent) {
            return Err("cannot insert a node into its own subtree".into());
        }
        self.detach(*new);
        let (parent, index) = self.detach(*old).ok_or(HostError::Detached)?;
        self.attach(parent, *new, Some(index));
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        self.children_mut(*parent)?;
        if self.is_inclusive_ancestor(*child, *parent) {
            return Err("cannot insert a node into its own subtree".into());
        }
        self.detach(*child);
        self.attach(*parent, *child, None);
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), HostError> {
        if self.node(*child).parent != Some(*parent) {
            return Err(HostError::Detached);
        }
        self.detach(*child);
        Ok(())
    }

    fn child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
        self.children(*node).to_vec()
    }

    fn previous_element_sibling(&self, node: &NodeId) -> Option<NodeId> {
        let parent = self.node(*node).parent?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|c| c == node)?;
        siblings[..index]
            .iter()
            .rev()
            .copied()
            .find(|sibling| self.node_kind(sibling) == NodeKind::Element)
    }

    fn last_element_child(&self, node: &NodeId) -> Option<NodeId> {
        self.children(*node)
            .iter()
            .rev()
            .copied()
            .find(|child| self.node_kind(child) == NodeKind::Element)
    }

    fn add_class(&mut self, node: &NodeId, class: &str) -> Result<(), HostError> {
        let classes = self.classes_mut(*node)?;
        if !classes.iter().any(|c| c == class) {
            classes.push(SmolStr::new(class));
        }
        Ok(())
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) -> Result<(), HostError> {
        self.classes_mut(*node)?.retain(|c| c != class);
        Ok(())
    }

    fn toggle_class(&mut self, node: &NodeId, class: &str) -> Result<bool, HostError> {
        let classes = self.classes_mut(*node)?;
        match classes.iter().position(|c| c == class) {
            Some(index) => {
                classes.remove(index);
                Ok(false)
            }
            None => {
                classes.push(SmolStr::new(class));
                Ok(true)
            }
        }
    }

    fn elements_with_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if let NodeData::Element {
                classes, children, ..
            } = &self.node(id).data
            {
                if id != self.root && classes.iter().any(|c| c == class) {
                    found.push(id);
                }
                stack.extend(children.iter().rev());
            }
        }
        found
    }

    fn has_focus(&self) -> bool {
        self.focused
    }
}

impl CaretPlatform for MemoryDocument {
    fn focus_node(&self) -> Option<NodeId> {
        self.caret.map(|(node, _)| node)
    }

    fn collapse(&mut self, node: &NodeId, offset: u32) -> Result<(), HostError> {
        let max = match &self.node(*node).data {
            NodeData::Element { children, .. } => children.len(),
            NodeData::Text(text) => text.chars().count(),
        };
        if offset as usize > max {
            return Err(format!("offset {offset} out of range (max {max})").into());
        }
        self.caret = Some((*node, offset));
        Ok(())
    }
}
