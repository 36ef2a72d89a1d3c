//! Live element tree and its change feed.
//!
//! The host page owns the tree: it creates and destroys elements, edits
//! their text, and moves focus. The monitoring core only subscribes to the
//! event feed and holds non-owning references to nodes, so an element
//! discarded by the page becomes unreachable without any explicit detach.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, Weak};
use tokio::sync::mpsc;

/// Shared handle to a tree node
pub type NodeRef = Arc<Node>;

/// Non-owning handle to a tree node
pub type WeakNodeRef = Weak<Node>;

/// Identity of a node (pointer-based, no synthetic IDs)
pub type NodeId = usize;

/// Identity of a node for map keys. Two nodes with identical content have
/// distinct ids; an id is stable for the lifetime of the node.
pub fn node_id(node: &NodeRef) -> NodeId {
    Arc::as_ptr(node) as NodeId
}

/// Events emitted by the tree as the page mutates it
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A subtree was inserted; the node is the subtree root
    Inserted(NodeRef),
    /// The user edited the node's text or form value
    Input(NodeRef),
    /// The node lost focus
    Blur(NodeRef),
    /// The page is being torn down
    Unload,
}

/// A single element in the tree
#[derive(Debug)]
pub struct Node {
    tag: String,
    attrs: RwLock<HashMap<String, String>>,
    children: RwLock<Vec<NodeRef>>,
    parent: RwLock<WeakNodeRef>,
    text: RwLock<String>,
    value: RwLock<Option<String>>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: RwLock::new(HashMap::new()),
            children: RwLock::new(Vec::new()),
            parent: RwLock::new(Weak::new()),
            text: RwLock::new(String::new()),
            value: RwLock::new(None),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<String> {
        self.attrs.read().expect("lock poisoned").get(name).cloned()
    }

    pub fn set_attr(&self, name: &str, value: &str) {
        self.attrs
            .write()
            .expect("lock poisoned")
            .insert(name.to_string(), value.to_string());
    }

    pub fn parent(&self) -> Option<NodeRef> {
        self.parent.read().expect("lock poisoned").upgrade()
    }

    pub fn children(&self) -> Vec<NodeRef> {
        self.children.read().expect("lock poisoned").clone()
    }

    /// Form value, present only for form-field elements
    pub fn value(&self) -> Option<String> {
        self.value.read().expect("lock poisoned").clone()
    }

    /// Set the node's own text without emitting an input event
    pub fn set_text(&self, text: &str) {
        *self.text.write().expect("lock poisoned") = text.to_string();
    }

    /// Set the node's form value without emitting an input event
    pub fn set_value(&self, value: &str) {
        *self.value.write().expect("lock poisoned") = Some(value.to_string());
    }

    /// Rendered text of the node and all descendants
    pub fn inner_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Plain text content. The tree has no layout, so this coincides with
    /// [`inner_text`](Self::inner_text).
    pub fn text_content(&self) -> String {
        self.inner_text()
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text.read().expect("lock poisoned"));
        for child in self.children.read().expect("lock poisoned").iter() {
            child.collect_text(out);
        }
    }
}

/// The live tree plus its event feed.
///
/// Cloning yields another handle to the same tree; events from all handles
/// arrive on the single receiver returned by [`PageTree::new`].
#[derive(Debug, Clone)]
pub struct PageTree {
    root: NodeRef,
    events: mpsc::UnboundedSender<PageEvent>,
}

impl PageTree {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PageEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tree = Self {
            root: Arc::new(Node::new("html")),
            events: tx,
        };
        (tree, rx)
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    /// Create a detached element. It joins the tree (and is announced on the
    /// feed) only once appended.
    pub fn create_element(&self, tag: &str) -> NodeRef {
        Arc::new(Node::new(tag))
    }

    pub fn append_child(&self, parent: &NodeRef, child: &NodeRef) {
        *child.parent.write().expect("lock poisoned") = Arc::downgrade(parent);
        parent
            .children
            .write()
            .expect("lock poisoned")
            .push(Arc::clone(child));
        let _ = self.events.send(PageEvent::Inserted(Arc::clone(child)));
    }

    /// Remove a child. No event is emitted; the feed only announces
    /// insertions, removed nodes are reclaimed once unreferenced.
    pub fn remove_child(&self, parent: &NodeRef, child: &NodeRef) {
        parent
            .children
            .write()
            .expect("lock poisoned")
            .retain(|c| !Arc::ptr_eq(c, child));
    }

    /// User edit of an editable region's text
    pub fn edit_text(&self, node: &NodeRef, text: &str) {
        node.set_text(text);
        let _ = self.events.send(PageEvent::Input(Arc::clone(node)));
    }

    /// User edit of a form field's value
    pub fn edit_value(&self, node: &NodeRef, value: &str) {
        node.set_value(value);
        let _ = self.events.send(PageEvent::Input(Arc::clone(node)));
    }

    pub fn blur(&self, node: &NodeRef) {
        let _ = self.events.send(PageEvent::Blur(Arc::clone(node)));
    }

    pub fn unload(&self) {
        let _ = self.events.send(PageEvent::Unload);
    }
}
