//! Structural matching of text-composition surfaces.
//!
//! Matching is driven by a fixed ordered list of role/attribute patterns;
//! there are no heuristics beyond exact pattern matching. The built-in list
//! covers the composer shapes of the supported social surfaces: reply
//! boxes, DM composers, and standalone editable textboxes.

use crate::page::{node_id, NodeId, NodeRef};
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::sync::Arc;

/// How an attribute value is compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    Equals,
    StartsWith,
    Contains,
}

/// A single attribute constraint
#[derive(Debug, Clone)]
pub struct AttrPattern {
    pub name: String,
    pub op: AttrOp,
    pub value: String,
}

impl AttrPattern {
    fn matches(&self, node: &NodeRef) -> bool {
        match node.attr(&self.name) {
            Some(actual) => match self.op {
                AttrOp::Equals => actual == self.value,
                AttrOp::StartsWith => actual.starts_with(&self.value),
                AttrOp::Contains => actual.contains(&self.value),
            },
            None => false,
        }
    }
}

/// A structural pattern: optional tag, attribute constraints, and an
/// optional ancestor constraint (the analog of a descendant selector).
#[derive(Debug, Clone)]
pub struct SurfacePattern {
    tag: Option<String>,
    attrs: Vec<AttrPattern>,
    within: Option<Box<SurfacePattern>>,
}

impl SurfacePattern {
    pub fn element(tag: &str) -> Self {
        Self {
            tag: Some(tag.to_string()),
            attrs: Vec::new(),
            within: None,
        }
    }

    pub fn any() -> Self {
        Self {
            tag: None,
            attrs: Vec::new(),
            within: None,
        }
    }

    pub fn attr(mut self, name: &str, op: AttrOp, value: &str) -> Self {
        self.attrs.push(AttrPattern {
            name: name.to_string(),
            op,
            value: value.to_string(),
        });
        self
    }

    /// Require some ancestor of the node to match `ancestor`. The ancestor
    /// may sit above the searched subtree root.
    pub fn within(mut self, ancestor: SurfacePattern) -> Self {
        self.within = Some(Box::new(ancestor));
        self
    }

    pub fn matches(&self, node: &NodeRef) -> bool {
        if !self.matches_local(node) {
            return false;
        }
        match &self.within {
            None => true,
            Some(ancestor) => {
                let mut current = node.parent();
                while let Some(n) = current {
                    if ancestor.matches_local(&n) {
                        return true;
                    }
                    current = n.parent();
                }
                false
            }
        }
    }

    fn matches_local(&self, node: &NodeRef) -> bool {
        if let Some(tag) = &self.tag {
            if node.tag() != tag {
                return false;
            }
        }
        self.attrs.iter().all(|a| a.matches(node))
    }
}

lazy_static! {
    /// Built-in composer patterns, in match order
    static ref BUILTIN_PATTERNS: Vec<SurfacePattern> = vec![
        // Tweet composer: editable region inside the tweet textarea shell
        SurfacePattern::element("div")
            .attr("contenteditable", AttrOp::Equals, "true")
            .within(
                SurfacePattern::element("div")
                    .attr("data-testid", AttrOp::StartsWith, "tweetTextarea"),
            ),
        // Generic editable textbox
        SurfacePattern::element("div")
            .attr("role", AttrOp::Equals, "textbox")
            .attr("contenteditable", AttrOp::Equals, "true"),
        // DM composer
        SurfacePattern::element("div")
            .attr("contenteditable", AttrOp::Equals, "true")
            .within(
                SurfacePattern::any()
                    .attr("data-testid", AttrOp::Equals, "dmComposerTextInput"),
            ),
        // Reply box
        SurfacePattern::element("div")
            .attr("contenteditable", AttrOp::Equals, "true")
            .within(
                SurfacePattern::any()
                    .attr("data-testid", AttrOp::Equals, "replyTextarea"),
            ),
        // Editable region that is itself tagged as a tweet textarea
        SurfacePattern::any()
            .attr("contenteditable", AttrOp::Equals, "true")
            .attr("data-testid", AttrOp::Contains, "tweetTextarea"),
    ];
}

/// Matches composer surfaces in a subtree. Pure and synchronous.
#[derive(Debug, Clone)]
pub struct SurfaceMatcher {
    patterns: Vec<SurfacePattern>,
}

impl SurfaceMatcher {
    pub fn new(patterns: Vec<SurfacePattern>) -> Self {
        Self { patterns }
    }

    pub fn with_defaults() -> Self {
        Self::new(BUILTIN_PATTERNS.clone())
    }

    /// Whether a single node matches any pattern
    pub fn matches(&self, node: &NodeRef) -> bool {
        self.patterns.iter().any(|p| p.matches(node))
    }

    /// All matching surfaces in `root`'s subtree, `root` included, in
    /// document order. A node matching several patterns appears once.
    pub fn find_surfaces(&self, root: &NodeRef) -> Vec<NodeRef> {
        let mut seen: HashSet<NodeId> = HashSet::new();
        let mut found = Vec::new();
        self.collect(root, &mut seen, &mut found);
        found
    }

    fn collect(&self, node: &NodeRef, seen: &mut HashSet<NodeId>, found: &mut Vec<NodeRef>) {
        if !seen.insert(node_id(node)) {
            return;
        }
        if self.matches(node) {
            found.push(Arc::clone(node));
        }
        for child in node.children() {
            self.collect(&child, seen, found);
        }
    }
}

impl Default for SurfaceMatcher {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::PageTree;

    fn editable_textbox(tree: &PageTree) -> NodeRef {
        let node = tree.create_element("div");
        node.set_attr("role", "textbox");
        node.set_attr("contenteditable", "true");
        node
    }

    #[test]
    fn matches_generic_textbox() {
        let (tree, _rx) = PageTree::new();
        let composer = editable_textbox(&tree);
        tree.append_child(tree.root(), &composer);

        let matcher = SurfaceMatcher::with_defaults();
        let found = matcher.find_surfaces(tree.root());
        assert_eq!(found.len(), 1);
        assert!(Arc::ptr_eq(&found[0], &composer));
    }

    #[test]
    fn search_includes_root_itself() {
        let (tree, _rx) = PageTree::new();
        let composer = editable_textbox(&tree);

        let matcher = SurfaceMatcher::with_defaults();
        let found = matcher.find_surfaces(&composer);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn matches_composer_inside_shell() {
        let (tree, _rx) = PageTree::new();
        let shell = tree.create_element("div");
        shell.set_attr("data-testid", "tweetTextarea_0");
        let inner = tree.create_element("div");
        inner.set_attr("contenteditable", "true");
        tree.append_child(tree.root(), &shell);
        tree.append_child(&shell, &inner);

        let matcher = SurfaceMatcher::with_defaults();
        let found = matcher.find_surfaces(tree.root());
        assert_eq!(found.len(), 1);
        assert!(Arc::ptr_eq(&found[0], &inner));
    }

    #[test]
    fn ancestor_may_sit_above_search_root() {
        let (tree, _rx) = PageTree::new();
        let shell = tree.create_element("div");
        shell.set_attr("data-testid", "dmComposerTextInput");
        let inner = tree.create_element("div");
        inner.set_attr("contenteditable", "true");
        tree.append_child(tree.root(), &shell);
        tree.append_child(&shell, &inner);

        // Search scoped to the inserted node only, as the watcher does
        let matcher = SurfaceMatcher::with_defaults();
        let found = matcher.find_surfaces(&inner);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn multiple_pattern_match_counts_once() {
        let (tree, _rx) = PageTree::new();
        // Matches both the generic textbox pattern and the tagged pattern
        let composer = tree.create_element("div");
        composer.set_attr("role", "textbox");
        composer.set_attr("contenteditable", "true");
        composer.set_attr("data-testid", "tweetTextarea_0");
        tree.append_child(tree.root(), &composer);

        let matcher = SurfaceMatcher::with_defaults();
        assert_eq!(matcher.find_surfaces(tree.root()).len(), 1);
    }

    #[test]
    fn ignores_non_editable_nodes() {
        let (tree, _rx) = PageTree::new();
        let plain = tree.create_element("div");
        plain.set_attr("role", "textbox");
        tree.append_child(tree.root(), &plain);

        let matcher = SurfaceMatcher::with_defaults();
        assert!(matcher.find_surfaces(tree.root()).is_empty());
    }

    #[test]
    fn attr_ops() {
        let (tree, _rx) = PageTree::new();
        let node = tree.create_element("div");
        node.set_attr("data-testid", "tweetTextarea_0");

        let starts = SurfacePattern::any().attr("data-testid", AttrOp::StartsWith, "tweetTextarea");
        let contains = SurfacePattern::any().attr("data-testid", AttrOp::Contains, "Textarea");
        let equals = SurfacePattern::any().attr("data-testid", AttrOp::Equals, "tweetTextarea");

        assert!(starts.matches(&node));
        assert!(contains.matches(&node));
        assert!(!equals.matches(&node));
    }
}
