//! Discovery of composers in newly inserted subtrees.
//!
//! The tree's insertion feed has no natural termination; the guard loop
//! consumes it for the lifetime of the page and hands every inserted
//! subtree to [`MutationWatcher::discover`]. The inserted node itself is
//! matched as well as its descendants, since composers can be swapped in
//! wholesale.

use crate::matcher::SurfaceMatcher;
use crate::page::NodeRef;

#[derive(Debug, Clone, Default)]
pub struct MutationWatcher {
    matcher: SurfaceMatcher,
}

impl MutationWatcher {
    pub fn new(matcher: SurfaceMatcher) -> Self {
        Self { matcher }
    }

    /// Surfaces in the inserted subtree, the subtree root included
    pub fn discover(&self, inserted: &NodeRef) -> Vec<NodeRef> {
        self.matcher.find_surfaces(inserted)
    }
}
