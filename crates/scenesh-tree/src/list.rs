//! Directory-style listing of a node's children and attributes.

use crate::graph::{NodeRef, SceneTree};
use crate::path;

/// Attribute the shell stamps on nodes it injects itself, so they stay
/// out of listings.
pub const INJECTED_ATTR: &str = "injected";

/// Decides which children a listing shows.
///
/// Hosts and the shell both add bookkeeping nodes to the graph (loader
/// overlays, render surfaces, the terminal the user is typing into) that
/// would only clutter `ls` output. The filter hides anything carrying the
/// marker attribute or one of the deny-listed classes.
#[derive(Debug, Clone)]
pub struct VisibilityFilter {
    /// Attribute marking shell-injected nodes.
    pub hidden_attr: String,
    /// Class tokens hidden from listings.
    pub hidden_classes: Vec<String>,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self {
            hidden_attr: INJECTED_ATTR.to_string(),
            hidden_classes: vec![
                "loader-overlay".to_string(),
                "render-surface".to_string(),
            ],
        }
    }
}

impl VisibilityFilter {
    /// True when the filter hides `node` from listings.
    pub fn hides(&self, scene: &dyn SceneTree, node: NodeRef) -> bool {
        if scene.has_attribute(node, &self.hidden_attr) {
            return true;
        }
        let classes = scene.classes(node);
        self.hidden_classes
            .iter()
            .any(|deny| classes.iter().any(|c| c == deny))
    }
}

/// Lists the visible children of `node` as path segments, in tree order,
/// followed by the node's own attribute names in declaration order.
///
/// Attribute entries look like path components but are leaves: they name
/// values, not nodes, and never resolve further.
pub fn list_entries(
    scene: &dyn SceneTree,
    node: NodeRef,
    filter: &VisibilityFilter,
) -> Vec<String> {
    // The cursor can be detached under us by another actor; a dead node
    // lists as empty rather than exposing its orphaned subtree.
    if !scene.is_attached(node) {
        return Vec::new();
    }
    let mut entries: Vec<String> = scene
        .children(node)
        .into_iter()
        .filter(|child| !filter.hides(scene, *child))
        .map(|child| path::segment_of(scene, child))
        .collect();
    entries.extend(scene.attributes(node));
    entries
}
