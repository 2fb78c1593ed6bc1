//! Paths over the scene graph.
//!
//! Every attached node has a canonical path built from its ancestry: `/`
//! for the root, then one segment per node on the way down, each segment
//! ending in `/`. [`resolve`] walks the other way, from path text back to
//! a node, which is what `cd` and friends are built on.

use crate::graph::{NodeRef, SceneTree};
use crate::selector::{self, CompoundSelector};

/// Renders one node as a path segment: lowercase tag, then `#id` if the
/// node has a non-empty id, then one `.class` per class token, then `/`.
pub fn segment_of(scene: &dyn SceneTree, node: NodeRef) -> String {
    let mut out = scene.tag_name(node).unwrap_or_default();
    if let Some(id) = scene.id(node)
        && !id.is_empty()
    {
        out.push('#');
        out.push_str(&id);
    }
    for class in scene.classes(node) {
        out.push('.');
        out.push_str(&class);
    }
    out.push('/');
    out
}

/// Canonical path of `node`: the concatenated segments of its ancestry.
///
/// Any parentless node renders as `/`, so the root of a detached
/// fragment prints like a filesystem root of its own.
pub fn path_of(scene: &dyn SceneTree, node: NodeRef) -> String {
    match scene.parent(node) {
        None => "/".to_string(),
        Some(parent) => {
            let mut out = path_of(scene, parent);
            out.push_str(&segment_of(scene, node));
            out
        },
    }
}

/// Resolves `path` relative to `base`.
///
/// A leading run of `..` segments ascends one parent per segment,
/// clamping at whatever parentless node the walk reaches. The remaining
/// non-empty segments form a parent-to-child selector chain; the first
/// node in document order below the ascended base that matches the whole
/// chain wins. An empty chain resolves to the ascended base itself.
///
/// Returns `None` when nothing matches or when any segment is malformed.
/// A `..` after the leading run is treated as a malformed segment, not as
/// a traversal. Selector chains only match below attached nodes: from a
/// cursor someone else has detached, `..` still climbs but every lookup
/// reads as not found.
pub fn resolve(scene: &dyn SceneTree, path: &str, base: NodeRef) -> Option<NodeRef> {
    let mut segments = path.split('/').peekable();
    let mut current = base;
    while segments.peek() == Some(&"..") {
        segments.next();
        if let Some(parent) = scene.parent(current) {
            current = parent;
        }
    }

    let chain: Option<Vec<CompoundSelector>> = segments
        .filter(|segment| !segment.is_empty())
        .map(selector::parse_compound)
        .collect();
    let chain = chain?;

    if chain.is_empty() {
        return Some(current);
    }
    if !scene.is_attached(current) {
        return None;
    }
    selector::find_first(scene, current, &chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SceneGraph;

    /// Builds the tree the demo app starts with:
    /// root > a-scene > (a-box.red, a-sphere#example-sphere, a-box)
    fn demo_scene() -> (SceneGraph, NodeRef, NodeRef, NodeRef, NodeRef) {
        let graph = SceneGraph::new();
        let scene = graph.create_node("a-scene");
        let red_box = graph.create_node("a-box");
        graph.add_class(red_box, "red");
        let sphere = graph.create_node("a-sphere");
        graph.set_id(sphere, "example-sphere");
        let plain_box = graph.create_node("a-box");
        graph.append_child(graph.root(), scene);
        graph.append_child(scene, red_box);
        graph.append_child(scene, sphere);
        graph.append_child(scene, plain_box);
        (graph, scene, red_box, sphere, plain_box)
    }

    #[test]
    fn root_path_is_slash() {
        let graph = SceneGraph::new();
        assert_eq!(path_of(&graph, graph.root()), "/");
    }

    #[test]
    fn segments_show_tag_id_and_classes() {
        let (graph, scene, red_box, sphere, _) = demo_scene();
        assert_eq!(segment_of(&graph, scene), "a-scene/");
        assert_eq!(segment_of(&graph, red_box), "a-box.red/");
        assert_eq!(segment_of(&graph, sphere), "a-sphere#example-sphere/");
    }

    #[test]
    fn empty_id_is_left_out_of_the_segment() {
        let graph = SceneGraph::new();
        let node = graph.create_node("a-box");
        graph.set_id(node, "");
        assert_eq!(segment_of(&graph, node), "a-box/");
    }

    #[test]
    fn nested_paths_concatenate_segments() {
        let (graph, _, _, sphere, _) = demo_scene();
        assert_eq!(path_of(&graph, sphere), "/a-scene/a-sphere#example-sphere/");
    }

    #[test]
    fn detached_fragment_root_prints_as_slash() {
        let graph = SceneGraph::new();
        let loose = graph.create_node("a-entity");
        let child = graph.create_node("a-box");
        graph.append_child(loose, child);
        assert_eq!(path_of(&graph, loose), "/");
        assert_eq!(path_of(&graph, child), "/a-box/");
    }

    #[test]
    fn empty_path_resolves_to_base() {
        let (graph, scene, _, _, _) = demo_scene();
        assert_eq!(resolve(&graph, "", scene), Some(scene));
    }

    #[test]
    fn single_tag_resolves_to_first_child_match() {
        let (graph, scene, red_box, _, _) = demo_scene();
        assert_eq!(resolve(&graph, "a-box", scene), Some(red_box));
    }

    #[test]
    fn id_segment_resolves_anywhere_below_base() {
        let (graph, _, _, sphere, _) = demo_scene();
        let root = graph.root();
        assert_eq!(resolve(&graph, "#example-sphere", root), Some(sphere));
    }

    #[test]
    fn class_segment_narrows_the_match() {
        let (graph, scene, red_box, _, _) = demo_scene();
        assert_eq!(resolve(&graph, "a-box.red", scene), Some(red_box));
        assert_eq!(resolve(&graph, "a-box.blue", scene), None);
    }

    #[test]
    fn chained_segments_require_direct_parents() {
        let (graph, _, red_box, _, _) = demo_scene();
        let root = graph.root();
        assert_eq!(resolve(&graph, "a-scene/a-box", root), Some(red_box));
        assert_eq!(resolve(&graph, "a-sphere/a-box", root), None);
    }

    #[test]
    fn trailing_slash_is_ignored() {
        let (graph, scene, red_box, _, _) = demo_scene();
        assert_eq!(resolve(&graph, "a-box/", scene), Some(red_box));
        assert_eq!(resolve(&graph, "a-box.red/", scene), Some(red_box));
    }

    #[test]
    fn dotdot_ascends_one_parent_per_segment() {
        let (graph, scene, _, sphere, _) = demo_scene();
        assert_eq!(resolve(&graph, "..", sphere), Some(scene));
        assert_eq!(resolve(&graph, "../..", sphere), Some(graph.root()));
        assert_eq!(resolve(&graph, "../a-box", sphere), resolve(&graph, "a-box", scene));
    }

    #[test]
    fn dotdot_clamps_at_the_root() {
        let (graph, _, _, sphere, _) = demo_scene();
        let root = graph.root();
        assert_eq!(resolve(&graph, "../../../../..", sphere), Some(root));
        assert_eq!(resolve(&graph, "..", root), Some(root));
    }

    #[test]
    fn embedded_dotdot_is_not_a_traversal() {
        let (graph, _, _, sphere, _) = demo_scene();
        assert_eq!(resolve(&graph, "a-scene/..", graph.root()), None);
        let _ = sphere;
    }

    #[test]
    fn malformed_segment_matches_nothing() {
        let (graph, scene, _, _, _) = demo_scene();
        assert_eq!(resolve(&graph, ".", scene), None);
        assert_eq!(resolve(&graph, "#", scene), None);
        assert_eq!(resolve(&graph, "a box", scene), None);
    }

    #[test]
    fn resolution_prefers_document_order() {
        let (graph, scene, red_box, _, plain_box) = demo_scene();
        // both boxes match the bare tag; the earlier sibling wins
        assert_eq!(resolve(&graph, "a-box", scene), Some(red_box));
        assert_eq!(resolve(&graph, "a-box.red", scene), Some(red_box));
        let _ = plain_box;
    }

    #[test]
    fn detached_base_resolves_to_none() {
        let graph = SceneGraph::new();
        let loose = graph.create_node("a-entity");
        let child = graph.create_node("a-box");
        graph.append_child(loose, child);
        assert_eq!(resolve(&graph, "a-box", loose), None);
        // the degenerate chains still land somewhere
        assert_eq!(resolve(&graph, "", loose), Some(loose));
        assert_eq!(resolve(&graph, "..", child), Some(loose));
    }

    #[test]
    fn resolve_round_trips_canonical_paths() {
        let (graph, scene, red_box, sphere, _) = demo_scene();
        let root = graph.root();
        for node in [scene, red_box, sphere] {
            let path = path_of(&graph, node);
            assert_eq!(resolve(&graph, &path, root), Some(node), "path {path}");
        }
    }

    #[test]
    fn earlier_sibling_with_extra_classes_shadows_a_plain_path() {
        // the red box matches the bare `a-box` segment too, and it comes
        // first in document order, so the plain box's own path resolves
        // to its decorated sibling
        let (graph, _, red_box, _, plain_box) = demo_scene();
        let path = path_of(&graph, plain_box);
        assert_eq!(path, "/a-scene/a-box/");
        assert_eq!(resolve(&graph, &path, graph.root()), Some(red_box));
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        fn arb_node() -> impl Strategy<
            Value = (
                proptest::sample::Index,
                String,
                Option<String>,
                Vec<String>,
            ),
        > {
            (
                any::<proptest::sample::Index>(),
                "[a-z][a-z0-9-]{0,6}",
                proptest::option::of("[a-z][a-z0-9]{0,5}"),
                proptest::collection::vec("[a-z][a-z0-9]{0,4}", 0..3),
            )
        }

        /// Document-order index of every node reachable from the root.
        fn doc_order(graph: &SceneGraph) -> Vec<NodeRef> {
            let mut order = Vec::new();
            let mut stack = vec![graph.root()];
            while let Some(node) = stack.pop() {
                order.push(node);
                let mut children = graph.children(node);
                children.reverse();
                stack.extend(children);
            }
            order
        }

        proptest! {
            /// A node's canonical path always resolves, and never to a
            /// node later in document order than the node itself.
            #[test]
            fn canonical_paths_always_resolve(
                entries in proptest::collection::vec(arb_node(), 1..24)
            ) {
                let graph = SceneGraph::new();
                let mut nodes = vec![graph.root()];
                for (parent_idx, tag, id, classes) in entries {
                    let parent = nodes[parent_idx.index(nodes.len())];
                    let node = graph.create_node(&tag);
                    if let Some(id) = id {
                        graph.set_id(node, &id);
                    }
                    for class in classes {
                        graph.add_class(node, &class);
                    }
                    graph.append_child(parent, node);
                    nodes.push(node);
                }

                let root = graph.root();
                let order = doc_order(&graph);
                let position = |n: NodeRef| {
                    order.iter().position(|&o| o == n).expect("attached")
                };
                for &node in &nodes {
                    let path = path_of(&graph, node);
                    let hit = resolve(&graph, &path, root)
                        .expect("canonical path should resolve");
                    let hit_tag = graph.tag_name(hit);
                    let node_tag = graph.tag_name(node);
                    prop_assert_eq!(hit_tag.as_deref(), node_tag.as_deref());
                    prop_assert!(position(hit) <= position(node));
                }
            }

            /// With a distinct id on every node each segment matches
            /// exactly one node, so canonical paths round-trip exactly.
            #[test]
            fn unambiguous_paths_round_trip(
                entries in proptest::collection::vec(
                    (any::<proptest::sample::Index>(), "[a-z][a-z0-9-]{0,6}"),
                    1..24,
                )
            ) {
                let graph = SceneGraph::new();
                let mut nodes = vec![graph.root()];
                for (i, (parent_idx, tag)) in entries.into_iter().enumerate() {
                    let parent = nodes[parent_idx.index(nodes.len())];
                    let node = graph.create_node(&tag);
                    graph.set_id(node, &format!("n{i}"));
                    graph.append_child(parent, node);
                    nodes.push(node);
                }

                let root = graph.root();
                for &node in &nodes {
                    let path = path_of(&graph, node);
                    prop_assert_eq!(resolve(&graph, &path, root), Some(node));
                }
            }
        }
    }
}
