//! Per-session mutable state.

use std::collections::BTreeMap;

use scenesh_tree::graph::find_by_id;
use scenesh_tree::{path, NodeRef, SceneTree};

/// One value in the session environment.
#[derive(Debug, Clone, PartialEq)]
pub enum EnvValue {
    Text(String),
    Node(NodeRef),
    Int(i64),
}

impl EnvValue {
    /// Render for `env` output. Node references format as their path.
    pub fn render(&self, scene: &dyn SceneTree) -> String {
        match self {
            EnvValue::Text(text) => text.clone(),
            EnvValue::Node(node) => path::path_of(scene, *node),
            EnvValue::Int(value) => value.to_string(),
        }
    }
}

/// State owned by one shell session, never shared between sessions.
#[derive(Debug, Clone)]
pub struct ShellState {
    /// The navigation cursor. Reassigned only by `cd` (or a host that
    /// moves the session deliberately).
    pub current: NodeRef,
    /// Scratch counter for generated node ids.
    pub next_node_id: u64,
    /// Open-ended environment bag; any handler may add keys.
    pub vars: BTreeMap<String, EnvValue>,
}

impl ShellState {
    pub fn new(current: NodeRef) -> Self {
        Self {
            current,
            next_node_id: 1,
            vars: BTreeMap::new(),
        }
    }

    /// Claim the next free generated id of the form `e<N>`.
    ///
    /// Starting at `next_node_id`, probes the attached tree and advances
    /// past every taken id. The counter is left at the value actually used,
    /// so the id is collision-free at assignment time but not reserved.
    pub fn probe_node_id(&mut self, scene: &dyn SceneTree) -> String {
        let mut candidate = self.next_node_id;
        while find_by_id(scene, &format!("e{candidate}")).is_some() {
            candidate += 1;
        }
        self.next_node_id = candidate;
        format!("e{candidate}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenesh_tree::SceneGraph;

    #[test]
    fn probe_returns_first_free_id() {
        let graph = SceneGraph::new();
        let mut state = ShellState::new(graph.root());
        assert_eq!(state.probe_node_id(&graph), "e1");
        assert_eq!(state.next_node_id, 1);
    }

    #[test]
    fn probe_skips_taken_ids_and_leaves_counter_at_used_value() {
        let graph = SceneGraph::new();
        for n in 42..45 {
            let node = graph.create_node("a-box");
            graph.set_id(node, &format!("e{n}"));
            graph.append_child(graph.root(), node);
        }

        let mut state = ShellState::new(graph.root());
        state.next_node_id = 42;
        assert_eq!(state.probe_node_id(&graph), "e45");
        assert_eq!(state.next_node_id, 45);
    }

    #[test]
    fn probe_ignores_detached_ids() {
        let graph = SceneGraph::new();
        let node = graph.create_node("a-box");
        graph.set_id(node, "e7");

        let mut state = ShellState::new(graph.root());
        state.next_node_id = 7;
        // Never attached, so the id does not count as taken.
        assert_eq!(state.probe_node_id(&graph), "e7");
    }

    #[test]
    fn env_values_render() {
        let graph = SceneGraph::new();
        let scene = graph.create_node("a-scene");
        graph.append_child(graph.root(), scene);

        assert_eq!(EnvValue::Text("abc".to_string()).render(&graph), "abc");
        assert_eq!(EnvValue::Int(42).render(&graph), "42");
        assert_eq!(EnvValue::Node(scene).render(&graph), "/a-scene/");
    }
}
