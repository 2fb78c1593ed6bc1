//! Arena-based scene graph shared across the shell.
//!
//! Nodes live in a flat map keyed by handle and linked both ways. The
//! arena sits behind a single `RwLock`, so one graph can be handed to the
//! session, its commands and background tasks as `Arc<dyn SceneTree>`
//! without cloning subtrees around.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

use scenesh_types::attr::AttrValue;

/// Opaque handle to a node in a [`SceneTree`].
///
/// Handles stay valid for the lifetime of the graph that issued them,
/// whether or not the node is currently attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(u64);

// ------------------------------------------------------------------
// SceneTree trait
// ------------------------------------------------------------------

/// Read and write access to a live scene graph.
///
/// Everything above this crate works against the trait, never a concrete
/// arena, so a host can back the shell with its own scene representation.
/// All operations tolerate handles from a different graph by returning
/// `None`, an empty collection or doing nothing.
pub trait SceneTree: Send + Sync {
    /// Handle of the synthetic root node.
    fn root(&self) -> NodeRef;

    /// Parent of `node`, or `None` for the root and detached subtree roots.
    fn parent(&self, node: NodeRef) -> Option<NodeRef>;

    /// Children of `node` in tree order.
    fn children(&self, node: NodeRef) -> Vec<NodeRef>;

    /// Lowercase tag name of `node`.
    fn tag_name(&self, node: NodeRef) -> Option<String>;

    /// Value of the `id` attribute, if set.
    fn id(&self, node: NodeRef) -> Option<String>;

    /// Sets the `id` attribute. The id names the node in paths.
    fn set_id(&self, node: NodeRef, id: &str);

    /// Class tokens of `node` in declaration order.
    fn classes(&self, node: NodeRef) -> Vec<String>;

    /// Appends a class token unless the node already carries it.
    fn add_class(&self, node: NodeRef, class: &str);

    /// Attribute names of `node` in declaration order.
    fn attributes(&self, node: NodeRef) -> Vec<String>;

    /// Value of a single attribute.
    fn attribute(&self, node: NodeRef, name: &str) -> Option<AttrValue>;

    /// Sets an attribute, keeping its position when it already exists.
    fn set_attribute(&self, node: NodeRef, name: &str, value: AttrValue);

    /// True when `node` carries the attribute, whatever its value.
    fn has_attribute(&self, node: NodeRef, name: &str) -> bool;

    /// Creates a new detached node with the given tag.
    fn create_node(&self, tag: &str) -> NodeRef;

    /// Appends `child` as the last child of `parent`, unlinking it from a
    /// previous parent first. Appending a node under its own descendant
    /// is refused.
    fn append_child(&self, parent: NodeRef, child: NodeRef);

    /// Unlinks `node` from its parent. The subtree below it stays intact
    /// and its handles remain usable.
    fn detach(&self, node: NodeRef);

    /// True when `node` lies in the subtree rooted at `ancestor`,
    /// including `ancestor` itself.
    fn contains(&self, ancestor: NodeRef, node: NodeRef) -> bool;

    /// True when `node` is reachable from the root.
    fn is_attached(&self, node: NodeRef) -> bool;

    /// Notifies the host that the attribute `name` on `node` should be
    /// synchronized back to its rendered form. No-op without a hook.
    fn flush_component(&self, node: NodeRef, name: &str);
}

// ------------------------------------------------------------------
// SceneGraph
// ------------------------------------------------------------------

/// One node's storage in the arena.
#[derive(Debug, Clone)]
struct NodeRecord {
    tag: String,
    attributes: Vec<(String, AttrValue)>,
    parent: Option<u64>,
    children: Vec<u64>,
}

type FlushHook = Arc<dyn Fn(NodeRef, &str) + Send + Sync>;

struct GraphInner {
    nodes: HashMap<u64, NodeRecord>,
    next: u64,
    root: u64,
    flush_hook: Option<FlushHook>,
}

/// The in-memory [`SceneTree`] implementation used by the demo app and
/// every test in the workspace.
pub struct SceneGraph {
    inner: RwLock<GraphInner>,
}

impl SceneGraph {
    /// Creates a graph holding only the synthetic root node.
    pub fn new() -> Self {
        let root = NodeRecord {
            tag: "root".to_string(),
            attributes: Vec::new(),
            parent: None,
            children: Vec::new(),
        };
        let mut nodes = HashMap::new();
        nodes.insert(0, root);
        Self {
            inner: RwLock::new(GraphInner {
                nodes,
                next: 1,
                root: 0,
                flush_hook: None,
            }),
        }
    }

    /// Registers the hook [`SceneTree::flush_component`] forwards to.
    /// A second call replaces the first.
    pub fn set_flush_hook(&self, hook: impl Fn(NodeRef, &str) + Send + Sync + 'static) {
        self.write().flush_hook = Some(Arc::new(hook));
    }

    fn read(&self) -> RwLockReadGuard<'_, GraphInner> {
        self.inner.read().expect("scene graph lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, GraphInner> {
        self.inner.write().expect("scene graph lock poisoned")
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneTree for SceneGraph {
    fn root(&self) -> NodeRef {
        NodeRef(self.read().root)
    }

    fn parent(&self, node: NodeRef) -> Option<NodeRef> {
        self.read().nodes.get(&node.0)?.parent.map(NodeRef)
    }

    fn children(&self, node: NodeRef) -> Vec<NodeRef> {
        match self.read().nodes.get(&node.0) {
            Some(rec) => rec.children.iter().copied().map(NodeRef).collect(),
            None => Vec::new(),
        }
    }

    fn tag_name(&self, node: NodeRef) -> Option<String> {
        self.read().nodes.get(&node.0).map(|rec| rec.tag.clone())
    }

    fn id(&self, node: NodeRef) -> Option<String> {
        let inner = self.read();
        let rec = inner.nodes.get(&node.0)?;
        attr_of(rec, "id")
            .and_then(AttrValue::as_text)
            .map(str::to_string)
    }

    fn set_id(&self, node: NodeRef, id: &str) {
        self.set_attribute(node, "id", AttrValue::text(id));
    }

    fn classes(&self, node: NodeRef) -> Vec<String> {
        let inner = self.read();
        let Some(rec) = inner.nodes.get(&node.0) else {
            return Vec::new();
        };
        match attr_of(rec, "class").and_then(AttrValue::as_text) {
            Some(value) => value.split_ascii_whitespace().map(str::to_string).collect(),
            None => Vec::new(),
        }
    }

    fn add_class(&self, node: NodeRef, class: &str) {
        let mut inner = self.write();
        let Some(rec) = inner.nodes.get_mut(&node.0) else {
            return;
        };
        let current = attr_of(rec, "class")
            .and_then(AttrValue::as_text)
            .unwrap_or("")
            .to_string();
        if current.split_ascii_whitespace().any(|c| c == class) {
            return;
        }
        let joined = if current.is_empty() {
            class.to_string()
        } else {
            format!("{current} {class}")
        };
        set_attr_on(rec, "class", AttrValue::Text(joined));
    }

    fn attributes(&self, node: NodeRef) -> Vec<String> {
        match self.read().nodes.get(&node.0) {
            Some(rec) => rec.attributes.iter().map(|(name, _)| name.clone()).collect(),
            None => Vec::new(),
        }
    }

    fn attribute(&self, node: NodeRef, name: &str) -> Option<AttrValue> {
        let inner = self.read();
        let rec = inner.nodes.get(&node.0)?;
        attr_of(rec, name).cloned()
    }

    fn set_attribute(&self, node: NodeRef, name: &str, value: AttrValue) {
        let mut inner = self.write();
        if let Some(rec) = inner.nodes.get_mut(&node.0) {
            set_attr_on(rec, name, value);
        }
    }

    fn has_attribute(&self, node: NodeRef, name: &str) -> bool {
        let inner = self.read();
        match inner.nodes.get(&node.0) {
            Some(rec) => attr_of(rec, name).is_some(),
            None => false,
        }
    }

    fn create_node(&self, tag: &str) -> NodeRef {
        let mut inner = self.write();
        let id = inner.next;
        inner.next += 1;
        inner.nodes.insert(
            id,
            NodeRecord {
                tag: tag.to_ascii_lowercase(),
                attributes: Vec::new(),
                parent: None,
                children: Vec::new(),
            },
        );
        NodeRef(id)
    }

    fn append_child(&self, parent: NodeRef, child: NodeRef) {
        let mut inner = self.write();
        if !inner.nodes.contains_key(&parent.0) || !inner.nodes.contains_key(&child.0) {
            return;
        }
        // refuse to create a cycle
        if parent.0 == child.0 || is_under(&inner, child.0, parent.0) {
            return;
        }
        if let Some(prev) = inner.nodes.get(&child.0).and_then(|rec| rec.parent)
            && let Some(rec) = inner.nodes.get_mut(&prev)
        {
            rec.children.retain(|&c| c != child.0);
        }
        if let Some(rec) = inner.nodes.get_mut(&parent.0) {
            rec.children.push(child.0);
        }
        if let Some(rec) = inner.nodes.get_mut(&child.0) {
            rec.parent = Some(parent.0);
        }
    }

    fn detach(&self, node: NodeRef) {
        let mut inner = self.write();
        let Some(parent) = inner.nodes.get(&node.0).and_then(|rec| rec.parent) else {
            return;
        };
        if let Some(rec) = inner.nodes.get_mut(&parent) {
            rec.children.retain(|&c| c != node.0);
        }
        if let Some(rec) = inner.nodes.get_mut(&node.0) {
            rec.parent = None;
        }
    }

    fn contains(&self, ancestor: NodeRef, node: NodeRef) -> bool {
        is_under(&self.read(), ancestor.0, node.0)
    }

    fn is_attached(&self, node: NodeRef) -> bool {
        let inner = self.read();
        is_under(&inner, inner.root, node.0)
    }

    fn flush_component(&self, node: NodeRef, name: &str) {
        let hook = self.read().flush_hook.clone();
        if let Some(hook) = hook {
            hook(node, name);
        }
    }
}

// ------------------------------------------------------------------
// Helpers
// ------------------------------------------------------------------

fn attr_of<'a>(rec: &'a NodeRecord, name: &str) -> Option<&'a AttrValue> {
    rec.attributes
        .iter()
        .find(|(attr, _)| attr == name)
        .map(|(_, value)| value)
}

fn set_attr_on(rec: &mut NodeRecord, name: &str, value: AttrValue) {
    if let Some(slot) = rec.attributes.iter_mut().find(|(attr, _)| attr == name) {
        slot.1 = value;
    } else {
        rec.attributes.push((name.to_string(), value));
    }
}

/// Walks parent links from `node` looking for `ancestor`.
fn is_under(inner: &GraphInner, ancestor: u64, node: u64) -> bool {
    let mut current = Some(node);
    while let Some(id) = current {
        if id == ancestor {
            return true;
        }
        current = inner.nodes.get(&id).and_then(|rec| rec.parent);
    }
    false
}

/// Depth-first search for the first attached node whose `id` attribute
/// matches `target`.
pub fn find_by_id(scene: &dyn SceneTree, target: &str) -> Option<NodeRef> {
    find_by_id_from(scene, scene.root(), target)
}

fn find_by_id_from(scene: &dyn SceneTree, node: NodeRef, target: &str) -> Option<NodeRef> {
    if scene.id(node).as_deref() == Some(target) {
        return Some(node);
    }
    for child in scene.children(node) {
        if let Some(found) = find_by_id_from(scene, child, target) {
            return Some(found);
        }
    }
    None
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
