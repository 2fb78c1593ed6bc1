//! Terminal surface injection.

use log::debug;
use scenesh_tree::graph::find_by_id;
use scenesh_tree::list::VisibilityFilter;
use scenesh_tree::{NodeRef, SceneTree};
use scenesh_types::attr::AttrValue;

/// Fixed id of the shell's own render surface.
pub const TERMINAL_ID: &str = "shell-terminal";

/// Add the curved terminal surface under `anchor`, unless one exists
/// anywhere in the tree already. The surface carries the filter's marker
/// attribute so it never shows up in its own listings.
pub fn spawn_terminal_surface(
    scene: &dyn SceneTree,
    anchor: NodeRef,
    filter: &VisibilityFilter,
) -> Option<NodeRef> {
    if find_by_id(scene, TERMINAL_ID).is_some() {
        debug!("terminal surface already present");
        return None;
    }

    let surface = scene.create_node("a-curvedimage");
    scene.set_id(surface, TERMINAL_ID);
    scene.add_class(surface, "terminal");
    scene.set_attribute(surface, &filter.hidden_attr, AttrValue::text(""));
    scene.set_attribute(surface, "material", AttrValue::text("depthTest: false"));
    scene.set_attribute(surface, "theta-start", AttrValue::text("150"));
    scene.set_attribute(surface, "theta-length", AttrValue::text("60"));
    scene.set_attribute(surface, "radius", AttrValue::text("4"));
    scene.set_attribute(surface, "height", AttrValue::text("2"));
    scene.set_attribute(surface, "opacity", AttrValue::text("0.8"));
    scene.set_attribute(surface, "position", AttrValue::text("0 2 0"));
    scene.append_child(anchor, surface);
    Some(surface)
}
