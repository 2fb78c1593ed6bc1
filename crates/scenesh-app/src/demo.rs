//! Demo scene for the standalone binary.

use scenesh_tree::{NodeRef, SceneGraph, SceneTree};
use scenesh_types::attr::AttrValue;
use serde_json::Value;

/// Build a small scene to walk around in and return its anchor node.
pub fn populate_demo_scene(graph: &SceneGraph) -> NodeRef {
    let scene = graph.create_node("a-scene");
    graph.append_child(graph.root(), scene);

    let sky = graph.create_node("a-sky");
    graph.set_attribute(sky, "color", AttrValue::text("#ECECEC"));
    graph.append_child(scene, sky);

    let ground = graph.create_node("a-plane");
    graph.add_class(ground, "ground");
    graph.set_attribute(ground, "rotation", AttrValue::text("-90 0 0"));
    graph.set_attribute(ground, "width", AttrValue::text("30"));
    graph.set_attribute(ground, "height", AttrValue::text("30"));
    graph.set_attribute(ground, "color", AttrValue::text("#7BC8A4"));
    graph.append_child(scene, ground);

    let crate_box = graph.create_node("a-box");
    graph.set_id(crate_box, "crate");
    graph.set_attribute(crate_box, "position", AttrValue::text("-1 0.5 -3"));
    graph.set_attribute(crate_box, "color", AttrValue::text("#4CC3D9"));
    graph.append_child(scene, crate_box);

    let light = graph.create_node("a-light");
    graph.add_class(light, "soft");
    graph.set_attribute(
        light,
        "light",
        AttrValue::map(vec![
            ("type", Value::String("ambient".to_string())),
            ("intensity", Value::from(0.5)),
        ]),
    );
    graph.append_child(scene, light);

    scene
}
