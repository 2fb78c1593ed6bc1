//! Scene graph, selectors and path resolution for scenesh.
//!
//! The shell treats a live scene graph the way a Unix shell treats a
//! filesystem: nodes are directories, attributes are files, and paths are
//! chains of selector segments. This crate owns that mapping. [`graph`]
//! holds the tree itself behind the [`SceneTree`] trait, [`selector`]
//! parses and matches path segments, [`path`] turns nodes into canonical
//! paths and back, and [`list`] renders directory-style listings.

pub mod graph;
pub mod list;
pub mod path;
pub mod selector;

pub use graph::{NodeRef, SceneGraph, SceneTree};
