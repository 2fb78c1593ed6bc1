//! Selector segments for path resolution.
//!
//! Path segments use a small CSS-like syntax: an optional tag name
//! followed by `#id` and `.class` qualifiers in any order, e.g.
//! `a-sphere#example-sphere.red`. A chain of segments matches
//! parent-to-child, so `a-scene/a-box` names an `a-box` whose direct
//! parent is an `a-scene`.

use crate::graph::{NodeRef, SceneTree};

// ------------------------------------------------------------------
// Selector types
// ------------------------------------------------------------------

/// A single, atomic selector component.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
    /// Type selector: `a-box`. Stored lowercase.
    Type(String),
    /// Class selector: `.classname`.
    Class(String),
    /// ID selector: `#idname`.
    Id(String),
    /// Universal selector: `*`.
    Universal,
}

/// A compound selector is a sequence of simple selectors applied to the
/// same node (e.g. `a-box.red#lid`).
#[derive(Debug, Clone, PartialEq)]
pub struct CompoundSelector {
    /// Parts that must all match the same node.
    pub parts: Vec<SimpleSelector>,
}

// ------------------------------------------------------------------
// Parsing
// ------------------------------------------------------------------

/// Parses one path segment into a compound selector.
///
/// Returns `None` for the empty string and for any malformed qualifier;
/// a segment that fails to parse matches nothing.
pub fn parse_compound(segment: &str) -> Option<CompoundSelector> {
    let mut parts = Vec::new();
    let mut rest = segment;

    if let Some(tail) = rest.strip_prefix('*') {
        parts.push(SimpleSelector::Universal);
        rest = tail;
    } else {
        let ident = take_ident(rest);
        if !ident.is_empty() {
            parts.push(SimpleSelector::Type(ident.to_ascii_lowercase()));
            rest = &rest[ident.len()..];
        }
    }

    while !rest.is_empty() {
        let mut chars = rest.chars();
        let marker = chars.next()?;
        let tail = chars.as_str();
        let ident = take_ident(tail);
        if ident.is_empty() {
            return None;
        }
        match marker {
            '#' => parts.push(SimpleSelector::Id(ident.to_string())),
            '.' => parts.push(SimpleSelector::Class(ident.to_string())),
            _ => return None,
        }
        rest = &tail[ident.len()..];
    }

    if parts.is_empty() {
        None
    } else {
        Some(CompoundSelector { parts })
    }
}

fn take_ident(s: &str) -> &str {
    let end = s
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
        .unwrap_or(s.len());
    &s[..end]
}

// ------------------------------------------------------------------
// Matching
// ------------------------------------------------------------------

/// True when `node` matches every simple selector in `compound`.
pub fn matches_compound(scene: &dyn SceneTree, node: NodeRef, compound: &CompoundSelector) -> bool {
    compound
        .parts
        .iter()
        .all(|part| matches_simple(scene, node, part))
}

fn matches_simple(scene: &dyn SceneTree, node: NodeRef, simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Universal => true,
        SimpleSelector::Type(tag) => scene.tag_name(node).as_deref() == Some(tag.as_str()),
        SimpleSelector::Id(id) => scene.id(node).as_deref() == Some(id.as_str()),
        SimpleSelector::Class(class) => scene.classes(node).iter().any(|c| c == class),
    }
}

/// True when `node` matches the last compound in `chain` and each
/// ancestor in turn matches the compound one step to the left.
///
/// The parent walk is not confined to any query base, so upper parts of
/// a chain may match nodes above the node the query started from. That
/// mirrors how scoped queries behave in the DOM.
pub fn matches_chain(scene: &dyn SceneTree, node: NodeRef, chain: &[CompoundSelector]) -> bool {
    let Some((last, rest)) = chain.split_last() else {
        return false;
    };
    if !matches_compound(scene, node, last) {
        return false;
    }
    let mut current = node;
    for compound in rest.iter().rev() {
        let Some(parent) = scene.parent(current) else {
            return false;
        };
        if !matches_compound(scene, parent, compound) {
            return false;
        }
        current = parent;
    }
    true
}

/// First node in document order strictly below `base` matching `chain`.
pub fn find_first(
    scene: &dyn SceneTree,
    base: NodeRef,
    chain: &[CompoundSelector],
) -> Option<NodeRef> {
    for child in scene.children(base) {
        if let Some(found) = find_first_from(scene, child, chain) {
            return Some(found);
        }
    }
    None
}

fn find_first_from(
    scene: &dyn SceneTree,
    node: NodeRef,
    chain: &[CompoundSelector],
) -> Option<NodeRef> {
    if matches_chain(scene, node, chain) {
        return Some(node);
    }
    for child in scene.children(node) {
        if let Some(found) = find_first_from(scene, child, chain) {
            return Some(found);
        }
    }
    None
}

// ------------------------------------------------------------------
// Tests
// ------------------------------------------------------------------
