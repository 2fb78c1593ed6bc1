//! Foundation types shared across the scenesh crates.
//!
//! This crate deliberately has no knowledge of scene graphs, sessions or
//! transports. It defines the error taxonomy every other crate reports
//! through, the attribute value model commands read and write, and the
//! shell configuration loaded at startup.

pub mod attr;
pub mod config;
pub mod error;
