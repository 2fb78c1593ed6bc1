//! Shell configuration.
//!
//! Loaded once at startup from an optional TOML file; every field has a
//! default so an absent or empty file yields a working shell.

use std::path::Path;

use serde::Deserialize;

use crate::error::Result;

/// Tunables for the interactive shell.
#[derive(Debug, Clone, Deserialize)]
pub struct ShellConfig {
    /// Prompt printed before each read of user input.
    #[serde(default = "default_prompt")]
    pub prompt: String,

    /// Prefix for messages produced by the session error boundary.
    #[serde(default = "default_error_marker")]
    pub error_marker: String,

    /// Socket endpoint `ssh` dials when invoked without a destination.
    #[serde(default = "default_socket_url")]
    pub socket_url: String,

    /// Whether to print the welcome banner when a session starts.
    #[serde(default = "default_banner")]
    pub banner: bool,

    /// Override for the attribute that marks shell-created surfaces as
    /// hidden from listings. `None` keeps the built-in marker.
    #[serde(default)]
    pub hidden_attr: Option<String>,

    /// Override for the class deny-list applied to listings. `None` keeps
    /// the built-in list.
    #[serde(default)]
    pub hidden_classes: Option<Vec<String>>,
}

fn default_prompt() -> String {
    "$ ".to_string()
}

fn default_error_marker() -> String {
    "error: ".to_string()
}

fn default_socket_url() -> String {
    "ws://localhost:8080".to_string()
}

fn default_banner() -> bool {
    true
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: default_prompt(),
            error_marker: default_error_marker(),
            socket_url: default_socket_url(),
            banner: default_banner(),
            hidden_attr: None,
            hidden_classes: None,
        }
    }
}

impl ShellConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Loads a configuration file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
