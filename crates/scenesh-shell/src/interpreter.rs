//! Command trait, registry, and line parsing.
//!
//! Parsing is deliberately small: quoted arguments and `--flag` extraction,
//! nothing else. There are no pipes, no chaining, no variable expansion;
//! a line is one command with its arguments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use scenesh_types::error::{Result, ShellError};

use crate::session::Session;

// ---------------------------------------------------------------------------
// Command trait
// ---------------------------------------------------------------------------

/// A single executable command.
#[async_trait]
pub trait Command: Send + Sync {
    /// The command name (what the user types).
    fn name(&self) -> &str;

    /// One-line description for `help <command>`.
    fn description(&self) -> &str;

    /// Usage string (e.g. "cat <name>").
    fn usage(&self) -> &str;

    /// Execute the command against the session.
    async fn execute(&self, session: &mut Session, args: &[String], flags: &Flags) -> Result<()>;

    /// Completion candidates for the argument at `arg_index`.
    ///
    /// `tokens` holds the arguments typed so far, the one being completed
    /// last (possibly empty). The default completes nothing.
    fn complete(&self, session: &Session, arg_index: usize, tokens: &[String]) -> Vec<String> {
        let _ = (session, arg_index, tokens);
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Value bound to one `--flag`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagValue {
    /// Flag present without a value.
    Bool(bool),
    /// Flag with an attached value (`--key=value` or `--key value`).
    Text(String),
}

/// Flags extracted from a command line, in the order they appeared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flags {
    entries: Vec<(String, FlagValue)>,
}

impl Flags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Raw value of a flag, if present.
    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// Text value of a flag; `None` for absent or boolean flags.
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(FlagValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    /// True when the flag appeared in any form.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn set(&mut self, name: &str, value: FlagValue) {
        match self.entries.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }
}

/// Split tokens into positional arguments and `--` flags.
///
/// `--key=value` and `--key value` both bind a text value; a flag followed
/// by another flag (or nothing) is boolean. A bare `--` ends flag parsing;
/// everything after it is positional.
pub fn split_flags(tokens: &[String]) -> (Vec<String>, Flags) {
    let mut args = Vec::new();
    let mut flags = Flags::new();
    let mut positional_only = false;

    let mut iter = tokens.iter().peekable();
    while let Some(token) = iter.next() {
        if positional_only || !token.starts_with("--") {
            args.push(token.clone());
            continue;
        }
        if token == "--" {
            positional_only = true;
            continue;
        }
        let body = &token[2..];
        if let Some((key, value)) = body.split_once('=') {
            flags.set(key, FlagValue::Text(value.to_string()));
        } else if iter.peek().is_some_and(|next| !next.starts_with("--")) {
            let value = iter.next().cloned().unwrap_or_default();
            flags.set(body, FlagValue::Text(value));
        } else {
            flags.set(body, FlagValue::Bool(true));
        }
    }

    (args, flags)
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Registry of available commands.
#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create an empty command registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command. Replaces any existing command with the same name.
    pub fn register(&mut self, cmd: Arc<dyn Command>) {
        self.commands.insert(cmd.name().to_string(), cmd);
    }

    /// Look up a command by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(name).map(Arc::clone)
    }

    /// All registered command names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.commands.keys().cloned().collect();
        names.sort();
        names
    }

    /// Sorted names starting with `partial`, for completing the command word.
    pub fn completions(&self, partial: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .commands
            .keys()
            .filter(|name| name.starts_with(partial))
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}

// ---------------------------------------------------------------------------
// Tokenizer: handles single quotes, double quotes, and backslash escapes.
// ---------------------------------------------------------------------------

/// Tokenize a command line respecting quotes and backslash escapes.
///
/// - Single-quoted strings preserve all characters literally.
/// - Double-quoted strings allow `\"` and `\\` escapes.
/// - Backslash escapes the next character outside of quotes.
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut chars = input.chars().peekable();
    let mut in_single = false;
    let mut in_double = false;

    while let Some(ch) = chars.next() {
        if in_single {
            if ch == '\'' {
                in_single = false;
            } else {
                current.push(ch);
            }
        } else if in_double {
            if ch == '"' {
                in_double = false;
            } else if ch == '\\'
                && let Some(&next) = chars.peek()
            {
                match next {
                    '"' | '\\' => {
                        current.push(next);
                        chars.next();
                    }
                    _ => {
                        current.push('\\');
                    }
                }
            } else if ch == '\\' {
                current.push('\\');
            } else {
                current.push(ch);
            }
        } else {
            match ch {
                '\'' => in_single = true,
                '"' => in_double = true,
                '\\' => {
                    if let Some(next) = chars.next() {
                        current.push(next);
                    }
                }
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(ch),
            }
        }
    }

    if in_single {
        return Err(ShellError::Command("unterminated single quote".to_string()));
    }
    if in_double {
        return Err(ShellError::Command("unterminated double quote".to_string()));
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}
