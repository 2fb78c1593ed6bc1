//! Built-in commands for the scenesh shell.
//!
//! Everything here speaks to the scene through the session: the cursor
//! node stands in for a working directory, attributes stand in for files.
//! Network commands live in [`crate::net_commands`]; the opt-in `eval`
//! command lives in [`crate::host_commands`].

use std::sync::Arc;

use async_trait::async_trait;
use scenesh_tree::list::list_entries;
use scenesh_tree::path::{self, resolve};
use scenesh_tree::SceneTree;
use scenesh_types::attr::AttrValue;
use scenesh_types::error::{Result, ShellError};
use serde_json::Value;

use crate::interpreter::{Command, CommandRegistry, Flags};
use crate::session::Session;

/// Register the scene and session commands plus the network commands.
///
/// `eval` is not part of this set; hosts that want it call
/// [`crate::host_commands::register_host_commands`] with an evaluator.
pub fn register_builtins(reg: &mut CommandRegistry) {
    reg.register(Arc::new(HelpCmd));
    reg.register(Arc::new(EnvCmd));
    reg.register(Arc::new(PwdCmd));
    reg.register(Arc::new(LsCmd));
    reg.register(Arc::new(CatCmd));
    reg.register(Arc::new(CdCmd));
    reg.register(Arc::new(WriteCmd));
    reg.register(Arc::new(MkdirCmd));
    reg.register(Arc::new(ExitCmd));
    crate::net_commands::register_net_commands(reg);
}

/// Completion shared by the commands that take a path or attribute name
/// as their first argument: offer the current node's entries, nothing for
/// later arguments.
fn complete_entries(session: &Session, arg_index: usize) -> Vec<String> {
    if arg_index == 0 {
        list_entries(
            session.scene.as_ref(),
            session.state.current,
            &session.filter,
        )
    } else {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// help
// ---------------------------------------------------------------------------

struct HelpCmd;

#[async_trait]
impl Command for HelpCmd {
    fn name(&self) -> &str {
        "help"
    }
    fn description(&self) -> &str {
        "List available commands"
    }
    fn usage(&self) -> &str {
        "help [command]"
    }
    async fn execute(&self, session: &mut Session, args: &[String], _flags: &Flags) -> Result<()> {
        match args {
            [] => {
                session.print_line("Try running one of these commands:");
                session.print_list(&session.commands.names());
                Ok(())
            }
            [name] => {
                let cmd = session
                    .commands
                    .get(name)
                    .ok_or_else(|| ShellError::UnknownCommand(name.clone()))?;
                session.print_line(cmd.description());
                session.print_line(&format!("usage: {}", cmd.usage()));
                Ok(())
            }
            _ => Err(ShellError::Command("usage: help [command]".to_string())),
        }
    }
    fn complete(&self, session: &Session, arg_index: usize, _tokens: &[String]) -> Vec<String> {
        if arg_index == 0 {
            session.commands.names()
        } else {
            Vec::new()
        }
    }
}

// ---------------------------------------------------------------------------
// env
// ---------------------------------------------------------------------------

struct EnvCmd;

#[async_trait]
impl Command for EnvCmd {
    fn name(&self) -> &str {
        "env"
    }
    fn description(&self) -> &str {
        "Show session environment"
    }
    fn usage(&self) -> &str {
        "env"
    }
    async fn execute(&self, session: &mut Session, _args: &[String], _flags: &Flags) -> Result<()> {
        let scene = session.scene.as_ref();
        let mut lines = vec![
            format!("pwd={}", path::path_of(scene, session.state.current)),
            format!("next_node_id={}", session.state.next_node_id),
        ];
        for (key, value) in &session.state.vars {
            lines.push(format!("{key}={}", value.render(scene)));
        }
        session.print_list(&lines);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// pwd
// ---------------------------------------------------------------------------

struct PwdCmd;

#[async_trait]
impl Command for PwdCmd {
    fn name(&self) -> &str {
        "pwd"
    }
    fn description(&self) -> &str {
        "Print the path of the current node"
    }
    fn usage(&self) -> &str {
        "pwd"
    }
    async fn execute(&self, session: &mut Session, _args: &[String], _flags: &Flags) -> Result<()> {
        let path = path::path_of(session.scene.as_ref(), session.state.current);
        session.print_line(&path);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ls
// ---------------------------------------------------------------------------

struct LsCmd;

#[async_trait]
impl Command for LsCmd {
    fn name(&self) -> &str {
        "ls"
    }
    fn description(&self) -> &str {
        "List children and attributes of the current node"
    }
    fn usage(&self) -> &str {
        "ls"
    }
    async fn execute(&self, session: &mut Session, _args: &[String], _flags: &Flags) -> Result<()> {
        let entries = list_entries(
            session.scene.as_ref(),
            session.state.current,
            &session.filter,
        );
        session.print_list(&entries);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// cat
// ---------------------------------------------------------------------------

struct CatCmd;

#[async_trait]
impl Command for CatCmd {
    fn name(&self) -> &str {
        "cat"
    }
    fn description(&self) -> &str {
        "Print an attribute of the current node"
    }
    fn usage(&self) -> &str {
        "cat <name>"
    }
    async fn execute(&self, session: &mut Session, args: &[String], _flags: &Flags) -> Result<()> {
        let name = match args {
            [name] => name,
            _ => return Err(ShellError::Command("usage: cat <name>".to_string())),
        };
        // An empty text value reads as absent, same as no attribute at all.
        let value = session
            .scene
            .attribute(session.state.current, name)
            .filter(|v| !v.is_blank())
            .ok_or_else(|| ShellError::NotFound(format!("Not found: {name}")))?;
        match value {
            AttrValue::Text(text) => session.print_line(&text),
            AttrValue::Map(entries) => {
                for (key, value) in &entries {
                    session.print_line(&format!("{key}={}", serde_json::to_string(value)?));
                }
            }
        }
        Ok(())
    }
    fn complete(&self, session: &Session, arg_index: usize, _tokens: &[String]) -> Vec<String> {
        complete_entries(session, arg_index)
    }
}

// ---------------------------------------------------------------------------
// cd
// ---------------------------------------------------------------------------

struct CdCmd;

#[async_trait]
impl Command for CdCmd {
    fn name(&self) -> &str {
        "cd"
    }
    fn description(&self) -> &str {
        "Move the cursor to another node"
    }
    fn usage(&self) -> &str {
        "cd <path>"
    }
    async fn execute(&self, session: &mut Session, args: &[String], _flags: &Flags) -> Result<()> {
        let target = match args {
            [path] => path,
            _ => return Err(ShellError::Command("usage: cd <path>".to_string())),
        };
        if target == "~" {
            session.state.current = session.anchor;
            return Ok(());
        }
        let node = resolve(session.scene.as_ref(), target, session.state.current)
            .ok_or_else(|| ShellError::NotFound("Element not found".to_string()))?;
        session.state.current = node;
        Ok(())
    }
    fn complete(&self, session: &Session, arg_index: usize, _tokens: &[String]) -> Vec<String> {
        complete_entries(session, arg_index)
    }
}

// ---------------------------------------------------------------------------
// write
// ---------------------------------------------------------------------------

struct WriteCmd;

#[async_trait]
impl Command for WriteCmd {
    fn name(&self) -> &str {
        "write"
    }
    fn description(&self) -> &str {
        "Set an attribute or one property of it"
    }
    fn usage(&self) -> &str {
        "write <name> [key] <value>"
    }
    async fn execute(&self, session: &mut Session, args: &[String], _flags: &Flags) -> Result<()> {
        let usage = || ShellError::Command("usage: write <name> [key] <value>".to_string());
        let Some((name, rest)) = args.split_first() else {
            return Err(usage());
        };
        let current = session.state.current;
        match rest {
            [value] => {
                session
                    .scene
                    .set_attribute(current, name, AttrValue::text(value.clone()));
            }
            [key, value] => {
                // Keyed writes merge into the existing property table; a
                // text value under the same name is replaced wholesale.
                let mut entries = match session.scene.attribute(current, name) {
                    Some(AttrValue::Map(entries)) => entries,
                    _ => Vec::new(),
                };
                match entries.iter_mut().find(|(k, _)| k == key) {
                    Some(entry) => entry.1 = Value::String(value.clone()),
                    None => entries.push((key.clone(), Value::String(value.clone()))),
                }
                session
                    .scene
                    .set_attribute(current, name, AttrValue::Map(entries));
            }
            _ => return Err(usage()),
        }
        session.scene.flush_component(current, name);
        Ok(())
    }
    fn complete(&self, session: &Session, arg_index: usize, _tokens: &[String]) -> Vec<String> {
        complete_entries(session, arg_index)
    }
}

// ---------------------------------------------------------------------------
// mkdir
// ---------------------------------------------------------------------------

struct MkdirCmd;

#[async_trait]
impl Command for MkdirCmd {
    fn name(&self) -> &str {
        "mkdir"
    }
    fn description(&self) -> &str {
        "Create a child node"
    }
    fn usage(&self) -> &str {
        "mkdir <tag> [selector]"
    }
    async fn execute(&self, session: &mut Session, args: &[String], _flags: &Flags) -> Result<()> {
        let (tag, selector) = match args {
            [tag] => (tag, None),
            [tag, selector] => (tag, Some(selector.as_str())),
            _ => {
                return Err(ShellError::Command(
                    "usage: mkdir <tag> [selector]".to_string(),
                ))
            }
        };
        let node = session.scene.create_node(tag);
        match selector {
            Some(sel) => {
                // A selector that is neither #id nor .class stamps nothing.
                if let Some(id) = sel.strip_prefix('#') {
                    session.scene.set_id(node, id);
                } else if let Some(class) = sel.strip_prefix('.') {
                    session.scene.add_class(node, class);
                }
            }
            None => {
                let id = session.state.probe_node_id(session.scene.as_ref());
                session.scene.set_id(node, &id);
            }
        }
        session.scene.append_child(session.state.current, node);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// exit
// ---------------------------------------------------------------------------

struct ExitCmd;

#[async_trait]
impl Command for ExitCmd {
    fn name(&self) -> &str {
        "exit"
    }
    fn description(&self) -> &str {
        "Close the terminal and end the session"
    }
    fn usage(&self) -> &str {
        "exit"
    }
    async fn execute(&self, session: &mut Session, _args: &[String], _flags: &Flags) -> Result<()> {
        if let Some(surface) = session.surface.take() {
            session.scene.detach(surface);
        }
        session.running = false;
        Ok(())
    }
}
