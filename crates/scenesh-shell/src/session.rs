//! The shell session: REPL loop, dispatch, and output streaming.

use std::sync::Arc;

use log::{debug, info};
use scenesh_net::http::HttpFetcher;
use scenesh_net::socket::SocketConnector;
use scenesh_tree::list::VisibilityFilter;
use scenesh_tree::{NodeRef, SceneTree};
use scenesh_types::config::ShellConfig;
use scenesh_types::error::{Result, ShellError};
use tokio::sync::mpsc;

use crate::commands::register_builtins;
use crate::interpreter::{split_flags, tokenize, CommandRegistry};
use crate::state::ShellState;

const BANNER: &str = r#"
Welcome to the scenesh terminal.

Try `help` for the command list, or the following:
mkdir a-sphere #example-sphere
cd #example-sphere
write color purple
write radius 0.2
write position "-1 1 -1"

"#;

/// Network collaborators handed to a session at construction.
///
/// Both are trait objects so tests can substitute scripted fakes.
pub struct Transports {
    pub http: Arc<dyn HttpFetcher>,
    pub socket: Arc<dyn SocketConnector>,
}

/// One running shell bound to a scene tree.
///
/// Input arrives one line per message on `input`; everything the shell
/// prints is streamed as text chunks on `output`, line breaks included.
/// The hosting terminal renders the output channel verbatim.
pub struct Session {
    pub scene: Arc<dyn SceneTree>,
    pub state: ShellState,
    pub commands: CommandRegistry,
    pub config: ShellConfig,
    /// Deny-list applied to `ls` and to path completion.
    pub filter: VisibilityFilter,
    /// Node the session was bound to; the `cd ~` target.
    pub anchor: NodeRef,
    /// The shell's own hosting surface, detached by `exit`.
    pub surface: Option<NodeRef>,
    pub http: Arc<dyn HttpFetcher>,
    pub socket: Arc<dyn SocketConnector>,
    pub input: mpsc::Receiver<String>,
    pub output: mpsc::UnboundedSender<String>,
    /// Cleared by `exit`; the REPL stops at the next loop top.
    pub running: bool,
}

impl Session {
    /// Create a session with the built-in commands registered.
    ///
    /// Further commands (or overrides) can be registered on
    /// [`Session::commands`] before the loop starts.
    pub fn new(
        scene: Arc<dyn SceneTree>,
        anchor: NodeRef,
        config: ShellConfig,
        transports: Transports,
        input: mpsc::Receiver<String>,
        output: mpsc::UnboundedSender<String>,
    ) -> Self {
        let mut filter = VisibilityFilter::default();
        if let Some(attr) = &config.hidden_attr {
            filter.hidden_attr = attr.clone();
        }
        if let Some(classes) = &config.hidden_classes {
            filter.hidden_classes = classes.clone();
        }

        let mut commands = CommandRegistry::new();
        register_builtins(&mut commands);

        Self {
            scene,
            state: ShellState::new(anchor),
            commands,
            config,
            filter,
            anchor,
            surface: None,
            http: transports.http,
            socket: transports.socket,
            input,
            output,
            running: true,
        }
    }

    // -- Output streaming --

    /// Append raw text to the output stream.
    pub fn print(&self, text: &str) {
        // A torn-down terminal just discards output.
        let _ = self.output.send(text.to_string());
    }

    /// Append a full line to the output stream.
    pub fn print_line(&self, text: &str) {
        let _ = self.output.send(format!("{text}\n"));
    }

    /// Print one item per line.
    pub fn print_list(&self, items: &[String]) {
        for item in items {
            self.print_line(item);
        }
    }

    // -- Input --

    /// Next line of session input, or `None` once the terminal is gone.
    ///
    /// The REPL reads here between commands; a long-running handler (the
    /// socket relay) may consume the same stream directly.
    pub async fn read_line(&mut self) -> Option<String> {
        self.input.recv().await
    }

    // -- Dispatch --

    /// Run one input line, reporting any failure on the output stream.
    ///
    /// This is the session's error boundary: a failed command becomes a
    /// single marked line and the session keeps going.
    pub async fn dispatch(&mut self, line: &str) {
        if let Err(e) = self.run_line(line).await {
            self.print_line(&format!("{}{e}", self.config.error_marker));
        }
    }

    async fn run_line(&mut self, line: &str) -> Result<()> {
        let tokens = tokenize(line)?;
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(());
        };
        let (args, flags) = split_flags(rest);
        let Some(cmd) = self.commands.get(name) else {
            return Err(ShellError::UnknownCommand(name.clone()));
        };
        debug!("dispatch: {name}");
        cmd.execute(self, &args, &flags).await
    }

    /// Prompt/read/dispatch until `exit` or the input stream ends.
    pub async fn repl(&mut self) {
        info!("shell session started");
        if self.config.banner {
            self.print(BANNER);
        }
        while self.running {
            let prompt = self.config.prompt.clone();
            self.print(&prompt);
            let Some(line) = self.read_line().await else {
                break;
            };
            self.dispatch(&line).await;
        }
        info!("shell session ended");
    }

    // -- Completion --

    /// Completion candidates for a partial input line.
    ///
    /// An empty line or a bare word completes over command names; once a
    /// command and whitespace are present the command's own provider runs.
    pub fn complete(&self, line: &str) -> Vec<String> {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            return self.commands.names();
        }
        if !trimmed.contains(char::is_whitespace) {
            return self.commands.completions(trimmed);
        }

        let mut tokens: Vec<String> = trimmed.split_whitespace().map(str::to_string).collect();
        let name = tokens.remove(0);
        let Some(cmd) = self.commands.get(&name) else {
            return Vec::new();
        };
        if line.ends_with(char::is_whitespace) || tokens.is_empty() {
            tokens.push(String::new());
        }
        let arg_index = tokens.len() - 1;
        cmd.complete(self, arg_index, &tokens)
    }
}
