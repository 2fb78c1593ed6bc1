//! The scenesh command shell.
//!
//! A [`Session`] owns the navigation cursor and I/O channels for one user;
//! a [`CommandRegistry`] maps command names to async handlers. The REPL
//! reads a line, tokenizes it, dispatches to a handler, and prints whatever
//! the handler streams back. Handlers work against the scene graph through
//! `scenesh-tree` and reach the network through the transport traits in
//! `scenesh-net`, so the whole loop runs against fakes in tests.

pub mod commands;
pub mod host_commands;
pub mod interpreter;
pub mod net_commands;
pub mod session;
pub mod state;

pub use commands::register_builtins;
pub use host_commands::{register_host_commands, HostEval};
pub use interpreter::{tokenize, Command, CommandRegistry, FlagValue, Flags};
pub use session::{Session, Transports};
pub use state::{EnvValue, ShellState};
