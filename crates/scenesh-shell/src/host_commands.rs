//! The opt-in `eval` command.
//!
//! `eval` hands an expression to whatever is hosting the shell. The shell
//! never ships an evaluator of its own: without a registered [`HostEval`]
//! the command simply does not exist, and `help` does not mention it.

use std::sync::Arc;

use async_trait::async_trait;
use scenesh_types::error::{Result, ShellError};

use crate::interpreter::{Command, CommandRegistry, Flags};
use crate::session::Session;

/// Capability to evaluate an expression on the hosting side.
///
/// The host decides what the expression language is and what it may
/// touch; the shell only relays text both ways.
#[async_trait]
pub trait HostEval: Send + Sync {
    async fn eval(&self, expression: &str) -> Result<String>;
}

/// Register `eval` backed by `host`.
pub fn register_host_commands(reg: &mut CommandRegistry, host: Arc<dyn HostEval>) {
    reg.register(Arc::new(EvalCmd { host }));
}

// ---------------------------------------------------------------------------
// eval
// ---------------------------------------------------------------------------

struct EvalCmd {
    host: Arc<dyn HostEval>,
}

#[async_trait]
impl Command for EvalCmd {
    fn name(&self) -> &str {
        "eval"
    }
    fn description(&self) -> &str {
        "Evaluate an expression on the host"
    }
    fn usage(&self) -> &str {
        "eval <expression>"
    }
    async fn execute(&self, session: &mut Session, args: &[String], _flags: &Flags) -> Result<()> {
        if args.is_empty() {
            return Err(ShellError::Command("usage: eval <expression>".to_string()));
        }
        let expression = args.join(" ");
        let result = self.host.eval(&expression).await?;
        session.print_line(&result);
        Ok(())
    }
}
