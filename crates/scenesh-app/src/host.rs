//! `eval` backed by the system shell.

use async_trait::async_trait;
use scenesh_shell::host_commands::HostEval;
use scenesh_types::error::{Result, ShellError};
use tokio::process::Command;

/// Runs expressions through `sh -c`.
///
/// Only registered when the binary is started with `--allow-eval`;
/// anything the shell user types runs with the process's privileges.
pub struct ShellEvaluator;

#[async_trait]
impl HostEval for ShellEvaluator {
    async fn eval(&self, expression: &str) -> Result<String> {
        let output = Command::new("sh")
            .arg("-c")
            .arg(expression)
            .output()
            .await
            .map_err(|e| ShellError::Eval(format!("sh: {e}")))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ShellError::Eval(stderr.trim_end().to_string()));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .trim_end()
            .to_string())
    }
}
