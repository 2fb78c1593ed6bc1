//! scenesh entry point.
//!
//! Runs one shell session over a demo scene, bridged to stdin/stdout.
//! Pass `--allow-eval` to enable the `eval` command; it runs expressions
//! through the host's `sh`.

mod activation;
mod demo;
mod host;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use rand::Rng;
use scenesh_net::http::HttpClient;
use scenesh_net::socket::WsConnector;
use scenesh_shell::host_commands::register_host_commands;
use scenesh_shell::session::{Session, Transports};
use scenesh_tree::SceneGraph;
use scenesh_types::config::ShellConfig;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use host::ShellEvaluator;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_path = Path::new("scenesh.toml");
    let config = if config_path.exists() {
        log::info!("Loading configuration from {}", config_path.display());
        ShellConfig::load(config_path)?
    } else {
        ShellConfig::default()
    };

    let graph = Arc::new(SceneGraph::new());
    let anchor = demo::populate_demo_scene(graph.as_ref());

    let transports = Transports {
        http: Arc::new(HttpClient::new()?),
        socket: Arc::new(WsConnector::new()),
    };

    let (input_tx, input_rx) = mpsc::channel(64);
    let (output_tx, mut output_rx) = mpsc::unbounded_channel();

    let mut session = Session::new(graph, anchor, config, transports, input_rx, output_tx);
    session.state.next_node_id = rand::rng().random_range(0..9000);
    session.surface =
        activation::spawn_terminal_surface(session.scene.as_ref(), anchor, &session.filter);

    if std::env::args().any(|arg| arg == "--allow-eval") {
        log::warn!("eval enabled; expressions run on the host shell");
        register_host_commands(&mut session.commands, Arc::new(ShellEvaluator));
    }

    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            if input_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let writer = tokio::spawn(async move {
        let mut stdout = tokio::io::stdout();
        while let Some(chunk) = output_rx.recv().await {
            if stdout.write_all(chunk.as_bytes()).await.is_err() {
                break;
            }
            let _ = stdout.flush().await;
        }
    });

    session.repl().await;

    // Dropping the session closes the output channel; the writer drains
    // what is left and exits.
    drop(session);
    writer.await?;
    Ok(())
}
