//! Network commands: `curl` and `ssh`.
//!
//! Both go through the transport seams on the session, so tests swap in
//! scripted fakes and the real crates never come up outside the binary.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};
use scenesh_net::socket::{SocketConnection, SocketEvent};
use scenesh_types::error::{Result, ShellError};

use crate::interpreter::{Command, CommandRegistry, Flags};
use crate::session::Session;

/// Register `curl` and `ssh`.
pub fn register_net_commands(reg: &mut CommandRegistry) {
    reg.register(Arc::new(CurlCmd));
    reg.register(Arc::new(SshCmd));
}

// ---------------------------------------------------------------------------
// curl
// ---------------------------------------------------------------------------

struct CurlCmd;

#[async_trait]
impl Command for CurlCmd {
    fn name(&self) -> &str {
        "curl"
    }
    fn description(&self) -> &str {
        "Fetch a URL and print the body"
    }
    fn usage(&self) -> &str {
        "curl <url>"
    }
    async fn execute(&self, session: &mut Session, args: &[String], _flags: &Flags) -> Result<()> {
        let url = match args {
            [url] => url,
            _ => return Err(ShellError::Command("usage: curl <url>".to_string())),
        };
        let http = Arc::clone(&session.http);
        let body = http.fetch_text(url).await?;
        // Bodies are streamed as-is; no newline is appended.
        session.print(&body);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ssh
// ---------------------------------------------------------------------------

struct SshCmd;

#[async_trait]
impl Command for SshCmd {
    fn name(&self) -> &str {
        "ssh"
    }
    fn description(&self) -> &str {
        "Open an interactive socket session"
    }
    fn usage(&self) -> &str {
        "ssh [--url <url>]"
    }
    async fn execute(&self, session: &mut Session, args: &[String], flags: &Flags) -> Result<()> {
        if !args.is_empty() {
            return Err(ShellError::Command("usage: ssh [--url <url>]".to_string()));
        }
        let url = flags
            .text("url")
            .unwrap_or(&session.config.socket_url)
            .to_string();

        let connector = Arc::clone(&session.socket);
        // A failed dial is conversational, not an error boundary case: the
        // message prints plainly and the shell moves on.
        let connection = match connector.connect(&url).await {
            Ok(connection) => connection,
            Err(e) => {
                warn!("ssh connect to {url} failed: {e}");
                session.print_line(&e.to_string());
                return Ok(());
            }
        };
        debug!("ssh session open: {url}");

        let SocketConnection {
            outbound,
            mut events,
        } = connection;
        let out = session.output.clone();
        let mut closed = false;

        // Relay until the peer closes or session input ends. Input typed
        // after the close notice stays queued for the command loop.
        while !closed {
            tokio::select! {
                event = events.recv() => match event {
                    Some(SocketEvent::Message(text)) => {
                        let _ = out.send(text);
                    }
                    Some(SocketEvent::Closed) | None => {
                        let _ = out.send(format!("Connection to {url} closed\n"));
                        closed = true;
                    }
                },
                line = session.input.recv() => match line {
                    Some(line) => {
                        if outbound.send(line).await.is_err() {
                            debug!("ssh outbound dropped: {url}");
                        }
                    }
                    None => break,
                },
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use scenesh_net::http::HttpFetcher;
    use scenesh_net::socket::SocketConnector;
    use scenesh_tree::{SceneGraph, SceneTree};
    use scenesh_types::config::ShellConfig;
    use tokio::sync::mpsc;

    use crate::session::Transports;

    struct FakeFetcher {
        body: std::result::Result<String, String>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl HttpFetcher for FakeFetcher {
        async fn fetch_text(&self, url: &str) -> Result<String> {
            self.seen.lock().unwrap().push(url.to_string());
            match &self.body {
                Ok(body) => Ok(body.clone()),
                Err(msg) => Err(ShellError::Transport(msg.clone())),
            }
        }
    }

    /// Hands out one prepared connection, then refuses.
    struct FakeConnector {
        connection: Mutex<Option<SocketConnection>>,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SocketConnector for FakeConnector {
        async fn connect(&self, url: &str) -> Result<SocketConnection> {
            self.seen.lock().unwrap().push(url.to_string());
            self.connection
                .lock()
                .unwrap()
                .take()
                .ok_or_else(|| ShellError::Transport(format!("{url}: connection refused")))
        }
    }

    fn session_with(
        transports: Transports,
    ) -> (
        Session,
        mpsc::Sender<String>,
        mpsc::UnboundedReceiver<String>,
    ) {
        let graph = SceneGraph::new();
        let scene = graph.create_node("a-scene");
        graph.append_child(graph.root(), scene);
        let (input_tx, input_rx) = mpsc::channel(16);
        let (output_tx, output_rx) = mpsc::unbounded_channel();
        let session = Session::new(
            Arc::new(graph),
            scene,
            ShellConfig::default(),
            transports,
            input_rx,
            output_tx,
        );
        (session, input_tx, output_rx)
    }

    fn refusing_socket() -> (Arc<FakeConnector>, Arc<Mutex<Vec<String>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let connector = Arc::new(FakeConnector {
            connection: Mutex::new(None),
            seen: Arc::clone(&seen),
        });
        (connector, seen)
    }

    fn drain(output: &mut mpsc::UnboundedReceiver<String>) -> String {
        let mut text = String::new();
        while let Ok(chunk) = output.try_recv() {
            text.push_str(&chunk);
        }
        text
    }

    #[tokio::test]
    async fn curl_prints_the_body_raw() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let http = Arc::new(FakeFetcher {
            body: Ok("alpha\nbeta".to_string()),
            seen: Arc::clone(&seen),
        });
        let (connector, _) = refusing_socket();
        let (mut s, _input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        s.dispatch("curl https://example.test/data").await;
        assert_eq!(drain(&mut out), "alpha\nbeta");
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            ["https://example.test/data"]
        );
    }

    #[tokio::test]
    async fn curl_failures_hit_the_error_boundary() {
        let http = Arc::new(FakeFetcher {
            body: Err("dns is down".to_string()),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let (connector, _) = refusing_socket();
        let (mut s, _input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        s.dispatch("curl https://example.test/").await;
        assert_eq!(drain(&mut out), "error: transport error: dns is down\n");
    }

    #[tokio::test]
    async fn curl_without_a_url_shows_usage() {
        let http = Arc::new(FakeFetcher {
            body: Ok(String::new()),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let (connector, _) = refusing_socket();
        let (mut s, _input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        s.dispatch("curl").await;
        assert_eq!(drain(&mut out), "error: command error: usage: curl <url>\n");
    }

    #[tokio::test]
    async fn ssh_dials_the_configured_default() {
        let http = Arc::new(FakeFetcher {
            body: Ok(String::new()),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let (connector, seen) = refusing_socket();
        let (mut s, _input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        s.dispatch("ssh").await;
        assert_eq!(seen.lock().unwrap().as_slice(), ["ws://localhost:8080"]);
        // Refused dials print plainly, without the error marker.
        assert_eq!(
            drain(&mut out),
            "transport error: ws://localhost:8080: connection refused\n"
        );
    }

    #[tokio::test]
    async fn ssh_url_flag_overrides_the_default() {
        let http = Arc::new(FakeFetcher {
            body: Ok(String::new()),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let (connector, seen) = refusing_socket();
        let (mut s, _input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        s.dispatch("ssh --url ws://example.test:9000").await;
        assert_eq!(seen.lock().unwrap().as_slice(), ["ws://example.test:9000"]);
        drain(&mut out);
    }

    #[tokio::test]
    async fn ssh_relays_both_directions_then_reports_close() {
        let (socket_outbound_tx, mut socket_outbound_rx) = mpsc::channel(64);
        let (socket_event_tx, socket_event_rx) = mpsc::channel(64);
        let connection = SocketConnection {
            outbound: socket_outbound_tx,
            events: socket_event_rx,
        };
        let connector = Arc::new(FakeConnector {
            connection: Mutex::new(Some(connection)),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let http = Arc::new(FakeFetcher {
            body: Ok(String::new()),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let (mut s, input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        let drive = async {
            socket_event_tx
                .send(SocketEvent::Message("remote$ ".to_string()))
                .await
                .unwrap();
            assert_eq!(out.recv().await.unwrap(), "remote$ ");

            input.send("ls -al".to_string()).await.unwrap();
            assert_eq!(socket_outbound_rx.recv().await.unwrap(), "ls -al");

            socket_event_tx.send(SocketEvent::Closed).await.unwrap();
            assert_eq!(
                out.recv().await.unwrap(),
                "Connection to ws://localhost:8080 closed\n"
            );
        };
        let ((), ()) = tokio::join!(s.dispatch("ssh"), drive);

        // The relay has returned its half of the outbound channel.
        assert!(socket_outbound_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn input_typed_after_close_goes_back_to_the_shell() {
        let (socket_outbound_tx, mut socket_outbound_rx) = mpsc::channel(64);
        let (socket_event_tx, socket_event_rx) = mpsc::channel(64);
        let connection = SocketConnection {
            outbound: socket_outbound_tx,
            events: socket_event_rx,
        };
        let connector = Arc::new(FakeConnector {
            connection: Mutex::new(Some(connection)),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let http = Arc::new(FakeFetcher {
            body: Ok(String::new()),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let (mut s, input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        let drive = async {
            socket_event_tx.send(SocketEvent::Closed).await.unwrap();
            assert_eq!(
                out.recv().await.unwrap(),
                "Connection to ws://localhost:8080 closed\n"
            );
        };
        let ((), ()) = tokio::join!(s.dispatch("ssh"), drive);

        // A line submitted once the relay is gone is ordinary shell input.
        input.send("pwd".to_string()).await.unwrap();
        assert!(socket_outbound_rx.recv().await.is_none());
        let line = s.read_line().await.unwrap();
        s.dispatch(&line).await;
        assert_eq!(drain(&mut out), "/a-scene/\n");
    }

    #[tokio::test]
    async fn ssh_ends_when_session_input_ends() {
        let (socket_outbound_tx, _socket_outbound_rx) = mpsc::channel(64);
        let (_socket_event_tx, socket_event_rx) = mpsc::channel(64);
        let connection = SocketConnection {
            outbound: socket_outbound_tx,
            events: socket_event_rx,
        };
        let connector = Arc::new(FakeConnector {
            connection: Mutex::new(Some(connection)),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let http = Arc::new(FakeFetcher {
            body: Ok(String::new()),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let (mut s, input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        drop(input);
        s.dispatch("ssh").await;
        assert_eq!(drain(&mut out), "");
    }

    #[tokio::test]
    async fn ssh_with_positional_arguments_shows_usage() {
        let http = Arc::new(FakeFetcher {
            body: Ok(String::new()),
            seen: Arc::new(Mutex::new(Vec::new())),
        });
        let (connector, _) = refusing_socket();
        let (mut s, _input, mut out) = session_with(Transports {
            http,
            socket: connector,
        });

        s.dispatch("ssh ws://example.test:9000").await;
        assert_eq!(
            drain(&mut out),
            "error: command error: usage: ssh [--url <url>]\n"
        );
    }
}
