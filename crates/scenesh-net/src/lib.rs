//! Network transports for the scene shell.
//!
//! Two seams, both trait objects so shell commands stay testable without a
//! network: [`http::HttpFetcher`] for one-shot body fetches and
//! [`socket::SocketConnector`] for long-lived line-oriented sessions.

pub mod http;
pub mod socket;

pub use http::{HttpClient, HttpFetcher};
pub use socket::{SocketConnection, SocketConnector, SocketEvent, WsConnector};
