//! HTTP protocol implementation.
//!
//! This module implements a minimal HTTP/1.1 server handling one request per
//! connection.
//!
//! # Architecture
//!
//! The HTTP layer is organized into several submodules:
//!
//! - **`connection`**: The main connection handler implementing the request-response state machine
//! - **`parser`**: Parses the request line and header block from byte buffers
//! - **`body`**: Materializes request bodies for both framing modes (Content-Length and chunked)
//! - **`request`**: HTTP request representation and parsing utilities
//! - **`response`**: HTTP response representation with builder pattern
//! - **`router`**: Registry mapping (path, method) pairs to handlers
//! - **`writer`**: Serializes and writes HTTP responses to the client
//!
//! # Connection State Machine
//!
//! Each client connection goes through a state machine:
//!
//! ```text
//!        ┌─────────────────┐
//!        │ ParsingHeaders  │ ← Read until the blank line, parse head
//!        └───────┬─────────┘
//!                │ Head parsed (interim 100 Continue if requested)
//!                ▼
//!        ┌─────────────────┐
//!        │  ReadingBody    │ ← Complete the body per its framing mode
//!        └───────┬─────────┘
//!                │ Body complete
//!                ▼
//!        ┌─────────────────┐
//!        │  Dispatching    │ ← Resolve the route, run the handler
//!        └───────┬─────────┘
//!                │ Response ready
//!                ▼
//!        ┌─────────────────┐
//!        │    Writing      │ ← Send response to client
//!        └───────┬─────────┘
//!                │ Response sent
//!                ▼ Close
//! ```
//!
//! A parse or framing failure short-circuits straight to `Writing` with a
//! synthesized 400 response. Every accepted connection gets exactly one
//! response write attempt and is then closed; there is no keep-alive.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use inferd::http::connection::Connection;
//! use inferd::http::request::Method;
//! use inferd::http::response::Response;
//! use inferd::http::router::Router;
//! use tokio::net::TcpListener;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut router = Router::new();
//!     router.register("/health", Method::GET, |_| Response::ok("ok"));
//!     let router = Arc::new(router);
//!
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!
//!     loop {
//!         let (socket, _addr) = listener.accept().await?;
//!         let router = router.clone();
//!         tokio::spawn(async move {
//!             let mut conn = Connection::new(socket, router);
//!             if let Err(e) = conn.run().await {
//!                 eprintln!("Connection error: {}", e);
//!             }
//!         });
//!     }
//! }
//! ```

pub mod body;
pub mod connection;
pub mod parser;
pub mod request;
pub mod response;
pub mod router;
pub mod writer;
