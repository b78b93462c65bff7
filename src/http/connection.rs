use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::body::{BodyReader, Framing};
use crate::http::parser::{parse_request_head, ParseError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::router::Router;
use crate::http::writer::ResponseWriter;

/// Interim status line sent before the body when the client asked for it
/// with `Expect: 100-continue`. Written at most once per request.
const CONTINUE_LINE: &[u8] = b"HTTP/1.1 100 Continue\r\n\r\n";

/// One accepted client connection, owned exclusively by its worker task.
///
/// Serves exactly one request: whatever the outcome, the socket is closed
/// when the worker drops it. Generic over the stream so the state machine can
/// be exercised against in-process transports.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    router: Arc<Router>,
    state: ConnectionState,
}

pub enum ConnectionState {
    ParsingHeaders,
    ReadingBody(Request),
    Dispatching(Request),
    Writing(ResponseWriter),
    Closed,
}

/// What the header read produced.
enum HeadOutcome {
    Complete(Request),
    /// Peer closed before sending anything.
    Eof,
    Malformed(ParseError),
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(stream: S, router: Arc<Router>) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            router,
            state: ConnectionState::ParsingHeaders,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            let state = std::mem::replace(&mut self.state, ConnectionState::Closed);

            match state {
                ConnectionState::ParsingHeaders => {
                    match self.read_head().await? {
                        HeadOutcome::Complete(req) => {
                            self.state = ConnectionState::ReadingBody(req);
                        }
                        HeadOutcome::Eof => {
                            self.state = ConnectionState::Closed;
                        }
                        HeadOutcome::Malformed(e) => {
                            tracing::warn!(error = ?e, "malformed request head");
                            self.state = ConnectionState::Writing(ResponseWriter::new(
                                &Response::bad_request(),
                            ));
                        }
                    }
                }

                ConnectionState::ReadingBody(mut req) => {
                    if req.expects_continue() {
                        // The client holds the body until this line arrives;
                        // a failed write here is fatal to the connection.
                        self.stream.write_all(CONTINUE_LINE).await?;
                    }

                    let framing = Framing::from_request(&req);
                    let mut reader = BodyReader::new(&mut self.stream, &mut self.buffer);

                    match reader.read_body(framing).await {
                        Ok(body) => {
                            req.body = body;
                            self.state = ConnectionState::Dispatching(req);
                        }
                        Err(e) => {
                            tracing::warn!(error = ?e, "body framing error");
                            self.state = ConnectionState::Writing(ResponseWriter::new(
                                &Response::bad_request(),
                            ));
                        }
                    }
                }

                ConnectionState::Dispatching(req) => {
                    tracing::debug!(method = ?req.method, path = %req.path, "dispatching request");
                    let response = self.router.dispatch(&req);
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(mut writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    // One request per connection; the socket closes on drop.
                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    async fn read_head(&mut self) -> std::io::Result<HeadOutcome> {
        loop {
            // Try parsing whatever we already have
            match parse_request_head(&self.buffer) {
                Ok((request, consumed)) => {
                    self.buffer.advance(consumed);
                    return Ok(HeadOutcome::Complete(request));
                }

                Err(ParseError::Incomplete) => {
                    // Need more data → fall through to read
                }

                Err(e) => {
                    return Ok(HeadOutcome::Malformed(e));
                }
            }

            // Read more data
            let n = self.stream.read_buf(&mut self.buffer).await?;

            if n == 0 {
                // A bare close before any bytes is not an error; a close
                // mid-header-block leaves the request unfinishable.
                return if self.buffer.is_empty() {
                    Ok(HeadOutcome::Eof)
                } else {
                    Ok(HeadOutcome::Malformed(ParseError::Incomplete))
                };
            }
        }
    }
}
