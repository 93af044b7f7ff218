use std::sync::Arc;

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::config::Limits;
use crate::error::{Result, ServeError};
use crate::http::buffer::RequestBuffer;
use crate::http::parser::extract_target;
use crate::http::reader::{Frame, receive_request};
use crate::http::resolver::StaticRoot;
use crate::http::response::{Outcome, Response};
use crate::http::writer::ResponseWriter;

/// One client connection, served until the peer goes away or an I/O error
/// ends it.
pub struct Connection<S> {
    stream: S,
    peer: String,
    root: Arc<StaticRoot>,
    limits: Limits,
    buffer: RequestBuffer,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing,
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, peer: impl Into<String>, root: Arc<StaticRoot>, limits: Limits) -> Self {
        Self {
            stream,
            peer: peer.into(),
            root,
            buffer: RequestBuffer::new(limits.request_buffer),
            limits,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    // Nothing from the previous request may leak into this one.
                    self.buffer.clear();

                    self.state = match receive_request(
                        &mut self.stream,
                        &mut self.buffer,
                        self.limits.read_chunk,
                    )
                    .await
                    {
                        Ok(Frame::Complete(_)) => ConnectionState::Processing,
                        Ok(Frame::Closed) => {
                            tracing::info!(peer = %self.peer, "Client closed connection");
                            ConnectionState::Closed
                        }
                        Err(e @ ServeError::BufferOverflow { .. }) => {
                            tracing::warn!(peer = %self.peer, error = %e, "Rejecting oversized request");
                            let response = Response::from_outcome(outcome_for(&e));
                            ConnectionState::Writing(ResponseWriter::new(&response), false)
                        }
                        Err(e) => return Err(e.into()),
                    };
                }

                ConnectionState::Processing => {
                    let response = handle_request(
                        &self.root,
                        self.limits.max_filename,
                        self.buffer.as_bytes(),
                    )
                    .await;

                    let keep_alive = !response.closes_connection();
                    tracing::info!(
                        peer = %self.peer,
                        status = response.status.as_u16(),
                        "Request served"
                    );
                    self.state = ConnectionState::Writing(ResponseWriter::new(&response), keep_alive);
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    let sent = writer.write_to_stream(&mut self.stream).await?;
                    tracing::debug!(peer = %self.peer, len = writer.len(), sent, "Response sent");

                    if keep_alive {
                        self.state = ConnectionState::Reading; // go back for next request
                    } else {
                        self.state = ConnectionState::Closed;
                    }
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }
}

/// Turns one buffered request into the response that answers it.
pub async fn handle_request(root: &StaticRoot, max_filename: usize, raw: &[u8]) -> Response {
    tracing::debug!(request = %String::from_utf8_lossy(raw), "Message from client");

    let result = read_target(root, max_filename, raw).await;

    match result {
        Ok(body) => Response::ok(body),
        Err(e) => {
            match &e {
                ServeError::NotFound(_) => tracing::debug!(error = %e, "Resource not found"),
                ServeError::MalformedRequest(_) | ServeError::PathOverflow { .. } => {
                    tracing::warn!(error = %e, "Rejecting request")
                }
                _ => tracing::error!(error = %e, "Failed to serve request"),
            }
            Response::from_outcome(outcome_for(&e))
        }
    }
}

async fn read_target(root: &StaticRoot, max_filename: usize, raw: &[u8]) -> Result<Bytes> {
    let target = extract_target(raw, max_filename)?;
    if target.has_parent_segment() {
        // Served as requested: targets are not confined to the root.
        tracing::warn!(requested = target.as_str(), "Request target walks above its directory");
    }
    tracing::debug!(requested = target.as_str(), "Requested filename");
    root.resolve(&target).await
}

fn outcome_for(err: &ServeError) -> Outcome {
    match err {
        ServeError::MalformedRequest(_) | ServeError::PathOverflow { .. } => {
            Outcome::BadRequest { close: false }
        }
        ServeError::NotFound(_) => Outcome::NotFound,
        ServeError::BufferOverflow { .. } => Outcome::BadRequest { close: true },
        ServeError::ResourceTooLarge { .. } | ServeError::FileChanged(_) | ServeError::Io(_) => {
            Outcome::ServerError
        }
    }
}
