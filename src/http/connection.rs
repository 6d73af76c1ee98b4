use std::sync::Arc;

use bytes::BytesMut;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;

use crate::config::ServerBlock;
use crate::http::parser::{parse_request, RequestError};
use crate::http::request::Request;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::handler;

/// Maximum bytes of headers accepted before the request is rejected.
const MAX_HEADER_BYTES: usize = 64 * 1024;

pub struct Connection {
    stream: TcpStream,
    buffer: BytesMut,
    servers: Arc<Vec<ServerBlock>>,
    port: u16,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing(Request),
    Writing(ResponseWriter, bool), // bool = keep_alive?
    Closed,
}

enum ReadOutcome {
    /// A complete, parseable request
    Request(Request),
    /// A complete but invalid request; answer and close
    Rejected(RequestError),
    /// Client went away
    Disconnected,
}

impl Connection {
    pub fn new(stream: TcpStream, servers: Arc<Vec<ServerBlock>>, port: u16) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(4096),
            servers,
            port,
            state: ConnectionState::Reading,
        }
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Closed) {
                ConnectionState::Reading => {
                    self.state = match self.read_request().await? {
                        ReadOutcome::Request(req) => ConnectionState::Processing(req),
                        ReadOutcome::Rejected(err) => {
                            // A rejected request still gets an answer, but
                            // the connection does not survive it.
                            let response = Self::rejection_response(err);
                            ConnectionState::Writing(ResponseWriter::new(&response), false)
                        }
                        ReadOutcome::Disconnected => ConnectionState::Closed,
                    };
                }

                ConnectionState::Processing(req) => {
                    let response =
                        handler::respond(&self.servers, self.port, &req).await;
                    let keep_alive = req.keep_alive();
                    self.state =
                        ConnectionState::Writing(ResponseWriter::new(&response), keep_alive);
                }

                ConnectionState::Writing(mut writer, keep_alive) => {
                    writer.write_to_stream(&mut self.stream).await?;

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

    /// Reads until one complete request is buffered, then parses it.
    ///
    /// Completeness is a framing check only: the header terminator must be
    /// present and, when a Content-Length header is framed, that many body
    /// bytes must have arrived. All semantic header handling lives in the
    /// parser; the entire buffered text is handed over, so anything beyond
    /// the headers reaches the parser as the body.
    async fn read_request(&mut self) -> anyhow::Result<ReadOutcome> {
        loop {
            if self.request_complete() {
                let bytes = self.buffer.split();
                let outcome = match std::str::from_utf8(&bytes) {
                    Ok(text) => match parse_request(text) {
                        Ok(request) => ReadOutcome::Request(request),
                        Err(err) => ReadOutcome::Rejected(err),
                    },
                    Err(_) => ReadOutcome::Rejected(RequestError::BadRequest),
                };
                return Ok(outcome);
            }

            if self.buffer.len() > MAX_HEADER_BYTES {
                return Ok(ReadOutcome::Rejected(RequestError::BadRequest));
            }

            let n = self.stream.read_buf(&mut self.buffer).await?;
            if n == 0 {
                // Client closed the connection
                return Ok(ReadOutcome::Disconnected);
            }
        }
    }

    /// Whether the buffer holds one complete request.
    fn request_complete(&self) -> bool {
        let Some(headers_end) = self
            .buffer
            .windows(4)
            .position(|window| window == b"\r\n\r\n")
        else {
            return false;
        };
        let content_length = framed_content_length(&self.buffer[..headers_end]);
        self.buffer.len() >= headers_end + 4 + content_length
    }

    fn rejection_response(err: RequestError) -> Response {
        match err {
            RequestError::BadRequest => Response::bad_request(),
            RequestError::MethodNotAllowed => Response::method_not_allowed(),
            RequestError::Forbidden => Response::forbidden(),
        }
    }
}

/// Scans raw header bytes for a Content-Length value.
///
/// Framing only; the parser applies the semantic rules later.
fn framed_content_length(headers: &[u8]) -> usize {
    let Ok(text) = std::str::from_utf8(headers) else {
        return 0;
    };
    for line in text.split("\r\n") {
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("Content-Length") {
                return value.trim().parse().unwrap_or(0);
            }
        }
    }
    0
}
