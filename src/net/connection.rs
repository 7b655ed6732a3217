//! One accepted socket, processed end to end.
//!
//! The lifecycle of a connection is strictly sequential:
//!
//! 1. Read raw bytes and incrementally parse them into an [`HttpRequest`]
//!    (delegated to [`RequestParser`])
//! 2. Build the [`Environment`] for the request
//! 3. Invoke the handler and wait for its completion
//!    (delegated to [`Invoker`])
//! 4. Harvest the response side, serialize it and write it back
//! 5. Close the socket
//!
//! Malformed requests never reach the handler. Handler failures and
//! responses that cannot be serialized become a generic `500`. Transport
//! errors abandon the connection.

use std::net::{Shutdown, SocketAddr};
use std::pin::pin;
use std::sync::Arc;

use async_std::channel::Receiver;
use async_std::future;
use async_std::io;
use async_std::net::TcpStream;
use async_std::prelude::*;
use futures::future::{Either, select};

use crate::config::ServerConfig;
use crate::environment::Environment;
use crate::error::ParseError;
use crate::handler::Invoker;
use crate::http::HttpMethod;
use crate::http::parser::{ParserOutcome, RequestParser};
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

/// Errors that interrupt reading a request.
enum ReadError {
    Io(io::Error),
    Malformed(ParseError),
}

pub(crate) struct Connection {
    stream: TcpStream,
    peer: SocketAddr,
    config: Arc<ServerConfig>,
}

impl Connection {
    pub(crate) fn new(stream: TcpStream, peer: SocketAddr, config: Arc<ServerConfig>) -> Self {
        Self {
            stream,
            peer,
            config,
        }
    }

    /// Serves exactly one request-response cycle, then closes the socket.
    ///
    /// `shutdown` is closed when the server stops; a connection still
    /// waiting for its request is abandoned at that point, one that has
    /// already read it runs to completion.
    pub(crate) async fn serve(mut self, invoker: Invoker, shutdown: Receiver<()>) {
        let read = {
            let read = pin!(self.read_request());
            let stop = pin!(shutdown.recv());
            match select(read, stop).await {
                Either::Left((read, _)) => read,
                Either::Right(_) => {
                    tracing::debug!("server stopping, abandoning idle connection");
                    return;
                }
            }
        };

        let request = match read {
            Ok(Some(request)) => request,
            Ok(None) => {
                tracing::debug!("connection closed before a request was sent");
                return;
            }
            Err(ReadError::Io(err)) => {
                tracing::debug!(error = %err, "I/O error while reading request");
                return;
            }
            Err(ReadError::Malformed(err)) => {
                tracing::warn!(error = %err, "rejecting malformed request");
                if self.config.respond_on_malformed {
                    self.send(HttpResponse::bad_request(), true).await;
                }
                self.close();
                return;
            }
        };

        tracing::debug!(method = %request.method, target = %request.target, "request received");
        let include_body = request.method != HttpMethod::Head;
        let local_addr = self.stream.local_addr().ok();
        let mut env = Environment::from_request(request, Some(self.peer), local_addr);

        let response = match invoker.invoke(&mut env).await {
            Ok(()) => env.into_response().unwrap_or_else(|err| {
                tracing::warn!(error = %err, "handler produced an unusable response");
                HttpResponse::internal_server_error()
            }),
            Err(err) => {
                tracing::error!(error = %err, "handler failed");
                HttpResponse::internal_server_error()
            }
        };

        self.send(response, include_body).await;
        self.close();
    }

    /// Reads from the socket until a full request is parsed.
    ///
    /// The whole request must arrive within `read_timeout`, however the
    /// bytes are spread over reads. Returns `Ok(None)` when the peer closes
    /// the connection before sending a single byte.
    async fn read_request(&mut self) -> Result<Option<HttpRequest>, ReadError> {
        let deadline = self.config.read_timeout;
        match future::timeout(deadline, self.read_until_parsed()).await {
            Ok(read) => read,
            Err(_) => Err(ReadError::Io(io::Error::new(
                io::ErrorKind::TimedOut,
                "request not received within read_timeout",
            ))),
        }
    }

    async fn read_until_parsed(&mut self) -> Result<Option<HttpRequest>, ReadError> {
        let mut parser = RequestParser::from_config(&self.config);
        let mut buffer = vec![0; self.config.buffer_size];

        loop {
            let n = match self.stream.read(&mut buffer).await {
                Ok(0) => {
                    parser.end_of_stream().map_err(ReadError::Malformed)?;
                    return Ok(None);
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ReadError::Io(e)),
            };

            match parser.feed(&buffer[..n]).map_err(ReadError::Malformed)? {
                ParserOutcome::Incomplete => continue,
                ParserOutcome::Done(request) => return Ok(Some(request)),
            }
        }
    }

    /// Best-effort write; a failure only abandons this connection.
    async fn send(&mut self, mut response: HttpResponse, include_body: bool) {
        response.finalize(&self.config);

        let write = response.write_to(&mut self.stream, include_body);
        match io::timeout(self.config.write_timeout, write).await {
            Ok(()) => tracing::debug!(status = response.status.as_u16(), "response written"),
            Err(err) => tracing::debug!(error = %err, "failed to write response"),
        }
    }

    fn close(&self) {
        if let Err(err) = self.stream.shutdown(Shutdown::Both) {
            tracing::trace!(error = %err, "socket already closed");
        }
    }
}
