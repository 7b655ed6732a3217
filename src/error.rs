//! Error types shared across the crate.
//!
//! Only [`ServerError`] ever reaches the caller of the lifecycle API. The
//! other enums stay connection-scoped: they decide which response (if any)
//! goes back on the wire and what gets logged.

use std::net::SocketAddr;

use thiserror::Error;

use crate::net::server::ServerState;

/// Error produced by a failing handler.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Lifecycle errors returned by [`Server`](crate::Server).
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound. The server stays `Created`.
    #[error("failed to bind {addr}: {source}")]
    BindFailure {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// Port 0 is not a valid listening port.
    #[error("invalid listening port {0}, expected 1-65535")]
    InvalidPort(u16),

    #[error("cannot {operation} a server that is {state}")]
    InvalidStateTransition {
        operation: &'static str,
        state: ServerState,
    },
}

/// Reasons a request is rejected as malformed.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed request head: {0}")]
    Head(#[from] httparse::Error),

    #[error("request head exceeds {limit} bytes")]
    HeadTooLarge { limit: usize },

    #[error("invalid Content-Length value {0:?}")]
    InvalidContentLength(String),

    #[error("conflicting Content-Length values")]
    ConflictingContentLength,

    #[error("body of {size} bytes exceeds limit of {limit} bytes")]
    BodyTooLarge { size: u64, limit: usize },

    /// The peer closed the stream in the middle of a request.
    #[error("connection closed mid-request")]
    Truncated,
}

/// A handler invocation that did not complete successfully.
#[derive(Debug, Error)]
pub enum HandlerFailure {
    #[error("handler returned an error: {0}")]
    Error(#[source] HandlerError),

    #[error("handler panicked: {0}")]
    Panic(String),
}

/// The environment's response side cannot be turned into a response.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("handler completed without setting a status code")]
    StatusUnset,

    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    #[error("invalid response header {0:?}")]
    InvalidHeader(String),

    #[error("invalid reason phrase {0:?}")]
    InvalidReason(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}
