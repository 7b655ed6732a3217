//! The per-request environment handed to the handler.
//!
//! An [`Environment`] carries both sides of one exchange: the request as
//! read from the wire and the response the handler fills in. Well-known
//! entries are typed fields; anything else goes in [`Extensions`].
//!
//! Exactly one environment exists per request. It is owned by the
//! connection task, lent mutably to the handler, and consumed by
//! [`Environment::into_response`] once the handler has completed.

mod adapter;
mod body;
mod extensions;

use std::borrow::Cow;
use std::net::SocketAddr;

pub use body::{RequestBody, ResponseBody};
pub use extensions::Extensions;

use crate::http::headers::HttpHeaders;
use crate::http::{HttpMethod, HttpVersion};

#[derive(Debug)]
pub struct Environment {
    pub request: RequestEnv,
    pub response: ResponseEnv,
    pub extensions: Extensions,
}

#[derive(Debug)]
pub struct RequestEnv {
    pub method: HttpMethod,
    /// Always `"http"`: TLS is terminated elsewhere, if at all.
    pub scheme: &'static str,
    pub protocol: HttpVersion,
    /// Portion of the path the application is mounted at. Empty, a single
    /// handler owns the whole path space.
    pub path_base: String,
    /// Path as sent by the client, still percent-encoded.
    pub path: String,
    pub query: Option<String>,
    pub headers: HttpHeaders,
    pub body: RequestBody,
    pub remote_addr: Option<SocketAddr>,
    pub local_addr: Option<SocketAddr>,
}

impl RequestEnv {
    /// Percent-decoded path. Decoding happens on each call; an encoding
    /// that does not yield UTF-8 leaves the path untouched.
    pub fn decoded_path(&self) -> Cow<'_, str> {
        urlencoding::decode(&self.path).unwrap_or(Cow::Borrowed(self.path.as_str()))
    }
}

/// Response side, filled in by the handler.
#[derive(Debug, Default)]
pub struct ResponseEnv {
    /// `None` until the handler sets a status. A response still unset when
    /// the handler completes is replaced by a `500`.
    pub status: Option<u16>,
    pub reason_phrase: Option<String>,
    pub headers: HttpHeaders,
    pub body: ResponseBody,
}

impl ResponseEnv {
    pub fn set_status(&mut self, code: u16) {
        self.status = Some(code);
    }

    /// Appends to the body.
    pub fn write(&mut self, data: impl AsRef<[u8]>) {
        self.body.extend(data);
    }
}
