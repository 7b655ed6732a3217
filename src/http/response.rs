//! Response serialization.
//!
//! An [`HttpResponse`] is harvested from a completed
//! [`Environment`](crate::Environment), or built directly for the generic
//! error responses the server sends on its own. Before it goes on the wire
//! [`finalize`](HttpResponse::finalize) adds the framing headers: the body
//! is always fully buffered, so `Content-Length` is computed rather than
//! trusted.

use std::io;
use std::time::SystemTime;

use async_std::prelude::*;
use http::StatusCode;

use crate::config::ServerConfig;
use crate::http::headers::HttpHeaders;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Overrides the canonical reason phrase.
    pub reason: Option<String>,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            reason: None,
            headers: HttpHeaders::new(),
            body: Vec::new(),
        }
    }

    /// Generic response for a failure the server handles itself. The body
    /// only names the status, never the cause.
    pub fn error(status: StatusCode) -> Self {
        let mut res = Self::new(status);
        res.headers.append("Content-Type", "text/plain");
        res.body = format!(
            "{} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Error")
        )
        .into_bytes();
        res
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BAD_REQUEST)
    }

    pub fn internal_server_error() -> Self {
        Self::error(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// 1xx, 204 and 304 responses never carry a body.
    pub fn allows_body(&self) -> bool {
        !(self.status.is_informational()
            || self.status == StatusCode::NO_CONTENT
            || self.status == StatusCode::NOT_MODIFIED)
    }

    pub fn reason_phrase(&self) -> &str {
        self.reason
            .as_deref()
            .or(self.status.canonical_reason())
            .unwrap_or("Unknown")
    }

    /// Adds the headers the server owns: `Content-Length`, `Connection`,
    /// and the optional `Server` and `Date`.
    ///
    /// A `Content-Length` already set by the handler keeps its position and
    /// casing; its values are collapsed to the body length if they do not
    /// match it exactly. Statuses without a body never carry one, and any
    /// `Transfer-Encoding` from the handler is dropped.
    pub fn finalize(&mut self, config: &ServerConfig) {
        // Framing headers belong to the server.
        if self.headers.remove("Transfer-Encoding").is_some() {
            tracing::debug!("dropping handler-set Transfer-Encoding");
        }

        if self.allows_body() {
            let actual = self.body.len().to_string();
            let declared = self.headers.get_all("Content-Length");
            if declared != [actual.as_str()] {
                if !declared.is_empty() {
                    tracing::debug!(declared = ?declared, actual = %actual, "correcting Content-Length");
                }
                self.headers.set("Content-Length", actual);
            }
        } else {
            self.body.clear();
            self.headers.remove("Content-Length");
        }

        // One request per connection.
        self.headers.set("Connection", "close");

        if let Some(name) = &config.server_name {
            if !self.headers.contains("Server") {
                self.headers.append("Server", name.as_str());
            }
        }
        if config.send_date && !self.headers.contains("Date") {
            self.headers
                .append("Date", httpdate::fmt_http_date(SystemTime::now()));
        }
    }

    /// Status line, header lines and the blank line ending the head.
    pub fn build_headers(&self) -> String {
        // HTTP/1.1 <status> <reason>\r\n
        // <header_name>: <header_value>\r\n
        // ...
        // \r\n
        format!(
            "HTTP/1.1 {} {}\r\n{}\r\n",
            self.status.as_u16(),
            self.reason_phrase(),
            self.headers.stringify(),
        )
    }

    /// Writes the response in a single buffer. `include_body` is false for
    /// responses to `HEAD`.
    pub async fn write_to<W>(&self, out: &mut W, include_body: bool) -> io::Result<()>
    where
        W: async_std::io::Write + Unpin + ?Sized,
    {
        let mut bytes = self.build_headers().into_bytes();
        if include_body {
            bytes.extend_from_slice(&self.body);
        }
        out.write_all(&bytes).await?;
        out.flush().await
    }
}
