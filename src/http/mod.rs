use std::fmt;

pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod validator;

/// HTTP versions accepted on the request line.
#[derive(PartialEq, Eq, PartialOrd, Debug, Clone, Copy)]
pub enum HttpVersion {
    V1_0,
    V1_1,
}

impl HttpVersion {
    /// Maps the minor version reported by `httparse` (`HTTP/1.x`).
    pub fn from_minor(minor: u8) -> Option<HttpVersion> {
        match minor {
            0 => Some(HttpVersion::V1_0),
            1 => Some(HttpVersion::V1_1),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpVersion::V1_0 => "HTTP/1.0",
            HttpVersion::V1_1 => "HTTP/1.1",
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request method. Tokens outside the fixed verb set parse as `Unknown`
/// rather than failing the request.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
    Unknown,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Unknown => "UNKNOWN",
        }
    }
}

impl From<&str> for HttpMethod {
    fn from(method: &str) -> Self {
        match method {
            "GET" => HttpMethod::Get,
            "HEAD" => HttpMethod::Head,
            "POST" => HttpMethod::Post,
            "PUT" => HttpMethod::Put,
            "DELETE" => HttpMethod::Delete,
            "TRACE" => HttpMethod::Trace,
            "OPTIONS" => HttpMethod::Options,
            "CONNECT" => HttpMethod::Connect,
            "PATCH" => HttpMethod::Patch,
            _ => HttpMethod::Unknown,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn methods_are_case_sensitive_tokens() {
        assert_eq!(HttpMethod::from("GET"), HttpMethod::Get);
        assert_eq!(HttpMethod::from("PATCH"), HttpMethod::Patch);
        assert_eq!(HttpMethod::from("get"), HttpMethod::Unknown);
        assert_eq!(HttpMethod::from("BREW"), HttpMethod::Unknown);
    }

    #[test]
    fn only_http_1x_minor_versions_map() {
        assert_eq!(HttpVersion::from_minor(1), Some(HttpVersion::V1_1));
        assert_eq!(HttpVersion::from_minor(0).map(|v| v.as_str()), Some("HTTP/1.0"));
        assert_eq!(HttpVersion::from_minor(2), None);
    }
}
