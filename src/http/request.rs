use crate::http::headers::HttpHeaders;
use crate::http::{HttpMethod, HttpVersion};

/// A fully read request, produced by the [`RequestParser`](super::parser::RequestParser).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Raw request target as sent on the request line, still escaped.
    pub target: String,
    pub version: HttpVersion,

    pub headers: HttpHeaders,
    pub body: Vec<u8>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, target: impl Into<String>, version: HttpVersion) -> Self {
        Self {
            method,
            target: target.into(),
            version,
            headers: HttpHeaders::new(),
            body: Vec::new(),
        }
    }

    /// Target without its query string.
    pub fn path(&self) -> &str {
        self.split_target().0
    }

    /// Query string without the leading `?`, if the target has one.
    pub fn query(&self) -> Option<&str> {
        self.split_target().1
    }

    fn split_target(&self) -> (&str, Option<&str>) {
        match self.target.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (self.target.as_str(), None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_splits_into_path_and_query() {
        let req = HttpRequest::new(HttpMethod::Get, "/search?q=rust&page=2", HttpVersion::V1_1);
        assert_eq!(req.path(), "/search");
        assert_eq!(req.query(), Some("q=rust&page=2"));
    }

    #[test]
    fn empty_query_is_kept_distinct_from_none() {
        let req = HttpRequest::new(HttpMethod::Get, "/a?", HttpVersion::V1_1);
        assert_eq!(req.path(), "/a");
        assert_eq!(req.query(), Some(""));

        let req = HttpRequest::new(HttpMethod::Get, "/a", HttpVersion::V1_1);
        assert_eq!(req.query(), None);
    }
}
