use crate::error::ParseError;
use crate::http::headers::HttpHeaders;
use crate::http::request::HttpRequest;

pub struct Validator;

impl Validator {
    /// Parses the request's `Content-Length`.
    ///
    /// Values must be plain decimal digits: a sign, whitespace inside the
    /// number or a list fails. Repeated headers are accepted only when they
    /// all agree.
    pub fn content_length(headers: &HttpHeaders) -> Result<Option<u64>, ParseError> {
        let mut length = None;

        for value in headers.get_all("Content-Length") {
            let value = value.trim();
            if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ParseError::InvalidContentLength(value.to_string()));
            }
            let parsed = value
                .parse::<u64>()
                .map_err(|_| ParseError::InvalidContentLength(value.to_string()))?;

            match length {
                Some(previous) if previous != parsed => {
                    return Err(ParseError::ConflictingContentLength);
                }
                _ => length = Some(parsed),
            }
        }

        Ok(length)
    }

    /// Validates a parsed head and returns the number of body bytes to read.
    pub fn validate_request(req: &HttpRequest, max_body_size: usize) -> Result<usize, ParseError> {
        let Some(length) = Self::content_length(&req.headers)? else {
            return Ok(0);
        };

        match usize::try_from(length) {
            Ok(size) if size <= max_body_size => Ok(size),
            _ => Err(ParseError::BodyTooLarge {
                size: length,
                limit: max_body_size,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpVersion};

    fn request_with(lengths: &[&str]) -> HttpRequest {
        let mut req = HttpRequest::new(HttpMethod::Post, "/", HttpVersion::V1_1);
        for length in lengths {
            req.headers.append("Content-Length", *length);
        }
        req
    }

    #[test]
    fn missing_length_means_empty_body() {
        assert_eq!(Validator::validate_request(&request_with(&[]), 16).unwrap(), 0);
    }

    #[test]
    fn negative_and_non_numeric_lengths_are_rejected() {
        for bad in ["-1", "abc", "+5", "1 2", ""] {
            let err = Validator::validate_request(&request_with(&[bad]), 1024).unwrap_err();
            assert!(
                matches!(err, ParseError::InvalidContentLength(_)),
                "{bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn repeated_lengths_must_agree() {
        assert_eq!(Validator::validate_request(&request_with(&["4", "4"]), 16).unwrap(), 4);

        let err = Validator::validate_request(&request_with(&["4", "5"]), 16).unwrap_err();
        assert!(matches!(err, ParseError::ConflictingContentLength));
    }

    #[test]
    fn body_limit_is_enforced() {
        let err = Validator::validate_request(&request_with(&["17"]), 16).unwrap_err();
        assert!(matches!(err, ParseError::BodyTooLarge { size: 17, limit: 16 }));

        let huge = u64::MAX.to_string();
        let err = Validator::validate_request(&request_with(&[&huge]), 16).unwrap_err();
        assert!(matches!(err, ParseError::BodyTooLarge { .. }));
    }
}
