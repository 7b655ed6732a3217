use crate::config::ServerConfig;
use crate::error::ParseError;
use crate::http::request::HttpRequest;
use crate::http::validator::Validator;
use crate::http::{HttpMethod, HttpVersion};

/// Header slots handed to `httparse`; more headers fail the request.
const MAX_HEADERS: usize = 64;

#[derive(Debug, PartialEq, Eq)]
pub enum ParserOutcome {
    /// More bytes are needed.
    Incomplete,
    Done(HttpRequest),
}

#[derive(Debug)]
enum ParserState {
    Head,
    /// Head parsed, waiting for `usize` body bytes.
    Body(HttpRequest, usize),
}

/// Incremental request parser.
///
/// Bytes are pushed with [`feed`](Self::feed) as they arrive from the
/// socket. Once a request is complete the parser resets itself and can be
/// fed again; bytes past the end of the body stay buffered and make up the
/// start of the next request. The server reads one request per connection
/// and drops the parser afterwards, so it ignores those bytes.
#[derive(Debug)]
pub struct RequestParser {
    buf: Vec<u8>,
    state: ParserState,
    max_head_size: usize,
    max_body_size: usize,
}

impl RequestParser {
    pub fn new(max_head_size: usize, max_body_size: usize) -> Self {
        Self {
            buf: Vec::new(),
            state: ParserState::Head,
            max_head_size,
            max_body_size,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.max_head_size, config.max_body_size)
    }

    /// True when no byte of the next request has been seen yet.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, ParserState::Head) && self.buf.is_empty()
    }

    pub fn feed(&mut self, data: &[u8]) -> Result<ParserOutcome, ParseError> {
        self.buf.extend_from_slice(data);

        if let ParserState::Head = self.state {
            let Some((request, consumed)) = parse_head(&self.buf, self.max_head_size)? else {
                return Ok(ParserOutcome::Incomplete);
            };
            self.buf.drain(..consumed);

            let body_len = Validator::validate_request(&request, self.max_body_size)?;
            self.state = ParserState::Body(request, body_len);
        }

        match &self.state {
            ParserState::Body(_, body_len) if self.buf.len() >= *body_len => {}
            _ => return Ok(ParserOutcome::Incomplete),
        }

        match std::mem::replace(&mut self.state, ParserState::Head) {
            ParserState::Body(mut request, body_len) => {
                request.body = self.buf.drain(..body_len).collect();
                Ok(ParserOutcome::Done(request))
            }
            ParserState::Head => Ok(ParserOutcome::Incomplete),
        }
    }

    /// Called when the peer closed its side of the stream.
    ///
    /// Closing before any byte of a request is a clean end of connection;
    /// closing in the middle of one is an error.
    pub fn end_of_stream(&self) -> Result<(), ParseError> {
        if self.is_idle() {
            Ok(())
        } else {
            Err(ParseError::Truncated)
        }
    }
}

/// Parses the request line and header block at the start of `buf`.
///
/// Returns the request (with an empty body) and the number of head bytes,
/// or `None` when the head is not terminated yet.
fn parse_head(buf: &[u8], max_head_size: usize) -> Result<Option<(HttpRequest, usize)>, ParseError> {
    let mut slots = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut head = httparse::Request::new(&mut slots);

    let consumed = match head.parse(buf)? {
        httparse::Status::Complete(consumed) => consumed,
        httparse::Status::Partial if buf.len() > max_head_size => {
            return Err(ParseError::HeadTooLarge { limit: max_head_size });
        }
        httparse::Status::Partial => return Ok(None),
    };

    if consumed > max_head_size {
        return Err(ParseError::HeadTooLarge { limit: max_head_size });
    }

    let version = head
        .version
        .and_then(HttpVersion::from_minor)
        .ok_or(httparse::Error::Version)?;

    let mut request = HttpRequest::new(
        HttpMethod::from(head.method.unwrap_or_default()),
        head.path.unwrap_or_default(),
        version,
    );
    for header in head.headers.iter() {
        request
            .headers
            .append(header.name, String::from_utf8_lossy(header.value).trim());
    }

    Ok(Some((request, consumed)))
}
