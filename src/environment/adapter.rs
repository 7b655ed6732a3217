//! Translation between the wire types and the [`Environment`].

use std::net::SocketAddr;

use http::header::{HeaderName, HeaderValue};
use http::StatusCode;

use super::{Environment, Extensions, RequestBody, RequestEnv, ResponseEnv};
use crate::error::ResponseError;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;

impl Environment {
    /// Builds the environment for a parsed request. The response side
    /// starts empty with no status.
    pub fn from_request(
        request: HttpRequest,
        remote_addr: Option<SocketAddr>,
        local_addr: Option<SocketAddr>,
    ) -> Self {
        let path = request.path().to_string();
        let query = request.query().map(str::to_string);

        Self {
            request: RequestEnv {
                method: request.method,
                scheme: "http",
                protocol: request.version,
                path_base: String::new(),
                path,
                query,
                headers: request.headers,
                body: RequestBody::new(request.body),
                remote_addr,
                local_addr,
            },
            response: ResponseEnv::default(),
            extensions: Extensions::new(),
        }
    }

    /// Harvests the response side once the handler has completed.
    ///
    /// Fails when no status was set, when the status is outside 100-999,
    /// or when a header or the reason phrase would break the framing.
    pub fn into_response(self) -> Result<HttpResponse, ResponseError> {
        let ResponseEnv {
            status,
            reason_phrase,
            headers,
            body,
        } = self.response;

        let code = status.ok_or(ResponseError::StatusUnset)?;
        let status = StatusCode::from_u16(code).map_err(|_| ResponseError::InvalidStatus(code))?;

        for (name, values) in headers.iter() {
            HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ResponseError::InvalidHeader(name.to_string()))?;
            for value in values {
                HeaderValue::from_bytes(value.as_bytes())
                    .map_err(|_| ResponseError::InvalidHeader(name.to_string()))?;
            }
        }

        if let Some(reason) = &reason_phrase {
            if reason.chars().any(char::is_control) {
                return Err(ResponseError::InvalidReason(reason.clone()));
            }
        }

        Ok(HttpResponse {
            status,
            reason: reason_phrase,
            headers,
            body: body.into_inner(),
        })
    }
}
