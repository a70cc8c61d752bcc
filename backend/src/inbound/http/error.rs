//! Wire format for domain errors.
//!
//! Handlers return [`Error`] directly. Each [`ErrorCode`] maps to one status;
//! 5xx payloads lose their message and details before leaving the process,
//! and a 401 carries the `WWW-Authenticate: Bearer` challenge.

use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::{HttpResponse, HttpResponseBuilder, ResponseError, http::StatusCode};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const BEARER_CHALLENGE: &str = "Bearer";
const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Payload actually sent to the client.
fn wire_payload(err: &Error) -> Error {
    if err.code() != ErrorCode::InternalError {
        return err.clone();
    }
    error!(message = err.message(), trace_id = ?err.trace_id(), "internal error");
    let redacted = Error::internal(REDACTED_MESSAGE);
    match err.trace_id() {
        Some(id) => redacted.with_trace_id(id.to_owned()),
        None => redacted,
    }
}

fn attach_headers(builder: &mut HttpResponseBuilder, err: &Error) {
    if let Some(id) = err.trace_id() {
        builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
    }
    if err.code() == ErrorCode::Unauthorized {
        builder.insert_header((WWW_AUTHENTICATE, BEARER_CHALLENGE));
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        attach_headers(&mut builder, self);
        builder.json(wire_payload(self))
    }
}
