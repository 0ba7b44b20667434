//! HTTP status codes as a typed enum.
//!
//! Use [`Status`] anywhere a status code is accepted: `Response::status()`,
//! or `Response::builder().status()`.
//!
//! ```rust
//! use microblog::{Response, Status};
//!
//! // status-only, no body
//! Response::status(Status::NotFound);
//!
//! // redirect after a form post
//! Response::builder()
//!     .status(Status::SeeOther)
//!     .header("location", "/")
//!     .no_body();
//! ```
//!
//! Only the codes the microblog actually sends are listed.

/// HTTP status codes sent by the microblog.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    // ── 2xx Success ───────────────────────────────────────────────────────────
    Ok,                            // 200

    // ── 3xx Redirection ───────────────────────────────────────────────────────
    SeeOther,                      // 303

    // ── 4xx Client errors ─────────────────────────────────────────────────────
    BadRequest,                    // 400
    NotFound,                      // 404
    MethodNotAllowed,              // 405
    ContentTooLarge,               // 413

    // ── 5xx Server errors ─────────────────────────────────────────────────────
    InternalServerError,           // 500
    ServiceUnavailable,            // 503
}

impl Status {
    /// Numeric status code (e.g. `404`).
    pub fn code(self) -> u16 {
        self.into()
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        match s {
            Status::Ok                  => 200,
            Status::SeeOther            => 303,
            Status::BadRequest          => 400,
            Status::NotFound            => 404,
            Status::MethodNotAllowed    => 405,
            Status::ContentTooLarge     => 413,
            Status::InternalServerError => 500,
            Status::ServiceUnavailable  => 503,
        }
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> http::StatusCode {
        match s {
            Status::Ok                  => http::StatusCode::OK,
            Status::SeeOther            => http::StatusCode::SEE_OTHER,
            Status::BadRequest          => http::StatusCode::BAD_REQUEST,
            Status::NotFound            => http::StatusCode::NOT_FOUND,
            Status::MethodNotAllowed    => http::StatusCode::METHOD_NOT_ALLOWED,
            Status::ContentTooLarge     => http::StatusCode::PAYLOAD_TOO_LARGE,
            Status::InternalServerError => http::StatusCode::INTERNAL_SERVER_ERROR,
            Status::ServiceUnavailable  => http::StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_code_matches_http_status_code() {
        for status in [
            Status::Ok,
            Status::SeeOther,
            Status::BadRequest,
            Status::NotFound,
            Status::MethodNotAllowed,
            Status::ContentTooLarge,
            Status::InternalServerError,
            Status::ServiceUnavailable,
        ] {
            assert_eq!(status.code(), http::StatusCode::from(status).as_u16());
        }
    }
}
