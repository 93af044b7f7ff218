use bytes::Bytes;

use crate::http::writer::serialize_response;

/// Appended after every body and counted in `Content-Length`.
pub const BODY_TRAILER: &[u8; 2] = b"\r\n";

pub const CONTENT_TYPE_HTML: &str = "text/html; charset=utf-8";
pub const CONTENT_TYPE_TEXT: &str = "text/plain; charset=utf-8";

/// HTTP status codes the server produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 Ok
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 500 Internal Server Error
    InternalServerError,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use lantern::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::NotFound.as_u16(), 404);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::InternalServerError => 500,
        }
    }

    /// Reason phrase written on the status line.
    ///
    /// Success is spelled `Ok`, which existing clients of this server
    /// match byte for byte.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "Ok",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::InternalServerError => "Internal Server Error",
        }
    }
}

/// A complete HTTP response ready to be sent to a client.
///
/// Headers keep the order they were added in. `body` does not include
/// [`BODY_TRAILER`]; the writer appends it.
#[derive(Debug)]
pub struct Response {
    pub status: StatusCode,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

/// Builder for constructing HTTP responses in a fluent style.
///
/// # Example
///
/// ```
/// # use lantern::http::response::{ResponseBuilder, StatusCode};
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .body("hello")
///     .content_length()
///     .header("Content-Type", "text/plain")
///     .build();
/// assert_eq!(response.header("Content-Length"), Some("7"));
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl ResponseBuilder {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// Appends a header, replacing an earlier one with the same name in
    /// place.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(&key))
        {
            Some(existing) => existing.1 = value,
            None => self.headers.push((key, value)),
        }
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Adds `Content-Length` at this position in the header list, covering
    /// the body set so far plus the trailing CRLF.
    pub fn content_length(self) -> Self {
        let len = self.body.len() + BODY_TRAILER.len();
        self.header("Content-Length", len.to_string())
    }

    /// Builds the final Response, adding `Content-Length` last if it was
    /// not placed explicitly.
    pub fn build(self) -> Response {
        let has_length = self
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case("Content-Length"));
        let builder = if has_length {
            self
        } else {
            self.content_length()
        };

        Response {
            status: builder.status,
            headers: builder.headers,
            body: builder.body,
        }
    }
}

/// What the request pipeline decided to answer.
#[derive(Debug)]
pub enum Outcome {
    Found(Bytes),
    NotFound,
    BadRequest { close: bool },
    ServerError,
}

impl Response {
    /// 200 with the file contents and keep-alive hints.
    pub fn ok(body: impl Into<Bytes>) -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .body(body)
            .header("Connection", "Keep-Alive")
            .content_length()
            .header("Content-Type", CONTENT_TYPE_HTML)
            .header("Keep-Alive", "timeout=5, max=1000")
            .build()
    }

    pub fn not_found() -> Self {
        Self::plain(StatusCode::NotFound)
    }

    pub fn bad_request() -> Self {
        Self::plain(StatusCode::BadRequest)
    }

    /// 400 that also tells the client the connection is going away.
    pub fn bad_request_close() -> Self {
        Self::plain_close(StatusCode::BadRequest)
    }

    pub fn internal_error() -> Self {
        Self::plain_close(StatusCode::InternalServerError)
    }

    /// A text/plain response whose body is the reason phrase.
    fn plain(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .body(status.reason_phrase())
            .content_length()
            .header("Content-Type", CONTENT_TYPE_TEXT)
            .build()
    }

    fn plain_close(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .body(status.reason_phrase())
            .header("Connection", "close")
            .content_length()
            .header("Content-Type", CONTENT_TYPE_TEXT)
            .build()
    }

    pub fn from_outcome(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Found(body) => Self::ok(body),
            Outcome::NotFound => Self::not_found(),
            Outcome::BadRequest { close: false } => Self::bad_request(),
            Outcome::BadRequest { close: true } => Self::bad_request_close(),
            Outcome::ServerError => Self::internal_error(),
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// True if the response announces `Connection: close`.
    pub fn closes_connection(&self) -> bool {
        self.header("Connection")
            .is_some_and(|v| v.eq_ignore_ascii_case("close"))
    }
}

/// Produces the wire bytes answering `outcome`.
pub fn compose(outcome: Outcome) -> Bytes {
    serialize_response(&Response::from_outcome(outcome))
}
