//! Conversion of action results into HTTP responses.
//!
//! Actions may return any type implementing [`Responder`]; the pipeline converts the value and
//! hands the resulting [`Response`] to the [`ResponseWriter`](crate::response::ResponseWriter).

use crate::Context;
use crate::body::ResponseBody;
use crate::error::ExtractError;
use http::{HeaderValue, Response, StatusCode};
use once_cell::sync::Lazy;
use std::convert::Infallible;
use tracing::debug;

static TEXT_PLAIN_UTF_8: Lazy<HeaderValue> = Lazy::new(|| {
    HeaderValue::from_str(mime::TEXT_PLAIN_UTF_8.as_ref()).expect("mime is a valid header value")
});

/// A trait for types that can be converted into HTTP responses.
///
/// Anything an [`Action`](crate::Action) returns goes through this conversion before it is
/// committed. Strings become `text/plain; charset=utf-8`, a `StatusCode` paired with a
/// responder overrides the status.
pub trait Responder {
    fn response_to(self, ctx: &Context<'_>) -> Response<ResponseBody>;
}

/// Lets an action use `?`: both arms convert on their own, so an error type decides its own
/// status, as [`ExtractError`] does.
impl<T: Responder, E: Responder> Responder for Result<T, E> {
    fn response_to(self, ctx: &Context<'_>) -> Response<ResponseBody> {
        match self {
            Ok(t) => t.response_to(ctx),
            Err(e) => e.response_to(ctx),
        }
    }
}

/// `None` is an empty `200 OK`, which does not commit the response.
impl<T: Responder> Responder for Option<T> {
    fn response_to(self, ctx: &Context<'_>) -> Response<ResponseBody> {
        match self {
            Some(t) => t.response_to(ctx),
            None => Response::new(ResponseBody::empty()),
        }
    }
}

/// A prebuilt response passes through, only its body is converted.
impl<B> Responder for Response<B>
where
    B: Into<ResponseBody>,
{
    fn response_to(self, _ctx: &Context<'_>) -> Response<ResponseBody> {
        self.map(Into::into)
    }
}

impl<T: Responder> Responder for (StatusCode, T) {
    fn response_to(self, ctx: &Context<'_>) -> Response<ResponseBody> {
        let (status, responder) = self;
        let mut response = responder.response_to(ctx);
        *response.status_mut() = status;
        response
    }
}

/// Same as `(StatusCode, T)`.
impl<T: Responder> Responder for (T, StatusCode) {
    fn response_to(self, ctx: &Context<'_>) -> Response<ResponseBody> {
        let (responder, status) = self;
        (status, responder).response_to(ctx)
    }
}

impl<T: Responder> Responder for Box<T> {
    fn response_to(self, ctx: &Context<'_>) -> Response<ResponseBody> {
        (*self).response_to(ctx)
    }
}

/// Empty body, status `200 OK`.
impl Responder for () {
    fn response_to(self, _ctx: &Context<'_>) -> Response<ResponseBody> {
        Response::new(ResponseBody::empty())
    }
}

impl Responder for &'static str {
    fn response_to(self, _ctx: &Context<'_>) -> Response<ResponseBody> {
        plain_text(StatusCode::OK, ResponseBody::from(self))
    }
}

impl Responder for String {
    fn response_to(self, _ctx: &Context<'_>) -> Response<ResponseBody> {
        plain_text(StatusCode::OK, ResponseBody::from(self))
    }
}

// for `Result<T, Infallible>` returning actions
impl Responder for Infallible {
    fn response_to(self, _ctx: &Context<'_>) -> Response<ResponseBody> {
        match self {}
    }
}

/// A request that could not be decoded is the client's fault: `400 Bad Request` with a short
/// plain text reason. The decoder's message is logged, not sent.
impl Responder for ExtractError {
    fn response_to(self, ctx: &Context<'_>) -> Response<ResponseBody> {
        debug!(path = ctx.uri().path(), cause = %self, "request payload rejected");
        match self {
            ExtractError::Form { .. } => (StatusCode::BAD_REQUEST, "invalid form data").response_to(ctx),
            ExtractError::Json { .. } => (StatusCode::BAD_REQUEST, "invalid json body").response_to(ctx),
        }
    }
}

/// Builds a `text/plain; charset=utf-8` response.
pub(crate) fn plain_text(status: StatusCode, body: ResponseBody) -> Response<ResponseBody> {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    response.headers_mut().insert(http::header::CONTENT_TYPE, TEXT_PLAIN_UTF_8.clone());
    response
}
