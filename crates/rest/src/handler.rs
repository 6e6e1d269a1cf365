//! The dispatch boundary: from an incoming request to a committed response.
//!
//! [`Handler::serve`] resolves the route, maps the two lookup failures to `404` and `405`,
//! builds the per-request [`Context`], runs the interceptors and finally the middleware chain and
//! the action. Lookup failures are returned as an [`Outcome`], only a failed write is an error.

use crate::body::ResponseBody;
use crate::context::Context;
use crate::error::{DispatchError, HandlerBuildError};
use crate::interceptor::{Interceptor, Interceptors, InterceptorsBuilder};
use crate::middleware::Middleware;
use crate::responder::plain_text;
use crate::response::{BufferedSink, ResponseSink, ResponseWriter};
use crate::router::{Route, Router};
use bytes::Bytes;
use http::{HeaderValue, Method, Request, Response, StatusCode};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error};

/// How a request left the dispatch core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No route matched the path, `404` was written
    NotFound,
    /// A route matched but has no action for the method, `405` was written
    MethodNotAllowed,
    /// An interceptor halted the request
    Intercepted,
    /// The middleware chain and, unless a middleware ended the request, the action ran
    Completed,
}

pub struct Handler {
    router: Arc<Router>,
    interceptors: Interceptors,
    middlewares: Vec<Box<dyn Middleware>>,
}

impl Handler {
    pub fn builder() -> HandlerBuilder {
        HandlerBuilder::new()
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Dispatches `request`, writing the response to `sink`.
    ///
    /// An error means the response could not be written; the transport should abort the
    /// connection. Shared state is never touched by a failing request.
    pub async fn serve(
        &self,
        request: Request<Bytes>,
        sink: &mut dyn ResponseSink,
    ) -> Result<Outcome, DispatchError> {
        let mut writer = ResponseWriter::new(sink);

        let path = request.uri().path();
        let Some(matched) = self.router.at(path) else {
            debug!(method = %request.method(), path, "no route matched");
            reject(&mut writer, StatusCode::NOT_FOUND, None).await.inspect_err(log_send_error)?;
            return Ok(Outcome::NotFound);
        };

        let (route, params) = matched.into_parts();
        let Some(action) = route.action(request.method()) else {
            debug!(method = %request.method(), path, route = route.path(), "method not allowed");
            reject(&mut writer, StatusCode::METHOD_NOT_ALLOWED, Some(route)).await.inspect_err(log_send_error)?;
            return Ok(Outcome::MethodNotAllowed);
        };

        let mut ctx = Context::new(request, route, params, &self.middlewares, action, writer);

        if !self.interceptors.intercept(&mut ctx).await {
            return Ok(Outcome::Intercepted);
        }

        ctx.run().await.inspect_err(log_send_error)?;
        Ok(Outcome::Completed)
    }

    /// Dispatches `request` into memory and returns the resulting response.
    ///
    /// An intercepted request whose interceptor wrote nothing comes back as an empty `200 OK`.
    pub async fn call(&self, request: Request<Bytes>) -> Result<Response<Bytes>, DispatchError> {
        let mut sink = BufferedSink::new();
        self.serve(request, &mut sink).await?;
        Ok(sink.into_response())
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("router", &self.router)
            .field("interceptors", &self.interceptors)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}

fn log_send_error(e: &DispatchError) {
    error!(cause = %e, "failed to write response, aborting request");
}

/// Writes the standard reason phrase for `status`, with an `Allow` header for `405`.
async fn reject(
    writer: &mut ResponseWriter<'_>,
    status: StatusCode,
    route: Option<&Route>,
) -> Result<(), DispatchError> {
    let reason = status.canonical_reason().unwrap_or_default();
    let mut response = plain_text(status, ResponseBody::from(format!("{reason}\n")));
    response.headers_mut().insert(http::header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));

    if let Some(route) = route {
        let allow = route.methods().into_iter().map(Method::as_str).collect::<Vec<_>>().join(", ");
        if let Ok(value) = HeaderValue::from_str(&allow) {
            response.headers_mut().insert(http::header::ALLOW, value);
        }
    }

    writer.send(response).await?;
    Ok(())
}

pub struct HandlerBuilder {
    router: Option<Arc<Router>>,
    interceptors: InterceptorsBuilder,
    middlewares: Vec<Box<dyn Middleware>>,
}

impl HandlerBuilder {
    fn new() -> Self {
        Self { router: None, interceptors: Interceptors::builder(), middlewares: vec![] }
    }

    pub fn router(mut self, router: impl Into<Arc<Router>>) -> Self {
        self.router = Some(router.into());
        self
    }

    /// Appends an interceptor, interceptors run in the order they were added.
    pub fn intercept<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors = self.interceptors.add_last(interceptor);
        self
    }

    /// Appends a prebuilt group of interceptors.
    pub fn interceptors(self, interceptors: Interceptors) -> Self {
        self.intercept(interceptors)
    }

    /// Appends a middleware, middleware run in the order they were added.
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middlewares.push(Box::new(middleware));
        self
    }

    pub fn build(self) -> Result<Handler, HandlerBuildError> {
        let router = self.router.ok_or(HandlerBuildError::MissingRouter)?;
        Ok(Handler { router, interceptors: self.interceptors.build(), middlewares: self.middlewares })
    }
}

impl fmt::Debug for HandlerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerBuilder")
            .field("router", &self.router)
            .field("interceptors", &self.interceptors)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}
