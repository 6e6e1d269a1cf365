//! Per-request pipeline state.
//!
//! A [`Context`] is created for every request that resolved to a route and a method. It owns the
//! request, the captured path parameters, the request-scoped data store and the response writer,
//! and it drives the middleware chain with an index cursor over the handler's immutable
//! middleware list:
//!
//! 1. while the cursor points at a middleware, that middleware runs; it may continue explicitly
//!    with [`Context::next`], which advances the cursor and re-enters the loop
//! 2. once the cursor is past the last middleware, the action runs, at most once per request
//! 3. after every stage the loop stops if the response is committed

use crate::action::Action;
use crate::error::{DispatchError, SendError};
use crate::middleware::Middleware;
use crate::request::{PathParams, RequestData};
use crate::responder::Responder;
use crate::response::ResponseWriter;
use crate::router::Route;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{HeaderMap, Method, Request, Uri};
use std::fmt;
use tracing::{debug, trace, warn};

pub struct Context<'a> {
    request: Request<Bytes>,
    route: &'a Route,
    params: PathParams<'a>,
    data: RequestData,
    writer: ResponseWriter<'a>,
    middlewares: &'a [Box<dyn Middleware>],
    action: &'a dyn Action,
    cursor: usize,
    chain_started: bool,
    action_invoked: bool,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        request: Request<Bytes>,
        route: &'a Route,
        params: PathParams<'a>,
        middlewares: &'a [Box<dyn Middleware>],
        action: &'a dyn Action,
        writer: ResponseWriter<'a>,
    ) -> Self {
        Self {
            request,
            route,
            params,
            data: RequestData::new(),
            writer,
            middlewares,
            action,
            cursor: 0,
            chain_started: false,
            action_invoked: false,
        }
    }

    pub fn request(&self) -> &Request<Bytes> {
        &self.request
    }

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn uri(&self) -> &Uri {
        self.request.uri()
    }

    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// The raw request body
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// The route this request resolved to
    pub fn route(&self) -> &'a Route {
        self.route
    }

    pub fn params(&self) -> &PathParams<'a> {
        &self.params
    }

    pub fn data(&self) -> &RequestData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut RequestData {
        &mut self.data
    }

    pub fn writer(&self) -> &ResponseWriter<'a> {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut ResponseWriter<'a> {
        &mut self.writer
    }

    pub fn is_committed(&self) -> bool {
        self.writer.is_committed()
    }

    /// Whether the action has already been invoked for this request.
    pub fn action_invoked(&self) -> bool {
        self.action_invoked
    }

    /// Converts `responder` and commits it to the response sink.
    ///
    /// Returns the number of body bytes written.
    pub async fn respond<R: Responder + Send>(&mut self, responder: R) -> Result<usize, SendError> {
        let response = responder.response_to(self);
        self.writer.send(response).await
    }

    /// Continues with the stage after the current middleware.
    ///
    /// Resolves once the rest of the chain (and possibly the action) has run. Before the
    /// middleware chain has started, for example from an [`Interceptor`](crate::Interceptor),
    /// this does nothing.
    pub fn next(&mut self) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(async move {
            if !self.chain_started {
                warn!(path = self.request.uri().path(), "next called before the middleware chain started, ignored");
                return Ok(());
            }
            self.cursor += 1;
            self.run().await
        })
    }

    pub(crate) async fn run(&mut self) -> Result<(), DispatchError> {
        self.chain_started = true;
        loop {
            if self.writer.is_committed() {
                trace!(cursor = self.cursor, "response committed, pipeline halted");
                return Ok(());
            }

            let middlewares = self.middlewares;
            let Some(middleware) = middlewares.get(self.cursor) else {
                if !self.action_invoked {
                    self.invoke_action().await?;
                }
                return Ok(());
            };

            let position = self.cursor;
            middleware.call(self).await?;

            // neither continued nor committed, fall through to the following stage
            if self.cursor == position {
                self.cursor += 1;
            }
        }
    }

    async fn invoke_action(&mut self) -> Result<(), DispatchError> {
        self.action_invoked = true;

        let action = self.action;
        let response = action.invoke(self).await;
        let status = response.status();
        let written = self.writer.send(response).await?;

        debug!(path = self.request.uri().path(), %status, written, "action response sent");
        Ok(())
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("route", &self.route.path())
            .field("params", &self.params)
            .field("cursor", &self.cursor)
            .field("chain_started", &self.chain_started)
            .field("action_invoked", &self.action_invoked)
            .field("writer", &self.writer)
            .finish_non_exhaustive()
    }
}
