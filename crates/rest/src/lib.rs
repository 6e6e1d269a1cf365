//! The routing and request dispatch core of a small REST framework.
//!
//! A [`Router`] maps path templates such as `/users/{id:int}` to [`Route`](router::Route)s, each
//! binding HTTP methods to [`Action`]s. A [`Handler`] takes a request, resolves it against its
//! router and runs it through three stages:
//!
//! - [`Interceptor`]s decide whether the request proceeds at all
//! - [`Middleware`] wraps the action and may end the request early by committing a response
//! - the [`Action`] produces the payload, converted through [`Responder`]
//!
//! Transport is out of scope: requests arrive as `http::Request<Bytes>` and responses leave
//! through a [`ResponseSink`](response::ResponseSink).
//!
//! # Example
//! ```
//! use bytes::Bytes;
//! use futures::future::BoxFuture;
//! use micro_rest::router::Route;
//! use micro_rest::{action_fn, Context, Handler, Router};
//!
//! fn show_user<'c>(ctx: &'c mut Context<'_>) -> BoxFuture<'c, String> {
//!     Box::pin(async move { format!("user {}", ctx.params().get("id").unwrap_or_default()) })
//! }
//!
//! let router = Router::builder()
//!     .route(Route::builder().named("user").path("/users/{id:int}").get(action_fn(show_user)))
//!     .build()
//!     .unwrap();
//!
//! let handler = Handler::builder().router(router).build().unwrap();
//! let request = http::Request::get("/users/42").body(Bytes::new()).unwrap();
//! let response = futures::executor::block_on(handler.call(request)).unwrap();
//! assert_eq!(response.body().as_ref(), b"user 42");
//! ```

mod action;
mod body;
mod context;
mod extract;
mod handler;
mod interceptor;
mod middleware;
mod request;
mod responder;

pub mod error;
pub mod response;
pub mod router;

pub use action::{Action, FnAction, action_fn};
pub use body::ResponseBody;
pub use context::Context;
pub use error::{DispatchError, ExtractError, HandlerBuildError, RouteError, SendError};
pub use handler::{Handler, HandlerBuilder, Outcome};
pub use interceptor::{FnInterceptor, Interceptor, Interceptors, InterceptorsBuilder, interceptor_fn};
pub use middleware::{FnMiddleware, Middleware, middleware_fn};
pub use request::{PathParams, RequestData};
pub use responder::Responder;
pub use router::{Router, RouterRegistry};
