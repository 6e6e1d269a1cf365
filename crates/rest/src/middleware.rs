use crate::Context;
use crate::error::DispatchError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::fmt;

/// A stage of the request pipeline.
///
/// A middleware either continues with [`Context::next`], or ends the request by committing a
/// response through [`Context::respond`]. One that does neither falls through to the stage after
/// it once it returns.
///
/// ```
/// use async_trait::async_trait;
/// use http::StatusCode;
/// use micro_rest::{Context, DispatchError, Middleware};
///
/// struct RequireToken;
///
/// #[async_trait]
/// impl Middleware for RequireToken {
///     async fn call(&self, ctx: &mut Context<'_>) -> Result<(), DispatchError> {
///         if ctx.headers().contains_key(http::header::AUTHORIZATION) {
///             ctx.next().await
///         } else {
///             ctx.respond((StatusCode::UNAUTHORIZED, "Unauthorized")).await?;
///             Ok(())
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn call(&self, ctx: &mut Context<'_>) -> Result<(), DispatchError>;
}

/// A middleware backed by a function returning a boxed future.
pub struct FnMiddleware<F>(F);

#[async_trait]
impl<F> Middleware for FnMiddleware<F>
where
    F: for<'c, 'r> Fn(&'c mut Context<'r>) -> BoxFuture<'c, Result<(), DispatchError>> + Send + Sync,
{
    async fn call(&self, ctx: &mut Context<'_>) -> Result<(), DispatchError> {
        (self.0)(ctx).await
    }
}

pub fn middleware_fn<F>(f: F) -> FnMiddleware<F>
where
    F: for<'c, 'r> Fn(&'c mut Context<'r>) -> BoxFuture<'c, Result<(), DispatchError>> + Send + Sync,
{
    FnMiddleware(f)
}

impl<F> fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnMiddleware")
    }
}
