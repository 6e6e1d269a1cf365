use crate::body::ResponseBody;
use crate::responder::Responder;
use crate::Context;
use async_trait::async_trait;
use futures::future::BoxFuture;
use http::Response;
use std::fmt;
use std::marker::PhantomData;

/// The terminal stage of a request, producing the response payload.
#[async_trait]
pub trait Action: Send + Sync {
    async fn invoke(&self, ctx: &mut Context<'_>) -> Response<ResponseBody>;
}

/// a function holder which represents any action returning a boxed future of a [`Responder`]
pub struct FnAction<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<F, R> FnAction<F, R> {
    fn new(f: F) -> Self {
        Self { f, _phantom: PhantomData }
    }
}

/// Wraps a function into an [`Action`].
///
/// # Example
/// ```
/// use futures::future::BoxFuture;
/// use micro_rest::{action_fn, Context};
///
/// fn show_user<'c>(ctx: &'c mut Context<'_>) -> BoxFuture<'c, String> {
///     Box::pin(async move { format!("user {}", ctx.params().get("id").unwrap_or_default()) })
/// }
///
/// let action = action_fn(show_user);
/// ```
pub fn action_fn<F, R>(f: F) -> FnAction<F, R>
where
    F: for<'c, 'r> Fn(&'c mut Context<'r>) -> BoxFuture<'c, R> + Send + Sync,
    R: Responder + Send + 'static,
{
    FnAction::new(f)
}

#[async_trait]
impl<F, R> Action for FnAction<F, R>
where
    F: for<'c, 'r> Fn(&'c mut Context<'r>) -> BoxFuture<'c, R> + Send + Sync,
    R: Responder + Send + 'static,
{
    async fn invoke(&self, ctx: &mut Context<'_>) -> Response<ResponseBody> {
        let responder = (self.f)(ctx).await;
        responder.response_to(ctx)
    }
}

impl<F, R> fmt::Debug for FnAction<F, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnAction")
    }
}
