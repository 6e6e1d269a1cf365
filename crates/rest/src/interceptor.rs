//! Interceptors gate a request before any middleware or action runs.
//!
//! Interceptors are evaluated in registration order and evaluation stops at the first one
//! returning `false`. A rejecting interceptor owns the response: the dispatch core writes
//! nothing on its behalf.

use crate::Context;
use async_trait::async_trait;
use std::fmt;
use tracing::debug;

#[async_trait]
pub trait Interceptor: Send + Sync {
    /// Returns `false` to halt the request.
    async fn intercept(&self, ctx: &mut Context<'_>) -> bool;
}

/// An interceptor backed by a synchronous predicate.
pub struct FnInterceptor<F>(F);

#[async_trait]
impl<F> Interceptor for FnInterceptor<F>
where
    F: Fn(&Context<'_>) -> bool + Send + Sync,
{
    async fn intercept(&self, ctx: &mut Context<'_>) -> bool {
        (self.0)(&*ctx)
    }
}

/// Creates an interceptor from a predicate over the request context.
///
/// # Example
/// ```
/// use micro_rest::interceptor_fn;
///
/// let only_json = interceptor_fn(|ctx| {
///     ctx.headers().get(http::header::ACCEPT).is_some_and(|accept| accept == "application/json")
/// });
/// ```
pub fn interceptor_fn<F>(f: F) -> FnInterceptor<F>
where
    F: Fn(&Context<'_>) -> bool + Send + Sync,
{
    FnInterceptor(f)
}

impl<F> fmt::Debug for FnInterceptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnInterceptor")
    }
}

/// An ordered group of interceptors, itself an interceptor.
pub struct Interceptors {
    inner: Vec<Box<dyn Interceptor>>,
}

#[async_trait]
impl Interceptor for Interceptors {
    async fn intercept(&self, ctx: &mut Context<'_>) -> bool {
        for (index, interceptor) in self.inner.iter().enumerate() {
            if !interceptor.intercept(ctx).await {
                debug!(index, path = ctx.uri().path(), "request rejected by interceptor");
                return false;
            }
        }
        true
    }
}

impl Interceptors {
    pub fn builder() -> InterceptorsBuilder {
        InterceptorsBuilder::new()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for Interceptors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptors").field("len", &self.inner.len()).finish()
    }
}

#[derive(Default)]
pub struct InterceptorsBuilder {
    inner: Vec<Box<dyn Interceptor>>,
}

impl InterceptorsBuilder {
    fn new() -> Self {
        Self { inner: vec![] }
    }

    pub fn add_last<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.inner.push(Box::new(interceptor));
        self
    }

    pub fn add_first<I: Interceptor + 'static>(mut self, interceptor: I) -> Self {
        self.inner.insert(0, Box::new(interceptor));
        self
    }

    pub fn build(self) -> Interceptors {
        Interceptors { inner: self.inner }
    }
}

impl fmt::Debug for InterceptorsBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorsBuilder").field("len", &self.inner.len()).finish()
    }
}
