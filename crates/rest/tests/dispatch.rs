use async_trait::async_trait;
use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Method, Request, StatusCode};
use micro_rest::router::Route;
use micro_rest::{
    action_fn, interceptor_fn, middleware_fn, Context, DispatchError, Handler, Middleware, Outcome, Router,
    RouterRegistry,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn show_order<'c>(ctx: &'c mut Context<'_>) -> BoxFuture<'c, String> {
    Box::pin(async move {
        // yield so concurrent requests interleave on the same route
        tokio::task::yield_now().await;
        let user = ctx.params().get("user").unwrap_or_default().to_string();
        let order = ctx.params().parse::<u64>("order").and_then(Result::ok).unwrap_or_default();
        let tag = ctx.data().get::<String>("tag").cloned().unwrap_or_default();
        format!("{user}/{order}/{tag}")
    })
}

fn tag_request<'c>(ctx: &'c mut Context<'_>) -> BoxFuture<'c, Result<(), DispatchError>> {
    Box::pin(async move {
        let tag = ctx.uri().query().unwrap_or("none").to_string();
        ctx.data_mut().insert("tag", tag);
        ctx.next().await
    })
}

fn handler() -> Handler {
    let router = Router::builder()
        .prefix("/api")
        .route(
            Route::builder()
                .named("order")
                .path("/users/{user:alpha}/orders/{order:int}")
                .get(action_fn(show_order)),
        )
        .build()
        .unwrap();

    Handler::builder()
        .router(router)
        .intercept(interceptor_fn(|ctx| !ctx.headers().contains_key("x-blocked")))
        .middleware(middleware_fn(tag_request))
        .build()
        .unwrap()
}

fn get(uri: &str) -> Request<Bytes> {
    Request::builder().method(Method::GET).uri(uri).body(Bytes::new()).unwrap()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_requests_see_their_own_params() {
    let handler = Arc::new(handler());

    let tasks = (0..64u64)
        .map(|i| {
            let handler = Arc::clone(&handler);
            let user = if i % 2 == 0 { "alice" } else { "bob" };
            tokio::spawn(async move {
                let response = handler.call(get(&format!("/api/users/{user}/orders/{i}?t{i}"))).await.unwrap();
                (user, i, response)
            })
        })
        .collect::<Vec<_>>();

    for task in tasks {
        let (user, i, response) = task.await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body(), &Bytes::from(format!("{user}/{i}/t{i}")));
    }
}

#[tokio::test]
async fn dispatch_is_repeatable() {
    let handler = handler();

    for _ in 0..3 {
        let response = handler.call(get("/api/users/carol/orders/7?x")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.body().as_ref(), b"carol/7/x");
    }
}

#[tokio::test]
async fn lookup_failures() {
    let handler = handler();
    let mut sink = micro_rest::response::BufferedSink::new();

    let outcome = handler.serve(get("/api/users/42/orders/7"), &mut sink).await.unwrap();
    assert_eq!(outcome, Outcome::NotFound);
    assert_eq!(sink.status(), Some(StatusCode::NOT_FOUND));

    let post = Request::builder().method(Method::POST).uri("/api/users/carol/orders/7").body(Bytes::new()).unwrap();
    let response = handler.call(post).await.unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers()[http::header::ALLOW], "GET");
}

#[tokio::test]
async fn blocked_request_never_reaches_the_pipeline() {
    let handler = handler();
    let request =
        Request::builder().uri("/api/users/carol/orders/7").header("x-blocked", "1").body(Bytes::new()).unwrap();

    let mut sink = micro_rest::response::BufferedSink::new();
    let outcome = handler.serve(request, &mut sink).await.unwrap();
    assert_eq!(outcome, Outcome::Intercepted);
    assert!(sink.body().is_empty());
}

struct Timing(Arc<AtomicUsize>);

#[async_trait]
impl Middleware for Timing {
    async fn call(&self, ctx: &mut Context<'_>) -> Result<(), DispatchError> {
        let result = ctx.next().await;
        // runs after the action, the response is already committed
        if ctx.is_committed() {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
        result
    }
}

#[tokio::test]
async fn routers_from_the_registry() {
    fn ping<'c>(_ctx: &'c mut Context<'_>) -> BoxFuture<'c, &'static str> {
        Box::pin(async { "pong" })
    }

    let mut registry = RouterRegistry::new();
    let admin = Router::builder().route(Route::builder().path("/ping").get(action_fn(ping))).build().unwrap();
    registry.insert("admin", admin);

    let committed = Arc::new(AtomicUsize::new(0));
    let handler = Handler::builder()
        .router(registry.get("admin").unwrap())
        .middleware(Timing(Arc::clone(&committed)))
        .build()
        .unwrap();

    let response = handler.call(get("/ping")).await.unwrap();
    assert_eq!(response.body().as_ref(), b"pong");
    assert_eq!(committed.load(Ordering::SeqCst), 1);

    // the default router is empty, everything is a 404
    let fallback = Handler::builder().router(registry.default_router()).build().unwrap();
    assert_eq!(fallback.call(get("/ping")).await.unwrap().status(), StatusCode::NOT_FOUND);
}
