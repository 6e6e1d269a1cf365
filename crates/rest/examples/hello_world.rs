use bytes::Bytes;
use futures::future::BoxFuture;
use http::{Method, Request, StatusCode};
use micro_rest::router::Route;
use micro_rest::{
    action_fn, interceptor_fn, middleware_fn, Context, DispatchError, ExtractError, Handler, Router, RouterRegistry,
};
use serde::Deserialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Deserialize, Debug)]
pub struct User {
    name: String,
    zip: String,
}

fn hello_world<'c>(_ctx: &'c mut Context<'_>) -> BoxFuture<'c, &'static str> {
    Box::pin(async { "hello world\r\n" })
}

fn show_user<'c>(ctx: &'c mut Context<'_>) -> BoxFuture<'c, String> {
    Box::pin(async move {
        let id = ctx.params().parse::<u64>("id").and_then(Result::ok).unwrap_or_default();
        let caller = ctx.data().get::<String>("caller").map_or("anonymous", String::as_str);
        format!("user #{id}, requested by {caller}\r\n")
    })
}

fn create_user<'c>(ctx: &'c mut Context<'_>) -> BoxFuture<'c, Result<(StatusCode, String), ExtractError>> {
    Box::pin(async move {
        let user = ctx.form::<User>()?;
        Ok((StatusCode::CREATED, format!("created user: {user:?}\r\n")))
    })
}

fn identify<'c>(ctx: &'c mut Context<'_>) -> BoxFuture<'c, Result<(), DispatchError>> {
    Box::pin(async move {
        if let Some(caller) = ctx.headers().get("x-caller").and_then(|value| value.to_str().ok()) {
            let caller = caller.to_string();
            ctx.data_mut().insert("caller", caller);
        }
        ctx.next().await
    })
}

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder().with_max_level(Level::DEBUG).finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let router = Router::builder()
        .route(Route::builder().named("hello").path("/").get(action_fn(hello_world)))
        .prefix("/api")
        .route(Route::builder().named("user").path("/users/{id:int}").get(action_fn(show_user)))
        .route(Route::builder().named("users").path("/users").post(action_fn(create_user)))
        .build()
        .expect("routes should be valid");

    let mut registry = RouterRegistry::new();
    registry.insert("api", router);

    let handler = Handler::builder()
        .router(registry.get("api").expect("api router is registered"))
        .intercept(interceptor_fn(|ctx| ctx.uri().path() != "/api/forbidden"))
        .middleware(middleware_fn(identify))
        .build()
        .expect("handler should be valid");

    let requests = [
        Request::get("/").body(Bytes::new()),
        Request::get("/api/users/42").header("x-caller", "zava").body(Bytes::new()),
        Request::get("/api/users/abc").body(Bytes::new()),
        Request::post("/api/users")
            .header(http::header::CONTENT_TYPE, mime::APPLICATION_WWW_FORM_URLENCODED.as_ref())
            .body(Bytes::from_static(b"name=hello&zip=world")),
        Request::builder().method(Method::DELETE).uri("/api/users/42").body(Bytes::new()),
    ];

    for request in requests {
        let request = request.expect("request should be valid");
        let (method, uri) = (request.method().clone(), request.uri().clone());

        match handler.call(request).await {
            Ok(response) => {
                info!(%method, %uri, status = %response.status(), body = ?response.body(), "dispatched");
            }
            Err(e) => info!(%method, %uri, cause = %e, "dispatch failed"),
        }
    }
}
