use std::hint::black_box;
use bencher::{TestCase, TestGroup, ROUTES};
use bytes::Bytes;
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use futures::future::BoxFuture;
use micro_rest::router::Route;
use micro_rest::{action_fn, Context, Handler, Router};

fn echo<'c>(ctx: &'c mut Context<'_>) -> BoxFuture<'c, String> {
    Box::pin(async move { ctx.params().values().join(",") })
}

fn create_router() -> Router {
    let routes = ROUTES
        .iter()
        .map(|fixture| Route::builder().named(fixture.name()).path(fixture.template()).get(action_fn(echo)));
    Router::builder().route_map(routes).build().expect("route fixtures should compile")
}

fn create_test_cases() -> Vec<TestCase> {
    vec![
        TestCase::hit("index", TestGroup::Head, "/", "index"),
        TestCase::hit("user", TestGroup::Middle, "/users/42", "user"),
        TestCase::hit("post_comments", TestGroup::Middle, "/users/42/posts/7/comments/", "post_comments"),
        TestCase::hit("commit", TestGroup::Tail, "/repos/foldright/micro-http/commits/9f3c2a1b", "commit"),
        TestCase::hit("session", TestGroup::Tail, "/sessions/6f1c8f4e-2b1a-4c3d-9e8f-0a1b2c3d4e5f", "session"),
        TestCase::miss("miss", TestGroup::Tail, "/users/42/unknown/segment"),
    ]
}

fn benchmark_route_matching(criterion: &mut Criterion) {
    let router = create_router();
    let mut group = criterion.benchmark_group("route_matching");

    for case in create_test_cases() {
        let matched = router.at(case.path()).map(|m| m.route().name());
        assert_eq!(matched, case.expected().map(Some), "case {} ({:?})", case.name(), case.group());

        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            b.iter(|| black_box(router.at(black_box(case.path())).map(|m| m.params().len())));
        });
    }

    group.finish();
}

fn benchmark_dispatch(criterion: &mut Criterion) {
    let handler = Handler::builder().router(create_router()).build().expect("handler should build");
    let mut group = criterion.benchmark_group("dispatch");

    for case in create_test_cases() {
        group.bench_with_input(BenchmarkId::from_parameter(case.name()), &case, |b, case| {
            b.iter_batched(
                || http::Request::get(case.path()).body(Bytes::new()).expect("fixture path should be a valid uri"),
                |request| {
                    let response = futures::executor::block_on(handler.call(request))
                        .expect("buffered dispatch should not fail");
                    black_box(response);
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(router, benchmark_route_matching, benchmark_dispatch);
criterion_main!(router);
