//! Route registration and path matching.
//!
//! Routes are accumulated with a [`RouterBuilder`] and compiled in [`RouterBuilder::build`], so
//! a malformed template or constraint fails at startup instead of on the first request. The
//! built [`Router`] is read-only and can be shared between any number of concurrent requests.
//!
//! Matching scans the routes in registration order and the first route whose matcher accepts
//! the whole path wins. Registering `/users/me` before `/users/{id}` therefore lets the literal
//! route take precedence.

pub mod registry;
pub mod template;

mod route;

pub use registry::RouterRegistry;
pub use route::{Route, RouteBuilder};
pub use template::Constraints;

use crate::error::RouteError;
use crate::request::PathParams;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info, warn};

/// Main router structure that resolves paths to routes
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    index: HashMap<String, usize>,
}

/// Result of matching a path: the route and the values captured for this request
#[derive(Debug)]
pub struct RouteMatch<'router> {
    route: &'router Route,
    params: PathParams<'router>,
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder::new()
    }

    /// Looks a route up by name or by its full path, the last registration of a key wins.
    pub fn get(&self, key: &str) -> Option<&Route> {
        self.index.get(key).and_then(|&position| self.routes.get(position))
    }

    /// Matches a path against the router's routes
    ///
    /// Returns `None` when no route accepts the whole path. When several routes do, the one
    /// registered first is returned.
    pub fn at(&self, path: &str) -> Option<RouteMatch<'_>> {
        self.routes.iter().find_map(|route| route.captures(path).map(|params| RouteMatch { route, params }))
    }

    /// All routes, in registration order
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter().map(Route::path)).finish()
    }
}

impl<'router> RouteMatch<'router> {
    pub fn route(&self) -> &'router Route {
        self.route
    }

    pub fn params(&self) -> &PathParams<'router> {
        &self.params
    }

    pub fn into_parts(self) -> (&'router Route, PathParams<'router>) {
        (self.route, self.params)
    }
}

pub struct RouterBuilder {
    prefix: String,
    constraints: Constraints,
    pending: Vec<(String, RouteBuilder)>,
}

impl RouterBuilder {
    fn new() -> Self {
        Self { prefix: String::new(), constraints: Constraints::default(), pending: vec![] }
    }

    /// Adds or replaces a named constraint expression usable as `{name:key}`.
    pub fn constraint(mut self, key: impl Into<String>, expr: impl Into<String>) -> Self {
        self.constraints.insert(key, expr);
        self
    }

    /// Replaces the whole constraint table.
    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    /// Prepends `prefix` to the paths of all routes added after this call.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn route(mut self, route: RouteBuilder) -> Self {
        self.pending.push((self.prefix.clone(), route));
        self
    }

    pub fn route_map<I>(self, routes: I) -> Self
    where
        I: IntoIterator<Item = RouteBuilder>,
    {
        routes.into_iter().fold(self, RouterBuilder::route)
    }

    /// Compiles every route, failing on the first invalid constraint or template.
    pub fn build(self) -> Result<Router, RouteError> {
        self.constraints.validate()?;

        let mut routes = Vec::with_capacity(self.pending.len());
        let mut index = HashMap::with_capacity(self.pending.len() * 2);

        for (prefix, builder) in self.pending {
            let route = builder.build(&prefix, &self.constraints)?;
            let position = routes.len();

            register_key(&mut index, route.path(), position);
            if let Some(name) = route.name() {
                register_key(&mut index, name, position);
            }

            debug!(path = route.path(), pattern = route.matcher().as_str(), "route compiled");
            routes.push(route);
        }

        info!(routes = routes.len(), "router built");
        Ok(Router { routes, index })
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("prefix", &self.prefix)
            .field("constraints", &self.constraints)
            .field("pending", &self.pending.len())
            .finish()
    }
}

fn register_key(index: &mut HashMap<String, usize>, key: &str, position: usize) {
    if let Some(previous) = index.insert(key.to_string(), position)
        && previous != position
    {
        warn!(key, previous, position, "route key registered twice, the last registration wins");
    }
}

#[cfg(test)]
mod tests {
    use super::{Route, Router};
    use crate::action::Action;
    use crate::body::ResponseBody;
    use crate::error::RouteError;
    use crate::Context;
    use async_trait::async_trait;
    use http::Response;

    struct Noop;

    #[async_trait]
    impl Action for Noop {
        async fn invoke(&self, _ctx: &mut Context<'_>) -> Response<ResponseBody> {
            Response::new(ResponseBody::empty())
        }
    }

    fn router() -> Router {
        Router::builder()
            .route_map([
                Route::builder().named("me").path("/users/me").get(Noop),
                Route::builder().named("user").path("/users/{id}").get(Noop).delete(Noop),
                Route::builder().named("user_post").path("/users/{id:int}/posts/{post:int}").get(Noop),
            ])
            .prefix("/api")
            .route(Route::builder().named("health").path("/health").get(Noop))
            .build()
            .unwrap()
    }

    #[test]
    fn test_match_params() {
        let router = router();

        let matched = router.at("/users/42").unwrap();
        assert_eq!(matched.route().name(), Some("user"));
        assert_eq!(matched.params().get("id"), Some("42"));

        let matched = router.at("/users/7/posts/9/").unwrap();
        assert_eq!(matched.route().name(), Some("user_post"));
        assert_eq!(matched.params().iter().collect::<Vec<_>>(), vec![("id", "7"), ("post", "9")]);
    }

    #[test]
    fn test_trailing_slash_and_extra_segment() {
        let router = router();

        let plain = router.at("/users/42").unwrap();
        let slashed = router.at("/users/42/").unwrap();
        assert!(std::ptr::eq(plain.route(), slashed.route()));
        assert_eq!(plain.params(), slashed.params());

        assert!(router.at("/users/42/extra").is_none());
    }

    #[test]
    fn test_constraint_violation_does_not_match() {
        let router = router();
        // `{post:int}` rejects a non-numeric value, and no other route takes the path
        assert!(router.at("/users/7/posts/abc").is_none());
    }

    #[test]
    fn test_registration_order_breaks_ties() {
        let router = router();
        // both "/users/me" and "/users/{id}" accept the path, the first registered wins
        let matched = router.at("/users/me").unwrap();
        assert_eq!(matched.route().name(), Some("me"));
        assert!(matched.params().is_empty());

        let reversed = Router::builder()
            .route(Route::builder().named("user").path("/users/{id}").get(Noop))
            .route(Route::builder().named("me").path("/users/me").get(Noop))
            .build()
            .unwrap();
        let matched = reversed.at("/users/me").unwrap();
        assert_eq!(matched.route().name(), Some("user"));
        assert_eq!(matched.params().get("id"), Some("me"));
    }

    #[test]
    fn test_prefix() {
        let router = router();
        assert!(router.at("/health").is_none());

        let matched = router.at("/api/health").unwrap();
        assert_eq!(matched.route().path(), "/api/health");
        assert_eq!(router.get("health").unwrap().path(), "/api/health");
    }

    #[test]
    fn test_lookup_by_name_and_path() {
        let router = router();
        assert_eq!(router.get("user").unwrap().path(), "/users/{id}");
        assert_eq!(router.get("/users/{id}").unwrap().name(), Some("user"));
        assert!(router.get("missing").is_none());
        assert_eq!(router.len(), 4);
    }

    #[test]
    fn test_name_collision_last_wins() {
        let router = Router::builder()
            .route(Route::builder().named("dup").path("/first").get(Noop))
            .route(Route::builder().named("dup").path("/second").get(Noop))
            .build()
            .unwrap();

        assert_eq!(router.get("dup").unwrap().path(), "/second");
        // both stay matchable
        assert!(router.at("/first").is_some());
        assert!(router.at("/second").is_some());
    }

    #[test]
    fn test_matching_is_idempotent() {
        let router = router();
        let first = router.at("/users/7/posts/9").unwrap();
        let second = router.at("/users/7/posts/9").unwrap();

        assert!(std::ptr::eq(first.route(), second.route()));
        assert_eq!(first.params(), second.params());
    }

    #[test]
    fn test_custom_constraint() {
        let router = Router::builder()
            .constraint("slug", "[a-z0-9]+(?:-[a-z0-9]+)*")
            .route(Route::builder().path("/posts/{slug:slug}").get(Noop))
            .build()
            .unwrap();

        assert_eq!(router.at("/posts/hello-world").unwrap().params().get("slug"), Some("hello-world"));
        assert!(router.at("/posts/Hello_World").is_none());
    }

    #[test]
    fn test_invalid_constraint_fails_build() {
        let result = Router::builder()
            .constraint("broken", "[a-z")
            .route(Route::builder().path("/x/{v:broken}").get(Noop))
            .build();
        assert!(matches!(result, Err(RouteError::InvalidConstraint { .. })));
    }

    #[test]
    fn test_invalid_template_fails_build() {
        let result = Router::builder().route(Route::builder().path("/x/{id}/{id}").get(Noop)).build();
        assert!(matches!(result, Err(RouteError::DuplicateParam { .. })));
    }

    #[test]
    fn test_empty_router() {
        let router = Router::builder().build().unwrap();
        assert!(router.is_empty());
        assert!(router.at("/").is_none());
    }
}
