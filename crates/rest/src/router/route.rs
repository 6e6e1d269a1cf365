use crate::action::Action;
use crate::error::RouteError;
use crate::request::PathParams;
use crate::router::template::{self, Constraints};
use http::Method;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// One registered endpoint: a compiled template plus its method bindings.
///
/// Routes are immutable once the router is built. Values captured while matching are returned
/// to the caller as [`PathParams`] and never stored on the route.
pub struct Route {
    path: String,
    name: Option<String>,
    matcher: Regex,
    param_names: Vec<String>,
    actions: HashMap<Method, Box<dyn Action>>,
}

impl Route {
    pub fn builder() -> RouteBuilder {
        RouteBuilder::new()
    }

    /// The full template, including any router prefix
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Parameter names in template order, one per capturing group of the matcher
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub fn action(&self, method: &Method) -> Option<&dyn Action> {
        self.actions.get(method).map(Box::as_ref)
    }

    pub fn allows(&self, method: &Method) -> bool {
        self.actions.contains_key(method)
    }

    /// The bound methods, sorted by name
    pub fn methods(&self) -> Vec<&Method> {
        let mut methods = self.actions.keys().collect::<Vec<_>>();
        methods.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        methods
    }

    /// Matches `path` in full, returning the captured values aligned with [`Self::param_names`].
    pub fn captures(&self, path: &str) -> Option<PathParams<'_>> {
        let captures = self.matcher.captures(path)?;
        let values = captures
            .iter()
            .skip(1)
            .map(|group| group.map(|m| m.as_str().to_string()).unwrap_or_default())
            .collect::<Vec<_>>();
        Some(PathParams::new(&self.param_names, values))
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("matcher", &self.matcher.as_str())
            .field("param_names", &self.param_names)
            .field("methods", &self.methods())
            .finish()
    }
}

/// Accumulates the name, path and method bindings of one route.
///
/// # Example
/// ```
/// use futures::future::BoxFuture;
/// use http::Method;
/// use micro_rest::router::Route;
/// use micro_rest::{action_fn, Context};
///
/// fn show<'c>(_ctx: &'c mut Context<'_>) -> BoxFuture<'c, &'static str> {
///     Box::pin(async { "user" })
/// }
///
/// fn remove<'c>(_ctx: &'c mut Context<'_>) -> BoxFuture<'c, &'static str> {
///     Box::pin(async { "removed" })
/// }
///
/// let route = Route::builder()
///     .named("user")
///     .path("/users/{id:int}")
///     .with(Method::GET, action_fn(show))
///     .and(Method::DELETE, action_fn(remove));
/// ```
#[derive(Default)]
pub struct RouteBuilder {
    name: Option<String>,
    path: String,
    actions: HashMap<Method, Box<dyn Action>>,
}

macro_rules! method_binding {
    ($method:ident, $upper_case_method:ident) => {
        #[doc = concat!("Binds `action` to HTTP ", stringify!($upper_case_method), " requests.")]
        pub fn $method<A: Action + 'static>(self, action: A) -> Self {
            self.with(Method::$upper_case_method, action)
        }
    };
}

impl RouteBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the route template, relative to the router prefix in effect when it is added.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Binds `action` to `method`, replacing an earlier binding of the same method.
    pub fn with<A: Action + 'static>(mut self, method: Method, action: A) -> Self {
        self.actions.insert(method, Box::new(action));
        self
    }

    /// Same as [`Self::with`], reads better when chaining several methods.
    pub fn and<A: Action + 'static>(self, method: Method, action: A) -> Self {
        self.with(method, action)
    }

    method_binding!(get, GET);
    method_binding!(post, POST);
    method_binding!(put, PUT);
    method_binding!(delete, DELETE);
    method_binding!(patch, PATCH);

    pub(crate) fn build(self, prefix: &str, constraints: &Constraints) -> Result<Route, RouteError> {
        let path = join_path(prefix, &self.path);
        let (matcher, param_names) = template::compile(&path, constraints)?.into_parts();
        Ok(Route { path, name: self.name, matcher, param_names, actions: self.actions })
    }
}

impl fmt::Debug for RouteBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteBuilder")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("methods", &self.actions.keys().collect::<Vec<_>>())
            .finish()
    }
}

fn join_path(prefix: &str, path: &str) -> String {
    if prefix.is_empty() {
        return path.to_string();
    }
    let prefix = prefix.trim_end_matches('/');
    if path.is_empty() || path == "/" {
        return if prefix.is_empty() { "/".to_string() } else { prefix.to_string() };
    }
    if path.starts_with('/') { format!("{prefix}{path}") } else { format!("{prefix}/{path}") }
}
