//! Route template compilation.
//!
//! A template is a path with zero or more placeholders, `{name}` or `{name:key}`. The `key`
//! selects an expression from a [`Constraints`] table; a placeholder without key (or with a key
//! the table does not know) matches one or more non-slash characters.
//!
//! ```
//! use micro_rest::router::template::{compile, Constraints};
//!
//! let compiled = compile("/users/{id:int}", &Constraints::default()).unwrap();
//! assert_eq!(compiled.param_names(), ["id"]);
//! assert_eq!(compiled.matcher().as_str(), "^/users/([0-9]+)/?$");
//! ```

use crate::error::RouteError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::warn;

/// Expression used for placeholders without a known constraint.
pub const DEFAULT_CONSTRAINT: &str = "[^/]+";

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)(?::([A-Za-z_][A-Za-z0-9_]*))?\}")
        .expect("placeholder pattern is valid")
});

/// Named expression table consulted for `{name:key}` placeholders.
///
/// The default table knows `int`, `alpha`, `alnum`, `hex` and `uuid`.
#[derive(Debug, Clone)]
pub struct Constraints {
    inner: HashMap<String, String>,
}

impl Constraints {
    /// Creates a table without any entry, every placeholder falls back to [`DEFAULT_CONSTRAINT`].
    pub fn empty() -> Self {
        Self { inner: HashMap::new() }
    }

    /// Adds or replaces the expression registered under `key`, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, expr: impl Into<String>) -> Option<String> {
        self.inner.insert(key.into(), expr.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Checks that every expression compiles and contains no capturing group of its own.
    ///
    /// A capturing group inside a constraint would shift the positions of the groups that carry
    /// parameter values, so it is rejected instead of silently mis-assigning values.
    pub fn validate(&self) -> Result<(), RouteError> {
        for (key, expr) in &self.inner {
            let regex = Regex::new(expr).map_err(|e| RouteError::invalid_constraint(key, expr, e))?;
            if regex.captures_len() > 1 {
                return Err(RouteError::capturing_constraint(key, expr));
            }
        }
        Ok(())
    }
}

impl Default for Constraints {
    fn default() -> Self {
        let mut constraints = Self::empty();
        constraints.insert("int", "[0-9]+");
        constraints.insert("alpha", "[A-Za-z]+");
        constraints.insert("alnum", "[A-Za-z0-9]+");
        constraints.insert("hex", "[0-9a-fA-F]+");
        constraints.insert(
            "uuid",
            "[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        );
        constraints
    }
}

/// The matcher and ordered parameter names produced from one template.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    matcher: Regex,
    param_names: Vec<String>,
}

impl CompiledTemplate {
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    pub(crate) fn into_parts(self) -> (Regex, Vec<String>) {
        (self.matcher, self.param_names)
    }
}

/// Compiles `template` into an anchored matcher.
///
/// Literal text is escaped, each placeholder becomes one capturing group, and the whole pattern
/// accepts an optional trailing slash. The returned names are in left-to-right placeholder order,
/// so the n-th name belongs to the n-th capturing group.
pub fn compile(template: &str, constraints: &Constraints) -> Result<CompiledTemplate, RouteError> {
    // "/users/" and "/users" compile to the same pattern
    let body = template.strip_suffix('/').unwrap_or(template);

    let mut pattern = String::with_capacity(body.len() + 16);
    pattern.push('^');

    let mut param_names: Vec<String> = Vec::new();
    let mut last = 0;

    for captures in PLACEHOLDER.captures_iter(body) {
        let (Some(whole), Some(name)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        push_literal(template, &body[last..whole.start()], &mut pattern)?;

        let name = name.as_str();
        if param_names.iter().any(|existing| existing == name) {
            return Err(RouteError::duplicate_param(template, name));
        }

        let expr = match captures.get(2) {
            Some(key) => constraints.get(key.as_str()).unwrap_or_else(|| {
                warn!(template, key = key.as_str(), "unknown constraint, falling back to default");
                DEFAULT_CONSTRAINT
            }),
            None => DEFAULT_CONSTRAINT,
        };

        pattern.push('(');
        pattern.push_str(expr);
        pattern.push(')');
        param_names.push(name.to_string());
        last = whole.end();
    }

    push_literal(template, &body[last..], &mut pattern)?;
    pattern.push_str("/?$");

    let matcher = Regex::new(&pattern)
        .map_err(|e| RouteError::InvalidPattern { template: template.to_string(), source: Box::new(e) })?;

    if matcher.captures_len() - 1 != param_names.len() {
        return Err(RouteError::invalid_template(
            template,
            "constraint expressions must not contain capturing groups",
        ));
    }

    Ok(CompiledTemplate { matcher, param_names })
}

fn push_literal(template: &str, literal: &str, pattern: &mut String) -> Result<(), RouteError> {
    if literal.contains(['{', '}']) {
        return Err(RouteError::invalid_template(template, format!("malformed placeholder near '{literal}'")));
    }
    pattern.push_str(&regex::escape(literal));
    Ok(())
}
