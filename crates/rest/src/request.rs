//! Request-scoped data carried through the pipeline.
//!
//! - `PathParams`: values captured from the request path, aligned with the route's parameter names
//! - `RequestData`: a string-keyed store middleware can use to hand values to later stages
//!
//! Both live inside the per-request [`Context`](crate::Context), never on the shared route, so
//! concurrent requests matching the same route cannot observe each other's values.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Represents path parameters extracted from the URL path of an HTTP request.
///
/// Names are borrowed from the matched route, values are owned by the request. For the route
/// `/users/{id}` and the path `/users/42`, `get("id")` returns `Some("42")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParams<'route> {
    names: &'route [String],
    values: Vec<String>,
}

impl<'route> PathParams<'route> {
    /// Creates a new PathParams from parallel name and value lists
    pub(crate) fn new(names: &'route [String], values: Vec<String>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { names, values }
    }

    /// Creates an empty PathParams instance with no parameters
    #[inline]
    pub fn empty() -> Self {
        Self { names: &[], values: Vec::new() }
    }

    /// Returns true if there are no path parameters
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns the number of path parameters
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Gets the value of a path parameter by its name
    /// Returns None if the parameter doesn't exist
    #[inline]
    pub fn get(&self, name: impl AsRef<str>) -> Option<&str> {
        let name = name.as_ref();
        self.names.iter().position(|n| n == name).and_then(|index| self.values.get(index)).map(String::as_str)
    }

    /// Parses the value of a path parameter, `None` if the parameter doesn't exist
    pub fn parse<T: FromStr>(&self, name: impl AsRef<str>) -> Option<Result<T, T::Err>> {
        self.get(name).map(str::parse)
    }

    pub fn names(&self) -> &'route [String] {
        self.names
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Iterates `(name, value)` pairs in template order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.names.iter().map(String::as_str).zip(self.values.iter().map(String::as_str))
    }
}

/// A per-request key/value store.
///
/// Values of any `Send + Sync` type can be stored under a string key; reading a value back
/// requires naming its type.
#[derive(Default)]
pub struct RequestData {
    inner: HashMap<String, Box<dyn Any + Send + Sync>>,
}

impl RequestData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` under `key`, returning the value previously stored there (of any type).
    pub fn insert<V>(&mut self, key: impl Into<String>, value: V) -> Option<Box<dyn Any + Send + Sync>>
    where
        V: Any + Send + Sync,
    {
        self.inner.insert(key.into(), Box::new(value))
    }

    /// Gets the value stored under `key`, `None` when absent or of another type.
    pub fn get<V: Any>(&self, key: &str) -> Option<&V> {
        self.inner.get(key).and_then(|value| value.downcast_ref::<V>())
    }

    pub fn get_mut<V: Any>(&mut self, key: &str) -> Option<&mut V> {
        self.inner.get_mut(key).and_then(|value| value.downcast_mut::<V>())
    }

    pub fn remove(&mut self, key: &str) -> Option<Box<dyn Any + Send + Sync>> {
        self.inner.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RequestData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.inner.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{PathParams, RequestData};

    #[test]
    fn test_path_params_lookup() {
        let names = vec!["org".to_string(), "id".to_string()];
        let params = PathParams::new(&names, vec!["rust".to_string(), "42".to_string()]);

        assert_eq!(params.len(), 2);
        assert_eq!(params.get("org"), Some("rust"));
        assert_eq!(params.get("id"), Some("42"));
        assert_eq!(params.get("missing"), None);
        assert_eq!(params.parse::<u32>("id"), Some(Ok(42)));
        assert!(params.parse::<u32>("org").unwrap().is_err());
        assert_eq!(params.iter().collect::<Vec<_>>(), vec![("org", "rust"), ("id", "42")]);
    }

    #[test]
    fn test_empty_path_params() {
        let params = PathParams::empty();
        assert!(params.is_empty());
        assert_eq!(params.get("id"), None);
        assert_eq!(params.iter().count(), 0);
    }

    #[test]
    fn test_request_data() {
        let mut data = RequestData::new();
        assert!(data.is_empty());

        data.insert("user", String::from("zava"));
        data.insert("attempts", 3_u8);

        assert_eq!(data.get::<String>("user").map(String::as_str), Some("zava"));
        assert_eq!(data.get::<u8>("attempts"), Some(&3));
        // wrong type reads as absent
        assert_eq!(data.get::<u32>("attempts"), None);

        *data.get_mut::<u8>("attempts").unwrap() += 1;
        assert_eq!(data.get::<u8>("attempts"), Some(&4));

        assert!(data.insert("user", 7_i32).is_some());
        assert_eq!(data.get::<i32>("user"), Some(&7));

        assert!(data.remove("user").is_some());
        assert!(!data.contains_key("user"));
        assert_eq!(data.len(), 1);
    }
}
