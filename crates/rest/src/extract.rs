//! Decoding of form, query and JSON payloads.
//!
//! These helpers are thin wrappers over `serde_urlencoded` and `serde_json`; a failure is an
//! [`ExtractError`], which actions can return directly to answer with `400 Bad Request`.

use crate::Context;
use crate::error::ExtractError;
use http::Method;
use serde::de::DeserializeOwned;

impl Context<'_> {
    /// Decodes form data.
    ///
    /// `POST`, `PUT` and `PATCH` requests read the `application/x-www-form-urlencoded` body,
    /// any other method reads the query string.
    pub fn form<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        let method = self.method();
        if method == Method::POST || method == Method::PUT || method == Method::PATCH {
            Ok(serde_urlencoded::from_bytes(self.body())?)
        } else {
            self.query()
        }
    }

    /// Decodes the query string, an absent query decodes like an empty one.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        Ok(serde_urlencoded::from_str(self.uri().query().unwrap_or_default())?)
    }

    /// Decodes the request body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ExtractError> {
        Ok(serde_json::from_slice(self.body())?)
    }
}
