//! Error types of the dispatch core.
//!
//! Registration problems surface as [`RouteError`] while the router is being built, so a
//! misconfigured table never reaches the serving phase. Request-time failures are split
//! into [`SendError`] (the response could not be written) and [`ExtractError`] (the request
//! body or query could not be decoded). [`DispatchError`] is what the pipeline hands back to
//! the transport when a request has to be aborted.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RouteError {
    #[error("invalid route template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("duplicate parameter '{name}' in route template '{template}'")]
    DuplicateParam { template: String, name: String },

    #[error("invalid constraint '{key}' (`{expr}`): {source}")]
    InvalidConstraint {
        key: String,
        expr: String,
        #[source]
        source: Box<regex::Error>,
    },

    #[error("constraint '{key}' (`{expr}`) must not contain capturing groups, use `(?:...)` instead")]
    CapturingConstraint { key: String, expr: String },

    #[error("route template '{template}' compiled to an invalid pattern: {source}")]
    InvalidPattern {
        template: String,
        #[source]
        source: Box<regex::Error>,
    },
}

impl RouteError {
    pub fn invalid_template<S: ToString>(template: &str, reason: S) -> Self {
        Self::InvalidTemplate { template: template.to_string(), reason: reason.to_string() }
    }

    pub fn duplicate_param(template: &str, name: &str) -> Self {
        Self::DuplicateParam { template: template.to_string(), name: name.to_string() }
    }

    pub fn invalid_constraint(key: &str, expr: &str, source: regex::Error) -> Self {
        Self::InvalidConstraint { key: key.to_string(), expr: expr.to_string(), source: Box::new(source) }
    }

    pub fn capturing_constraint(key: &str, expr: &str) -> Self {
        Self::CapturingConstraint { key: key.to_string(), expr: expr.to_string() }
    }
}

#[derive(Error, Debug)]
pub enum SendError {
    #[error("sink accepted no bytes, {remaining} bytes left unwritten")]
    WriteZero { remaining: usize },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },
}

#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("failed to commit response: {source}")]
    Send {
        #[from]
        source: SendError,
    },
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("invalid form data: {source}")]
    Form {
        #[from]
        source: serde_urlencoded::de::Error,
    },

    #[error("invalid json body: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

#[derive(Error, Debug)]
pub enum HandlerBuildError {
    #[error("router must be set")]
    MissingRouter,
}
