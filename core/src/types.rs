//! Value types shared by the dispatcher and the endpoint catalog.
//!
//! # Design
//! `Outcome` is the single failure contract of this crate: any call either
//! yields a complete value or `Failure`. A decoded JSON `false`, `0`, or
//! `null` is still a `Success`, so callers can never mistake a legitimate
//! value for the sentinel.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a call against the remote service.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Success(T),
    /// The request did not succeed. The cause is deliberately not exposed.
    Failure,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure)
    }

    /// The successful value, or `None` on failure.
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(value) => Some(value),
            Outcome::Failure => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(value) => Outcome::Success(f(value)),
            Outcome::Failure => Outcome::Failure,
        }
    }

    pub fn and_then<U, F: FnOnce(T) -> Outcome<U>>(self, f: F) -> Outcome<U> {
        match self {
            Outcome::Success(value) => f(value),
            Outcome::Failure => Outcome::Failure,
        }
    }
}

impl<T> From<Outcome<T>> for Option<T> {
    fn from(outcome: Outcome<T>) -> Self {
        outcome.success()
    }
}

/// How a successful response body is handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Decode {
    /// Parse the body as JSON.
    #[default]
    Json,
    /// Return the body text unmodified.
    Text,
}

/// A successfully received response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn into_json(self) -> Outcome<Value> {
        match self {
            Payload::Json(value) => Outcome::Success(value),
            Payload::Text(_) => Outcome::Failure,
        }
    }

    pub fn into_text(self) -> Outcome<String> {
        match self {
            Payload::Text(text) => Outcome::Success(text),
            Payload::Json(_) => Outcome::Failure,
        }
    }
}

/// What the dispatcher returns for every call.
pub type RemoteResponse = Outcome<Payload>;

/// API key identifying the caller to the remote service.
///
/// `Debug` is redacted so the key cannot leak through log output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Optional filters for the analytics feed. Unset fields are not sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl FeedOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(mut self, get: impl Into<String>) -> Self {
        self.get = Some(get.into());
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}
