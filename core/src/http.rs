//! HTTP request and response types exchanged across the transport seam.
//!
//! # Design
//! The dispatcher describes each call as a plain `HttpRequest` and hands it
//! to a `Transport`, which performs the I/O and answers with a plain
//! `HttpResponse`. Parameters stay as unescaped name/value pairs here; the
//! transport owns escaping, whether it writes them into a query string or a
//! form-encoded body.

use std::time::Duration;

/// HTTP method for a request. The remote service is only ever called with
/// these two verbs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
///
/// For `Get` the `params` become the query string; for `Post` they become an
/// `application/x-www-form-urlencoded` body. `url` never carries a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub params: Vec<(String, String)>,
    pub timeout: Duration,
}

impl HttpRequest {
    /// First value sent under `name`, if any.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Parameter names in the order they will be sent.
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|(key, _)| key.as_str()).collect()
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
