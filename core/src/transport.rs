//! The HTTP transport seam.
//!
//! # Design
//! `RequestDispatcher` never talks to the network itself; it hands an
//! `HttpRequest` to whatever `Transport` it was built with. `UreqTransport` is
//! the production implementation. Any closure with the right signature is a
//! `Transport` too, which is how tests substitute canned responses.
//!
//! A transport reports every HTTP status as a response, errors included.
//! `Err` is reserved for "no response at all".

use ureq::Agent;

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one blocking HTTP round trip.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> Transport for F
where
    F: Fn(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Blocking transport backed by a shared `ureq` agent.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl UreqTransport {
    pub fn new() -> Self {
        // 4xx/5xx come back as data so the dispatcher applies one status policy.
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let pairs = request
            .params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()));

        let result = match request.method {
            HttpMethod::Get => self
                .agent
                .get(&request.url)
                .config()
                .timeout_global(Some(request.timeout))
                .build()
                .query_pairs(pairs)
                .call(),
            HttpMethod::Post => self
                .agent
                .post(&request.url)
                .config()
                .timeout_global(Some(request.timeout))
                .build()
                .send_form(pairs),
        };
        let mut response = result?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(TransportError::body_read)?;

        Ok(HttpResponse { status, body })
    }
}
