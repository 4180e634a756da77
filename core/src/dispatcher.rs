//! Request construction and dispatch against the remote service.
//!
//! # Design
//! `RequestDispatcher` owns the credential, the configuration, and an injected
//! `Transport`. Every call takes a fresh `ParameterSet` by value, stamps the
//! credential into it, and performs exactly one round trip. Connection
//! errors, non-2xx statuses, and undecodable JSON all collapse into
//! `Outcome::Failure`: the service reports application errors and transport
//! errors the same way, so no finer distinction is offered. Nothing is
//! retried here.

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::http::{HttpMethod, HttpRequest};
use crate::params::ParameterSet;
use crate::transport::Transport;
use crate::types::{Credential, Decode, Outcome, Payload, RemoteResponse};

/// Reserved parameter name carrying the credential.
pub const APIKEY_PARAM: &str = "apikey";

#[derive(Debug, Clone)]
pub struct RequestDispatcher<T> {
    credential: Credential,
    config: ClientConfig,
    transport: T,
}

impl<T: Transport> RequestDispatcher<T> {
    pub fn new(credential: Credential, config: ClientConfig, transport: T) -> Self {
        Self {
            credential,
            config,
            transport,
        }
    }

    /// Insert the credential into `params` and return the endpoint URL.
    ///
    /// The URL never carries a query string; parameters travel separately so
    /// the transport escapes them.
    pub fn build_target(&self, path: &str, params: &mut ParameterSet) -> String {
        params.insert(APIKEY_PARAM, self.credential.expose());
        format!("{}/{}", self.config.api_root(), path)
    }

    /// GET with `params` as the query string.
    pub fn dispatch_get(&self, path: &str, params: ParameterSet, decode: Decode) -> RemoteResponse {
        self.dispatch(HttpMethod::Get, path, params, decode)
    }

    /// POST with `params` as a form-encoded body, using the longer POST timeout.
    pub fn dispatch_post(&self, path: &str, params: ParameterSet, decode: Decode) -> RemoteResponse {
        self.dispatch(HttpMethod::Post, path, params, decode)
    }

    fn dispatch(
        &self,
        method: HttpMethod,
        path: &str,
        mut params: ParameterSet,
        decode: Decode,
    ) -> RemoteResponse {
        let url = self.build_target(path, &mut params);
        let timeout = match method {
            HttpMethod::Get => self.config.timeout_for_get(),
            HttpMethod::Post => self.config.timeout_for_post(),
        };
        let request = HttpRequest {
            method,
            url,
            params: params.to_pairs(),
            timeout,
        };

        debug!(endpoint = path, method = method.as_str(), "dispatching request");

        let response = match self.transport.execute(&request) {
            Ok(response) => response,
            Err(e) => {
                warn!(endpoint = path, error = %e, "transport failure");
                return Outcome::Failure;
            }
        };

        if !response.is_success() {
            warn!(endpoint = path, status = response.status, "non-success status");
            return Outcome::Failure;
        }

        match decode {
            Decode::Text => Outcome::Success(Payload::Text(response.body)),
            Decode::Json => match serde_json::from_str::<Value>(&response.body) {
                Ok(value) => Outcome::Success(Payload::Json(value)),
                Err(e) => {
                    warn!(endpoint = path, error = %e, "response body is not valid JSON");
                    Outcome::Failure
                }
            },
        }
    }
}
