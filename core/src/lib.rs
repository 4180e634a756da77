//! Synchronous client for the PreviewMyEmail email-preview API.
//!
//! # Overview
//! `PreviewClient` exposes one method per remote endpoint. Each method builds
//! a `ParameterSet` and hands it to `RequestDispatcher`, which stamps in the
//! API key, performs one blocking round trip through an injected `Transport`,
//! and decodes the body as JSON or returns it as text.
//!
//! # Design
//! - Every call returns `Outcome`: a complete value or `Failure`. Transport
//!   errors, non-2xx statuses, and malformed JSON are not distinguished.
//! - Authentication is the `apikey` parameter only; no headers are set.
//! - The transport is a trait so tests can swap in a closure; production
//!   uses `UreqTransport`.
//! - No retries, no caching. Callers that need either wrap this crate.

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod http;
pub mod params;
pub mod transport;
pub mod types;

pub use client::PreviewClient;
pub use config::ClientConfig;
pub use dispatcher::{RequestDispatcher, APIKEY_PARAM};
pub use error::TransportError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::{ParamValue, ParameterSet};
pub use transport::{Transport, UreqTransport};
pub use types::{Credential, Decode, FeedOptions, Outcome, Payload, RemoteResponse};
