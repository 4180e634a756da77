//! Errors raised at the transport seam.
//!
//! # Design
//! `TransportError` only travels between a `Transport` implementation and the
//! `RequestDispatcher`. The dispatcher logs it and collapses it into
//! `Outcome::Failure`, so endpoint callers never see it. The variants exist to
//! keep the log lines informative, not to let callers branch on the cause.

use std::io::ErrorKind;

use thiserror::Error;

/// Failure to obtain any HTTP response from the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The request did not complete within its timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// DNS, TLS, or socket level failure.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A response arrived but its body could not be read as text.
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Both ureq's own deadline and a socket-level `TimedOut` count as timeouts.
fn is_timeout(err: &ureq::Error) -> bool {
    match err {
        ureq::Error::Timeout(_) => true,
        ureq::Error::Io(e) => e.kind() == ErrorKind::TimedOut,
        _ => false,
    }
}

impl From<ureq::Error> for TransportError {
    fn from(err: ureq::Error) -> Self {
        if is_timeout(&err) {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::Connection(err.to_string())
        }
    }
}

impl TransportError {
    /// Classify a failure while reading a response body that already arrived.
    pub(crate) fn body_read(err: ureq::Error) -> Self {
        if is_timeout(&err) {
            TransportError::Timeout(err.to_string())
        } else {
            TransportError::Body(err.to_string())
        }
    }
}
