//! Page transport
//!
//! The client never talks HTTP directly. Every page goes through a
//! [`Transport`], which returns the raw response body. The default is an
//! [`HttpTransport`], optionally wrapped in a [`CachedTransport`]; callers may
//! supply any implementation, e.g. one serving canned pages in tests.
mod cached;
mod http;

pub use cached::{CachedPage, CachedTransport};
pub use http::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpTransport};

use chrono::{DateTime, Utc};
use std::rc::Rc;
use thiserror::Error;

/// Errors that can occur while retrieving a page.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The server could not be reached (DNS failure, refused connection,
    /// timeout, ...)
    #[error("Could not connect to server for {url}: {message}")]
    Connection {
        url: String,
        message: String,
        /// When the failure happened
        occurred_at: DateTime<Utc>,
    },

    /// The server answered with a non-success status
    #[error("HTTP {status} while retrieving {url}")]
    Status { url: String, status: u16 },
}

impl RetrievalError {
    /// Creates a connection failure stamped with the current time
    pub fn connection(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            url: url.into(),
            message: message.into(),
            occurred_at: Utc::now(),
        }
    }

    /// Time of the failure if the server was unreachable
    ///
    /// HTTP status errors mean the server did answer and carry no timestamp.
    pub fn last_timeout(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Connection { occurred_at, .. } => Some(*occurred_at),
            Self::Status { .. } => None,
        }
    }
}

/// Trait for fetching raw page bodies.
///
/// Implementations block until the body is available. `form` carries
/// url-encoded POST fields; without it the request is a plain GET.
pub trait Transport {
    /// Fetches `url` and returns the response body
    fn fetch(&self, url: &str, form: Option<&[(&str, &str)]>) -> Result<Vec<u8>, RetrievalError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn fetch(&self, url: &str, form: Option<&[(&str, &str)]>) -> Result<Vec<u8>, RetrievalError> {
        (**self).fetch(url, form)
    }
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn fetch(&self, url: &str, form: Option<&[(&str, &str)]>) -> Result<Vec<u8>, RetrievalError> {
        (**self).fetch(url, form)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_timeout_only_for_connection_failures() {
        let err = RetrievalError::connection("http://example.com", "connection refused");
        assert!(err.last_timeout().is_some());
        assert!(err.to_string().contains("connection refused"));

        let err = RetrievalError::Status {
            url: "http://example.com".to_string(),
            status: 404,
        };
        assert!(err.last_timeout().is_none());
        assert!(err.to_string().contains("404"));
    }
}
