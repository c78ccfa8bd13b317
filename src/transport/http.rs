//! Blocking HTTP transport.
use super::{RetrievalError, Transport};
use std::time::Duration;
use tracing::debug;

/// Default User-Agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("tvsubtitles/", env!("CARGO_PKG_VERSION"));

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Transport fetching pages over HTTP.
///
/// Requests block the calling thread until the whole body has been read.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Creates a transport with the given User-Agent and request timeout.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, RetrievalError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| RetrievalError::connection("", e.to_string()))?;

        Ok(Self { client })
    }

    /// Wraps an already configured client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Default for HttpTransport {
    /// Default User-Agent and timeout, or plain reqwest defaults if that
    /// client cannot be built.
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
            .unwrap_or_else(|_| Self::with_client(reqwest::blocking::Client::new()))
    }
}

impl Transport for HttpTransport {
    fn fetch(&self, url: &str, form: Option<&[(&str, &str)]>) -> Result<Vec<u8>, RetrievalError> {
        debug!(url, post = form.is_some(), "Retrieving URL");

        let request = match form {
            Some(fields) => self.client.post(url).form(fields),
            None => self.client.get(url),
        };

        let response = request
            .send()
            .map_err(|e| RetrievalError::connection(url, e.to_string()))?;

        // Ensure request was successful
        if !response.status().is_success() {
            return Err(RetrievalError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let body = response
            .bytes()
            .map_err(|e| RetrievalError::connection(url, e.to_string()))?;

        Ok(body.to_vec())
    }
}
