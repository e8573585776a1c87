//! Transport seam between the executor and the HTTP client library.
//!
//! [`ReqwestTransport`] is the real implementation. Everything network
//! related (DNS, TLS, connecting, following redirects) happens inside it;
//! the executor only sees a [`TransportResponse`] or a [`TransportError`].

use crate::model::{Headers, RequestConfig};
use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::header::HeaderMap;
use reqwest::redirect::Policy;
use reqwest::{Client, Method};
use std::error::Error as StdError;
use std::sync::Arc;

/// Redirect hops followed before giving up.
pub const MAX_REDIRECTS: usize = 20;

/// Raw outcome of a request, before timing is attached.
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    /// Response headers in received order. Repeated names are folded into
    /// one entry with values joined by `", "`.
    pub headers: Headers,
    pub body: String,
    /// URL of the last response in the chain.
    pub final_url: String,
    /// URL of each prior response in the redirect history, oldest first.
    pub history: Vec<String>,
}

/// Transport-level failure, carrying a description of the cause.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("{0}")]
    Timeout(String),
    #[error("{0}")]
    Failed(String),
}

/// Opens a [`Session`] for a [`RequestConfig`].
///
/// Opening covers client setup (TLS roots, connector, redirect policy) and
/// does no network I/O.
pub trait Transport: Send + Sync {
    type Session: Session;

    fn open(&self, config: &RequestConfig) -> Result<Self::Session, TransportError>;
}

/// A transport session scoped to one request.
///
/// `send` consumes the session, so it is released before the call returns,
/// on success and on failure.
#[async_trait]
pub trait Session: Send {
    async fn send(self, config: &RequestConfig) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a fresh `reqwest::Client` per request.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    max_redirects: usize,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            max_redirects: MAX_REDIRECTS,
        }
    }

    /// Override the redirect hop limit.
    pub fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }
}

impl Transport for ReqwestTransport {
    type Session = ReqwestSession;

    fn open(&self, config: &RequestConfig) -> Result<ReqwestSession, TransportError> {
        let hops = Arc::new(Mutex::new(Vec::new()));
        let policy = if config.follow_redirects() {
            recording_policy(self.max_redirects, Arc::clone(&hops))
        } else {
            Policy::none()
        };

        let client = Client::builder()
            .timeout(config.timeout())
            .redirect(policy)
            .build()
            .map_err(|e| TransportError::Failed(describe(&e)))?;

        Ok(ReqwestSession { client, hops })
    }
}

/// One `reqwest::Client` plus the redirect hops its policy recorded.
#[derive(Debug)]
pub struct ReqwestSession {
    client: Client,
    hops: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Session for ReqwestSession {
    async fn send(self, config: &RequestConfig) -> Result<TransportResponse, TransportError> {
        let method = Method::from_bytes(config.method().as_bytes()).map_err(|e| {
            TransportError::Failed(format!("Invalid method `{}`: {e}", config.method()))
        })?;

        let mut request = self.client.request(method, config.url());
        for (name, value) in config.headers() {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = config.body() {
            request = request.body(body.to_string());
        }

        let response = request.send().await.map_err(classify)?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let headers = collect_headers(response.headers());
        let body = response.text().await.map_err(classify)?;
        let history = std::mem::take(&mut *self.hops.lock());

        Ok(TransportResponse {
            status,
            headers,
            body,
            final_url,
            history,
        })
    }
}

/// Follow redirects up to `max` hops, recording the URL of each response
/// that redirected.
fn recording_policy(max: usize, hops: Arc<Mutex<Vec<String>>>) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() > max {
            return attempt.error(format!("too many redirects (limit {max})"));
        }
        if let Some(previous) = attempt.previous().last() {
            hops.lock().push(previous.to_string());
        }
        attempt.follow()
    })
}

fn collect_headers(map: &HeaderMap) -> Headers {
    let mut headers = Headers::with_capacity(map.keys_len());
    for (name, value) in map {
        let value = String::from_utf8_lossy(value.as_bytes());
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert_with(|| value.into_owned());
    }
    headers
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(describe(&err))
    } else {
        TransportError::Failed(describe(&err))
    }
}

/// Render an error together with its source chain.
fn describe(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{HeaderValue, SET_COOKIE};
    use std::fmt;

    #[test]
    fn test_collect_headers_folds_repeated_names() {
        let mut map = HeaderMap::new();
        map.insert("content-type", HeaderValue::from_static("text/plain"));
        map.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        map.append(SET_COOKIE, HeaderValue::from_static("b=2"));
        map.insert("x-request-id", HeaderValue::from_static("abc"));

        let headers = collect_headers(&map);
        assert_eq!(headers.len(), 3);
        assert_eq!(headers["set-cookie"], "a=1, b=2");
        assert_eq!(headers["content-type"], "text/plain");
        assert_eq!(headers["x-request-id"], "abc");
    }

    #[derive(Debug)]
    struct Layer(&'static str, Option<Box<Layer>>);

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for Layer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            self.1.as_deref().map(|l| l as &(dyn StdError + 'static))
        }
    }

    #[test]
    fn test_describe_includes_source_chain() {
        let err = Layer(
            "error sending request",
            Some(Box::new(Layer(
                "client error (Connect)",
                Some(Box::new(Layer("Connection refused", None))),
            ))),
        );
        assert_eq!(
            describe(&err),
            "error sending request: client error (Connect): Connection refused"
        );
    }

    #[test]
    fn test_describe_skips_repeated_text() {
        let err = Layer(
            "operation timed out: deadline",
            Some(Box::new(Layer("deadline", None))),
        );
        assert_eq!(describe(&err), "operation timed out: deadline");
    }
}
