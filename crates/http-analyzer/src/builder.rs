//! Request configuration builder.
//!
//! Accumulates loosely specified inputs into a [`RequestConfig`]. The URL is
//! validated once, when the builder is created; every other setting is
//! accepted as given.

use crate::error::{AnalyzerError, Result};
use crate::model::{Headers, RequestConfig};
use tracing::debug;
use url::Url;

pub const DEFAULT_METHOD: &str = "GET";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Fluent builder for [`RequestConfig`].
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    url: String,
    method: String,
    headers: Headers,
    body: Option<String>,
    timeout_secs: u64,
    follow_redirects: bool,
}

impl RequestBuilder {
    /// Create a builder for `url`.
    ///
    /// A URL without an `http://` or `https://` prefix gets `https://`.
    /// Fails with [`AnalyzerError::InvalidUrl`] when no host can be
    /// extracted from the result.
    pub fn new(url: &str) -> Result<Self> {
        Ok(Self {
            url: normalize_url(url)?,
            method: DEFAULT_METHOD.to_string(),
            headers: Headers::new(),
            body: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            follow_redirects: true,
        })
    }

    /// Set the HTTP method. Stored uppercased.
    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_uppercase();
        self
    }

    /// Set a header, replacing any earlier value for the same key.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Merge several headers. Later entries win.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in headers {
            self.headers.insert(key.into(), value.into());
        }
        self
    }

    /// Apply `key:value` header specifications.
    ///
    /// Entries without a colon are skipped.
    pub fn header_specs<I, S>(mut self, specs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for spec in specs {
            match parse_header_spec(spec.as_ref()) {
                Some((key, value)) => {
                    self.headers.insert(key, value);
                }
                None => debug!("Ignoring malformed header spec: {:?}", spec.as_ref()),
            }
        }
        self
    }

    /// Set the raw request body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the timeout in seconds. Zero is raised to one.
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs.max(1);
        self
    }

    pub fn follow_redirects(mut self, follow: bool) -> Self {
        self.follow_redirects = follow;
        self
    }

    /// Snapshot the current settings. The builder stays usable.
    pub fn build(&self) -> RequestConfig {
        RequestConfig {
            url: self.url.clone(),
            method: self.method.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            timeout_secs: self.timeout_secs,
            follow_redirects: self.follow_redirects,
        }
    }
}

/// Split a `key:value` header specification on its first colon.
///
/// Both halves are trimmed. Returns `None` when there is no colon.
pub fn parse_header_spec(spec: &str) -> Option<(String, String)> {
    let (key, value) = spec.split_once(':')?;
    Some((key.trim().to_string(), value.trim().to_string()))
}

fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let url = if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let invalid = || AnalyzerError::InvalidUrl {
        input: raw.to_string(),
    };
    let parsed = Url::parse(&url).map_err(|_| invalid())?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(invalid()),
    }
}

fn has_http_scheme(url: &str) -> bool {
    let starts_with = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    starts_with("http://") || starts_with("https://")
}
