//! Core data types for request analysis.

use chrono::{DateTime, Local};
use indexmap::IndexMap;
use serde::Serialize;
use std::time::Duration;

/// Header map that keeps insertion order for display.
pub type Headers = IndexMap<String, String>;

/// Immutable description of one HTTP request to issue.
///
/// Only [`RequestBuilder`](crate::RequestBuilder) creates these, so the URL
/// always carries an explicit `http://` or `https://` scheme and a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestConfig {
    pub(crate) url: String,
    pub(crate) method: String,
    pub(crate) headers: Headers,
    pub(crate) body: Option<String>,
    #[serde(rename = "timeout")]
    pub(crate) timeout_secs: u64,
    pub(crate) follow_redirects: bool,
}

impl RequestConfig {
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Uppercase method token, e.g. `GET`.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Raw body, sent as-is.
    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn follow_redirects(&self) -> bool {
        self.follow_redirects
    }
}

/// Timing information for a single request.
///
/// Only `total_time_ms` is measured. The per-phase fields are reserved for
/// granular instrumentation and are always `0.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimingInfo {
    /// Reserved, never populated.
    pub dns_lookup_ms: f64,
    /// Reserved, never populated.
    pub tcp_connect_ms: f64,
    /// Reserved, never populated.
    pub tls_handshake_ms: f64,
    /// Reserved, never populated.
    pub time_to_first_byte_ms: f64,
    /// Wall-clock milliseconds from issuing the request until the body is
    /// read, including connecting, redirect following and TLS. Client setup
    /// is not counted.
    pub total_time_ms: f64,
}

impl TimingInfo {
    pub fn from_elapsed(elapsed: Duration) -> Self {
        Self {
            total_time_ms: elapsed.as_secs_f64() * 1000.0,
            ..Self::default()
        }
    }
}

/// Uniform result of a successful request attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    pub status_code: u16,
    pub headers: Headers,
    /// Body decoded as text.
    pub body: String,
    /// URL of the last response in the chain.
    pub final_url: String,
    pub timing: TimingInfo,
    /// Number of redirect hops followed before the final response.
    pub redirect_count: usize,
    /// URL of each prior response in the redirect history, oldest first.
    pub redirect_chain: Vec<String>,
    /// Capture time, informational only.
    pub timestamp: DateTime<Local>,
}

/// Severity of an analysis finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

/// Area an analysis finding belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Security,
    Performance,
    Headers,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Security => "security",
            Category::Performance => "performance",
            Category::Headers => "headers",
        }
    }
}

/// A single annotation about a request/response pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    pub category: Category,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// A request, its response, and any findings about them.
///
/// Nothing in this crate produces findings yet; the type is the envelope
/// for JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub request: RequestConfig,
    pub response: ResponseData,
    pub findings: Vec<Finding>,
}

impl AnalysisResult {
    pub fn new(request: RequestConfig, response: ResponseData) -> Self {
        Self {
            request,
            response,
            findings: Vec::new(),
        }
    }

    /// Add a finding to the result.
    pub fn add_finding(
        &mut self,
        severity: Severity,
        category: Category,
        message: impl Into<String>,
        details: Option<String>,
    ) {
        self.findings.push(Finding {
            severity,
            category,
            message: message.into(),
            details,
        });
    }
}
