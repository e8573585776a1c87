//! Single-shot request execution and timing.

use crate::error::{AnalyzerError, Result};
use crate::model::{RequestConfig, ResponseData, TimingInfo};
use crate::transport::{ReqwestTransport, Session, Transport, TransportError};
use chrono::Local;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Issues exactly one request per [`execute`](Executor::execute) call.
///
/// No state is carried between calls and failures are never retried.
#[derive(Debug, Clone)]
pub struct Executor<T = ReqwestTransport> {
    transport: T,
}

impl Executor<ReqwestTransport> {
    pub fn new() -> Self {
        Self::with_transport(ReqwestTransport::new())
    }
}

impl Default for Executor<ReqwestTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> Executor<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Perform the request described by `config`.
    ///
    /// The session is opened before the clock starts, so
    /// `timing.total_time_ms` covers issuing the request, redirect
    /// following and reading the body, but not client setup.
    pub async fn execute(&self, config: &RequestConfig) -> Result<ResponseData> {
        debug!(
            "Sending {} {} (timeout {}s, follow redirects: {})",
            config.method(),
            config.url(),
            config.timeout_secs(),
            config.follow_redirects()
        );

        let session = self
            .transport
            .open(config)
            .map_err(|e| failure(config, e, None))?;

        let started = Instant::now();
        let outcome = session.send(config).await;
        let timing = TimingInfo::from_elapsed(started.elapsed());

        let response = outcome.map_err(|e| failure(config, e, Some(&timing)))?;
        let redirect_count = response.history.len();
        info!(
            "{} {} -> {} in {:.2}ms ({} redirect(s))",
            config.method(),
            config.url(),
            response.status,
            timing.total_time_ms,
            redirect_count
        );

        Ok(ResponseData {
            status_code: response.status,
            headers: response.headers,
            body: response.body,
            final_url: response.final_url,
            timing,
            redirect_count,
            redirect_chain: response.history,
            timestamp: Local::now(),
        })
    }
}

fn failure(
    config: &RequestConfig,
    err: TransportError,
    timing: Option<&TimingInfo>,
) -> AnalyzerError {
    let elapsed_ms = timing.map_or(0.0, |t| t.total_time_ms);
    match err {
        TransportError::Timeout(cause) => {
            warn!(
                "{} {} timed out after {:.2}ms: {}",
                config.method(),
                config.url(),
                elapsed_ms,
                cause
            );
            AnalyzerError::Timeout {
                timeout_secs: config.timeout_secs(),
                cause,
            }
        }
        TransportError::Failed(cause) => {
            warn!("{} {} failed: {}", config.method(), config.url(), cause);
            AnalyzerError::RequestFailed { cause }
        }
    }
}
