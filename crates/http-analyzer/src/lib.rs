//! Single-shot HTTP request analysis.
//!
//! This library turns loosely specified command-line inputs into a validated
//! [`RequestConfig`], issues exactly one request for it, and reports the
//! status, final URL, redirect count and wall-clock time as [`ResponseData`].
//! It can be used as a standalone library or through the `http-analyzer`
//! CLI binary.
//!
//! # Example
//!
//! ```no_run
//! use http_analyzer::{Executor, RequestBuilder};
//!
//! # async fn run() -> http_analyzer::Result<()> {
//! let config = RequestBuilder::new("example.com")?
//!     .method("get")
//!     .header("Accept", "application/json")
//!     .timeout(10)
//!     .build();
//!
//! let response = Executor::new().execute(&config).await?;
//! println!("{} in {:.2}ms", response.status_code, response.timing.total_time_ms);
//! # Ok(())
//! # }
//! ```

mod builder;
mod error;
mod executor;
mod model;
pub mod render;
pub mod transport;

// Re-export public types
pub use builder::{parse_header_spec, RequestBuilder, DEFAULT_METHOD, DEFAULT_TIMEOUT_SECS};
pub use error::{AnalyzerError, ErrorKind, Result};
pub use executor::Executor;
pub use model::{
    AnalysisResult, Category, Finding, Headers, RequestConfig, ResponseData, Severity, TimingInfo,
};
pub use transport::{
    ReqwestSession, ReqwestTransport, Session, Transport, TransportError, TransportResponse,
};
