//! Terminal presentation of request results.

use crate::error::AnalyzerError;
use crate::model::{AnalysisResult, ResponseData};
use std::borrow::Cow;
use std::io::{self, Write};

/// Bytes of body shown in verbose mode.
pub const PREVIEW_LIMIT: usize = 500;
/// Appended to a truncated body preview.
pub const ELLIPSIS: &str = "...";

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Print response headers and a body preview.
    pub verbose: bool,
    /// Emit ANSI escape codes.
    pub color: bool,
}

struct Style {
    green: &'static str,
    red: &'static str,
    yellow: &'static str,
    cyan: &'static str,
    bold: &'static str,
    dim: &'static str,
    reset: &'static str,
}

impl Style {
    fn new(color: bool) -> Self {
        if color {
            Self {
                green: GREEN,
                red: RED,
                yellow: YELLOW,
                cyan: CYAN,
                bold: BOLD,
                dim: DIM,
                reset: RESET,
            }
        } else {
            Self {
                green: "",
                red: "",
                yellow: "",
                cyan: "",
                bold: "",
                dim: "",
                reset: "",
            }
        }
    }

    fn status(&self, code: u16) -> &'static str {
        match code {
            200..=299 => self.green,
            300..=399 => self.cyan,
            400..=499 => self.yellow,
            _ => self.red,
        }
    }
}

/// First `limit` bytes of `body`, with [`ELLIPSIS`] appended when the body
/// is longer.
///
/// The cut is moved back to the nearest UTF-8 character boundary.
pub fn body_preview(body: &str, limit: usize) -> Cow<'_, str> {
    if body.len() <= limit {
        return Cow::Borrowed(body);
    }
    let mut end = limit;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}{ELLIPSIS}", &body[..end]))
}

/// Line printed before the request is sent.
pub fn render_banner<W: Write>(out: &mut W, url: &str, options: RenderOptions) -> io::Result<()> {
    let s = Style::new(options.color);
    writeln!(out, "{}{}Analyzing:{} {url}", s.bold, s.green, s.reset)
}

/// Print status, final URL, redirect count and time; in verbose mode also
/// the response headers and a body preview.
pub fn render_response<W: Write>(
    out: &mut W,
    response: &ResponseData,
    options: RenderOptions,
) -> io::Result<()> {
    let s = Style::new(options.color);

    writeln!(out)?;
    writeln!(
        out,
        "{}Status:{} {}{}{}",
        s.bold,
        s.reset,
        s.status(response.status_code),
        response.status_code,
        s.reset
    )?;
    writeln!(out, "{}Final URL:{} {}", s.bold, s.reset, response.final_url)?;

    if response.redirect_count > 0 {
        writeln!(
            out,
            "{}Redirects:{} {}",
            s.bold, s.reset, response.redirect_count
        )?;
    }

    writeln!(
        out,
        "{}Time:{} {:.2}ms",
        s.bold, s.reset, response.timing.total_time_ms
    )?;

    if !options.verbose {
        return Ok(());
    }

    if !response.redirect_chain.is_empty() {
        writeln!(out, "\n{}Redirect Chain:{}", s.bold, s.reset)?;
        for (hop, url) in response.redirect_chain.iter().enumerate() {
            writeln!(out, "  {}{}.{} {url}", s.dim, hop + 1, s.reset)?;
        }
    }

    writeln!(out, "\n{}Response Headers:{}", s.bold, s.reset)?;
    let width = response
        .headers
        .keys()
        .map(|k| k.len())
        .chain(std::iter::once("Header".len()))
        .max()
        .unwrap_or(0);
    writeln!(
        out,
        "  {}{}{:<width$}  Value{}",
        s.bold, s.cyan, "Header", s.reset
    )?;
    for (name, value) in &response.headers {
        writeln!(out, "  {name:<width$}  {value}")?;
    }

    writeln!(
        out,
        "\n{}Body Length:{} {} bytes",
        s.bold,
        s.reset,
        response.body.len()
    )?;
    writeln!(
        out,
        "\n{}{}{}",
        s.dim,
        body_preview(&response.body, PREVIEW_LIMIT),
        s.reset
    )?;

    Ok(())
}

/// Print a user-facing message for a failed request.
pub fn render_error<W: Write>(
    out: &mut W,
    err: &AnalyzerError,
    options: RenderOptions,
) -> io::Result<()> {
    let s = Style::new(options.color);
    match err {
        AnalyzerError::InvalidUrl { .. } => {
            writeln!(out, "{}{}Error:{} {err}", s.bold, s.red, s.reset)
        }
        AnalyzerError::Timeout { .. } => {
            writeln!(out, "{}{}Request failed:{} {err}", s.bold, s.red, s.reset)
        }
        AnalyzerError::RequestFailed { cause } => {
            writeln!(out, "{}{}Request failed:{} {cause}", s.bold, s.red, s.reset)
        }
    }
}

/// Write the analysis envelope as pretty-printed JSON.
pub fn render_json<W: Write>(out: &mut W, result: &AnalysisResult) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, result)?;
    writeln!(out)
}

/// Write a failure as a JSON object with `error` and `kind` fields.
pub fn render_error_json<W: Write>(out: &mut W, err: &AnalyzerError) -> io::Result<()> {
    let value = serde_json::json!({
        "error": err.to_string(),
        "kind": err.kind(),
    });
    serde_json::to_writer_pretty(&mut *out, &value)?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::RequestBuilder;
    use crate::model::{Headers, TimingInfo};
    use chrono::Local;

    fn response(body: &str) -> ResponseData {
        let mut headers = Headers::new();
        headers.insert("content-type".to_string(), "text/plain".to_string());
        headers.insert("x-cache".to_string(), "MISS".to_string());
        ResponseData {
            status_code: 200,
            headers,
            body: body.to_string(),
            final_url: "https://example.com/".to_string(),
            timing: TimingInfo {
                total_time_ms: 123.456,
                ..TimingInfo::default()
            },
            redirect_count: 0,
            redirect_chain: Vec::new(),
            timestamp: Local::now(),
        }
    }

    fn render(response: &ResponseData, verbose: bool) -> String {
        let mut out = Vec::new();
        render_response(
            &mut out,
            response,
            RenderOptions {
                verbose,
                color: false,
            },
        )
        .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_body_preview_short_body_is_untouched() {
        assert_eq!(body_preview("hello", 500), "hello");
        let exact = "x".repeat(500);
        assert_eq!(body_preview(&exact, 500), exact);
    }

    #[test]
    fn test_body_preview_truncates_long_body() {
        let body = "a".repeat(600);
        let preview = body_preview(&body, PREVIEW_LIMIT);
        assert_eq!(preview.len(), 503);
        assert_eq!(preview, format!("{}...", "a".repeat(500)));
    }

    #[test]
    fn test_body_preview_respects_char_boundaries() {
        // 'é' is two bytes; byte 3 falls inside the second one
        let preview = body_preview("éééé", 3);
        assert_eq!(preview, "é...");
    }

    #[test]
    fn test_summary_lines() {
        let output = render(&response("ok"), false);
        assert!(output.contains("Status: 200"));
        assert!(output.contains("Final URL: https://example.com/"));
        assert!(output.contains("Time: 123.46ms"));
        assert!(!output.contains("Redirects:"));
        assert!(!output.contains("Response Headers"));
        assert!(!output.contains("\x1b["));
    }

    #[test]
    fn test_redirects_shown_when_followed() {
        let mut data = response("ok");
        data.redirect_count = 2;
        data.redirect_chain = vec![
            "http://example.com/".to_string(),
            "https://example.com/old".to_string(),
        ];
        let output = render(&data, false);
        assert!(output.contains("Redirects: 2"));

        let verbose = render(&data, true);
        assert!(verbose.contains("1. http://example.com/"));
        assert!(verbose.contains("2. https://example.com/old"));
    }

    #[test]
    fn test_verbose_preview_of_long_body() {
        let output = render(&response(&"a".repeat(600)), true);
        assert!(output.contains("Body Length: 600 bytes"));
        assert!(output.contains(&format!("{}...", "a".repeat(500))));
        assert!(!output.contains(&"a".repeat(501)));
        assert!(output.contains("content-type  text/plain"));
        assert!(output.contains("x-cache       MISS"));
    }

    #[test]
    fn test_color_codes_when_enabled() {
        let mut out = Vec::new();
        render_response(
            &mut out,
            &response("ok"),
            RenderOptions {
                verbose: false,
                color: true,
            },
        )
        .unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains(&format!("{GREEN}200{RESET}")));
    }

    #[test]
    fn test_error_messages() {
        let render = |err: AnalyzerError| {
            let mut out = Vec::new();
            render_error(&mut out, &err, RenderOptions::default()).unwrap();
            String::from_utf8(out).unwrap()
        };

        assert_eq!(
            render(AnalyzerError::InvalidUrl {
                input: "https://".to_string()
            }),
            "Error: Invalid URL: https://\n"
        );
        assert_eq!(
            render(AnalyzerError::Timeout {
                timeout_secs: 2,
                cause: "operation timed out".to_string()
            }),
            "Request failed: Request timeout after 2s: operation timed out\n"
        );
        assert_eq!(
            render(AnalyzerError::RequestFailed {
                cause: "connection refused".to_string()
            }),
            "Request failed: connection refused\n"
        );
    }

    #[test]
    fn test_json_envelope() {
        let request = RequestBuilder::new("example.com")
            .unwrap()
            .header("Accept", "*/*")
            .build();
        let result = AnalysisResult::new(request, response("ok"));

        let mut out = Vec::new();
        render_json(&mut out, &result).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["request"]["url"], "https://example.com");
        assert_eq!(value["request"]["method"], "GET");
        assert_eq!(value["request"]["timeout"], 30);
        assert_eq!(value["request"]["followRedirects"], true);
        assert_eq!(value["response"]["statusCode"], 200);
        assert_eq!(value["response"]["redirectCount"], 0);
        assert_eq!(value["response"]["timing"]["totalTimeMs"], 123.456);
        assert_eq!(value["findings"], serde_json::json!([]));
    }

    #[test]
    fn test_error_json() {
        let mut out = Vec::new();
        render_error_json(
            &mut out,
            &AnalyzerError::InvalidUrl {
                input: String::new(),
            },
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["kind"], "invalid_url");
        assert_eq!(value["error"], "Invalid URL: ");
    }
}
