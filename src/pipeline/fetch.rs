//! URL fetching with an HTTP-client-first, `curl`-second fallback chain.
//!
//! ## Why a curl fallback?
//!
//! Some hosts reject or stall non-browser TLS clients, and some
//! environments route traffic through proxies that only the system `curl`
//! is configured for. When the built-in client fails for any reason we
//! retry once through `curl -sL` before reporting an error.
//!
//! After fetching, HTML bodies are converted to text, then the optional
//! start offset and the character limit are applied. All offsets and limits
//! count characters, not bytes.

use crate::config::{FetchConfig, CURL_USER_AGENT};
use crate::error::SkimError;
use crate::pipeline::html::{html_to_text, looks_like_html};
use crate::pipeline::input::is_url;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Which transport produced the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchMethod {
    Http,
    Curl,
}

/// What we learned about a URL while fetching it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchInfo {
    /// Final URL after redirects (the requested URL for curl).
    pub url: String,
    pub method: FetchMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// `Content-Length` as reported by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_length: Option<u64>,
    /// Characters in the raw body, before HTML conversion.
    pub raw_length: usize,
    /// Characters in the text after HTML conversion.
    pub text_length: usize,
    /// Whether the body was converted from HTML.
    pub converted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<usize>,
    /// Whether `content` was cut at `max_chars`.
    pub truncated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

/// Fetched, converted and limited content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedContent {
    pub info: FetchInfo,
    pub content: String,
}

/// Body and headers before conversion.
struct RawFetch {
    url: String,
    method: FetchMethod,
    status: Option<u16>,
    content_type: Option<String>,
    content_length: Option<u64>,
    body: String,
}

impl RawFetch {
    fn is_html(&self) -> bool {
        match self.content_type {
            Some(ref ct) => ct.to_ascii_lowercase().contains("html"),
            None => looks_like_html(&self.body),
        }
    }
}

/// Fetch `url`, convert HTML to text, and apply the offset and limit.
pub async fn fetch(url: &str, config: &FetchConfig) -> Result<FetchedContent, SkimError> {
    if !is_url(url) {
        return Err(SkimError::InvalidUrl {
            input: url.to_string(),
        });
    }

    let raw = match fetch_http(url, config).await {
        Ok(raw) => raw,
        Err(e) if config.curl_fallback => {
            warn!("HTTP client failed ({}), falling back to curl", e);
            fetch_curl(url, config.curl_timeout_secs).await?
        }
        Err(e) => return Err(e),
    };

    Ok(shape(raw, config.start, config.max_chars))
}

/// Convert and limit a raw fetch.
fn shape(raw: RawFetch, start: usize, max_chars: usize) -> FetchedContent {
    let is_html = raw.is_html();
    let raw_length = raw.body.chars().count();
    let text = if is_html {
        html_to_text(&raw.body)
    } else {
        raw.body
    };
    let text_length = text.chars().count();

    let (content, truncated) = window_chars(&text, start, max_chars);
    debug!(
        "Shaped {} chars (html={}) → {} chars",
        raw_length,
        is_html,
        content.chars().count()
    );

    FetchedContent {
        info: FetchInfo {
            url: raw.url,
            method: raw.method,
            status: raw.status,
            content_type: raw.content_type,
            content_length: raw.content_length,
            raw_length,
            text_length,
            converted: is_html,
            start_offset: (start > 0).then_some(start),
            truncated,
            max_chars: truncated.then_some(max_chars),
        },
        content,
    }
}

/// Characters `[start, start + max_chars)` of `text`, and whether anything
/// past the limit was cut.
fn window_chars(text: &str, start: usize, max_chars: usize) -> (String, bool) {
    let mut rest = text.chars().skip(start);
    let content: String = rest.by_ref().take(max_chars).collect();
    let truncated = rest.next().is_some();
    (content, truncated)
}

fn map_reqwest_error(url: &str, secs: u64, e: reqwest::Error) -> SkimError {
    if e.is_timeout() {
        SkimError::FetchTimeout {
            url: url.to_string(),
            secs,
        }
    } else {
        SkimError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}

/// HEAD for metadata (best effort), then GET for the body.
async fn fetch_http(url: &str, config: &FetchConfig) -> Result<RawFetch, SkimError> {
    info!("Fetching {}", url);

    let client = reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SkimError::FetchFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let head_length = match client
        .head(url)
        .timeout(Duration::from_secs(config.head_timeout_secs))
        .send()
        .await
    {
        Ok(resp) => header_u64(resp.headers().get(CONTENT_LENGTH)),
        Err(e) => {
            debug!("HEAD {} failed: {}", url, e);
            None
        }
    };

    let response = client
        .get(url)
        .timeout(Duration::from_secs(config.get_timeout_secs))
        .send()
        .await
        .map_err(|e| map_reqwest_error(url, config.get_timeout_secs, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(SkimError::FetchFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", status),
        });
    }

    let final_url = response.url().to_string();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let content_length = head_length.or_else(|| header_u64(response.headers().get(CONTENT_LENGTH)));

    let body = response
        .text()
        .await
        .map_err(|e| map_reqwest_error(url, config.get_timeout_secs, e))?;

    Ok(RawFetch {
        url: final_url,
        method: FetchMethod::Http,
        status: Some(status.as_u16()),
        content_type,
        content_length,
        body,
    })
}

fn header_u64(value: Option<&reqwest::header::HeaderValue>) -> Option<u64> {
    value?.to_str().ok()?.trim().parse().ok()
}

/// Fetch through the `curl` CLI.
async fn fetch_curl(url: &str, max_time_secs: u64) -> Result<RawFetch, SkimError> {
    info!("Fetching {} via curl", url);

    let curl_err = |reason: String| SkimError::CurlFailed {
        url: url.to_string(),
        reason,
    };

    let child = tokio::process::Command::new("curl")
        .args(["-sL", "-A", CURL_USER_AGENT, "--max-time"])
        .arg(max_time_secs.to_string())
        .arg(url)
        .kill_on_drop(true)
        .output();

    let grace = Duration::from_secs(max_time_secs + 5);
    let output = match tokio::time::timeout(grace, child).await {
        Err(_) => {
            return Err(SkimError::FetchTimeout {
                url: url.to_string(),
                secs: max_time_secs + 5,
            })
        }
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(curl_err("curl not found".into()))
        }
        Ok(Err(e)) => return Err(curl_err(e.to_string())),
        Ok(Ok(output)) => output,
    };

    curl_output(url, output)
}

/// Map a finished curl process to its body, or to [`SkimError::CurlFailed`]
/// on a non-zero exit.
fn curl_output(url: &str, output: std::process::Output) -> Result<RawFetch, SkimError> {
    if !output.status.success() {
        let code = output
            .status
            .code()
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        return Err(SkimError::CurlFailed {
            url: url.to_string(),
            reason: format!("exited with code {code}"),
        });
    }

    Ok(RawFetch {
        url: url.to_string(),
        method: FetchMethod::Curl,
        status: None,
        content_type: None,
        content_length: None,
        body: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}
