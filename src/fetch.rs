use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;

use crate::error::{Error, Result};

/// Request timeout. Deliberately not caller-configurable.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// A single synchronous GET returning the response body as JSON.
///
/// [`HttpFetcher`] is the production implementation; a canned stub or a
/// recorder can be injected instead through
/// [`Client::with_fetcher`](crate::Client::with_fetcher).
pub trait Fetcher {
    /// Fetches `path` (relative to the fetcher's endpoint) with the given
    /// query pairs.
    fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<Value>;
}

impl<F: Fetcher + ?Sized> Fetcher for &F {
    fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        (**self).fetch(path, query)
    }
}

/// Blocking [`Fetcher`] over reqwest, bound to one base URL.
///
/// One request per call: no retries, no backoff, no caching. Failures map
/// onto the taxonomy in [`Error`]: connection problems and non-2xx statuses
/// are transport failures, a non-JSON body is a malformed response.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    base_url: String,
    http: HttpClient,
}

impl HttpFetcher {
    /// Builds a fetcher for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("powderlines-rs/{}", env!("CARGO_PKG_VERSION")))
                .unwrap_or(HeaderValue::from_static("powderlines-rs")),
        );

        let http = HttpClient::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = join_url(&self.base_url, path);
        debug!("GET {url}");

        let mut request = self.http.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }
        let response = request.send()?;

        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            warn!("GET {url} returned HTTP {status}: {}", truncated(&body));
            return Err(Error::Transport {
                status: Some(status.as_u16()),
                source: None,
            });
        }
        debug!("GET {url} -> {status}");

        serde_json::from_str(&body).map_err(|err| {
            Error::MalformedResponse(format!("response from {url} is not JSON: {err}"))
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// Server error bodies can be arbitrarily large HTML; log a prefix only.
fn truncated(body: &str) -> &str {
    match body.char_indices().nth(200) {
        Some((at, _)) => &body[..at],
        None => body,
    }
}
