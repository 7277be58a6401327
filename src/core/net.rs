// src/core/net.rs
//
// One GET per call, no retries. The client is built once per `Scraper` from
// `ScrapeOptions` and shared by the extractor threads.

use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::config::ScrapeOptions;
use crate::error::FetchError;

/// Anything that can turn a URL into document text.
/// `Sync` because the three extractors share one fetcher across threads.
pub trait Fetch: Sync {
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        (**self).fetch(url)
    }
}

/// Browser-looking HTTPS client.
///
/// Certificate validation is relaxed when `accept_invalid_certs` is set: the
/// upstream site presents a chain that strict validation rejects.
pub struct HttpFetcher {
    client: Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(opts: &ScrapeOptions) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        for (k, v) in &opts.headers {
            match (HeaderName::from_bytes(k.as_bytes()), HeaderValue::from_str(v)) {
                (Ok(name), Ok(value)) => { headers.insert(name, value); }
                _ => logw!("Skipping invalid header {k:?}"),
            }
        }

        let client = Client::builder()
            .user_agent(opts.user_agent.as_str())
            .default_headers(headers)
            .timeout(opts.timeout)
            .danger_accept_invalid_certs(opts.accept_invalid_certs)
            .build()
            .map_err(|e| FetchError::Network { url: opts.origin.clone(), reason: e.to_string() })?;

        Ok(Self { client, timeout_secs: opts.timeout.as_secs() })
    }

    fn classify(&self, url: &str, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout { url: s!(url), secs: self.timeout_secs }
        } else if let Some(status) = e.status() {
            FetchError::HttpStatus { url: s!(url), status: status.as_u16() }
        } else {
            FetchError::Network { url: s!(url), reason: e.to_string() }
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        logd!("GET {url}");
        let resp = self.client.get(url).send().map_err(|e| self.classify(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus { url: s!(url), status: status.as_u16() });
        }

        let body = resp.text().map_err(|e| self.classify(url, e))?;
        logd!("GET {url}: {} {} bytes", status.as_u16(), body.len());
        Ok(body)
    }
}
