// src/config/options.rs
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::consts::*;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppOptions {
    pub scrape: ScrapeOptions,
    pub store: StoreOptions,
    /// Published spreadsheet (CSV export) to ingest with `sheet`.
    pub sheet_url: Option<String>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            scrape: ScrapeOptions::default(),
            store: StoreOptions::default(),
            sheet_url: None,
        }
    }
}

impl AppOptions {
    /// Defaults with `IBBI_*` environment overrides applied.
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        let mut opts = Self::default();

        if let Ok(origin) = env::var(ENV_ORIGIN) {
            if !origin.trim().is_empty() {
                opts.scrape.origin = origin.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(dir) = env::var(ENV_DATA_DIR) {
            if !dir.trim().is_empty() {
                opts.store.data_dir = PathBuf::from(dir.trim());
            }
        }
        if let Ok(secs) = env::var(ENV_TIMEOUT_SECS) {
            match secs.trim().parse::<u64>() {
                Ok(n) if n > 0 => opts.scrape.timeout = Duration::from_secs(n),
                _ => logw!("Ignoring {ENV_TIMEOUT_SECS}={secs:?}: expected a positive integer"),
            }
        }
        if let Ok(url) = env::var(ENV_SHEET_URL) {
            if !url.trim().is_empty() {
                opts.sheet_url = Some(url.trim().to_string());
            }
        }
        opts
    }
}

/// Everything the fetcher and extractors need, held by one `Scraper`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScrapeOptions {
    /// Scheme + host, no trailing slash.
    pub origin: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub headers: Vec<(String, String)>,
    /// The source serves a chain that fails strict validation.
    pub accept_invalid_certs: bool,
}

impl Default for ScrapeOptions {
    fn default() -> Self {
        Self {
            origin: s!(ORIGIN),
            timeout: Duration::from_secs(TIMEOUT_SECS),
            user_agent: s!(USER_AGENT),
            headers: BROWSER_HEADERS
                .iter()
                .map(|(k, v)| (s!(*k), s!(*v)))
                .collect(),
            accept_invalid_certs: true,
        }
    }
}

impl ScrapeOptions {
    /// Absolute URL for a source page path.
    pub fn page_url(&self, path: &str) -> String {
        crate::core::links::absolutize(path, &self.origin)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreOptions {
    pub data_dir: PathBuf,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { data_dir: PathBuf::from(DEFAULT_DATA_DIR) }
    }
}

impl StoreOptions {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self { data_dir: data_dir.as_ref().to_path_buf() }
    }

    pub fn last_run_path(&self) -> PathBuf {
        self.data_dir.join(LAST_RUN_FILE)
    }
}
