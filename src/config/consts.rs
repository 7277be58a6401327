// src/config/consts.rs

// Net config
pub const ORIGIN: &str = "https://ibbi.gov.in";
pub const TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36";

/// Request headers the source expects from a real browser.
/// `Accept-Encoding` is left to the client so it can decode what it advertises.
pub const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8"),
    ("Accept-Language", "en-US,en;q=0.9"),
    ("Upgrade-Insecure-Requests", "1"),
    ("Sec-Fetch-Dest", "document"),
    ("Sec-Fetch-Mode", "navigate"),
    ("Sec-Fetch-Site", "none"),
    ("Sec-Fetch-User", "?1"),
    ("Cache-Control", "max-age=0"),
];

// Source pages (paths under ORIGIN)
pub const ASSIGNMENTS_PATH: &str = "/resolution-plans";
pub const ANNOUNCEMENTS_PATH: &str = "/en/whats-new";
pub const PUBLIC_ANNOUNCEMENTS_PATH: &str = "/en/public-announcement";

// Local store
pub const DEFAULT_DATA_DIR: &str = "data";
pub const ASSIGNMENTS_FILE: &str = "assignments.csv";
pub const ANNOUNCEMENTS_FILE: &str = "announcements.csv";
pub const PUBLIC_ANNOUNCEMENTS_FILE: &str = "public_announcements.csv";
pub const LAST_RUN_FILE: &str = "last_run.json";

// Sentinels
pub const STATUS_DEFAULT: &str = "Active";
pub const UNKNOWN: &str = "Unknown";
pub const CATEGORY_DEFAULT: &str = "Public Announcement";

// Env overrides
pub const ENV_ORIGIN: &str = "IBBI_ORIGIN";
pub const ENV_DATA_DIR: &str = "IBBI_DATA_DIR";
pub const ENV_TIMEOUT_SECS: &str = "IBBI_TIMEOUT_SECS";
pub const ENV_SHEET_URL: &str = "IBBI_SHEET_URL";
