// src/scrape/mod.rs
mod scrape;

pub use scrape::{ScrapeBundle, Scraper};
