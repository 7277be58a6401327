// src/scrape/scrape.rs
use std::thread;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::{
    config::ScrapeOptions,
    core::net::{Fetch, HttpFetcher},
    error::FetchError,
    model::{Announcement, Assignment, PublicAnnouncement, RawRow, RecordKind},
    normalize::{Batch, Normalizer},
    specs::{self, PageSpec},
};

/// Result of one full scrape. Any list may be empty; the bundle itself always exists.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ScrapeBundle {
    pub assignments: Vec<Assignment>,
    pub announcements: Vec<Announcement>,
    pub public_announcements: Vec<PublicAnnouncement>,
    pub last_scraped: String,
}

impl ScrapeBundle {
    pub fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Assignments => self.assignments.len(),
            RecordKind::Announcements => self.announcements.len(),
            RecordKind::PublicAnnouncements => self.public_announcements.len(),
        }
    }
}

/// The one service object for a scrape: fetcher plus options, passed by reference
/// to every extractor.
pub struct Scraper<F: Fetch> {
    fetcher: F,
    opts: ScrapeOptions,
}

impl Scraper<HttpFetcher> {
    pub fn from_options(opts: ScrapeOptions) -> Result<Self, FetchError> {
        let fetcher = HttpFetcher::new(&opts)?;
        Ok(Self { fetcher, opts })
    }
}

impl<F: Fetch> Scraper<F> {
    pub fn new(fetcher: F, opts: ScrapeOptions) -> Self {
        Self { fetcher, opts }
    }

    pub fn options(&self) -> &ScrapeOptions { &self.opts }

    fn fetch_rows(&self, spec: &PageSpec) -> Result<Vec<(usize, RawRow)>, FetchError> {
        let url = self.opts.page_url(spec.path);
        let doc = self.fetcher.fetch(&url)?;
        logd!("{}: fetched {} bytes from {url}", spec.kind, doc.len());
        Ok(specs::extract_rows(&doc, spec))
    }

    fn normalizer(&self, kind: RecordKind, at: DateTime<Utc>) -> Normalizer<'_> {
        Normalizer::new(&self.opts.origin, Batch::new(kind, at))
    }

    pub fn try_assignments(&self, at: DateTime<Utc>) -> Result<Vec<Assignment>, FetchError> {
        let rows = self.fetch_rows(PageSpec::for_kind(RecordKind::Assignments))?;
        Ok(self.normalizer(RecordKind::Assignments, at).assignments(&rows))
    }

    pub fn try_announcements(&self, at: DateTime<Utc>) -> Result<Vec<Announcement>, FetchError> {
        let rows = self.fetch_rows(PageSpec::for_kind(RecordKind::Announcements))?;
        Ok(self.normalizer(RecordKind::Announcements, at).announcements(&rows))
    }

    pub fn try_public_announcements(&self, at: DateTime<Utc>) -> Result<Vec<PublicAnnouncement>, FetchError> {
        let rows = self.fetch_rows(PageSpec::for_kind(RecordKind::PublicAnnouncements))?;
        Ok(self.normalizer(RecordKind::PublicAnnouncements, at).public_announcements(&rows))
    }

    /// Assignments batch; a failed fetch is logged and yields an empty batch.
    pub fn assignments(&self, at: DateTime<Utc>) -> Vec<Assignment> {
        isolate(RecordKind::Assignments, self.try_assignments(at))
    }

    pub fn announcements(&self, at: DateTime<Utc>) -> Vec<Announcement> {
        isolate(RecordKind::Announcements, self.try_announcements(at))
    }

    pub fn public_announcements(&self, at: DateTime<Utc>) -> Vec<PublicAnnouncement> {
        isolate(RecordKind::PublicAnnouncements, self.try_public_announcements(at))
    }

    pub fn get_all_data(&self) -> ScrapeBundle {
        self.get_all_data_at(Utc::now())
    }

    /// Run the three extractors side by side and join their batches.
    /// A source that errors or panics contributes an empty list; the others are unaffected.
    pub fn get_all_data_at(&self, at: DateTime<Utc>) -> ScrapeBundle {
        logf!("Starting scrape of {}", self.opts.origin);

        let (assignments, announcements, public_announcements) = thread::scope(|s| {
            let asg = s.spawn(|| self.assignments(at));
            let ann = s.spawn(|| self.announcements(at));
            let pub_ann = s.spawn(|| self.public_announcements(at));
            (
                joined(RecordKind::Assignments, asg.join()),
                joined(RecordKind::Announcements, ann.join()),
                joined(RecordKind::PublicAnnouncements, pub_ann.join()),
            )
        });

        let bundle = ScrapeBundle {
            assignments,
            announcements,
            public_announcements,
            last_scraped: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        logf!(
            "Scrape done: {} assignments, {} announcements, {} public announcements",
            bundle.assignments.len(),
            bundle.announcements.len(),
            bundle.public_announcements.len()
        );
        bundle
    }
}

fn isolate<T>(kind: RecordKind, res: Result<Vec<T>, FetchError>) -> Vec<T> {
    match res {
        Ok(v) => {
            logd!("{kind}: {} records", v.len());
            v
        }
        Err(e) => {
            loge!("{kind}: {e}");
            Vec::new()
        }
    }
}

fn joined<T>(kind: RecordKind, res: thread::Result<Vec<T>>) -> Vec<T> {
    res.unwrap_or_else(|_| {
        loge!("{kind}: extractor panicked");
        Vec::new()
    })
}
