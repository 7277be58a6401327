// tests/daily_guard.rs
use std::fs;

use chrono::{DateTime, TimeZone, Utc};

use ibbi_scrape::config::{ScrapeOptions, StoreOptions};
use ibbi_scrape::core::Fetch;
use ibbi_scrape::error::{FetchError, PersistenceError};
use ibbi_scrape::model::RecordKind;
use ibbi_scrape::progress::Progress;
use ibbi_scrape::runner::{LastRun, RunOutcome, Updater};
use ibbi_scrape::scrape::Scraper;
use ibbi_scrape::store;

const ANNOUNCEMENTS: &str = r#"<table><tr><td>05 Jan 2024</td><td><a href="/n/1.pdf">Notice</a></td></tr></table>"#;

/// Only the announcements page answers.
struct OneSource;

impl Fetch for OneSource {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if url.ends_with("/en/whats-new") {
            Ok(ANNOUNCEMENTS.to_string())
        } else {
            Err(FetchError::HttpStatus { url: url.to_string(), status: 503 })
        }
    }
}

#[derive(Default)]
struct Recorder {
    begun: Option<usize>,
    items: Vec<(RecordKind, usize)>,
    finished: bool,
}

impl Progress for Recorder {
    fn begin(&mut self, total: usize) { self.begun = Some(total); }
    fn item_done(&mut self, kind: RecordKind, records: usize, _path: &std::path::Path) {
        self.items.push((kind, records));
    }
    fn finish(&mut self) { self.finished = true; }
}

fn updater(store: StoreOptions) -> Updater<OneSource> {
    Updater::new(Scraper::new(OneSource, ScrapeOptions::default()), store)
}

fn utc(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

#[test]
fn same_date_is_skipped_until_marker_is_cleared() {
    let dir = tempfile::tempdir().unwrap();
    let up = updater(StoreOptions::new(dir.path()));

    let first = up.run_daily(utc("2024-01-05T06:00:00Z"), None).unwrap();
    assert!(matches!(first, RunOutcome::Completed(_)));

    let second = up.run_daily(utc("2024-01-05T18:00:00Z"), None).unwrap();
    let RunOutcome::Skipped { last_run } = second else { panic!("second run on the same date executed") };
    assert_eq!(last_run.timestamp, utc("2024-01-05T06:00:00Z"));

    up.clear_marker().unwrap();
    let third = up.run_daily(utc("2024-01-05T19:00:00Z"), None).unwrap();
    let RunOutcome::Completed(report) = third else { panic!("run after clearing was skipped") };
    assert_eq!(report.timestamp, "2024-01-05T19:00:00.000Z");
}

#[test]
fn next_calendar_date_runs_again() {
    let dir = tempfile::tempdir().unwrap();
    let up = updater(StoreOptions::new(dir.path()));
    up.run_daily(utc("2024-01-05T23:59:00Z"), None).unwrap();
    let next = up.run_daily(utc("2024-01-06T00:01:00Z"), None).unwrap();
    let RunOutcome::Completed(report) = next else { panic!("next-day run skipped") };
    assert_eq!(report.run_count, 2);
}

#[test]
fn completed_run_writes_artifacts_then_marker() {
    let dir = tempfile::tempdir().unwrap();
    let store_opts = StoreOptions::new(dir.path().join("data"));
    let up = updater(store_opts.clone());
    let mut rec = Recorder::default();

    let outcome = up.run_daily(utc("2024-01-05T06:00:00Z"), Some(&mut rec)).unwrap();
    let RunOutcome::Completed(report) = outcome else { panic!("skipped") };
    assert_eq!((report.assignments, report.announcements, report.public_announcements), (0, 1, 0));
    assert_eq!(report.files_written.len(), 3);
    assert!(report.files_written.iter().all(|p| p.exists()));

    assert_eq!(rec.begun, Some(3));
    assert!(rec.finished);
    assert_eq!(
        rec.items,
        vec![(RecordKind::Assignments, 0), (RecordKind::Announcements, 1), (RecordKind::PublicAnnouncements, 0)]
    );

    let marker: LastRun = serde_json::from_str(&fs::read_to_string(store_opts.last_run_path()).unwrap()).unwrap();
    assert_eq!(marker.date, Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap().date_naive());
    assert_eq!(marker.run_count, 1);

    let stats = up.statistics().unwrap();
    assert_eq!(stats.announcements, 1);
    assert_eq!(stats.total_runs, 1);
    assert_eq!(store::count_rows(&store_opts, RecordKind::Assignments).unwrap(), 0);
}

#[test]
fn unwritable_data_dir_fails_the_run_and_leaves_no_marker() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("data");
    fs::write(&blocker, "a file, not a directory").unwrap();
    let store_opts = StoreOptions::new(&blocker);
    let up = updater(store_opts.clone());

    let err = up.run_daily(utc("2024-01-05T06:00:00Z"), None).unwrap_err();
    assert!(matches!(err, PersistenceError::Write { .. }));
    assert!(up.last_run().is_none());
}
