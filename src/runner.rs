// src/runner.rs
//
// Full runs: scrape all sources, overwrite the three artifacts, stamp the
// last-run marker. At most one run per UTC calendar day unless the marker is
// cleared first, which is what a manual run does.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    config::StoreOptions,
    core::net::Fetch,
    error::PersistenceError,
    model::RecordKind,
    progress::{NullProgress, Progress},
    scrape::{ScrapeBundle, Scraper},
    store,
};

/// Contents of `last_run.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRun {
    pub timestamp: DateTime<Utc>,
    pub date: NaiveDate,
    #[serde(default)]
    pub run_count: u64,
}

/// Summary of an executed run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub assignments: usize,
    pub announcements: usize,
    pub public_announcements: usize,
    pub files_written: Vec<PathBuf>,
    pub timestamp: String,
    pub run_count: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RunOutcome {
    /// A run already happened on this calendar date.
    Skipped { last_run: LastRun },
    Completed(RunReport),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub last_run: Option<LastRun>,
    pub total_runs: u64,
    pub assignments: usize,
    pub announcements: usize,
    pub public_announcements: usize,
}

pub struct Updater<F: Fetch> {
    scraper: Scraper<F>,
    store: StoreOptions,
}

impl<F: Fetch> Updater<F> {
    pub fn new(scraper: Scraper<F>, store: StoreOptions) -> Self {
        Self { scraper, store }
    }

    pub fn scraper(&self) -> &Scraper<F> { &self.scraper }
    pub fn store(&self) -> &StoreOptions { &self.store }

    /// Marker contents. Missing or unreadable markers read as "never ran".
    pub fn last_run(&self) -> Option<LastRun> {
        let path = self.store.last_run_path();
        let text = match store::read_file(&path) {
            Ok(Some(t)) => t,
            Ok(None) => return None,
            Err(e) => {
                logw!("{e}");
                return None;
            }
        };
        match serde_json::from_str(&text) {
            Ok(last) => Some(last),
            Err(e) => {
                logw!("Ignoring unreadable marker {}: {e}", path.display());
                None
            }
        }
    }

    /// The marker that blocks a run at `now`, if any.
    pub fn blocking_run(&self, now: DateTime<Utc>) -> Option<LastRun> {
        self.last_run().filter(|last| last.timestamp.date_naive() == now.date_naive())
    }

    pub fn clear_marker(&self) -> Result<(), PersistenceError> {
        let path = self.store.last_run_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Write { path, source }),
        }
    }

    fn stamp(&self, now: DateTime<Utc>, run_count: u64) -> Result<LastRun, PersistenceError> {
        let last = LastRun { timestamp: now, date: now.date_naive(), run_count };
        let path = self.store.last_run_path();
        let json = serde_json::to_string_pretty(&last)
            .map_err(|source| PersistenceError::Json { path: path.clone(), source })?;
        store::write_file(&path, &json)?;
        Ok(last)
    }

    /// Daily entry point: skipped when a run already happened on `now`'s date.
    pub fn run_daily(
        &self,
        now: DateTime<Utc>,
        progress: Option<&mut dyn Progress>,
    ) -> Result<RunOutcome, PersistenceError> {
        if let Some(last_run) = self.blocking_run(now) {
            logf!("Skipping update: already ran on {}", last_run.date);
            return Ok(RunOutcome::Skipped { last_run });
        }
        let run_count = self.last_run().map(|l| l.run_count).unwrap_or(0) + 1;
        self.execute(now, run_count, progress).map(RunOutcome::Completed)
    }

    /// Forced run: clears the marker, then runs unconditionally. The run
    /// count carries over.
    pub fn run_manual(
        &self,
        now: DateTime<Utc>,
        progress: Option<&mut dyn Progress>,
    ) -> Result<RunOutcome, PersistenceError> {
        logf!("Manual update: clearing last-run marker");
        let run_count = self.last_run().map(|l| l.run_count).unwrap_or(0) + 1;
        self.clear_marker()?;
        self.execute(now, run_count, progress).map(RunOutcome::Completed)
    }

    fn execute(
        &self,
        now: DateTime<Utc>,
        run_count: u64,
        progress: Option<&mut dyn Progress>,
    ) -> Result<RunReport, PersistenceError> {
        let mut silent = NullProgress;
        let progress: &mut dyn Progress = match progress {
            Some(p) => p,
            None => &mut silent,
        };
        progress.begin(RecordKind::ALL.len());
        progress.log("Scraping sources…");

        let bundle = self.scraper.get_all_data_at(now);
        let result = self.persist(&bundle, &mut *progress);
        progress.finish();

        let files_written = result?;
        let last = self.stamp(now, run_count)?;
        Ok(RunReport {
            assignments: bundle.assignments.len(),
            announcements: bundle.announcements.len(),
            public_announcements: bundle.public_announcements.len(),
            files_written,
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            run_count: last.run_count,
        })
    }

    /// Write each artifact in turn; the first failure stops the run and
    /// leaves earlier artifacts already replaced.
    fn persist(
        &self,
        bundle: &ScrapeBundle,
        progress: &mut dyn Progress,
    ) -> Result<Vec<PathBuf>, PersistenceError> {
        let mut written = Vec::with_capacity(3);
        for kind in RecordKind::ALL {
            let path = match kind {
                RecordKind::Assignments => store::save(&self.store, &bundle.assignments),
                RecordKind::Announcements => store::save(&self.store, &bundle.announcements),
                RecordKind::PublicAnnouncements => store::save(&self.store, &bundle.public_announcements),
            }
            .inspect_err(|e| loge!("{kind}: {e}"))?;
            progress.item_done(kind, bundle.count(kind), &path);
            written.push(path);
        }
        Ok(written)
    }

    pub fn statistics(&self) -> Result<Statistics, PersistenceError> {
        let last_run = self.last_run();
        let total_runs = last_run.as_ref().map(|l| l.run_count).unwrap_or(0);
        Ok(Statistics {
            last_run,
            total_runs,
            assignments: store::count_rows(&self.store, RecordKind::Assignments)?,
            announcements: store::count_rows(&self.store, RecordKind::Announcements)?,
            public_announcements: store::count_rows(&self.store, RecordKind::PublicAnnouncements)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::config::ScrapeOptions;
    use crate::error::FetchError;

    struct Offline;

    impl Fetch for Offline {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            Err(FetchError::Network { url: s!(url), reason: s!("offline") })
        }
    }

    fn updater(dir: &std::path::Path) -> Updater<Offline> {
        Updater::new(Scraper::new(Offline, ScrapeOptions::default()), StoreOptions::new(dir))
    }

    fn at(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 5, h, 0, 0).unwrap()
    }

    #[test]
    fn second_run_same_day_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let up = updater(dir.path());

        let first = up.run_daily(at(6), None).unwrap();
        let RunOutcome::Completed(report) = first else { panic!("first run skipped") };
        assert_eq!(report.run_count, 1);
        assert_eq!(report.files_written.len(), 3);

        let second = up.run_daily(at(18), None).unwrap();
        assert!(matches!(second, RunOutcome::Skipped { ref last_run } if last_run.timestamp == at(6)));
    }

    #[test]
    fn manual_run_ignores_the_guard_and_keeps_counting() {
        let dir = tempfile::tempdir().unwrap();
        let up = updater(dir.path());
        up.run_daily(at(6), None).unwrap();

        let RunOutcome::Completed(report) = up.run_manual(at(7), None).unwrap() else {
            panic!("manual run skipped")
        };
        assert_eq!(report.run_count, 2);
        assert_eq!(up.last_run().unwrap().timestamp, at(7));
    }

    #[derive(Default)]
    struct Counting {
        items: usize,
        finished: bool,
    }

    impl Progress for Counting {
        fn item_done(&mut self, _kind: RecordKind, _records: usize, _path: &std::path::Path) {
            self.items += 1;
        }
        fn finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn progress_sees_every_artifact_then_finish() {
        let dir = tempfile::tempdir().unwrap();
        let up = updater(dir.path());
        let mut counting = Counting::default();

        up.run_daily(at(6), Some(&mut counting)).unwrap();
        assert_eq!(counting.items, 3);
        assert!(counting.finished);

        up.run_manual(at(7), Some(&mut NullProgress)).unwrap();
        up.run_manual(at(8), Some(&mut counting)).unwrap();
        assert_eq!(counting.items, 6);
    }

    #[test]
    fn corrupt_marker_reads_as_never_ran() {
        let dir = tempfile::tempdir().unwrap();
        let up = updater(dir.path());
        std::fs::write(up.store().last_run_path(), "{not json").unwrap();
        assert!(up.last_run().is_none());
        assert!(matches!(up.run_daily(at(6), None).unwrap(), RunOutcome::Completed(_)));
    }

    #[test]
    fn statistics_reflect_artifacts_and_marker() {
        let dir = tempfile::tempdir().unwrap();
        let up = updater(dir.path());
        assert_eq!(up.statistics().unwrap(), Statistics::default());

        up.run_daily(at(6), None).unwrap();
        let stats = up.statistics().unwrap();
        assert_eq!(stats.total_runs, 1);
        assert_eq!(stats.last_run.unwrap().date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(stats.assignments, 0);
    }
}
