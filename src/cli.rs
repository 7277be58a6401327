// src/cli.rs
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Result, WrapErr};

use crate::config::AppOptions;
use crate::core::HttpFetcher;
use crate::model::RecordKind;
use crate::progress::Progress;
use crate::runner::{RunOutcome, Updater};
use crate::schema::SchemaMapper;
use crate::scrape::Scraper;
use crate::sheet;
use crate::store;

#[derive(Debug, Parser)]
#[command(name = "ibbi_scrape", version, about = "Scrape IBBI assignments and announcements into CSV files")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Directory holding the CSV artifacts and the last-run marker
    #[arg(long, global = true, env = "IBBI_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Scrape all sources and rewrite the artifacts (once per day unless forced)
    Scrape {
        /// Clear the last-run marker and run regardless of date
        #[arg(long)]
        force: bool,
        /// Print the run outcome as JSON
        #[arg(long)]
        json: bool,
    },
    /// Last run and record counts
    Stats,
    /// Create the data dir and header-only artifacts
    Init,
    /// Print a persisted batch as JSON
    Show {
        #[arg(value_enum)]
        kind: KindArg,
    },
    /// Map an external spreadsheet onto assignments and print them as JSON
    Sheet {
        /// Published CSV export URL (falls back to IBBI_SHEET_URL)
        url: Option<String>,
        /// Read a JSON array of row objects instead of fetching
        #[arg(long, conflicts_with = "url")]
        json_file: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum KindArg {
    Assignments,
    Announcements,
    PublicAnnouncements,
}

impl From<KindArg> for RecordKind {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Assignments => RecordKind::Assignments,
            KindArg::Announcements => RecordKind::Announcements,
            KindArg::PublicAnnouncements => RecordKind::PublicAnnouncements,
        }
    }
}

/// Progress lines on stdout.
struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }

    fn item_done(&mut self, kind: RecordKind, records: usize, path: &Path) {
        self.done += 1;
        println!("[{}/{}] {records} {kind} -> {}", self.done, self.total, path.display());
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init(&cli.global.log_level, cli.global.log_file.as_deref())
        .wrap_err("cannot open log file")?;

    let mut opts = AppOptions::from_env();
    if let Some(dir) = cli.global.data_dir {
        opts.store.data_dir = dir;
    }
    execute(cli.command, opts)
}

fn execute(command: Command, opts: AppOptions) -> Result<()> {
    match command {
        Command::Scrape { force, json } => {
            let scraper = Scraper::from_options(opts.scrape)?;
            let updater = Updater::new(scraper, opts.store);
            let mut progress = ConsoleProgress { total: 0, done: 0 };
            let progress: Option<&mut dyn Progress> = if json { None } else { Some(&mut progress) };
            let now = Utc::now();
            let outcome = if force {
                updater.run_manual(now, progress)?
            } else {
                updater.run_daily(now, progress)?
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }
            match outcome {
                RunOutcome::Skipped { last_run } => {
                    println!("Already updated today ({}); use --force to run again.", last_run.timestamp);
                }
                RunOutcome::Completed(report) => {
                    println!(
                        "Run #{} done: {} assignments, {} announcements, {} public announcements",
                        report.run_count, report.assignments, report.announcements, report.public_announcements
                    );
                }
            }
        }
        Command::Stats => {
            let updater = Updater::new(Scraper::from_options(opts.scrape)?, opts.store);
            let stats = updater.statistics()?;
            match &stats.last_run {
                Some(last) => println!("Last run:             {} (run #{})", last.timestamp, last.run_count),
                None => println!("Last run:             never"),
            }
            println!("Assignments:          {}", stats.assignments);
            println!("Announcements:        {}", stats.announcements);
            println!("Public announcements: {}", stats.public_announcements);
        }
        Command::Init => {
            let created = store::init(&opts.store)?;
            if created.is_empty() {
                println!("All artifacts already exist in {}", opts.store.data_dir.display());
            }
            for path in created {
                println!("Created {}", path.display());
            }
        }
        Command::Show { kind } => {
            let mapper = SchemaMapper::new(&opts.scrape.origin);
            let records = store::load(&opts.store, &mapper, kind.into())?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Sheet { url, json_file } => {
            let mapper = SchemaMapper::new(&opts.scrape.origin);
            let records = match json_file {
                Some(path) => sheet::read_json_file(&path)
                    .wrap_err_with(|| format!("cannot load {}", path.display()))?
                    .assignments(&mapper),
                None => {
                    let url = url
                        .or(opts.sheet_url)
                        .ok_or_else(|| eyre!("no sheet URL: pass one or set IBBI_SHEET_URL"))?;
                    let fetcher = HttpFetcher::new(&opts.scrape)?;
                    sheet::fetch_assignments(&fetcher, &url, &mapper)?
                }
            };
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["ibbi_scrape", "scrape", "--force", "--data-dir", "/tmp/x"]).unwrap();
        assert_eq!(cli.global.data_dir.as_deref(), Some(Path::new("/tmp/x")));
        assert!(matches!(cli.command, Command::Scrape { force: true, json: false }));
    }

    #[test]
    fn show_takes_kebab_case_kinds() {
        let cli = Cli::try_parse_from(["ibbi_scrape", "show", "public-announcements"]).unwrap();
        let Command::Show { kind } = cli.command else { panic!("show expected") };
        assert_eq!(RecordKind::from(kind), RecordKind::PublicAnnouncements);
    }

    #[test]
    fn sheet_url_and_json_file_conflict() {
        assert!(Cli::try_parse_from(["ibbi_scrape", "sheet", "https://x", "--json-file", "a.json"]).is_err());
    }
}
