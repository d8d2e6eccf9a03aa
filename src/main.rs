//! `studio-extract` command line front end

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::error;

use studio_extract::scene::{RecordOutcome, SexFilter};
use studio_extract::{extract_scene, logging, ExtractOptions, ExtractSummary};

#[derive(Parser)]
#[command(
    name = "studio-extract",
    version,
    about = "Extract character cards from Studio scene cards",
    long_about = "Extract character cards from Studio scene cards.\n\n\
                  Supported games: AI Shoujo, Honey Select, Honey Select 2, Koikatu, PlayHome."
)]
struct Cli {
    /// Scene files to extract from
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Extract male characters only
    #[arg(short, long, conflicts_with = "female")]
    male: bool,

    /// Extract female characters only
    #[arg(short, long)]
    female: bool,

    /// Directory to write cards to
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Only handle Studio NEO and NEO V2 scenes
    #[arg(long)]
    neo_only: bool,

    /// List the characters found without writing anything
    #[arg(long)]
    list: bool,

    /// Print the per-file summary as JSON
    #[arg(long)]
    json: bool,

    /// More log output (-vv for source locations)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn options(&self) -> ExtractOptions {
        let sex_filter = if self.male {
            SexFilter::MaleOnly
        } else if self.female {
            SexFilter::FemaleOnly
        } else {
            SexFilter::All
        };
        ExtractOptions {
            sex_filter,
            full: !self.neo_only,
            output_dir: self.output.clone(),
            verbose_errors: self.verbose > 0,
            dry_run: self.list,
        }
    }
}

fn print_summary(file: &Path, summary: &ExtractSummary) {
    println!("{}", file.display());
    for record in &summary.records {
        let format = record.format.map(|f| f.to_string()).unwrap_or_else(|| "?".into());
        let sex = record.sex.map(|s| s.to_string()).unwrap_or_else(|| "?".into());
        let detail = match (record.outcome, &record.path, &record.error) {
            (RecordOutcome::Written, Some(path), _) => path.display().to_string(),
            (RecordOutcome::Failed, _, Some(error)) => format!("failed: {error}"),
            (RecordOutcome::Filtered, _, _) => "filtered".to_string(),
            _ => String::new(),
        };
        println!("  @{:<10} {:<15} {:<8} {:<20} {}", record.offset, format, sex, record.name, detail);
    }
    if summary.found == 0 {
        println!("  no character cards found");
    } else {
        println!("  found {}, written {}", summary.found, summary.written);
    }
}

fn extract_file(file: &Path, options: &ExtractOptions) -> Result<ExtractSummary> {
    extract_scene(file, options).with_context(|| format!("failed to extract {}", file.display()))
}

fn run(cli: &Cli) -> Result<bool> {
    let options = cli.options();
    let mut all_ok = true;
    let mut reports = Vec::new();

    for file in &cli.files {
        match extract_file(file, &options) {
            Ok(summary) => {
                if cli.json {
                    reports.push(serde_json::json!({ "file": file, "summary": summary }));
                } else {
                    print_summary(file, &summary);
                }
            }
            Err(e) => {
                all_ok = false;
                error!(file = %file.display(), error = %e, "Scene could not be read");
                if cli.json {
                    reports.push(serde_json::json!({ "file": file, "error": format!("{e:#}") }));
                } else {
                    eprintln!("{e:#}");
                }
            }
        }
    }

    if cli.json {
        let out = serde_json::to_string_pretty(&reports).context("failed to serialize summary")?;
        println!("{out}");
    }
    Ok(all_ok)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if cli.verbose > 1 {
        logging::init_verbose();
    } else {
        logging::init(cli.verbose > 0);
    }

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}
