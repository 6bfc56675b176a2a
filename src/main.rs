use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Instant;

use appdoc::config::{load_config, write_default_config, CONFIG_FILE_NAME};
use appdoc::formatters::JsonFormatter;
use appdoc::logging::init_tracing;
use appdoc::{CodebaseAnalyzer, ScanCancellation, ScanOptions};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "appdoc",
    version,
    author = "appdoc developers",
    about = "Documentation coverage and dependency metrics for a codebase"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Scan a directory and write scan_results.json
    Scan {
        /// Directory to analyze
        #[arg(short, long, value_name = "PATH", default_value = ".")]
        path: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "appdoc-reports")]
        out: PathBuf,

        /// Configuration file
        #[arg(short, long, value_name = "FILE", default_value = CONFIG_FILE_NAME)]
        config: PathBuf,

        /// Comma-separated list of languages to analyze
        #[arg(short, long, value_name = "LANGS", value_delimiter = ',')]
        languages: Option<Vec<String>>,

        /// Ignore pattern, replaces the configured list (repeatable)
        #[arg(short, long, value_name = "PATTERN")]
        ignore: Vec<String>,

        /// Analyze at most this many files
        #[arg(long, value_name = "N")]
        max_files: Option<usize>,

        /// Worker threads; 0 uses every core
        #[arg(short, long, value_name = "N")]
        jobs: Option<usize>,

        /// Write single-line JSON
        #[arg(long)]
        compact: bool,
    },
    /// Write a default appdoc.config.json
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Scan {
            path,
            out,
            config,
            languages,
            ignore,
            max_files,
            jobs,
            compact,
        } => {
            let start_time = Instant::now();

            let mut scan_config = load_config(&config)?;
            scan_config.output_dir = Some(out.clone());

            let languages = languages.map(|langs| {
                langs
                    .into_iter()
                    .map(|lang| lang.trim().to_string())
                    .filter(|lang| !lang.is_empty())
                    .collect::<Vec<_>>()
            });
            let options = ScanOptions {
                ignore_patterns: (!ignore.is_empty()).then_some(ignore),
                languages,
                max_files,
                concurrency: jobs,
            };

            let analyzer = CodebaseAnalyzer::new(scan_config);
            let result = analyzer
                .scan(&path, &options, &ScanCancellation::new())
                .with_context(|| format!("scan of {} failed", path.display()))?;

            let formatter = if compact {
                JsonFormatter::compact()
            } else {
                JsonFormatter::new()
            };
            let written = formatter.write_to_dir(&result, &out)?;

            println!("Scanned {}", result.scan_path().display());
            println!(
                "Files: {} | Lines: {} | Coverage: {:.1}%",
                result.total_files(),
                result.total_lines(),
                result.overall_coverage()
            );
            for (language, summary) in result.language_summaries() {
                println!(
                    "  {:<12} {:>6} files {:>8} lines {:>6.1}%",
                    language,
                    summary.files,
                    summary.lines,
                    summary.coverage()
                );
            }
            println!("Wrote {}", written.display());
            println!(
                "Total execution time: {:.2}s",
                start_time.elapsed().as_secs_f64()
            );
        }
        Command::Init { force } => {
            let target = PathBuf::from(CONFIG_FILE_NAME);
            if target.exists() && !force {
                anyhow::bail!(
                    "{} already exists; pass --force to overwrite",
                    target.display()
                );
            }
            write_default_config(&target)?;
            println!("Wrote {}", target.display());
        }
    }

    Ok(())
}
