use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use munche::analyzer::DEFAULT_KEYWORD_LIMIT;
use munche::discovery::{self, DiscoveryConfig, DEFAULT_PATTERN};
use munche::reader::{self, ReaderConfig};
use munche::report::{self, TextReport};
use munche::{AnalyzerConfig, BatchConfig, DialogueRemoval, FileReport, ProseAnalyzer};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    /// Korean summary panel
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RemovalMode {
    /// Remove the first occurrence of each dialogue text
    FirstOccurrence,
    /// Remove dialogue exactly where it was matched
    ByPosition,
}

impl From<RemovalMode> for DialogueRemoval {
    fn from(mode: RemovalMode) -> Self {
        match mode {
            RemovalMode::FirstOccurrence => DialogueRemoval::FirstOccurrence,
            RemovalMode::ByPosition => DialogueRemoval::ByPosition,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "munche")]
#[command(about = "Stylistic analysis of Korean prose manuscripts")]
#[command(version)]
struct Args {
    /// Manuscript files or directories to search; `-` reads standard input
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// How dialogue is removed before narrative sentences are split
    #[arg(long, value_enum, default_value = "first-occurrence")]
    dialogue_removal: RemovalMode,

    /// Number of keywords to report
    #[arg(long, default_value_t = DEFAULT_KEYWORD_LIMIT)]
    keywords: usize,

    /// Maximum manuscripts analyzed concurrently (default: number of CPUs)
    #[arg(long)]
    jobs: Option<usize>,

    /// File name pattern for directory search
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Use memory-mapped I/O instead of async buffered
    #[arg(long)]
    use_mmap: bool,

    /// Abort on first error
    #[arg(long)]
    fail_fast: bool,

    /// Suppress console progress bars
    #[arg(long)]
    no_progress: bool,

    /// Walk directories with the parallel walker
    #[arg(long)]
    parallel_discovery: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // WHY: structured JSON logging on stderr keeps stdout clean for reports
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let args = Args::parse();
    info!(?args, "Parsed CLI arguments");

    let analyzer = Arc::new(ProseAnalyzer::new(AnalyzerConfig {
        dialogue_removal: args.dialogue_removal.into(),
        keyword_limit: args.keywords,
        ..AnalyzerConfig::default()
    })?);

    if args.paths.len() == 1 && args.paths[0].as_os_str() == "-" {
        let text = reader::read_stdin().await?;
        let result = analyzer.analyze(&text);
        let rendered = match args.format {
            OutputFormat::Text => TextReport::new(&result).to_string(),
            OutputFormat::Json => report::render_json(&result)?,
        };
        println!("{rendered}");
        return Ok(());
    }

    let manuscripts = collect_manuscripts(&args).await?;
    if manuscripts.is_empty() {
        anyhow::bail!("No manuscripts matching {:?} found", args.pattern);
    }
    info!("Found {} manuscripts", manuscripts.len());

    let progress = progress_bar(manuscripts.len(), args.no_progress);
    let batch = BatchConfig {
        jobs: args.jobs.unwrap_or_else(num_cpus::get),
        fail_fast: args.fail_fast,
    };
    let reader_config = ReaderConfig {
        use_mmap: args.use_mmap,
        ..ReaderConfig::default()
    };

    let reports =
        munche::analyze_files_parallel(manuscripts, analyzer, reader_config, batch, &progress)
            .await?;
    progress.finish_and_clear();

    print_reports(&reports, args.format)?;

    let failed = reports.iter().filter(|r| !r.is_success()).count();
    if failed > 0 {
        warn!("{} of {} manuscripts could not be analyzed", failed, reports.len());
    }
    Ok(())
}

/// Expand directories into matching manuscripts; explicit files are taken as given
async fn collect_manuscripts(args: &Args) -> Result<Vec<PathBuf>> {
    let mut manuscripts = Vec::new();

    for path in &args.paths {
        if path.as_os_str() == "-" {
            anyhow::bail!("`-` (standard input) cannot be combined with other paths");
        }
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("Path does not exist: {}", path.display()))?;

        if metadata.is_dir() {
            let config = DiscoveryConfig {
                fail_fast: args.fail_fast,
                pattern: args.pattern.clone(),
            };
            manuscripts
                .extend(discovery::find_manuscripts(path, config, args.parallel_discovery).await?);
        } else {
            manuscripts.push(path.clone());
        }
    }

    Ok(manuscripts)
}

fn progress_bar(total: usize, disabled: bool) -> ProgressBar {
    // A single manuscript finishes too quickly for a bar to help
    if disabled || total < 2 {
        return ProgressBar::hidden();
    }

    let bar = ProgressBar::new(total as u64);
    match ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} manuscripts {msg}")
    {
        Ok(style) => bar.set_style(style.progress_chars("##-")),
        Err(e) => warn!("Falling back to default progress style: {}", e),
    }
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

fn print_reports(reports: &[FileReport], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", report::render_json(&reports)?),
        OutputFormat::Text => {
            for file_report in reports {
                match (&file_report.analysis, &file_report.stats.error) {
                    (Some(result), _) => {
                        println!("{}", TextReport::titled(&file_report.stats.path, result));
                        info!(
                            path = %file_report.stats.path,
                            entities = ?report::category_counts(result),
                            "Rendered manuscript report"
                        );
                    }
                    (None, error) => println!(
                        "=== {} ===\n분석 실패: {}\n",
                        file_report.stats.path,
                        error.as_deref().unwrap_or("unknown error")
                    ),
                }
            }
        }
    }
    Ok(())
}
