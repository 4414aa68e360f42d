//! The `tierscan run` command: one full discover, classify, report cycle.

use clap::Args;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tierscan_core::{AggregateReport, Config, FileDiscovery, ResolutionTier, Tierscan};
use tokio_util::sync::CancellationToken;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Directory of images (defaults to `input.dir` from config)
    pub input: Option<PathBuf>,

    /// Directory receiving the report artifacts
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of parallel workers
    #[arg(short, long)]
    pub parallel: Option<usize>,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Recognized extensions, comma separated (e.g. jpg,png)
    #[arg(long, value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Fully decode pixel data instead of reading headers only
    #[arg(long)]
    pub full_decode: bool,
}

impl RunArgs {
    /// Layer command-line overrides on top of the loaded configuration.
    fn apply(self, config: &mut Config) {
        if let Some(input) = self.input {
            config.input.dir = input;
        }
        if let Some(output) = self.output {
            config.output.dir = output;
        }
        if let Some(workers) = self.parallel {
            config.processing.parallel_workers = workers;
        }
        if let Some(extensions) = self.extensions {
            config.input.extensions = extensions;
        }
        config.input.recursive |= self.recursive;
        config.processing.full_decode |= self.full_decode;
    }
}

/// Execute the run command.
///
/// Artifact paths go to stdout, one per line; everything else to stderr.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    let tierscan = Tierscan::new(config)?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    let items = tierscan.discover()?;
    let total_bytes = FileDiscovery::total_size(&items);

    let progress = create_progress_bar(items.len() as u64);
    let start_time = Instant::now();
    let mut processed: u64 = 0;

    let results = tierscan
        .classify_with_progress(items, &cancel, |_| {
            processed += 1;
            progress.inc(1);
            let elapsed = start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                progress.set_message(format!("{:.1} img/sec", processed as f64 / elapsed));
            }
        })
        .await;
    progress.finish_and_clear();
    let results = results?;

    if cancel.is_cancelled() {
        anyhow::bail!("Run cancelled before the report was written");
    }

    let report = tierscan.aggregate(results);
    let artifacts = tierscan.write_report(&report)?;

    for line in summary_lines(&report, total_bytes, start_time.elapsed()) {
        eprintln!("{line}");
    }
    for artifact in &artifacts {
        println!("{}", artifact.path.display());
    }

    Ok(())
}

/// Cancel the run on the first Ctrl-C. In-flight items still finish.
fn cancel_on_ctrl_c(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after in-flight items");
            cancel.cancel();
        }
    });
}

/// Create a progress bar for the transform stage.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .map(|style| style.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Formatted summary table printed after a run.
fn summary_lines(report: &AggregateReport, total_bytes: u64, elapsed: Duration) -> Vec<String> {
    let secs = elapsed.as_secs_f64();
    let rate = if secs > 0.0 {
        report.total_items as f64 / secs
    } else {
        0.0
    };
    let throughput = if secs > 0.0 {
        total_bytes as f64 / 1_000_000.0 / secs
    } else {
        0.0
    };

    let mut lines = vec![
        String::new(),
        "  ====================================".to_string(),
        format!("          Run {}", report.run_id),
        "  ====================================".to_string(),
    ];
    for tier in ResolutionTier::ALL {
        let count = report.per_tier_counts.get(&tier).copied().unwrap_or(0);
        let pct = report.per_tier_percentage.get(&tier).copied().unwrap_or(0.0);
        lines.push(format!("    {:<6}  {:>8}  {:>6.2}%", tier.label(), count, pct));
    }
    lines.push("  ------------------------------------".to_string());
    lines.push(format!("    Succeeded:    {:>8}", report.succeeded_count));
    if report.failed_count > 0 {
        lines.push(format!("    Failed:       {:>8}", report.failed_count));
    }
    lines.push(format!("    Total:        {:>8}", report.total_items));
    lines.push(format!("    Duration:     {:>7.1}s", secs));
    lines.push(format!("    Rate:         {:>7.1} img/sec", rate));
    lines.push(format!("    Throughput:   {:>7.1} MB/sec", throughput));
    lines.push("  ====================================".to_string());
    lines
}
