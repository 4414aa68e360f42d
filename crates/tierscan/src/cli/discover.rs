//! The `tierscan discover` command: list work items without processing.

use clap::{Args, ValueEnum};
use std::io::Write;
use std::path::PathBuf;
use tierscan_core::{Config, FileDiscovery, Tierscan, WorkItem};

/// Supported listing formats.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ListFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

/// Arguments for the `discover` command.
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Directory to scan (defaults to `input.dir` from config)
    pub input: Option<PathBuf>,

    /// Listing format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: ListFormat,

    /// Descend into subdirectories
    #[arg(short, long)]
    pub recursive: bool,
}

/// Execute the discover command.
pub async fn execute(args: DiscoverArgs, mut config: Config) -> anyhow::Result<()> {
    if let Some(input) = args.input {
        config.input.dir = input;
    }
    config.input.recursive |= args.recursive;

    let tierscan = Tierscan::new(config)?;
    let items = tierscan.discover()?;
    tracing::info!(
        "{} image(s), {:.1} MB total",
        items.len(),
        FileDiscovery::total_size(&items) as f64 / 1_000_000.0
    );

    print_items(std::io::stdout().lock(), &items, args.format)?;
    Ok(())
}

fn print_items<W: Write>(
    mut out: W,
    items: &[WorkItem],
    format: ListFormat,
) -> anyhow::Result<W> {
    match format {
        ListFormat::Json => {
            serde_json::to_writer_pretty(&mut out, items)?;
            writeln!(out)?;
        }
        ListFormat::Jsonl => {
            for item in items {
                serde_json::to_writer(&mut out, item)?;
                writeln!(out)?;
            }
        }
    }
    out.flush()?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<WorkItem> {
        ["a.png", "b.jpg"]
            .iter()
            .map(|name| WorkItem {
                id: name.to_string(),
                source_path: PathBuf::from("/in").join(name),
                size_bytes: 5,
            })
            .collect()
    }

    #[test]
    fn test_jsonl_listing() {
        let out = print_items(Vec::new(), &items(), ListFormat::Jsonl).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["id"], "a.png");
    }

    #[test]
    fn test_empty_jsonl_listing() {
        let out = print_items(Vec::new(), &[], ListFormat::Jsonl).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_json_listing() {
        let out = print_items(Vec::new(), &items(), ListFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }
}
