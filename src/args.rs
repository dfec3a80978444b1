use clap::{Parser, ValueEnum};
use std::collections::BTreeSet;

#[derive(Parser, Debug)]
#[command(name = "photo-haul")]
#[command(about = "Extracts and downloads high-resolution contributor photos from a page")]
#[command(version)]
pub struct Args {
    /// Page URL (live source) or path to a saved markup file (file source)
    pub target: String,

    /// Where the document comes from
    #[arg(short, long, value_enum, default_value_t = SourceArg::Live)]
    pub source: SourceArg,

    /// Scan and list photos without downloading anything
    #[arg(long)]
    pub list: bool,

    /// Comma-separated photo numbers to download, as listed (default: all)
    #[arg(short, long)]
    pub pick: Option<String>,

    /// Label prefixed to every saved filename
    #[arg(short, long)]
    pub label: Option<String>,

    /// Directory downloads are written to
    #[arg(short, long)]
    pub out: Option<String>,

    /// Delay between downloads in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Capture the page over WebDriver
    Live,
    /// Read markup from a local file
    File,
}

/// Convert a comma-separated list of 1-based photo numbers into zero-based
/// indices
pub fn parse_picks(picks: &str) -> Result<BTreeSet<usize>, String> {
    let mut indices = BTreeSet::new();

    for part in picks.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        let number: usize = part
            .parse()
            .map_err(|_| format!("Invalid photo number '{}'", part))?;
        if number == 0 {
            return Err("Photo numbers start at 1".to_string());
        }

        indices.insert(number - 1);
    }

    Ok(indices)
}
