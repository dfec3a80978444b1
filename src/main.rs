use clap::Parser;
use photo_haul::config::ExtractorConfig;
use photo_haul::downloader::{Downloader, Selection};
use photo_haul::{DocumentKind, Gallery};

mod args;
use args::{Args, SourceArg, parse_picks};

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => match ExtractorConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load configuration {}: {}", path, e);
                return;
            }
        },
        None => ExtractorConfig::default(),
    };

    // CLI flags win over the configuration file
    if let Some(out) = &args.out {
        config.download.output_dir = out.clone();
    }
    if let Some(delay) = args.delay_ms {
        config.download.delay_ms = delay;
    }

    let kind = match args.source {
        SourceArg::Live => {
            println!("Note: live capture requires a WebDriver server (e.g., ChromeDriver).");
            println!(
                "Set WEBDRIVER_URL environment variable if not using the default {}",
                config.webdriver_url
            );
            DocumentKind::Live(args.target.clone())
        }
        SourceArg::File => {
            let markup = match std::fs::read_to_string(&args.target) {
                Ok(markup) => markup,
                Err(e) => {
                    ::log::error!("Failed to read {}: {}", args.target, e);
                    return;
                }
            };
            DocumentKind::Markup(markup)
        }
    };

    ::log::info!("Scanning {}", args.target);
    let gallery = Gallery::new(kind).with_config(config.clone());

    let records = match gallery.scan().await {
        Ok(records) => records,
        Err(e) => {
            ::log::error!("Scan failed: {}", e);
            return;
        }
    };

    println!("Found {} photos", records.len());
    for (number, record) in records.iter().enumerate() {
        println!(
            "  {:>3}. [{}] {}",
            number + 1,
            record.label,
            record.canonical_url
        );
    }

    if args.list || records.is_empty() {
        return;
    }

    let selection = match &args.pick {
        Some(picks) => match parse_picks(picks) {
            Ok(indices) => Selection::Picked(indices),
            Err(e) => {
                ::log::error!("{}", e);
                return;
            }
        },
        None => Selection::All,
    };

    let downloader = match Downloader::new(&config.download) {
        Ok(downloader) => downloader,
        Err(e) => {
            ::log::error!("Failed to build downloader: {}", e);
            return;
        }
    };

    let result = downloader
        .run(&records, &selection, args.label.as_deref(), |progress| {
            println!(
                "Downloading {}/{}: {}",
                progress.index + 1,
                progress.total,
                progress.filename
            );
        })
        .await;

    match result {
        Ok(summary) => {
            println!(
                "Done: {} attempted, {} saved, {} via fallback (unverified)",
                summary.attempted, summary.saved, summary.fallback_saved
            );
        }
        Err(e) => {
            ::log::error!("Download run failed: {}", e);
        }
    }
}
