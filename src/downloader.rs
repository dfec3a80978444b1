use crate::config::DownloadConfig;
use crate::filename::derive_filename;
use crate::records::ImageRecord;
use reqwest::header;
use std::collections::BTreeSet;
use std::error::Error;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Which records of a scan result to download
#[derive(Debug, Clone)]
pub enum Selection {
    /// Every record
    All,
    /// Records at these zero-based indices, in list order
    Picked(BTreeSet<usize>),
}

/// Progress notification, fired once per job before its fetch starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    /// Zero-based position within the run
    pub index: usize,

    /// Total number of jobs in the run
    pub total: usize,

    /// Filename the job will save to
    pub filename: String,
}

/// Result of a completed run
///
/// Fallback saves are counted separately from confirmed saves because a
/// fallback attempt is never verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Jobs started
    pub attempted: usize,

    /// Jobs whose fetch succeeded and whose file was written
    pub saved: usize,

    /// Jobs that fell through to the unverified direct save attempt
    pub fallback_saved: usize,
}

/// Sequentially downloads selected records to the output directory
///
/// Strictly one job in flight at a time, in list order, with a fixed delay
/// after every save attempt. No concurrent fetch fan-out.
pub struct Downloader {
    config: DownloadConfig,
    client: reqwest::Client,
    cancel: Arc<AtomicBool>,
}

impl Downloader {
    /// Build a downloader; the client carries the fixed User-Agent header
    pub fn new(config: &DownloadConfig) -> Result<Self, Box<dyn Error>> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(&config.user_agent)?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            config: config.clone(),
            client,
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Shared flag that ends the run before the next job once set
    ///
    /// Nothing sets it by default, so a run goes to completion unless the
    /// caller wires the flag up.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    /// Download the selected records, one at a time, in list order
    ///
    /// `label` is an optional caller-supplied prefix for every derived
    /// filename. `on_progress` fires once per job before its fetch begins.
    /// An empty selection is an immediate error; per-job fetch failures are
    /// absorbed into the fallback path and never abort the batch.
    pub async fn run(
        &self,
        records: &[ImageRecord],
        selection: &Selection,
        label: Option<&str>,
        mut on_progress: impl FnMut(&Progress),
    ) -> Result<Summary, Box<dyn Error>> {
        let selected = select(records, selection);
        if selected.is_empty() {
            return Err("No images selected for download".into());
        }

        ::log::info!("Starting download of {} images", selected.len());
        self.run_jobs(&selected, label, &mut on_progress, |url| self.fetch(url))
            .await
    }

    /// The sequential job loop, generic over the fetch step so tests can
    /// script fetch outcomes
    async fn run_jobs<F, Fut>(
        &self,
        selected: &[&ImageRecord],
        label: Option<&str>,
        on_progress: &mut impl FnMut(&Progress),
        fetch: F,
    ) -> Result<Summary, Box<dyn Error>>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<Vec<u8>, Box<dyn Error>>>,
    {
        tokio::fs::create_dir_all(&self.config.output_dir).await?;

        let total = selected.len();
        let mut summary = Summary::default();

        for (index, record) in selected.iter().enumerate() {
            if self.cancel.load(Ordering::Relaxed) {
                ::log::info!("Cancelled after {} of {} downloads", index, total);
                break;
            }

            let filename = derive_filename(&record.canonical_url, index, label);
            on_progress(&Progress {
                index,
                total,
                filename: filename.clone(),
            });

            summary.attempted += 1;

            let primary = async {
                let body = fetch(record.canonical_url.clone()).await?;
                self.save(&filename, &body).await?;
                Ok::<(), Box<dyn Error>>(())
            }
            .await;

            match primary {
                Ok(()) => {
                    ::log::info!("Saved {}", filename);
                    summary.saved += 1;
                }
                Err(e) => {
                    ::log::warn!(
                        "Fetch failed for {}: {}; attempting direct save",
                        record.canonical_url,
                        e
                    );
                    self.fallback_save(&record.canonical_url, &filename).await;
                    summary.fallback_saved += 1;
                }
            }

            // Politeness delay toward the remote host
            if self.config.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
            }
        }

        ::log::info!(
            "Download run complete: {} attempted, {} saved, {} via fallback",
            summary.attempted,
            summary.saved,
            summary.fallback_saved
        );
        Ok(summary)
    }

    /// Primary fetch: identified GET, non-2xx is a failure
    async fn fetch(&self, url: String) -> Result<Vec<u8>, Box<dyn Error>> {
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(format!("HTTP status {}", response.status()).into());
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Best-effort direct save: one plain unverified GET, no identifying
    /// header, no status check; whatever body arrives is written and every
    /// error is swallowed
    async fn fallback_save(&self, url: &str, filename: &str) {
        let attempt = async {
            let body = reqwest::get(url).await?.bytes().await?;
            self.save(filename, &body).await?;
            Ok::<(), Box<dyn Error>>(())
        };

        match attempt.await {
            Ok(()) => ::log::info!("Direct save attempt for {} wrote {}", url, filename),
            Err(e) => ::log::warn!("Direct save attempt for {} not confirmed: {}", url, e),
        }
    }

    /// Write one downloaded body under the output directory
    async fn save(&self, filename: &str, body: &[u8]) -> Result<(), std::io::Error> {
        let path = Path::new(&self.config.output_dir).join(filename);
        tokio::fs::write(&path, body).await?;
        ::log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

/// Resolve a selection against the record list, preserving list order
fn select<'a>(records: &'a [ImageRecord], selection: &Selection) -> Vec<&'a ImageRecord> {
    match selection {
        Selection::All => records.iter().collect(),
        Selection::Picked(indices) => indices
            .iter()
            .filter_map(|i| {
                let found = records.get(*i);
                if found.is_none() {
                    ::log::warn!("Selection index {} is out of range, skipping", i);
                }
                found
            })
            .collect(),
    }
}
