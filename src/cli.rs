use crate::config::{ClientConfig, DEFAULT_API_BASE, DEFAULT_HOST, DEFAULT_USER_AGENT};
use crate::download::progress::{NoProgress, StickerProgressBar};
use crate::download::{ErrorPolicy, PackOptions, PackReport, StickerClient, download_pack};
use anyhow::{Context, bail};
use clap::{ArgAction, Parser};
use colored::Colorize;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::sync::{Arc, atomic::AtomicBool};
use std::time::Duration;
use tracing::Level;
use url::Url;

/// Download a sticker pack and its manifest.
#[derive(Parser, Debug)]
#[command(version, about, long_about=None)]
pub struct Cli {
    /// Sticker pack ID (required)
    #[arg(short, long)]
    pack: Option<String>,

    /// Directory the pack directory is created in
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Number of stickers downloaded at once
    #[arg(short, long, default_value = "1")]
    jobs: NonZeroUsize,

    /// Keep downloading after a sticker fails and report all failures at the end
    #[arg(short, long)]
    keep_going: bool,

    /// Base URL of the sticker API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: Url,

    /// User-Agent sent with every request
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Host header sent with index requests; empty to leave it to the URL
    #[arg(long, default_value = DEFAULT_HOST)]
    host: String,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// More logging, repeat for more
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Raised when no usable pack id was given, before anything is requested.
#[derive(thiserror::Error, Debug)]
#[error("a non-empty --pack <ID> is required")]
pub struct MissingPackId;

impl Cli {
    pub fn log_level(&self) -> Level {
        match (self.quiet, self.verbose) {
            (true, 0) => Level::WARN,
            (_, 0) => Level::INFO,
            (_, 1) => Level::DEBUG,
            _ => Level::TRACE,
        }
    }

    fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            user_agent: self.user_agent.clone(),
            host: Some(self.host.clone()).filter(|h| !h.is_empty()),
            timeout: self.timeout.map(Duration::from_secs),
        }
    }

    fn pack_options(&self, interrupted: Arc<AtomicBool>) -> PackOptions {
        PackOptions {
            output_dir: self.output_dir.clone(),
            jobs: self.jobs,
            on_error: if self.keep_going {
                ErrorPolicy::Continue
            } else {
                ErrorPolicy::Stop
            },
            interrupted,
        }
    }

    pub async fn execute(self, interrupted: Arc<AtomicBool>) -> anyhow::Result<()> {
        let Some(pack_id) = self.pack.as_deref().filter(|p| !p.is_empty()) else {
            bail!(MissingPackId);
        };

        let client = StickerClient::new(self.client_config()).context("setting up HTTP client")?;
        let options = self.pack_options(interrupted);
        let result = if self.quiet {
            download_pack(&client, pack_id, &options, &NoProgress).await
        } else {
            download_pack(&client, pack_id, &options, &StickerProgressBar::new()).await
        };
        let report = result.with_context(|| format!("downloading pack {pack_id:?}"))?;

        print_report(&report);
        if !report.failed.is_empty() {
            bail!(
                "{} of {} stickers failed to download",
                report.failed.len(),
                report.index.stickers.len()
            );
        }
        Ok(())
    }
}

fn print_report(report: &PackReport) {
    println!(
        "Pack {:?} downloaded to {}.",
        report.index.name,
        report.directory.display()
    );
    for sticker in &report.downloaded {
        println!(
            "  {} {}; SHA256: {}.",
            "ok".green(),
            sticker.file.path.display(),
            hex::encode(sticker.file.sha256)
        );
    }
    for failure in &report.failed {
        eprintln!(
            "  {} #{} {}: {}",
            "failed".red(),
            failure.position,
            failure.file_name,
            failure.error
        );
    }
}
