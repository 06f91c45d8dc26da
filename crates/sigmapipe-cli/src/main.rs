//! Sigmapipe main entry point

use anyhow::Result;
use clap::Parser;
use sigmapipe_cli::Poller;
use sigmapipe_convert::{RuleConverter, SignatureStore, SigmacConverter};
use sigmapipe_core::{PipelineConfig, TargetMode};
use sigmapipe_intel::{IntelClient, MispClient};
use sigmapipe_siem::{KibanaClient, RuleImporter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sigmapipe")]
#[command(about = "Relay Sigma signatures from MISP through sigmac into a SIEM")]
#[command(version)]
struct Args {
    /// Path to the JSON configuration file
    #[arg(short, long, default_value = "sigmapipe.json")]
    config: PathBuf,

    /// Run a single poll cycle and exit
    #[arg(long)]
    once: bool,

    /// Override the configured conversion target (es-rule, elastalert)
    #[arg(long)]
    target: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = PipelineConfig::load(&args.config)?;
    if let Some(target) = args.target.as_deref() {
        config.target = target.parse::<TargetMode>()?;
    }

    let store = SignatureStore::new(
        config.folders.signatures.clone(),
        config.folders.alerts.clone(),
    );
    store.ensure_directories()?;
    // Converter configs are operator-supplied; the directory just has to exist
    std::fs::create_dir_all(&config.folders.configs)?;

    let intel: Arc<dyn IntelClient> = Arc::new(MispClient::new(config.misp.clone())?);
    let converter: Arc<dyn RuleConverter> = Arc::new(SigmacConverter::new(config.sigmac.clone()));
    let importer: Arc<dyn RuleImporter> = Arc::new(KibanaClient::new(config.kibana.clone()));

    let poller = Poller::new(
        intel,
        converter,
        importer,
        store,
        config.target,
        Duration::from_secs(config.poll_interval_secs),
    );

    info!(
        mode = %config.target,
        interval_secs = config.poll_interval_secs,
        "sigmapipe starting"
    );

    if args.once {
        let summary = poller.run_cycle().await?;
        info!(
            fetched = summary.fetched,
            processed = summary.processed,
            failed = summary.failed,
            "single cycle finished"
        );
        Ok(())
    } else {
        poller.run().await
    }
}
