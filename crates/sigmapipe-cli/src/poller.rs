//! The polling loop

use anyhow::Context;
use sigmapipe_convert::{RuleConverter, SignatureStore};
use sigmapipe_core::{Attribute, TargetMode};
use sigmapipe_intel::{IntelClient, IntelResult};
use sigmapipe_siem::RuleImporter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleSummary {
    /// Attributes returned by the intel query
    pub fetched: usize,

    /// Attributes fully processed (stored, converted, imported)
    pub processed: usize,

    /// Attributes that failed at some step and were skipped
    pub failed: usize,
}

/// Drives the relay: one `run_cycle` per interval tick, forever,
/// until Ctrl-C.
pub struct Poller {
    intel: Arc<dyn IntelClient>,
    converter: Arc<dyn RuleConverter>,
    importer: Arc<dyn RuleImporter>,
    store: SignatureStore,
    target: TargetMode,
    interval: Duration,
}

impl Poller {
    pub fn new(
        intel: Arc<dyn IntelClient>,
        converter: Arc<dyn RuleConverter>,
        importer: Arc<dyn RuleImporter>,
        store: SignatureStore,
        target: TargetMode,
        interval: Duration,
    ) -> Self {
        Self {
            intel,
            converter,
            importer,
            store,
            target,
            interval,
        }
    }

    /// Poll until interrupted. The first cycle runs immediately; a
    /// failed cycle is logged and the loop keeps going.
    pub async fn run(&self) -> anyhow::Result<()> {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(error) = self.run_cycle().await {
                        warn!("poll cycle failed: {error}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received, shutting down");
                    return Ok(());
                }
            }
        }
    }

    /// Execute a single poll cycle.
    ///
    /// A failed attribute is logged and skipped; the remaining
    /// attributes in the same cycle are still processed.
    pub async fn run_cycle(&self) -> IntelResult<CycleSummary> {
        let attributes = self.intel.fetch_recent_signatures().await?;

        let mut summary = CycleSummary {
            fetched: attributes.len(),
            ..CycleSummary::default()
        };

        if attributes.is_empty() {
            info!("No new events");
            return Ok(summary);
        }

        for attribute in &attributes {
            match self.process_attribute(attribute).await {
                Ok(()) => summary.processed += 1,
                Err(error) => {
                    warn!(
                        attribute_id = %attribute.id,
                        "failed to process attribute: {error:#}"
                    );
                    summary.failed += 1;
                }
            }
        }

        info!(
            fetched = summary.fetched,
            processed = summary.processed,
            failed = summary.failed,
            "poll cycle complete"
        );
        Ok(summary)
    }

    /// Store, convert, and (for es-rule) import one attribute.
    async fn process_attribute(&self, attribute: &Attribute) -> anyhow::Result<()> {
        let signature_filename = self
            .store
            .write_signature(attribute)
            .context("writing signature")?;

        let rule = self
            .converter
            .convert(self.target, &self.store.signature_path(&signature_filename))
            .await
            .context("converting signature")?;
        info!("sigmac converter called for: {signature_filename}");

        let rule_path = self
            .store
            .write_rule(&rule.filename, &rule.content)
            .context("writing rule")?;

        if self.target.uploads_to_siem() {
            self.importer
                .import_rule(&rule_path)
                .await
                .context("importing rule")?;
        }

        Ok(())
    }
}
