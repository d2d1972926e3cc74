//! One pipeline run: scan the output directory, plan, fan out, collect.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Semaphore, mpsc};
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::planner::plan;
use crate::types::{Event, Link, LinkOutcome, LinkReport, RunReport, SkipReason, Stage};

use super::AlbumArtDownloader;
use super::context::{OutcomeMessage, TaskContext};
use super::page_task::run_page_task;

impl AlbumArtDownloader {
    /// Download artwork for every link not already present in the output directory
    ///
    /// Page fetches for all pending links start at once and each successful
    /// page spawns its own artwork task; at most `max_concurrent_requests`
    /// requests are in flight. Returns after every spawned task has finished.
    ///
    /// Per-link failures never abort the run and are recorded in the report.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputDir`] if the output directory cannot be created
    /// or listed. Nothing is fetched in that case.
    pub async fn run(&self, links: Vec<Link>) -> Result<RunReport> {
        let started_at = Utc::now();

        let store = Arc::clone(&self.store);
        let existing = tokio::task::spawn_blocking(move || store.existing_identifiers())
            .await
            .map_err(|e| Error::Other(format!("output directory scan panicked: {e}")))??;

        let pending = plan(&links, &existing);
        info!(
            total = links.len(),
            pending = pending.len(),
            already_present = links.len() - pending.len(),
            "Planned album art downloads"
        );
        self.event_tx
            .send(Event::Planned {
                total: links.len(),
                pending: pending.len(),
            })
            .ok();

        let mut outcomes = self.fan_out(pending).await;
        let report_links = assemble(&links, &existing, &mut outcomes, |identifier, reason| {
            self.event_tx
                .send(Event::LinkSkipped {
                    identifier: identifier.to_string(),
                    reason,
                })
                .ok();
        });

        let report = RunReport {
            started_at,
            finished_at: Utc::now(),
            links: report_links,
        };

        info!(
            downloaded = report.downloaded(),
            skipped = report.skipped(),
            failed = report.failed(),
            "Album art run complete"
        );
        self.event_tx
            .send(Event::RunComplete {
                downloaded: report.downloaded(),
                skipped: report.skipped(),
                failed: report.failed(),
            })
            .ok();

        Ok(report)
    }

    /// Spawn a page task per pending link and wait for the whole task tree
    async fn fan_out(&self, pending: Vec<Link>) -> HashMap<String, LinkOutcome> {
        let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel::<OutcomeMessage>();
        let tracker = TaskTracker::new();
        let ctx = TaskContext {
            page_fetcher: Arc::clone(&self.page_fetcher),
            art_fetcher: Arc::clone(&self.art_fetcher),
            extractor: Arc::clone(&self.extractor),
            store: Arc::clone(&self.store),
            request_limit: Arc::new(Semaphore::new(self.config.download.max_concurrent_requests)),
            tracker: tracker.clone(),
            event_tx: self.event_tx.clone(),
            outcome_tx,
        };

        for link in pending {
            tracker.spawn(run_page_task(ctx.clone(), link));
        }
        drop(ctx);

        // Page tasks spawn art tasks onto the same tracker before they finish,
        // so the tracker only empties once every art task has finished too
        tracker.close();
        tracker.wait().await;

        let mut outcomes = HashMap::new();
        while let Ok((identifier, outcome)) = outcome_rx.try_recv() {
            outcomes.insert(identifier, outcome);
        }
        outcomes
    }
}

/// Build the per-link report in input order
///
/// Links skipped at planning time are passed to `on_skip`. A pending link with
/// no recorded outcome means its task panicked.
fn assemble(
    links: &[Link],
    existing: &HashSet<String>,
    outcomes: &mut HashMap<String, LinkOutcome>,
    mut on_skip: impl FnMut(&str, SkipReason),
) -> Vec<LinkReport> {
    let mut seen: HashSet<&str> = HashSet::new();

    links
        .iter()
        .map(|link| {
            let identifier = link.identifier();
            let outcome = if existing.contains(identifier) || !seen.insert(identifier) {
                on_skip(identifier, SkipReason::AlreadyPresent);
                LinkOutcome::Skipped(SkipReason::AlreadyPresent)
            } else {
                outcomes.remove(identifier).unwrap_or_else(|| {
                    warn!(link = %link, "Task ended without reporting an outcome");
                    LinkOutcome::failed(
                        Stage::PageFetch,
                        &Error::Other("task ended without reporting an outcome".to_string()),
                    )
                })
            };

            LinkReport {
                link: link.url().to_string(),
                identifier: identifier.to_string(),
                outcome,
            }
        })
        .collect()
}
