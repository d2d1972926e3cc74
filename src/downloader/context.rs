//! Per-run task context: shared handles plus outcome reporting.

use std::sync::Arc;

use tokio::sync::{Semaphore, broadcast, mpsc};
use tokio_util::task::TaskTracker;

use crate::error::{Error, Result};
use crate::extractor::PageExtractor;
use crate::store::ArtifactStore;
use crate::types::{Event, LinkOutcome, SkipReason};

use super::fetch::{FetchedBody, Fetcher};

/// Terminal outcome of one pending link, keyed by identifier
pub(super) type OutcomeMessage = (String, LinkOutcome);

/// Everything a page or art task needs, cloned into each spawned task
#[derive(Clone)]
pub(super) struct TaskContext {
    pub(super) page_fetcher: Arc<dyn Fetcher>,
    pub(super) art_fetcher: Arc<dyn Fetcher>,
    pub(super) extractor: Arc<PageExtractor>,
    pub(super) store: Arc<ArtifactStore>,
    /// Bounds in-flight HTTP requests across page and art fetches
    pub(super) request_limit: Arc<Semaphore>,
    /// Art tasks are spawned here so the run waits for them too
    pub(super) tracker: TaskTracker,
    pub(super) event_tx: broadcast::Sender<Event>,
    pub(super) outcome_tx: mpsc::UnboundedSender<OutcomeMessage>,
}

impl TaskContext {
    /// Fetch `url` while holding a request permit
    ///
    /// The permit is released when the body has been read, before any parsing
    /// or disk work.
    pub(super) async fn fetch(&self, fetcher: &dyn Fetcher, url: &str) -> Result<FetchedBody> {
        let _permit = self
            .request_limit
            .acquire()
            .await
            .map_err(|e| Error::Other(format!("request limiter closed: {e}")))?;
        Ok(fetcher.fetch(url).await?)
    }

    /// Record the terminal outcome of a link and emit the matching event
    pub(super) fn report(&self, identifier: &str, outcome: LinkOutcome) {
        let event = match &outcome {
            LinkOutcome::Downloaded { path } => Event::ArtworkSaved {
                identifier: identifier.to_string(),
                path: path.clone(),
            },
            LinkOutcome::Skipped(reason) => Event::LinkSkipped {
                identifier: identifier.to_string(),
                reason: reason.clone(),
            },
            LinkOutcome::Failed { stage, message, .. } => Event::LinkFailed {
                identifier: identifier.to_string(),
                stage: *stage,
                error: message.clone(),
            },
        };
        self.event_tx.send(event).ok();
        self.outcome_tx.send((identifier.to_string(), outcome)).ok();
    }

    pub(super) fn skip(&self, identifier: &str, reason: SkipReason) {
        self.report(identifier, LinkOutcome::Skipped(reason));
    }
}
