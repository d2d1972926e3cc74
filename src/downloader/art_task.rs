//! Artwork stage: fetch the image, embed the identifier, write the artifact.

use tracing::{info, warn};

use crate::store::WriteOutcome;
use crate::types::{LinkOutcome, SkipReason, Stage};

use super::context::TaskContext;

/// One artwork download handed over by a page task
#[derive(Clone, Debug)]
pub(super) struct ArtJob {
    pub(super) identifier: String,
    pub(super) title: String,
    pub(super) image_url: String,
}

/// Fetch, tag and persist one artwork, reporting the link's terminal outcome
pub(super) async fn run_art_task(ctx: TaskContext, job: ArtJob) {
    let ArtJob {
        identifier,
        title,
        image_url,
    } = job;

    let image = match ctx.fetch(ctx.art_fetcher.as_ref(), &image_url).await {
        Ok(image) => image,
        Err(e) => {
            warn!(identifier = %identifier, url = %image_url, error = %e, "Artwork fetch failed");
            ctx.report(&identifier, LinkOutcome::failed(Stage::ArtFetch, &e));
            return;
        }
    };

    match ctx.store.write(&title, &identifier, &image.bytes).await {
        Ok(WriteOutcome::Written(path)) => {
            info!(identifier = %identifier, title = %title, path = %path.display(), "Saved artwork");
            ctx.report(&identifier, LinkOutcome::Downloaded { path });
        }
        Ok(WriteOutcome::Collision(path)) => {
            warn!(
                identifier = %identifier,
                title = %title,
                path = %path.display(),
                "Artwork file already taken by another album, skipping"
            );
            ctx.skip(&identifier, SkipReason::TitleCollision { path });
        }
        Err(e) => {
            warn!(identifier = %identifier, title = %title, error = %e, "Failed to write artwork");
            ctx.report(&identifier, LinkOutcome::failed(Stage::Write, &e));
        }
    }
}
