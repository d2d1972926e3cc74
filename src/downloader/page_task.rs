//! Album page stage: fetch the page, extract metadata, hand off to the art stage.

use tracing::{debug, warn};
use url::Url;

use crate::error::{Error, FetchError, Result};
use crate::extractor::{ExtractOutcome, PageExtractor, is_html_content_type};
use crate::types::{AlbumMetadata, Event, Link, LinkOutcome, SkipReason, Stage};

use super::art_task::{ArtJob, run_art_task};
use super::context::TaskContext;
use super::fetch::FetchedBody;

/// Fetch one album page and, if both fields are present, spawn its art task
///
/// Every early return reports a terminal outcome for the link. On success the
/// outcome is reported by the art task instead.
pub(super) async fn run_page_task(ctx: TaskContext, link: Link) {
    let identifier = link.identifier().to_string();
    debug!(link = %link, "Fetching album page");

    let page = match ctx.fetch(ctx.page_fetcher.as_ref(), link.url()).await {
        Ok(page) => page,
        Err(e) => {
            warn!(link = %link, error = %e, "Album page fetch failed");
            ctx.report(&identifier, LinkOutcome::failed(Stage::PageFetch, &e));
            return;
        }
    };

    let metadata = match extract_metadata(&ctx.extractor, &page) {
        Ok(ExtractOutcome::Complete(metadata)) => metadata,
        Ok(ExtractOutcome::Incomplete { missing }) => {
            debug!(link = %link, ?missing, "Album page lacks artwork metadata");
            ctx.skip(&identifier, SkipReason::IncompleteMetadata { missing });
            return;
        }
        Err(e) => {
            warn!(link = %link, error = %e, "Album page could not be parsed");
            ctx.report(&identifier, LinkOutcome::failed(Stage::PageFetch, &e));
            return;
        }
    };

    let AlbumMetadata { image, title } = metadata;
    let image_url = match resolve_image_url(link.url(), &image) {
        Ok(url) => url,
        Err(e) => {
            warn!(link = %link, image = %image, error = %e, "Artwork URL is not usable");
            ctx.report(&identifier, LinkOutcome::failed(Stage::ArtFetch, &e));
            return;
        }
    };

    ctx.event_tx
        .send(Event::PageFetched {
            identifier: identifier.clone(),
            title: title.clone(),
        })
        .ok();

    let job = ArtJob {
        identifier,
        title,
        image_url,
    };
    ctx.tracker.spawn(run_art_task(ctx.clone(), job));
}

/// Parse the page body and look for the metadata tags
///
/// Kept synchronous: the parsed document is not `Send` and must not live
/// across an await point.
fn extract_metadata(extractor: &PageExtractor, page: &FetchedBody) -> Result<ExtractOutcome> {
    if !is_html_content_type(page.content_type.as_deref()) {
        return Err(Error::Parse(format!(
            "expected an HTML page, got {}",
            page.content_type.as_deref().unwrap_or_default()
        )));
    }

    let body = String::from_utf8_lossy(&page.bytes);
    let document = PageExtractor::parse(&body);
    Ok(extractor.extract(&document))
}

/// Resolve the artwork URL against the page URL
///
/// Absolute URLs pass through unchanged. Relative ones are joined onto the
/// page URL when that parses as a URL.
fn resolve_image_url(page_url: &str, image: &str) -> Result<String> {
    let resolved = match Url::parse(page_url) {
        Ok(base) => base.join(image),
        Err(_) => Url::parse(image),
    };

    resolved.map(|url| url.to_string()).map_err(|e| {
        Error::Fetch(FetchError::InvalidUrl {
            url: image.to_string(),
            reason: e.to_string(),
        })
    })
}
