//! Custom assertions for run reports and artifacts

use std::path::Path;

use album_art_dl::tagging::read_identifier;
use album_art_dl::{Event, LinkOutcome, RunReport};
use tokio::sync::broadcast;

/// Assert that `path` is an artifact tagged with `identifier`
pub fn assert_artifact(path: &Path, identifier: &str) {
    assert!(path.is_file(), "expected artifact at {}", path.display());
    assert_eq!(
        read_identifier(path).as_deref(),
        Some(identifier),
        "artifact {} carries the wrong identifier",
        path.display()
    );
}

/// Outcome recorded for `link`, panicking if the link is missing from the report
pub fn outcome<'a>(report: &'a RunReport, link: &str) -> &'a LinkOutcome {
    report
        .outcome_for(link)
        .unwrap_or_else(|| panic!("no outcome for {link}"))
}

/// Drain every event already buffered on `rx`
pub fn drain_events(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Number of regular files in `dir`
pub fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}
