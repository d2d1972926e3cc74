//! Artifact directory: the on-disk dedup index
//!
//! The output directory is the only persisted state. Which albums are already
//! downloaded is recovered by reading the identifier embedded in every file.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::FileCollisionAction;
use crate::error::{Error, Result};
use crate::tagging::{read_identifier, write_tagged};
use crate::utils::{MAX_RENAME_ATTEMPTS, artifact_path, numbered_path, sanitize_title};

/// What [`ArtifactStore::write`] did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Artwork tagged and written to this path
    Written(PathBuf),
    /// The path is taken and the collision policy is skip; nothing written
    Collision(PathBuf),
}

/// Reads and writes identifier-tagged artwork in one directory
///
/// Clones share one overwrite lock, so concurrent writers never interleave
/// bytes in the same file.
#[derive(Clone, Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    file_collision: FileCollisionAction,
    overwrite_lock: Arc<Mutex<()>>,
}

impl ArtifactStore {
    /// Create a store over `dir`; nothing touches the disk until the first call
    pub fn new(dir: impl Into<PathBuf>, file_collision: FileCollisionAction) -> Self {
        Self {
            dir: dir.into(),
            file_collision,
            overwrite_lock: Arc::new(Mutex::new(())),
        }
    }

    /// The output directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Collect the identifiers of every artifact already in the directory
    ///
    /// A missing directory is created (with parents) and yields an empty set.
    /// Subdirectories are skipped, and files without a readable identifier are
    /// left out of the set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutputDir`] if the directory cannot be created or listed.
    pub fn existing_identifiers(&self) -> Result<HashSet<String>> {
        let mut identifiers = HashSet::new();

        if !self.dir.exists() {
            std::fs::create_dir_all(&self.dir).map_err(|source| Error::OutputDir {
                path: self.dir.clone(),
                source,
            })?;
            info!(dir = %self.dir.display(), "Created output directory");
            return Ok(identifiers);
        }

        let entries = std::fs::read_dir(&self.dir).map_err(|source| Error::OutputDir {
            path: self.dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(dir = %self.dir.display(), error = %e, "Failed to read directory entry");
                    continue;
                }
            };
            let path = entry.path();
            if path.is_dir() {
                continue;
            }

            match read_identifier(&path) {
                Some(identifier) => {
                    identifiers.insert(identifier);
                }
                None => {
                    debug!(path = %path.display(), "No embedded identifier, ignoring file");
                }
            }
        }

        info!(
            dir = %self.dir.display(),
            count = identifiers.len(),
            "Scanned existing artwork"
        );
        Ok(identifiers)
    }

    /// Tag `raw` with `identifier` and write it as `<sanitized title>.jpg`
    ///
    /// Under `rename` and `skip` the target path is claimed with an exclusive
    /// create, so concurrent writers with the same title never share a file.
    ///
    /// Writes in place without a temporary file: a crash mid-write can leave a
    /// truncated artifact. Such a file carries no readable identifier, so the
    /// album is fetched again on the next run.
    pub async fn write(&self, title: &str, identifier: &str, raw: &[u8]) -> Result<WriteOutcome> {
        let tagged = write_tagged(raw, identifier)?;
        let desired = artifact_path(&self.dir, &sanitize_title(title, identifier));

        let outcome = match self.file_collision {
            FileCollisionAction::Overwrite => {
                let _guard = self.overwrite_lock.lock().await;
                tokio::fs::write(&desired, &tagged).await?;
                WriteOutcome::Written(desired)
            }
            FileCollisionAction::Skip => {
                if write_new(&desired, &tagged).await? {
                    WriteOutcome::Written(desired)
                } else {
                    WriteOutcome::Collision(desired)
                }
            }
            FileCollisionAction::Rename => {
                WriteOutcome::Written(write_renamed(desired, &tagged).await?)
            }
        };

        if let WriteOutcome::Written(path) = &outcome {
            debug!(path = %path.display(), identifier, "Wrote artwork");
        }
        Ok(outcome)
    }
}

/// Create `path` exclusively and write `bytes`
///
/// Returns `Ok(false)` without touching the file if `path` already exists.
async fn write_new(path: &Path, bytes: &[u8]) -> Result<bool> {
    let mut file = match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(true)
}

/// Write to `desired`, or to the first free `"stem (n).ext"` alternative
async fn write_renamed(desired: PathBuf, bytes: &[u8]) -> Result<PathBuf> {
    if write_new(&desired, bytes).await? {
        return Ok(desired);
    }

    for n in 1..=MAX_RENAME_ATTEMPTS {
        let candidate = numbered_path(&desired, n)?;
        if write_new(&candidate, bytes).await? {
            return Ok(candidate);
        }
    }

    Err(Error::FileCollision {
        path: desired,
        reason: format!(
            "could not find unique filename after {} attempts",
            MAX_RENAME_ATTEMPTS
        ),
    })
}
