//! Utility functions for file naming and path manipulation

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Maximum number of rename attempts when resolving file collisions
pub const MAX_RENAME_ATTEMPTS: u32 = 9999;

/// Extension given to every artifact
pub const ARTIFACT_EXTENSION: &str = "jpg";

/// Characters that would split a title into nested paths (or truncate it)
const UNSAFE_TITLE_CHARS: [char; 3] = ['/', '\\', '\0'];

/// Turn an album title into a single file name component
///
/// Path separators are replaced with a space, so `"AC/DC"` becomes `"AC DC"`.
/// A title that is empty after sanitizing falls back to `fallback`.
///
/// # Examples
///
/// ```
/// use album_art_dl::utils::sanitize_title;
///
/// assert_eq!(sanitize_title("AC/DC", "id"), "AC DC");
/// assert_eq!(sanitize_title(" / ", "abcdefghijk"), "abcdefghijk");
/// ```
#[must_use]
pub fn sanitize_title(title: &str, fallback: &str) -> String {
    let sanitized: String = title
        .chars()
        .map(|c| if UNSAFE_TITLE_CHARS.contains(&c) { ' ' } else { c })
        .collect();

    if sanitized.trim().is_empty() || sanitized == "." || sanitized == ".." {
        fallback.to_string()
    } else {
        sanitized
    }
}

/// Path of the artifact for a sanitized title inside `dir`
pub fn artifact_path(dir: &Path, sanitized_title: &str) -> PathBuf {
    dir.join(format!("{sanitized_title}.{ARTIFACT_EXTENSION}"))
}

/// Path of the `n`th renamed alternative to `path`: `"stem (n).ext"`
///
/// # Examples
///
/// ```
/// use album_art_dl::utils::numbered_path;
/// use std::path::{Path, PathBuf};
///
/// let renamed = numbered_path(Path::new("/tmp/album.jpg"), 2).unwrap();
/// assert_eq!(renamed, PathBuf::from("/tmp/album (2).jpg"));
/// ```
pub fn numbered_path(path: &Path, n: u32) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| Error::FileCollision {
            path: path.to_path_buf(),
            reason: "cannot extract file stem".to_string(),
        })?;
    let parent = path.parent().ok_or_else(|| Error::FileCollision {
        path: path.to_path_buf(),
        reason: "cannot extract parent directory".to_string(),
    })?;

    let new_name = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{} ({}).{}", stem, n, ext),
        None => format!("{} ({})", stem, n),
    };
    Ok(parent.join(new_name))
}
