//! Image download.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::{ScrapeError, retry};

static NON_ALNUM_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid regex"));

/// Default maximum length of a slugified file stem.
pub const DEFAULT_SLUG_LEN: usize = 60;

/// Turns free text into a file-name-safe stem: runs of non-alphanumerics
/// become `_`, the result is cut to `max_len` characters, and leading or
/// trailing underscores are stripped.
#[must_use]
pub fn slugify(text: &str, max_len: usize) -> String {
    let replaced = NON_ALNUM_RUN_RE.replace_all(text, "_");
    // Only ASCII remains, so byte and char lengths agree.
    let cut = &replaced[..replaced.len().min(max_len)];
    cut.trim_matches('_').to_owned()
}

/// Returns the path an image for `address` is saved to inside `dir`.
#[must_use]
pub fn image_path(dir: &Path, address: &str) -> PathBuf {
    dir.join(format!("{}.jpg", slugify(address, DEFAULT_SLUG_LEN)))
}

/// Downloads `image_url` and writes it to [`image_path`], creating `dir`
/// if needed. Returns the written path.
///
/// # Errors
///
/// Returns [`ScrapeError`] if the download fails or the file cannot be
/// written.
pub async fn download_image(
    client: &reqwest::Client,
    image_url: &str,
    dir: &Path,
    address: &str,
) -> Result<PathBuf, ScrapeError> {
    let bytes = retry::send_bytes(|| client.get(image_url)).await?;

    tokio::fs::create_dir_all(dir).await?;
    let path = image_path(dir, address);
    tokio::fs::write(&path, &bytes).await?;

    log::info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(path)
}
