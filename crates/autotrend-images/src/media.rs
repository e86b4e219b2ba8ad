//! Local media store. Downloaded images land in a flat directory and are
//! referenced by a `/media/...` URL in post content.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::ImageError;

/// Where a stored image ended up.
#[derive(Debug, Clone)]
pub struct StoredImage {
    /// Absolute filesystem path of the written file.
    pub path: PathBuf,
    /// URL the file is served under.
    pub url: String,
}

pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write image bytes under a filename derived from the alt text and
    /// photo id, creating the media directory on first use.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Io`] when the directory or file cannot be
    /// written.
    pub async fn store_image(
        &self,
        photo_id: u64,
        alt_text: &str,
        bytes: &[u8],
    ) -> Result<StoredImage, ImageError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let filename = format!("{}-{photo_id}.jpg", slugify(alt_text));
        let path = self.root.join(&filename);
        tokio::fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "stored image");

        Ok(StoredImage {
            path,
            url: format!("/media/{filename}"),
        })
    }
}

/// Lowercase, alphanumerics kept, everything else collapsed to single
/// hyphens. Empty input falls back to "image".
fn slugify(text: &str) -> String {
    let mut slug = String::new();
    let mut last_hyphen = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        "image".to_string()
    } else {
        slug
    }
}
