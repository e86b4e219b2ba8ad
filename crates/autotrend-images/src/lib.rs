//! Stock-image sourcing and placement.
//!
//! [`PexelsClient`] talks to the Pexels-shaped search API, [`MediaStore`]
//! writes downloaded bytes into the local media directory, and
//! [`ImageResolver`] walks an article's image suggestions and splices the
//! results into its content.

use thiserror::Error;

pub mod client;
pub mod media;
pub mod query;
pub mod resolver;

pub use client::{PexelsClient, Photo};
pub use media::{MediaStore, StoredImage};
pub use resolver::{ImageResolver, ResolvedImages};

#[derive(Debug, Error)]
pub enum ImageError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("image API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The image API answered with a non-200 status.
    #[error("image API returned error {status}: {body}")]
    Api { status: u16, body: String },

    /// A search completed but matched nothing.
    #[error("no images found for query: {0}")]
    NoImagesFound(String),

    /// Writing a downloaded image to the media directory failed.
    #[error("failed to store image: {0}")]
    Io(#[from] std::io::Error),
}
