//! Flash image loading
//!
//! Reads a root certificate store dump from disk into an owned buffer. The
//! buffer outlives every decoded entry borrowed from it, which is what keeps
//! those entries valid.

use std::fs;
use std::path::{Path, PathBuf};

/// Default cap on image size: larger than any WINC flash part.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 1024 * 1024;

/// Errors that can occur when loading an image
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image file not found: {0}")]
    NotFound(PathBuf),

    #[error("Image is {size} bytes, larger than the {max} byte limit")]
    TooLarge { size: u64, max: u64 },
}

/// A flash image held in memory.
#[derive(Debug, Clone)]
pub struct FlashImage {
    path: PathBuf,
    bytes: Vec<u8>,
}

impl FlashImage {
    /// Load an image, refusing files above `max_bytes`.
    pub fn load(path: &Path, max_bytes: u64) -> Result<Self, ImageError> {
        if !path.exists() {
            return Err(ImageError::NotFound(path.to_path_buf()));
        }

        let size = fs::metadata(path)?.len();
        if size > max_bytes {
            return Err(ImageError::TooLarge { size, max: max_bytes });
        }

        let bytes = fs::read(path)?;
        log::info!("loaded {} ({} bytes)", path.display(), bytes.len());

        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// Wrap bytes already in memory.
    pub fn from_bytes(path: impl Into<PathBuf>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            bytes,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
