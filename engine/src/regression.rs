//! Helpers for deterministic-output checks.
//!
//! Frames and generated images are compared by digest rather than byte-by-byte so failures
//! stay readable and digests can be logged or pinned.

use sha2::{Digest, Sha256};

use crate::image::RgbaImage;

pub fn rgba_sha256_hex(rgba: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(rgba);
    let digest = hasher.finalize();
    hex::encode(digest)
}

/// Digest of an image's dimensions and pixels, so equal bytes at different sizes differ.
pub fn image_sha256_hex(image: &RgbaImage) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image.width().to_le_bytes());
    hasher.update(image.height().to_le_bytes());
    hasher.update(image.as_bytes());
    hex::encode(hasher.finalize())
}
