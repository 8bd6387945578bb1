//! Output writing: persist decoded images and downscale in place.
//!
//! Output naming is stable and predictable — `badge-<id>.<format>` with a
//! `-<index>` suffix only for variants beyond the first — so dashboard
//! configs can reference the paths without consulting a manifest.
//!
//! ## Why resize after writing?
//!
//! The API's smallest render is far larger than a badge slot, and the resize
//! must not assume the payload's format: the file is written verbatim first,
//! then re-opened by the `image` crate (which sniffs the actual format) and
//! rewritten only when it exceeds the bound. Lanczos3 matches the smooth
//! resampling the badge art needs — nearest-neighbour aliases the thin
//! outlines these prompts produce.

use crate::error::BadgeGenError;
use image::imageops::FilterType;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Compute the output path for one image of one job.
///
/// `index` is 1-based within the job; the first image has no suffix:
/// `badge-dispatch.webp`, `badge-dispatch-2.webp`, …
pub fn build_out_path(out_dir: &Path, job_id: &str, index: usize, format: &str) -> PathBuf {
    let file_name = if index > 1 {
        format!("badge-{job_id}-{index}.{format}")
    } else {
        format!("badge-{job_id}.{format}")
    };
    out_dir.join(file_name)
}

/// Write raw image bytes verbatim, creating parent directories as needed.
pub async fn write_image(path: &Path, bytes: &[u8]) -> Result<(), BadgeGenError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| BadgeGenError::OutputWriteFailed {
                path: path.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| BadgeGenError::OutputWriteFailed {
            path: path.to_path_buf(),
            source,
        })
}

/// Downscale a written image in place so its longest side is at most
/// `max_dim` pixels.
///
/// Returns `true` when the file was rewritten, `false` when it already fit.
/// Decoding and resampling are CPU-bound, so the work runs under
/// `spawn_blocking` to keep it off the async executor's worker threads.
pub async fn downscale_in_place(path: &Path, max_dim: u32) -> Result<bool, BadgeGenError> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || downscale_blocking(&path, max_dim))
        .await
        .map_err(|e| BadgeGenError::Internal(format!("Downscale task panicked: {e}")))?
}

/// Blocking implementation of the in-place downscale.
fn downscale_blocking(path: &Path, max_dim: u32) -> Result<bool, BadgeGenError> {
    let img = image::open(path).map_err(|source| BadgeGenError::DownscaleFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let (w, h) = (img.width(), img.height());
    if w.max(h) <= max_dim {
        debug!(
            "{} is {}x{}, within {} — leaving untouched",
            path.display(),
            w,
            h,
            max_dim
        );
        return Ok(false);
    }

    // `resize` preserves aspect ratio, fitting the longest side to max_dim.
    let resized = img.resize(max_dim, max_dim, FilterType::Lanczos3);
    debug!(
        "Downscaling {} from {}x{} to {}x{}",
        path.display(),
        w,
        h,
        resized.width(),
        resized.height()
    );

    resized
        .save(path)
        .map_err(|source| BadgeGenError::DownscaleFailed {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    #[test]
    fn out_path_first_image_has_no_suffix() {
        let path = build_out_path(Path::new("out"), "dispatch", 1, "webp");
        assert_eq!(path, PathBuf::from("out/badge-dispatch.webp"));
    }

    #[test]
    fn out_path_later_images_are_suffixed() {
        let path = build_out_path(Path::new("out"), "dispatch", 2, "webp");
        assert_eq!(path, PathBuf::from("out/badge-dispatch-2.webp"));

        let path = build_out_path(Path::new("out"), "triage", 10, "png");
        assert_eq!(path, PathBuf::from("out/badge-triage-10.png"));
    }

    fn write_test_png(path: &Path, w: u32, h: u32) {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba([0, 128, 255, 255])));
        img.save(path).unwrap();
    }

    #[test]
    fn downscale_bounds_longest_side() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badge-dispatch.png");
        write_test_png(&path, 64, 32);

        let resized = downscale_blocking(&path, 16).unwrap();
        assert!(resized);

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 16);
        assert_eq!(img.height(), 8);
    }

    #[test]
    fn downscale_is_noop_when_image_already_fits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badge-triage.png");
        write_test_png(&path, 20, 10);

        let resized = downscale_blocking(&path, 64).unwrap();
        assert!(!resized);

        let img = image::open(&path).unwrap();
        assert_eq!((img.width(), img.height()), (20, 10));
    }

    #[test]
    fn downscale_exact_fit_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badge-edge.png");
        write_test_png(&path, 32, 32);

        assert!(!downscale_blocking(&path, 32).unwrap());
    }

    #[test]
    fn downscale_on_non_image_bytes_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("badge-bogus.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = downscale_blocking(&path, 16).unwrap_err();
        assert!(matches!(err, BadgeGenError::DownscaleFailed { .. }));
    }

    #[tokio::test]
    async fn write_image_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/badge-dispatch.webp");

        write_image(&path, b"payload").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"payload");
    }
}
