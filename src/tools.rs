//! Helpers for feeding image files through a decoder context
//!
//! Used by the `qrscan` CLI and the integration tests. Images are converted to
//! 8-bit luma and shrunk to fit the frame buffer maxima before being copied in.

use crate::config::ScannerConfig;
use crate::context::DecoderContext;
use crate::driver::{ScanDriver, ScanOutcome};
use crate::engine::DecodeEngine;
use crate::error::{ConfigError, ImageScanError};
use image::{DynamicImage, GenericImageView, GrayImage};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Convert to luma, downscaling (aspect preserved) if larger than the maxima
pub fn fit_luma(img: DynamicImage, max_hor_res: usize, max_ver_res: usize) -> GrayImage {
    let (max_w, max_h) = (max_hor_res as u32, max_ver_res as u32);
    let (width, height) = img.dimensions();
    if width > max_w || height > max_h {
        img.resize(max_w, max_h, image::imageops::FilterType::Triangle)
            .to_luma8()
    } else {
        img.to_luma8()
    }
}

/// Load an image file as luma fitted to `config`'s maxima
pub fn load_luma_fitted<P: AsRef<Path>>(
    path: P,
    config: &ScannerConfig,
) -> Result<GrayImage, image::ImageError> {
    let img = image::open(path)?;
    Ok(fit_luma(img, config.max_hor_res, config.max_ver_res))
}

/// Configure the context to `image`'s size, copy it into the frame buffer, scan.
///
/// If `configure` fails the frame buffer and previous configuration are left
/// untouched.
pub fn scan_luma_with<E: DecodeEngine>(
    ctx: &mut DecoderContext<E>,
    driver: &mut ScanDriver,
    image: &GrayImage,
) -> Result<ScanOutcome, ConfigError> {
    ctx.configure(image.width() as usize, image.height() as usize)?;
    ctx.frame_buffer_mut().load_luma(image)?;
    Ok(driver.scan_outcome(ctx))
}

/// Scan one image file with a fresh context
pub fn scan_file<P: AsRef<Path>>(
    path: P,
    config: ScannerConfig,
) -> Result<ScanOutcome, ImageScanError> {
    let image = load_luma_fitted(path, &config)?;
    let mut ctx = DecoderContext::with_config(config)?;
    let mut driver = ScanDriver::new();
    Ok(scan_luma_with(&mut ctx, &mut driver, &image)?)
}

/// Outcome of scanning one file in a batch
#[derive(Debug)]
pub struct FileScan {
    /// The image scanned
    pub path: PathBuf,
    /// Scan result or the reason the file could not be scanned
    pub outcome: Result<ScanOutcome, ImageScanError>,
}

/// Scan files in parallel; each rayon worker owns its own context.
///
/// Results come back in input order. If `config` cannot be allocated every
/// file reports the allocation error.
pub fn scan_files_parallel(paths: &[PathBuf], config: ScannerConfig) -> Vec<FileScan> {
    paths
        .par_iter()
        .map_init(
            || (DecoderContext::with_config(config), ScanDriver::new()),
            |(ctx, driver), path| {
                let outcome = match ctx {
                    Ok(ctx) => load_luma_fitted(path, &config)
                        .map_err(ImageScanError::from)
                        .and_then(|image| Ok(scan_luma_with(ctx, driver, &image)?)),
                    Err(err) => Err(ImageScanError::from(err.clone())),
                };
                FileScan {
                    path: path.clone(),
                    outcome,
                }
            },
        )
        .collect()
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "pgm"];

/// Image paths under `root` (recursive), sorted, optionally truncated
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
) -> impl Iterator<Item = PathBuf> {
    let mut images = Vec::new();
    collect_images(root.as_ref(), &mut images);
    images.sort();
    images.into_iter().take(limit.unwrap_or(usize::MAX))
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| IMAGE_EXTENSIONS.iter().any(|known| ext.eq_ignore_ascii_case(known)))
}

fn collect_images(dir: &Path, images: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        tracing::debug!(dir = %dir.display(), "skipping unreadable directory");
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect_images(&path, images);
        } else if is_image(&path) {
            images.push(path);
        }
    }
}
