//! qr_driver - embeddable single-shot QR code scanning
//!
//! A small driver around a black-box QR decoding engine, built for constrained
//! capture loops:
//! - [`FrameBuffer`]: fixed-capacity grayscale storage, filled by capture code
//! - [`DecoderContext`]: frame buffer + scratch workspace + engine, configured
//!   with the actual (sub-maximum) resolution
//! - [`ScanDriver`]: runs one detection/decode pass and reports the first code
//!
//! Everything is allocated when the context is created; scans reuse it.
//!
//! ```
//! use qr_driver::{DecoderContext, ScanDriver};
//!
//! let mut ctx = DecoderContext::new();
//! ctx.configure(96, 96).unwrap();
//! ctx.frame_buffer_mut().fill(255); // capture code writes pixels here
//!
//! let mut driver = ScanDriver::new();
//! assert_eq!(driver.scan(&mut ctx), None);
//! ```

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Sizing defaults and environment overrides
pub mod config;
/// Decoder context lifecycle (Unconfigured / Configured)
pub mod context;
/// Scan orchestration and outcomes
pub mod driver;
/// Engine contract and the rqrr-backed engine
pub mod engine;
/// Configuration and decode error types
pub mod error;
/// Frame buffer and logical frame views
pub mod frame;
/// Image file helpers for the CLI and tests
pub mod tools;
/// Scratch workspace reservation checked by engines
pub mod workspace;

pub use config::{DEFAULT_MAX_HOR_RES, DEFAULT_MAX_VER_RES, ScannerConfig};
pub use context::{ContextState, DecoderContext};
pub use driver::{ScanDriver, ScanOutcome, ScanStats};
pub use engine::{DecodeEngine, Payload, RqrrEngine};
pub use error::{ConfigError, DecodeError, ImageScanError};
pub use frame::{FrameBuffer, FrameView, LumaStats};
pub use workspace::Workspace;

/// Scan a grayscale image with a one-off default context.
///
/// Fails with [`ConfigError::OutOfBounds`] if the image exceeds the default
/// 128x128 maxima.
pub fn scan_luma(image: &image::GrayImage) -> Result<Option<String>, ConfigError> {
    let mut ctx = DecoderContext::new();
    let mut driver = ScanDriver::new();
    tools::scan_luma_with(&mut ctx, &mut driver, image).map(ScanOutcome::into_text)
}
