//! Error types for configuration and decoding

use thiserror::Error;

/// Errors returned by [`DecoderContext::configure`](crate::DecoderContext::configure)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Requested resolution exceeds the frame buffer maxima
    #[error("Maximum resolution for the QR scanner is {max_hor_res}x{max_ver_res}")]
    OutOfBounds {
        /// Requested horizontal resolution
        hor_res: usize,
        /// Requested vertical resolution
        ver_res: usize,
        /// Configured horizontal maximum
        max_hor_res: usize,
        /// Configured vertical maximum
        max_ver_res: usize,
    },

    /// The engine rejected the buffer/workspace sizing
    #[error("Invalid buffer size for this decoder: {reason}")]
    InitializationFailure {
        /// Engine-provided detail
        reason: String,
    },
}

/// A located candidate that could not be turned into a payload
///
/// Checksum/error-correction failures, unsupported encodings and malformed
/// structure all land here.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("decode failed: {reason}")]
pub struct DecodeError {
    /// Engine-provided detail
    pub reason: String,
}

impl DecodeError {
    /// Create a decode error from any displayable reason
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors from scanning an image file
#[derive(Debug, Error)]
pub enum ImageScanError {
    /// The file could not be opened or decoded as an image
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),

    /// The image could not be bound to a decoder context
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_reports_maxima() {
        let err = ConfigError::OutOfBounds {
            hor_res: 200,
            ver_res: 100,
            max_hor_res: 128,
            max_ver_res: 128,
        };
        assert_eq!(
            err.to_string(),
            "Maximum resolution for the QR scanner is 128x128"
        );
    }

    #[test]
    fn test_initialization_failure_message() {
        let err = ConfigError::InitializationFailure {
            reason: "workspace has 4 slots, 85 required".into(),
        };
        assert!(err.to_string().starts_with("Invalid buffer size for this decoder"));
        assert_eq!(
            DecodeError::new("data ecc").to_string(),
            "decode failed: data ecc"
        );
    }
}
