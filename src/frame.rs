//! Fixed-capacity grayscale frame storage
//!
//! The buffer is allocated once at the configured maxima and never resized.
//! Capture code writes raw 8-bit luminance straight into [`FrameBuffer::as_mut_bytes`];
//! the decoder later reinterprets the leading `hor_res * ver_res` bytes as a
//! row-major image of the configured logical size.

use crate::error::ConfigError;
use image::GrayImage;

/// Grayscale pixel storage sized for the maximum resolution
pub struct FrameBuffer {
    pixels: Box<[u8]>,
    max_hor_res: usize,
    max_ver_res: usize,
}

impl FrameBuffer {
    /// Allocate a zeroed buffer of `max_hor_res * max_ver_res` bytes.
    ///
    /// Fails with [`ConfigError::InitializationFailure`] if the size
    /// overflows `usize`.
    pub fn new(max_hor_res: usize, max_ver_res: usize) -> Result<Self, ConfigError> {
        let capacity = max_hor_res.checked_mul(max_ver_res).ok_or_else(|| {
            ConfigError::InitializationFailure {
                reason: format!("frame buffer of {max_hor_res}x{max_ver_res} overflows usize"),
            }
        })?;
        Ok(Self {
            pixels: vec![0u8; capacity].into_boxed_slice(),
            max_hor_res,
            max_ver_res,
        })
    }

    /// Maximum horizontal resolution
    #[inline]
    pub fn max_hor_res(&self) -> usize {
        self.max_hor_res
    }

    /// Maximum vertical resolution
    #[inline]
    pub fn max_ver_res(&self) -> usize {
        self.max_ver_res
    }

    /// Total byte capacity
    #[inline]
    pub fn capacity(&self) -> usize {
        self.pixels.len()
    }

    /// Raw view of the whole buffer
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Raw mutable view of the whole buffer for capture code.
    ///
    /// Writers are expected to respect the configured logical dimensions.
    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Set every byte to `value`
    pub fn fill(&mut self, value: u8) {
        self.pixels.fill(value);
    }

    /// Reinterpret the buffer as a `hor_res x ver_res` image.
    ///
    /// Returns `None` if the dimensions exceed the maxima.
    pub fn view(&self, hor_res: usize, ver_res: usize) -> Option<FrameView<'_>> {
        if hor_res > self.max_hor_res || ver_res > self.max_ver_res {
            return None;
        }
        Some(FrameView {
            pixels: &self.pixels[..hor_res * ver_res],
            width: hor_res,
            height: ver_res,
        })
    }

    /// Copy a grayscale image into the buffer using the image width as stride.
    ///
    /// Returns the image dimensions so the caller can configure the context
    /// to match.
    pub fn load_luma(&mut self, image: &GrayImage) -> Result<(usize, usize), ConfigError> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        if width > self.max_hor_res || height > self.max_ver_res {
            return Err(ConfigError::OutOfBounds {
                hor_res: width,
                ver_res: height,
                max_hor_res: self.max_hor_res,
                max_ver_res: self.max_ver_res,
            });
        }
        self.pixels[..width * height].copy_from_slice(image.as_raw());
        Ok((width, height))
    }
}

/// Borrowed logical image over a [`FrameBuffer`]
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pixels: &'a [u8],
    width: usize,
    height: usize,
}

impl<'a> FrameView<'a> {
    /// Wrap an arbitrary row-major luminance slice.
    ///
    /// Returns `None` if `pixels` is shorter than `width * height`.
    pub fn new(pixels: &'a [u8], width: usize, height: usize) -> Option<Self> {
        let len = width.checked_mul(height)?;
        if pixels.len() < len {
            return None;
        }
        Some(Self {
            pixels: &pixels[..len],
            width,
            height,
        })
    }

    /// Width in pixels
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Luminance at (x, y)
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        self.pixels[y * self.width + x]
    }

    /// Underlying row-major bytes
    pub fn as_bytes(&self) -> &'a [u8] {
        self.pixels
    }

    /// True if either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Luminance range and mean, `None` for an empty frame
    pub fn luma_stats(&self) -> Option<LumaStats> {
        let (&first, rest) = self.pixels.split_first()?;
        let (darkest, brightest, sum) = rest.iter().fold(
            (first, first, u64::from(first)),
            |(lo, hi, sum), &p| (lo.min(p), hi.max(p), sum + u64::from(p)),
        );
        Some(LumaStats {
            darkest,
            brightest,
            mean: (sum / self.pixels.len() as u64) as u8,
        })
    }
}

/// Exposure summary of a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LumaStats {
    /// Lowest luminance
    pub darkest: u8,
    /// Highest luminance
    pub brightest: u8,
    /// Mean luminance, rounded down
    pub mean: u8,
}

impl LumaStats {
    /// Spread between the darkest and brightest pixel.
    ///
    /// Zero for a uniform frame, which can never contain a code.
    pub fn contrast(&self) -> u8 {
        self.brightest - self.darkest
    }
}
