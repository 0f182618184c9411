//! Single-shot scan orchestration
//!
//! One scan: begin, end (detection), count, extract the first candidate,
//! decode it. Only the first candidate is ever reported, even if the engine
//! located several.

use crate::context::DecoderContext;
use crate::engine::{DecodeEngine, Payload};
use crate::error::DecodeError;

/// Result of one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// No candidate located (or the context is not configured)
    NotFound,
    /// A candidate was located but its data could not be decoded
    DecodeFailed(DecodeError),
    /// First candidate decoded
    Found(Payload),
}

impl ScanOutcome {
    /// The payload, if found
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            ScanOutcome::Found(payload) => Some(payload),
            _ => None,
        }
    }

    /// Collapse to text; decode failures read as "nothing found"
    pub fn into_text(self) -> Option<String> {
        match self {
            ScanOutcome::Found(payload) => Some(payload.text()),
            ScanOutcome::NotFound | ScanOutcome::DecodeFailed(_) => None,
        }
    }
}

/// Running counters over every scan a driver performed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Scans attempted
    pub scans: usize,
    /// Scans that returned a payload
    pub found: usize,
    /// Scans with no candidate
    pub not_found: usize,
    /// Scans whose first candidate failed to decode
    pub decode_failed: usize,
}

impl ScanStats {
    fn record(&mut self, outcome: &ScanOutcome) {
        self.scans += 1;
        match outcome {
            ScanOutcome::NotFound => self.not_found += 1,
            ScanOutcome::DecodeFailed(_) => self.decode_failed += 1,
            ScanOutcome::Found(_) => self.found += 1,
        }
    }

    /// Fraction of scans that produced a payload
    pub fn reading_rate(&self) -> f64 {
        if self.scans == 0 {
            0.0
        } else {
            self.found as f64 / self.scans as f64
        }
    }
}

/// Runs scans against a [`DecoderContext`]
#[derive(Debug, Default)]
pub struct ScanDriver {
    stats: ScanStats,
}

impl ScanDriver {
    /// Create a driver with zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan the current frame and return the first payload as text.
    ///
    /// Returns `None` when nothing is visible or the first code fails to
    /// decode. Never fails.
    pub fn scan<E: DecodeEngine>(&mut self, ctx: &mut DecoderContext<E>) -> Option<String> {
        self.scan_outcome(ctx).into_text()
    }

    /// Scan the current frame keeping the decode-failure distinction
    pub fn scan_outcome<E: DecodeEngine>(&mut self, ctx: &mut DecoderContext<E>) -> ScanOutcome {
        let outcome = run_scan(ctx);
        self.stats.record(&outcome);
        outcome
    }

    /// Counters so far
    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Zero the counters
    pub fn reset_stats(&mut self) {
        self.stats = ScanStats::default();
    }
}

fn run_scan<E: DecodeEngine>(ctx: &mut DecoderContext<E>) -> ScanOutcome {
    let debug = ctx.config().debug;
    let Some((engine, frame)) = ctx.engine_and_frame() else {
        tracing::warn!("scan() called before configure()");
        return ScanOutcome::NotFound;
    };

    if debug {
        if let Some(luma) = frame.luma_stats() {
            tracing::debug!(
                darkest = luma.darkest,
                brightest = luma.brightest,
                mean = luma.mean,
                "frame luma"
            );
        }
    }

    engine.begin();
    engine.end(frame);

    let num_codes = engine.count();
    if debug {
        tracing::debug!(num_codes, "detection finished");
    }
    if num_codes == 0 {
        return ScanOutcome::NotFound;
    }

    // First code only
    let Some(candidate) = engine.extract(0) else {
        return ScanOutcome::NotFound;
    };
    if debug {
        tracing::debug!("extract done");
    }

    match engine.decode(&candidate) {
        Ok(payload) => {
            if debug {
                tracing::debug!(data = %payload.text(), len = payload.len(), "decoded");
            }
            ScanOutcome::Found(payload)
        }
        Err(err) => {
            if debug {
                tracing::debug!(error = %err, "decode failed");
            }
            ScanOutcome::DecodeFailed(err)
        }
    }
}
