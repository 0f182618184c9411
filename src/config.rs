//! Scanner configuration
//!
//! Compile-time defaults for the frame buffer maxima, optionally overridden
//! from the environment:
//! - `QR_MAX_HOR_RES` / `QR_MAX_VER_RES` - frame buffer capacity
//! - `QR_WORKSPACE_SLOTS` - scratch slots handed to the engine
//! - `QR_DEBUG` - enable per-scan diagnostic lines
//!
//! Every variable is read each time [`ScannerConfig::from_env`] is called.

/// Default maximum horizontal resolution of the frame buffer
pub const DEFAULT_MAX_HOR_RES: usize = 128;
/// Default maximum vertical resolution of the frame buffer
pub const DEFAULT_MAX_VER_RES: usize = 128;

/// Number of flood-fill scratch slots the engine needs for a frame of
/// `ver_res` rows.
pub const fn workspace_slots_for(ver_res: usize) -> usize {
    let slots = ver_res * 2 / 3;
    if slots == 0 { 1 } else { slots }
}

fn parse_env_usize<F>(lookup: &F, name: &str, default: usize) -> usize
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

/// Sizing and diagnostics for a [`DecoderContext`](crate::DecoderContext)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScannerConfig {
    /// Maximum horizontal resolution accepted by `configure`
    pub max_hor_res: usize,
    /// Maximum vertical resolution accepted by `configure`
    pub max_ver_res: usize,
    /// Scratch slots allocated for the engine's region segmentation
    pub workspace_slots: usize,
    /// Emit diagnostic lines for each scan
    pub debug: bool,
}

impl ScannerConfig {
    /// Default 128x128 configuration with debug output off
    pub const fn new() -> Self {
        Self {
            max_hor_res: DEFAULT_MAX_HOR_RES,
            max_ver_res: DEFAULT_MAX_VER_RES,
            workspace_slots: workspace_slots_for(DEFAULT_MAX_VER_RES),
            debug: false,
        }
    }

    /// Defaults overridden by `QR_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each `QR_*` name.
    ///
    /// Unparseable values fall back to the default. Maxima whose product
    /// overflows `usize` fall back to the default maxima.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut max_hor_res = parse_env_usize(&lookup, "QR_MAX_HOR_RES", DEFAULT_MAX_HOR_RES);
        let mut max_ver_res = parse_env_usize(&lookup, "QR_MAX_VER_RES", DEFAULT_MAX_VER_RES);
        if max_hor_res.checked_mul(max_ver_res).is_none() {
            tracing::warn!(max_hor_res, max_ver_res, "frame maxima overflow; using defaults");
            max_hor_res = DEFAULT_MAX_HOR_RES;
            max_ver_res = DEFAULT_MAX_VER_RES;
        }
        let workspace_slots = parse_env_usize(
            &lookup,
            "QR_WORKSPACE_SLOTS",
            workspace_slots_for(max_ver_res),
        );
        Self {
            max_hor_res,
            max_ver_res,
            workspace_slots,
            debug: lookup("QR_DEBUG").is_some(),
        }
    }

    /// Change the maxima; the workspace is resized to match the new height
    pub fn with_max_resolution(mut self, max_hor_res: usize, max_ver_res: usize) -> Self {
        self.max_hor_res = max_hor_res;
        self.max_ver_res = max_ver_res;
        self.workspace_slots = workspace_slots_for(max_ver_res);
        self
    }

    /// Override the number of workspace slots
    pub fn with_workspace_slots(mut self, slots: usize) -> Self {
        self.workspace_slots = slots;
        self
    }

    /// Toggle diagnostic output
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Byte capacity of the frame buffer, `None` if it overflows `usize`
    pub fn frame_capacity(&self) -> Option<usize> {
        self.max_hor_res.checked_mul(self.max_ver_res)
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::new()
    }
}
