//! Decoder context: frame buffer, scratch workspace and engine bound together
//!
//! The context is created once with its maxima and lives as long as the caller
//! keeps it. `configure` may be called any number of times; each success
//! reinterprets the same buffers at the new resolution.

use crate::config::ScannerConfig;
use crate::engine::{DecodeEngine, RqrrEngine};
use crate::error::ConfigError;
use crate::frame::{FrameBuffer, FrameView};
use crate::workspace::Workspace;

/// Whether `configure` has succeeded yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextState {
    /// No successful `configure` so far
    Unconfigured,
    /// Bound to a logical resolution
    Configured {
        /// Logical width
        hor_res: usize,
        /// Logical height
        ver_res: usize,
    },
}

/// Owns every buffer a scan needs
pub struct DecoderContext<E: DecodeEngine = RqrrEngine> {
    config: ScannerConfig,
    frame: FrameBuffer,
    workspace: Workspace,
    engine: E,
    state: ContextState,
}

impl DecoderContext<RqrrEngine> {
    /// Context with the default 128x128 maxima and the rqrr engine
    pub fn new() -> Self {
        Self::with_engine(ScannerConfig::default(), RqrrEngine::new())
            .expect("default maxima fit in usize")
    }

    /// Context with custom sizing and the rqrr engine
    pub fn with_config(config: ScannerConfig) -> Result<Self, ConfigError> {
        Self::with_engine(config, RqrrEngine::new())
    }
}

impl Default for DecoderContext<RqrrEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: DecodeEngine> DecoderContext<E> {
    /// Allocate the frame buffer for `config` and take `engine`.
    ///
    /// This is the only place the context allocates. Fails with
    /// [`ConfigError::InitializationFailure`] if the maxima overflow `usize`.
    pub fn with_engine(config: ScannerConfig, engine: E) -> Result<Self, ConfigError> {
        tracing::debug!(
            max_hor_res = config.max_hor_res,
            max_ver_res = config.max_ver_res,
            workspace_slots = config.workspace_slots,
            "allocating decoder context"
        );
        Ok(Self {
            frame: FrameBuffer::new(config.max_hor_res, config.max_ver_res)?,
            workspace: Workspace::new(config.workspace_slots),
            engine,
            state: ContextState::Unconfigured,
            config,
        })
    }

    /// Bind the context to a logical `hor_res x ver_res` frame.
    ///
    /// On failure the previous configuration stays in effect.
    pub fn configure(&mut self, hor_res: usize, ver_res: usize) -> Result<(), ConfigError> {
        if hor_res > self.config.max_hor_res || ver_res > self.config.max_ver_res {
            return Err(ConfigError::OutOfBounds {
                hor_res,
                ver_res,
                max_hor_res: self.config.max_hor_res,
                max_ver_res: self.config.max_ver_res,
            });
        }

        if let Err(err) = self.engine.init(hor_res, ver_res, &self.workspace) {
            tracing::warn!(hor_res, ver_res, error = %err, "engine rejected configuration");
            return Err(err);
        }

        self.state = ContextState::Configured { hor_res, ver_res };
        tracing::debug!(hor_res, ver_res, "decoder context configured");
        Ok(())
    }

    /// Current state
    pub fn state(&self) -> ContextState {
        self.state
    }

    /// Configured logical resolution, if any
    pub fn resolution(&self) -> Option<(usize, usize)> {
        match self.state {
            ContextState::Configured { hor_res, ver_res } => Some((hor_res, ver_res)),
            ContextState::Unconfigured => None,
        }
    }

    /// Sizing the context was created with
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// The frame buffer
    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.frame
    }

    /// The frame buffer, for capture code to write into
    pub fn frame_buffer_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    /// The engine
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// The frame buffer seen at the configured resolution
    pub fn frame(&self) -> Option<FrameView<'_>> {
        let (hor_res, ver_res) = self.resolution()?;
        self.frame.view(hor_res, ver_res)
    }

    /// Split borrow of the engine and the configured frame
    pub(crate) fn engine_and_frame(&mut self) -> Option<(&mut E, FrameView<'_>)> {
        let (hor_res, ver_res) = self.resolution()?;
        let frame = self.frame.view(hor_res, ver_res)?;
        Some((&mut self.engine, frame))
    }
}
