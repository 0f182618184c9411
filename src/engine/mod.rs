//! Decoding engine contract
//!
//! The driver treats the QR pipeline (finder location, perspective
//! rectification, module sampling, error correction, bitstream parsing) as a
//! black box reached through [`DecodeEngine`]:
//! - `init` binds the engine to a resolution and scratch workspace
//! - `begin` / `end` bracket one analysis of the current frame
//! - `count` / `extract` enumerate located candidates
//! - `decode` turns a candidate into a [`Payload`]

use crate::config::workspace_slots_for;
use crate::error::{ConfigError, DecodeError};
use crate::frame::FrameView;
use crate::workspace::Workspace;

/// Default engine backed by the `rqrr` crate
pub mod rqrr_engine;

pub use rqrr_engine::{Code, RqrrEngine};

/// Narrow call contract of an external QR decoding library
pub trait DecodeEngine {
    /// A located, not yet decoded code
    type Candidate;

    /// Bind to a `hor_res x ver_res` frame using `workspace` for scratch.
    ///
    /// Must reject sizings the engine cannot honour with
    /// [`ConfigError::InitializationFailure`].
    fn init(
        &mut self,
        hor_res: usize,
        ver_res: usize,
        workspace: &Workspace,
    ) -> Result<(), ConfigError>;

    /// Mark the frame contents as ready for analysis
    fn begin(&mut self);

    /// Run detection on `frame`; blocks until all candidates are located
    fn end(&mut self, frame: FrameView<'_>);

    /// Number of candidates located by the last `end`
    fn count(&self) -> usize;

    /// Copy out candidate `index`
    fn extract(&self, index: usize) -> Option<Self::Candidate>;

    /// Decode a candidate's data segments
    fn decode(&self, candidate: &Self::Candidate) -> Result<Payload, DecodeError>;
}

/// Workspace check shared by quirc-style engines
pub fn check_workspace(ver_res: usize, workspace: &Workspace) -> Result<(), ConfigError> {
    let required = workspace_slots_for(ver_res);
    if workspace.len() < required {
        return Err(ConfigError::InitializationFailure {
            reason: format!(
                "workspace has {} slots (up to {} rows), {} required for {} rows",
                workspace.len(),
                workspace.max_rows(),
                required,
                ver_res
            ),
        });
    }
    Ok(())
}

/// Decoded contents of one QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    /// Raw data bytes
    pub bytes: Vec<u8>,
    /// Symbol version (1-40)
    pub version: usize,
    /// Error correction level as encoded in the format bits
    pub ecc_level: u8,
    /// Mask pattern (0-7)
    pub mask: u8,
}

impl Payload {
    /// Payload with only data bytes and unknown metadata
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
            version: 0,
            ecc_level: 0,
            mask: 0,
        }
    }

    /// Data as text; invalid UTF-8 sequences are replaced
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Number of data bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the code carried no data
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
