//! `rqrr`-backed engine
//!
//! `end` prepares the frame, detects grids and samples each grid's modules
//! into an owned [`Code`]. `decode` feeds a sampled code back through rqrr's
//! bit-grid decoder (format info, Reed-Solomon, data segments).

use super::{DecodeEngine, Payload, check_workspace};
use crate::error::{ConfigError, DecodeError};
use crate::frame::FrameView;
use crate::workspace::Workspace;
use rqrr::BitGrid;

/// A located code: sampled module grid plus its corners in the frame
#[derive(Debug, Clone)]
pub struct Code {
    size: usize,
    cells: Vec<bool>,
    corners: [(i32, i32); 4],
}

impl Code {
    fn sample<G: BitGrid>(grid: &rqrr::Grid<G>) -> Self {
        let size = grid.grid.size();
        let mut cells = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                cells.push(grid.grid.bit(y, x));
            }
        }
        Self {
            size,
            cells,
            corners: std::array::from_fn(|i| (grid.bounds[i].x, grid.bounds[i].y)),
        }
    }

    /// Modules per side
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether module (x, y) is dark
    pub fn module(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.size + x]
    }

    /// Corner points in frame coordinates
    pub fn corners(&self) -> [(i32, i32); 4] {
        self.corners
    }
}

impl BitGrid for Code {
    fn size(&self) -> usize {
        self.size
    }

    fn bit(&self, y: usize, x: usize) -> bool {
        self.cells[y * self.size + x]
    }
}

/// Engine state between `begin` and the next `begin`
#[derive(Default)]
pub struct RqrrEngine {
    hor_res: usize,
    ver_res: usize,
    codes: Vec<Code>,
    pending: bool,
}

impl RqrrEngine {
    /// Create an unbound engine
    pub fn new() -> Self {
        Self::default()
    }
}

impl DecodeEngine for RqrrEngine {
    type Candidate = Code;

    fn init(
        &mut self,
        hor_res: usize,
        ver_res: usize,
        workspace: &Workspace,
    ) -> Result<(), ConfigError> {
        check_workspace(ver_res, workspace)?;
        self.hor_res = hor_res;
        self.ver_res = ver_res;
        self.codes.clear();
        self.pending = false;
        Ok(())
    }

    fn begin(&mut self) {
        self.codes.clear();
        self.pending = true;
    }

    fn end(&mut self, frame: FrameView<'_>) {
        if !self.pending {
            tracing::warn!("end() without begin(); analysing anyway");
        }
        self.pending = false;
        if (frame.width(), frame.height()) != (self.hor_res, self.ver_res) {
            tracing::debug!(
                width = frame.width(),
                height = frame.height(),
                "frame size differs from the initialised resolution"
            );
        }

        if frame.is_empty() {
            return;
        }

        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            frame.width(),
            frame.height(),
            |x, y| frame.pixel(x, y),
        );
        let grids = prepared.detect_grids();
        self.codes.extend(grids.iter().map(Code::sample));
        tracing::trace!(codes = self.codes.len(), "grid detection done");
    }

    fn count(&self) -> usize {
        self.codes.len()
    }

    fn extract(&self, index: usize) -> Option<Code> {
        self.codes.get(index).cloned()
    }

    fn decode(&self, candidate: &Code) -> Result<Payload, DecodeError> {
        let grid = rqrr::Grid {
            grid: candidate.clone(),
            bounds: candidate.corners.map(|(x, y)| rqrr::Point { x, y }),
        };
        let mut bytes = Vec::new();
        let meta = grid
            .decode_to(&mut bytes)
            .map_err(|e| DecodeError::new(e.to_string()))?;
        Ok(Payload {
            bytes,
            version: meta.version.0,
            ecc_level: meta.ecc_level as u8,
            mask: meta.mask as u8,
        })
    }
}
