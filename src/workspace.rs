//! Scratch workspace reservation for engine region segmentation
//!
//! Engines in the quirc family flood-fill connected regions with an explicit
//! stack whose worst-case depth is proportional to the frame height. The
//! context records how many stack slots it was sized for; engines check that
//! reservation in [`DecodeEngine::init`](crate::DecodeEngine::init) and reject
//! resolutions it cannot cover. The rqrr engine keeps its own stack, so only
//! the count is carried here.

/// Number of flood-fill slots reserved for a context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Workspace {
    slots: usize,
}

impl Workspace {
    /// Reserve `slots` entries
    pub const fn new(slots: usize) -> Self {
        Self { slots }
    }

    /// Number of reserved slots
    #[inline]
    pub fn len(&self) -> usize {
        self.slots
    }

    /// True if no slots are reserved
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots == 0
    }

    /// Largest frame height this reservation covers
    pub fn max_rows(&self) -> usize {
        // Inverse of `workspace_slots_for`, which rounds down
        (self.slots * 3 + 2) / 2
    }
}
