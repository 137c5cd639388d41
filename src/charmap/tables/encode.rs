//! Codepoint -> byte sequence index.
//!
//! # Layout
//! ```text
//! index[256]        high byte of codepoint -> base offset | absent
//! lookup[len]       [reserved area][segment][segment]...
//! lookup[base + low byte of codepoint] = byte sequence | UNMAPPABLE_ENCODING
//! ```
//!
//! Segments are allocated on first sight of a high byte, in the order entries
//! are fed in. The resulting offsets therefore depend on file order, primary
//! map first and encode-only overrides second, and must be built by a single
//! forward pass.

use log::trace;

use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::{EncodeOrigin, SEGMENT_SIZE, UNMAPPABLE_DECODING, UNMAPPABLE_ENCODING};
use crate::charmap::utils;

/// Cells addressable through 16-bit base offsets.
pub const INDEX_LIMIT: u32 = 0x10000;

/// Marker emitted for high bytes that never received a segment.
///
/// Base offsets are multiples of 0x100, so the marker never collides.
pub const ABSENT_SEGMENT: u32 = UNMAPPABLE_DECODING;

#[derive(Debug, Clone)]
pub struct EncodeIndex {
    name: &'static str,
    reserved: u32,
    index: Vec<Option<u32>>,
    lookup: Vec<u32>,
    origins: Vec<Option<EncodeOrigin>>,
}

impl EncodeIndex {
    /// Create an index whose first `reserved` lookup cells form an
    /// always-present unmappable area.
    pub fn new(name: &'static str, reserved: u32) -> Self {
        Self {
            name,
            reserved,
            index: vec![None; SEGMENT_SIZE],
            lookup: vec![UNMAPPABLE_ENCODING; reserved as usize],
            origins: vec![None; reserved as usize],
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn reserved(&self) -> u32 {
        self.reserved
    }

    /// Ensure the segment for `codepoint`'s high byte exists; returns its base offset.
    pub fn allocate(&mut self, codepoint: u32) -> Result<u32> {
        self.allocate_segment(utils::high_byte(codepoint))
    }

    /// Ensure the segment for `high` exists; returns its base offset.
    ///
    /// # Errors
    /// [`CharmapError::StructuralOverflow`] when the new segment would end past
    /// [`INDEX_LIMIT`].
    pub fn allocate_segment(&mut self, high: usize) -> Result<u32> {
        if let Some(base) = self.index[high] {
            return Ok(base);
        }
        let base = self.lookup.len() as u32;
        if base + SEGMENT_SIZE as u32 > INDEX_LIMIT {
            return Err(CharmapError::StructuralOverflow {
                index: self.name,
                high_byte: high as u8,
                limit: INDEX_LIMIT,
            });
        }
        trace!("{}: segment {:#04x} allocated at {:#06x}", self.name, high, base);
        self.index[high] = Some(base);
        self.lookup.resize(self.lookup.len() + SEGMENT_SIZE, UNMAPPABLE_ENCODING);
        self.origins.resize(self.origins.len() + SEGMENT_SIZE, None);
        Ok(base)
    }

    /// Record a primary-map pair. When several byte sequences map to one
    /// codepoint, the first one fed in stays.
    pub fn insert_canonical(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        let slot = self.allocate(codepoint)? as usize + utils::low_byte(codepoint);
        if self.origins[slot].is_none() {
            self.lookup[slot] = bytes;
            self.origins[slot] = Some(EncodeOrigin::Canonical);
        }
        Ok(())
    }

    /// Record an encode-only pair. Overrides replace whatever the cell held,
    /// so the last override for a codepoint wins.
    pub fn insert_override(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        let slot = self.allocate(codepoint)? as usize + utils::low_byte(codepoint);
        self.lookup[slot] = bytes;
        self.origins[slot] = Some(EncodeOrigin::Override);
        Ok(())
    }

    fn slot(&self, codepoint: u32) -> Option<usize> {
        self.index[utils::high_byte(codepoint)].map(|base| base as usize + utils::low_byte(codepoint))
    }

    /// The byte sequence for `codepoint`, if any. A cell counts as filled by
    /// its origin, so a byte sequence equal to the sentinel still resolves.
    pub fn lookup(&self, codepoint: u32) -> Option<u32> {
        self.slot(codepoint)
            .filter(|&slot| self.origins[slot].is_some())
            .map(|slot| self.lookup[slot])
    }

    pub fn origin(&self, codepoint: u32) -> Option<EncodeOrigin> {
        self.slot(codepoint).and_then(|slot| self.origins[slot])
    }

    pub fn base_offset(&self, high: usize) -> Option<u32> {
        self.index.get(high).copied().flatten()
    }

    pub fn is_used(&self, high: usize) -> bool {
        self.base_offset(high).is_some()
    }

    pub fn used_segments(&self) -> usize {
        self.index.iter().filter(|base| base.is_some()).count()
    }

    /// Length of the lookup region, reserved area included.
    pub fn len(&self) -> u32 {
        self.lookup.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.used_segments() == 0
    }

    pub fn lookup_cells(&self) -> &[u32] {
        &self.lookup
    }

    /// The 256 index cells as emitted: base offset or [`ABSENT_SEGMENT`].
    pub fn index_units(&self) -> Vec<u16> {
        self.index
            .iter()
            .map(|base| utils::to_unit(base.unwrap_or(ABSENT_SEGMENT)))
            .collect()
    }
}

/// Two independent indices: BMP codepoints and supplementary codepoints.
///
/// The supplementary index is keyed by bits 8-15 like the BMP one, which only
/// works while every supplementary codepoint shares a single plane.
#[derive(Debug, Clone)]
pub struct SplitEncodeIndex {
    bmp: EncodeIndex,
    supp: EncodeIndex,
    supp_plane: Option<u32>,
}

impl SplitEncodeIndex {
    pub fn new(reserved: u32) -> Self {
        Self {
            bmp: EncodeIndex::new("bmp", reserved),
            supp: EncodeIndex::new("supplementary", reserved),
            supp_plane: None,
        }
    }

    pub fn bmp(&self) -> &EncodeIndex {
        &self.bmp
    }

    pub fn supp(&self) -> &EncodeIndex {
        &self.supp
    }

    /// The plane shared by all supplementary codepoints, once one was seen.
    pub fn supp_plane(&self) -> Option<u32> {
        self.supp_plane
    }

    fn route(&mut self, codepoint: u32) -> Result<&mut EncodeIndex> {
        if codepoint < 0x10000 {
            return Ok(&mut self.bmp);
        }
        let plane = codepoint >> 16;
        match self.supp_plane {
            Some(expected) if expected != plane => {
                return Err(CharmapError::MixedSupplementaryPlanes {
                    expected,
                    found: codepoint,
                })
            }
            Some(_) => {}
            None => self.supp_plane = Some(plane),
        }
        Ok(&mut self.supp)
    }

    pub fn allocate(&mut self, codepoint: u32) -> Result<u32> {
        self.route(codepoint)?.allocate(codepoint)
    }

    pub fn insert_canonical(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        self.route(codepoint)?.insert_canonical(codepoint, bytes)
    }

    pub fn insert_override(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        self.route(codepoint)?.insert_override(codepoint, bytes)
    }

    pub fn lookup(&self, codepoint: u32) -> Option<u32> {
        if codepoint < 0x10000 {
            self.bmp.lookup(codepoint)
        } else if self.supp_plane == Some(codepoint >> 16) {
            self.supp.lookup(codepoint)
        } else {
            None
        }
    }

    pub fn origin(&self, codepoint: u32) -> Option<EncodeOrigin> {
        if codepoint < 0x10000 {
            self.bmp.origin(codepoint)
        } else if self.supp_plane == Some(codepoint >> 16) {
            self.supp.origin(codepoint)
        } else {
            None
        }
    }
}

/// Anything the primary and override passes can feed pairs into.
pub trait EncodeTarget {
    fn allocate(&mut self, codepoint: u32) -> Result<u32>;
    fn insert_canonical(&mut self, codepoint: u32, bytes: u32) -> Result<()>;
    fn insert_override(&mut self, codepoint: u32, bytes: u32) -> Result<()>;
}

impl EncodeTarget for EncodeIndex {
    fn allocate(&mut self, codepoint: u32) -> Result<u32> {
        EncodeIndex::allocate(self, codepoint)
    }

    fn insert_canonical(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        EncodeIndex::insert_canonical(self, codepoint, bytes)
    }

    fn insert_override(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        EncodeIndex::insert_override(self, codepoint, bytes)
    }
}

impl EncodeTarget for SplitEncodeIndex {
    fn allocate(&mut self, codepoint: u32) -> Result<u32> {
        SplitEncodeIndex::allocate(self, codepoint)
    }

    fn insert_canonical(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        SplitEncodeIndex::insert_canonical(self, codepoint, bytes)
    }

    fn insert_override(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        SplitEncodeIndex::insert_override(self, codepoint, bytes)
    }
}
