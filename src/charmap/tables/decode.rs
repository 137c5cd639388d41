//! Byte sequence -> codepoint tables.
//!
//! A table is flat over its whole byte space (256 cells for single-byte, 64K
//! for double-byte) and partitioned into 256-cell segments keyed by the high
//! byte. Each segment counts the cells holding an entry, so segments that
//! stayed all-unmappable can be emitted as absent instead of materialized.

use std::fmt;

use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::{ByteRange, SEGMENT_SIZE, UNMAPPABLE_DECODING};
use crate::charmap::utils;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableWidth {
    SingleByte,
    DoubleByte,
}

impl TableWidth {
    pub fn cells(&self) -> usize {
        match self {
            TableWidth::SingleByte => SEGMENT_SIZE,
            TableWidth::DoubleByte => SEGMENT_SIZE * SEGMENT_SIZE,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableWidth::SingleByte => "single-byte",
            TableWidth::DoubleByte => "double-byte",
        }
    }
}

impl fmt::Display for TableWidth {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone)]
pub struct DecodeTable {
    width: TableWidth,
    cells: Vec<u32>,
    occupied: Vec<bool>,
    filled: Vec<usize>,
}

impl DecodeTable {
    pub fn new(width: TableWidth) -> Self {
        let cells = width.cells();
        Self {
            width,
            cells: vec![UNMAPPABLE_DECODING; cells],
            occupied: vec![false; cells],
            filled: vec![0; cells / SEGMENT_SIZE],
        }
    }

    pub fn single_byte() -> Self {
        Self::new(TableWidth::SingleByte)
    }

    pub fn double_byte() -> Self {
        Self::new(TableWidth::DoubleByte)
    }

    pub fn width(&self) -> TableWidth {
        self.width
    }

    /// Store a mapping. A later entry for the same bytes replaces the earlier one.
    pub fn insert(&mut self, bytes: u32, codepoint: u32) -> Result<()> {
        let slot = self.slot(bytes)?;
        self.cells[slot] = codepoint;
        if !self.occupied[slot] {
            self.occupied[slot] = true;
            self.filled[slot / SEGMENT_SIZE] += 1;
        }
        Ok(())
    }

    /// Drop a byte sequence entirely, as if it had never been inserted. A
    /// segment left without entries reads as absent again.
    pub fn remove(&mut self, bytes: u32) -> Result<()> {
        let slot = self.slot(bytes)?;
        self.cells[slot] = UNMAPPABLE_DECODING;
        if self.occupied[slot] {
            self.occupied[slot] = false;
            self.filled[slot / SEGMENT_SIZE] -= 1;
        }
        Ok(())
    }

    /// Force a byte sequence back to unmappable. The cell still counts as
    /// an entry; invalidation never changes the table's shape.
    pub fn invalidate(&mut self, bytes: u32) -> Result<()> {
        let slot = self.slot(bytes)?;
        self.cells[slot] = UNMAPPABLE_DECODING;
        Ok(())
    }

    /// The codepoint for `bytes`, or [`UNMAPPABLE_DECODING`].
    pub fn get(&self, bytes: u32) -> u32 {
        self.cells
            .get(bytes as usize)
            .copied()
            .unwrap_or(UNMAPPABLE_DECODING)
    }

    pub fn is_mapped(&self, bytes: u32) -> bool {
        self.get(bytes) != UNMAPPABLE_DECODING
    }

    pub fn has_data(&self, high: usize) -> bool {
        self.filled.get(high).is_some_and(|&count| count > 0)
    }

    /// Number of segments holding at least one entry.
    pub fn used_segments(&self) -> usize {
        self.filled.iter().filter(|&&count| count > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.used_segments() == 0
    }

    pub fn cells(&self) -> &[u32] {
        &self.cells
    }

    /// The cells of one segment restricted to `trail`, or `None` when the
    /// segment never received an entry.
    pub fn segment(&self, high: usize, trail: ByteRange) -> Option<Vec<u32>> {
        if !self.has_data(high) {
            return None;
        }
        let base = (high * SEGMENT_SIZE) as u32;
        Some(trail.iter().map(|low| self.get(base | low)).collect())
    }

    fn slot(&self, bytes: u32) -> Result<usize> {
        let slot = bytes as usize;
        if slot >= self.cells.len() {
            return Err(CharmapError::ByteSequenceOutOfRange {
                bytes,
                shape: self.width.name(),
            });
        }
        Ok(slot)
    }
}

/// Reject byte sequences whose trailing byte lies outside `trail`; those
/// cells would never be emitted.
pub fn check_trailing_byte(bytes: u32, trail: ByteRange, shape: &'static str) -> Result<()> {
    if !trail.contains(utils::low_byte(bytes) as u32) {
        return Err(CharmapError::ByteSequenceOutOfRange { bytes, shape });
    }
    Ok(())
}
