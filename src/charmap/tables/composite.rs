//! Auxiliary tables for variants with characters outside the plain 1:1 model.
//!
//! - [`PuaTable`]: reverse lookup from a Private Use Area codepoint to the
//!   byte sequence it stands for (HKSCS alternates).
//! - [`CompositeTable`]: byte sequences that decode to a base character plus
//!   a combining mark (JIS X 0213).
//!
//! Both are built only by the variants that need them, and an empty table is
//! emitted as a single absent marker.

use std::cmp::Ordering;
use log::trace;

use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::Entry;

/// First codepoint of the Private Use Area.
pub const PUA_START: u32 = 0xE000;
/// Last PUA codepoint for current variants.
pub const PUA_END: u32 = 0xF8FF;
/// Last codepoint covered by the legacy (2001) variant, which spills past the PUA block.
pub const PUA_END_LEGACY: u32 = 0xF93B;

/// Dense array keyed by `codepoint - 0xE000`; 0 marks an empty cell.
#[derive(Debug, Clone)]
pub struct PuaTable {
    upper: u32,
    cells: Vec<u32>,
    populated: usize,
}

impl PuaTable {
    pub fn new(upper: u32) -> Self {
        Self {
            upper,
            cells: vec![0; (upper.saturating_sub(PUA_START) + 1) as usize],
            populated: 0,
        }
    }

    pub fn upper(&self) -> u32 {
        self.upper
    }

    pub fn covers(&self, codepoint: u32) -> bool {
        (PUA_START..=self.upper).contains(&codepoint)
    }

    /// Record `bytes` as the reverse mapping of `codepoint`. Later records win.
    pub fn record(&mut self, codepoint: u32, bytes: u32) -> Result<()> {
        if !self.covers(codepoint) {
            return Err(CharmapError::PuaOutOfRange {
                codepoint,
                upper: self.upper,
            });
        }
        let cell = &mut self.cells[(codepoint - PUA_START) as usize];
        if *cell == 0 {
            self.populated += 1;
        }
        *cell = bytes;
        trace!("PUA U+{:04X} -> {:#x}", codepoint, bytes);
        Ok(())
    }

    /// Record the entry's secondary codepoint when it falls in range.
    ///
    /// Returns whether anything was recorded.
    pub fn record_secondary(&mut self, entry: &Entry) -> Result<bool> {
        if entry.secondary == 0 || !self.covers(entry.secondary) {
            return Ok(false);
        }
        self.record(entry.secondary, entry.bytes)?;
        Ok(true)
    }

    pub fn get(&self, codepoint: u32) -> Option<u32> {
        if !self.covers(codepoint) {
            return None;
        }
        Some(self.cells[(codepoint - PUA_START) as usize]).filter(|&bytes| bytes != 0)
    }

    pub fn len(&self) -> usize {
        self.populated
    }

    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// The dense cells, or `None` when nothing was recorded.
    pub fn cells(&self) -> Option<&[u32]> {
        (!self.is_empty()).then_some(self.cells.as_slice())
    }
}

/// One byte sequence that decodes to two codepoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Composite {
    pub bytes: u32,
    pub base: u32,
    pub combining: u32,
}

impl Composite {
    fn key(&self) -> (u32, u32) {
        (self.base, self.combining)
    }
}

/// Composite records sorted by `(base, combining)` for binary search.
#[derive(Debug, Clone, Default)]
pub struct CompositeTable {
    records: Vec<Composite>,
}

impl CompositeTable {
    /// Keep the entries with a nonzero secondary codepoint. The sort is stable,
    /// so duplicate pairs keep file order.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let mut records: Vec<Composite> = entries
            .into_iter()
            .filter(|e| e.secondary != 0)
            .map(|e| Composite {
                bytes: e.bytes,
                base: e.codepoint,
                combining: e.secondary,
            })
            .collect();
        records.sort_by_key(Composite::key);
        Self { records }
    }

    /// Exact lookup by base and combining codepoint.
    pub fn find(&self, base: u32, combining: u32) -> Option<&Composite> {
        self.records
            .binary_search_by(|probe| match probe.base.cmp(&base) {
                Ordering::Equal => probe.combining.cmp(&combining),
                other => other,
            })
            .ok()
            .map(|i| &self.records[i])
    }

    /// Reverse lookup by byte sequence (linear; the table is small).
    pub fn by_bytes(&self, bytes: u32) -> Option<&Composite> {
        self.records.iter().find(|c| c.bytes == bytes)
    }

    pub fn records(&self) -> &[Composite] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
