//! Non-roundtrip override layer.
//!
//! Companion files break the default decode/encode inverse relation:
//! - `.nr` on a single-byte map invalidates decode cells after the primary
//!   table is built. It can only remove a mapping, never add one.
//! - `.nr` on a multi-byte map lists decode-only pairs. The primary table is
//!   left untouched; the pairs travel as a side list and are kept out of the
//!   encode lookup.
//! - `.c2b` lists encode-only pairs. They extend the encode index (possibly
//!   allocating new segments) and are kept as their own list, never merged
//!   into the decode table.
//!
//! Within one override file the last entry for a key wins.

use std::collections::HashSet;
use log::debug;

use super::decode::DecodeTable;
use super::encode::EncodeTarget;
use crate::charmap::types::error::Result;
use crate::charmap::types::models::Entry;

/// What a variant's companion files contributed, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NonRoundtrip {
    /// Single-byte positions forced to unmappable.
    pub invalidated: Vec<u32>,
    /// Multi-byte decode-only pairs.
    pub decode_only: Vec<Entry>,
    /// Encode-only pairs.
    pub encode_only: Vec<Entry>,
}

impl NonRoundtrip {
    pub fn is_empty(&self) -> bool {
        self.invalidated.is_empty() && self.decode_only.is_empty() && self.encode_only.is_empty()
    }
}

/// Decode-only `(bytes, codepoint)` pairs, for membership tests during the primary pass.
#[derive(Debug, Clone, Default)]
pub struct DecodeOnlySet(HashSet<(u32, u32)>);

impl DecodeOnlySet {
    pub fn from_entries(entries: &[Entry]) -> Self {
        Self(entries.iter().map(|e| (e.bytes, e.codepoint)).collect())
    }

    pub fn contains(&self, entry: &Entry) -> bool {
        self.0.contains(&(entry.bytes, entry.codepoint))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Single-byte `.nr` pass: force every listed byte back to unmappable.
///
/// Returns the invalidated positions in file order.
pub fn invalidate_decodes(table: &mut DecodeTable, entries: &[Entry]) -> Result<Vec<u32>> {
    let mut invalidated = Vec::with_capacity(entries.len());
    for entry in entries {
        table.invalidate(entry.bytes)?;
        invalidated.push(entry.bytes);
    }
    debug!("Invalidated {} decode cells", invalidated.len());
    Ok(invalidated)
}

/// Multi-byte `.nr` pass: the entries become the decode-only side list verbatim.
pub fn decode_only_pairs(entries: &[Entry]) -> Vec<Entry> {
    debug!("Collected {} decode-only pairs", entries.len());
    entries.to_vec()
}

/// `.c2b` pass: feed encode-only pairs into the index after the primary pass.
///
/// Returns the pairs in file order.
pub fn add_encode_only<T: EncodeTarget>(target: &mut T, entries: &[Entry]) -> Result<Vec<Entry>> {
    for entry in entries {
        target.insert_override(entry.codepoint, entry.bytes)?;
    }
    debug!("Applied {} encode-only pairs", entries.len());
    Ok(entries.to_vec())
}

/// Primary pass over the encode side. Decode-only pairs still claim their
/// segment, so allocation stays a pure function of file order, but they do
/// not fill a lookup cell.
pub fn feed_primary<T: EncodeTarget>(target: &mut T, entry: &Entry, decode_only: &DecodeOnlySet) -> Result<()> {
    if decode_only.contains(entry) {
        target.allocate(entry.codepoint)?;
        Ok(())
    } else {
        target.insert_canonical(entry.codepoint, entry.bytes)
    }
}
