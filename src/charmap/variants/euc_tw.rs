//! EUC-TW: up to eight CNS 11643 planes behind an optional `8EA<n>` prefix.
//!
//! The plane comes from bits 16-23 of the raw byte sequence: `8EA2A1A1`
//! parses to `0x2A1A1`, plane index 1. Sequences without a prefix belong to
//! plane 0. Each plane is an independent double-byte table over
//! 0xA1-0xFE squared, and codepoints route to a BMP or a supplementary encode
//! index.

use log::debug;

use crate::charmap::codec::text::{self, TextOutput};
use crate::charmap::sources::EntrySet;
use crate::charmap::tables::decode::DecodeTable;
use crate::charmap::tables::encode::SplitEncodeIndex;
use crate::charmap::tables::overrides::{self, DecodeOnlySet, NonRoundtrip};
use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::{ByteRange, SEGMENT_SIZE, UNMAPPABLE_DECODING};
use crate::charmap::utils;

pub const PLANES: usize = 8;

/// Lead and trailing byte range of every plane.
pub const CELL_BYTES: ByteRange = ByteRange::new(0xA1, 0xFE);

const SHAPE: &str = "multi-plane";

/// Plane index of a raw byte sequence.
///
/// Raw plane numbers of 14 and above fold into the last plane; 7 through 13
/// have no table.
pub fn plane_of(bytes: u32) -> Result<usize> {
    if bytes > 0xFF_FFFF {
        return Err(CharmapError::ByteSequenceOutOfRange { bytes, shape: SHAPE });
    }
    if bytes < 0x10000 {
        return Ok(0);
    }
    let plane = ((bytes >> 16) & 0xFF) - 1;
    match plane {
        0..=6 => Ok(plane as usize),
        p if p >= 14 => Ok(PLANES - 1),
        p => Err(CharmapError::PlaneOutOfRange { bytes, plane: p }),
    }
}

#[derive(Debug, Clone)]
pub struct EucTwTables {
    planes: Vec<DecodeTable>,
    encode: SplitEncodeIndex,
    overrides: NonRoundtrip,
}

pub fn build(entries: &EntrySet) -> Result<EucTwTables> {
    let mut planes = vec![DecodeTable::double_byte(); PLANES];
    let mut encode = SplitEncodeIndex::new(SEGMENT_SIZE as u32);
    let decode_only = DecodeOnlySet::from_entries(&entries.non_roundtrip);

    for entry in &entries.primary {
        let plane = plane_of(entry.bytes)?;
        let cell = entry.bytes & 0xFFFF;
        if !CELL_BYTES.contains(utils::high_byte(cell) as u32) || !CELL_BYTES.contains(utils::low_byte(cell) as u32) {
            return Err(CharmapError::ByteSequenceOutOfRange {
                bytes: entry.bytes,
                shape: SHAPE,
            });
        }
        planes[plane].insert(cell, entry.codepoint)?;
        overrides::feed_primary(&mut encode, entry, &decode_only)?;
    }
    debug!(
        "Primary pass: {} entries over {} planes",
        entries.primary.len(),
        planes.iter().filter(|p| !p.is_empty()).count()
    );

    let decode_only = overrides::decode_only_pairs(&entries.non_roundtrip);
    let encode_only = overrides::add_encode_only(&mut encode, &entries.encode_only)?;

    Ok(EucTwTables {
        planes,
        encode,
        overrides: NonRoundtrip {
            invalidated: Vec::new(),
            decode_only,
            encode_only,
        },
    })
}

impl EucTwTables {
    pub fn plane(&self, index: usize) -> Option<&DecodeTable> {
        self.planes.get(index)
    }

    pub fn encode_index(&self) -> &SplitEncodeIndex {
        &self.encode
    }

    pub fn overrides(&self) -> &NonRoundtrip {
        &self.overrides
    }

    pub fn decode(&self, bytes: u32) -> Option<u32> {
        let plane = plane_of(bytes).ok()?;
        Some(self.planes[plane].get(bytes & 0xFFFF)).filter(|&cp| cp != UNMAPPABLE_DECODING)
    }

    pub fn encode(&self, codepoint: u32) -> Option<u32> {
        self.encode.lookup(codepoint)
    }

    /// One unit per cell, bit `p` set when plane `p` decodes the cell to a
    /// supplementary codepoint.
    pub fn supplementary_flags(&self) -> Vec<u16> {
        let mut flags = Vec::with_capacity(CELL_BYTES.len() * CELL_BYTES.len());
        for b1 in CELL_BYTES.iter() {
            for b2 in CELL_BYTES.iter() {
                let cell = b1 << 8 | b2;
                let bits = self
                    .planes
                    .iter()
                    .enumerate()
                    .filter(|(_, plane)| plane.get(cell) >= 0x10000)
                    .fold(0u16, |acc, (p, _)| acc | 1 << p);
                flags.push(bits);
            }
        }
        flags
    }

    pub fn render_text(&self) -> TextOutput {
        let mut out = TextOutput::new();
        for (index, plane) in self.planes.iter().enumerate() {
            let name = format!("B2C_PLANE{}", index);
            if plane.is_empty() {
                out.push(name, text::optional_literal(None));
                continue;
            }
            let mut segments = String::new();
            text::write_segments(
                &mut segments,
                CELL_BYTES
                    .iter()
                    .map(|b1| plane.segment(b1 as usize, CELL_BYTES).map(|cells| text::units(&cells))),
            );
            out.push(name, segments);
        }
        out.push("B2C_IS_SUPP", text::literal(&self.supplementary_flags()));
        out.push("B2C_NR", text::list_literal(text::wide_pair_units(&self.overrides.decode_only)));
        out.push("C2B_NR", text::list_literal(text::wide_pair_units(&self.overrides.encode_only)));
        out.push("C2B_INDEX", text::literal(&self.encode.bmp().index_units()));
        out.push("C2B_LENGTH", format!("{:#x}", self.encode.bmp().len()));
        out.push("C2B_SUPP_INDEX", text::literal(&self.encode.supp().index_units()));
        out.push("C2B_SUPP_LENGTH", format!("{:#x}", self.encode.supp().len()));
        out
    }
}
