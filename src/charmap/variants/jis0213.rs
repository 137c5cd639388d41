//! JIS X 0213 (Shift_JIS-2004 style) tables, emitted as a binary stream.
//!
//! Entries are split three ways:
//! - a nonzero combining codepoint makes a composite record
//! - a supplementary codepoint goes to the supplement list
//! - everything else fills the single-byte or double-byte table and marks
//!   the codepoint's high byte in the encode index
//!
//! # Stream sections, in order
//! ```text
//! INDEXC2B        256 units: base offset per used high byte, 0xFFFF otherwise
//! SINGLEBYTE      256 units
//! DOUBLEBYTE1     b1 0x81-0x9F, b2 0x40-0xFE
//! DOUBLEBYTE2     b1 0xE0-0xFC, b2 0x40-0xFE
//! SUPPLEMENT      pairs sorted by bytes: byte sequences, then codepoints (low 16 bits)
//! SUPPLEMENT_C2B  same pairs sorted by codepoint: codepoints, then bytes
//! COMPOSITE       (base, combining, bytes) triples sorted by (base, combining)
//! ```

use std::io::Write;
use log::{debug, info};

use crate::charmap::codec::binary::{SectionTag, StreamWriter};
use crate::charmap::codec::text;
use crate::charmap::sources::EntrySet;
use crate::charmap::tables::composite::{Composite, CompositeTable};
use crate::charmap::tables::decode::DecodeTable;
use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::{ByteRange, Entry, SEGMENT_SIZE, UNMAPPABLE_DECODING};
use crate::charmap::utils;

pub const DB1_LEAD: ByteRange = ByteRange::new(0x81, 0x9F);
pub const DB2_LEAD: ByteRange = ByteRange::new(0xE0, 0xFC);
pub const TRAIL: ByteRange = ByteRange::new(0x40, 0xFE);

/// Index cell written for a high byte without a segment.
pub const ABSENT_INDEX: u16 = 0xFFFF;

const SHAPE: &str = "JIS X 0213";

#[derive(Debug, Clone)]
pub struct Jis0213Tables {
    single: DecodeTable,
    double: DecodeTable,
    supplement: Vec<Entry>,
    composites: CompositeTable,
    index_used: Vec<bool>,
}

pub fn build(entries: &EntrySet) -> Result<Jis0213Tables> {
    let mut single = DecodeTable::single_byte();
    for byte in 0..0x80 {
        single.insert(byte, byte)?;
    }
    let mut double = DecodeTable::double_byte();
    let mut supplement = Vec::new();
    let mut index_used = vec![false; SEGMENT_SIZE];

    for entry in &entries.primary {
        if entry.secondary != 0 {
            continue;
        }
        if entry.is_supplementary() {
            supplement.push(*entry);
            continue;
        }
        if entry.bytes <= 0xFF {
            single.insert(entry.bytes, entry.codepoint)?;
        } else {
            let lead = utils::high_byte(entry.bytes) as u32;
            let in_lead = DB1_LEAD.contains(lead) || DB2_LEAD.contains(lead);
            if entry.bytes > 0xFFFF || !in_lead || !TRAIL.contains(utils::low_byte(entry.bytes) as u32) {
                return Err(CharmapError::ByteSequenceOutOfRange {
                    bytes: entry.bytes,
                    shape: SHAPE,
                });
            }
            double.insert(entry.bytes, entry.codepoint)?;
        }
        index_used[utils::high_byte(entry.codepoint)] = true;
    }
    let composites = CompositeTable::from_entries(&entries.primary);
    debug!(
        "Split {} entries: {} supplementary, {} composite",
        entries.primary.len(),
        supplement.len(),
        composites.len()
    );

    Ok(Jis0213Tables {
        single,
        double,
        supplement,
        composites,
        index_used,
    })
}

impl Jis0213Tables {
    pub fn decode(&self, bytes: u32) -> Option<u32> {
        let cp = if bytes <= 0xFF {
            self.single.get(bytes)
        } else {
            self.double.get(bytes)
        };
        if cp != UNMAPPABLE_DECODING {
            return Some(cp);
        }
        self.supplement
            .iter()
            .rev()
            .find(|e| e.bytes == bytes)
            .map(|e| e.codepoint)
    }

    pub fn supplement(&self) -> &[Entry] {
        &self.supplement
    }

    pub fn composites(&self) -> &CompositeTable {
        &self.composites
    }

    pub fn composite(&self, base: u32, combining: u32) -> Option<&Composite> {
        self.composites.find(base, combining)
    }

    pub fn is_index_used(&self, high: usize) -> bool {
        self.index_used.get(high).copied().unwrap_or(false)
    }

    /// Base offsets in ascending high-byte order.
    pub fn index_units(&self) -> Vec<u16> {
        let mut next = 0u32;
        self.index_used
            .iter()
            .map(|&used| {
                if used {
                    let base = next;
                    next += SEGMENT_SIZE as u32;
                    utils::to_unit(base)
                } else {
                    ABSENT_INDEX
                }
            })
            .collect()
    }

    fn double_units(&self, lead: ByteRange) -> Vec<u16> {
        lead.iter()
            .flat_map(|b1| TRAIL.iter().map(move |b2| b1 << 8 | b2))
            .map(|bytes| utils::to_unit(self.double.get(bytes)))
            .collect()
    }

    /// Serialize every section into a complete stream.
    pub fn to_binary(&self) -> Result<Vec<u8>> {
        let mut writer = StreamWriter::new();
        writer.section(SectionTag::IndexC2b, &self.index_units())?;
        writer.section(SectionTag::SingleByte, &text::units(self.single.cells()))?;
        writer.bounded_section(SectionTag::DoubleByte1, DB1_LEAD, TRAIL, &self.double_units(DB1_LEAD))?;
        writer.bounded_section(SectionTag::DoubleByte2, DB2_LEAD, TRAIL, &self.double_units(DB2_LEAD))?;

        let mut by_bytes = self.supplement.clone();
        by_bytes.sort_by_key(|e| e.bytes);
        let mut supp: Vec<u16> = by_bytes.iter().map(|e| utils::to_unit(e.bytes)).collect();
        supp.extend(by_bytes.iter().map(|e| utils::to_unit(e.codepoint)));
        writer.section(SectionTag::Supplement, &supp)?;

        let mut by_codepoint = self.supplement.clone();
        by_codepoint.sort_by_key(|e| e.codepoint);
        let mut supp_c2b: Vec<u16> = by_codepoint.iter().map(|e| utils::to_unit(e.codepoint)).collect();
        supp_c2b.extend(by_codepoint.iter().map(|e| utils::to_unit(e.bytes)));
        writer.section(SectionTag::SupplementC2b, &supp_c2b)?;

        let composite: Vec<u16> = self
            .composites
            .records()
            .iter()
            .flat_map(|c| [c.base, c.combining, c.bytes])
            .map(utils::to_unit)
            .collect();
        writer.section(SectionTag::Composite, &composite)?;

        let stream = writer.finish()?;
        info!("Serialized JIS X 0213 stream: {} bytes", stream.len());
        Ok(stream)
    }

    /// Serialize fully, then hand the stream to `sink` in one write.
    pub fn write_binary<W: Write>(&self, sink: &mut W) -> Result<()> {
        let stream = self.to_binary()?;
        sink.write_all(&stream)?;
        Ok(())
    }
}
