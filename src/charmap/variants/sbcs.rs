//! Single-byte variants.
//!
//! # Build steps
//! 1. Fill the 256-cell decode table from the primary map (last write wins).
//! 2. Feed the same entries into the encode index in file order (first wins).
//! 3. Invalidate every `.nr` byte in the decode table. Encoding is untouched,
//!    so an invalidated byte still encodes.
//! 4. Apply `.c2b` encode-only pairs.

use log::debug;

use crate::charmap::codec::text::{self, TextOutput};
use crate::charmap::sources::EntrySet;
use crate::charmap::tables::decode::DecodeTable;
use crate::charmap::tables::encode::EncodeIndex;
use crate::charmap::tables::overrides::{self, NonRoundtrip};
use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::{Entry, UNMAPPABLE_DECODING};

const SHAPE: &str = "single-byte";

#[derive(Debug, Clone)]
pub struct SbcsTables {
    decode: DecodeTable,
    encode: EncodeIndex,
    overrides: NonRoundtrip,
}

pub fn build(entries: &EntrySet) -> Result<SbcsTables> {
    let mut decode = DecodeTable::single_byte();
    let mut encode = EncodeIndex::new("c2b", 0);

    for entry in &entries.primary {
        check_codepoint(entry)?;
        decode.insert(entry.bytes, entry.codepoint)?;
        encode.insert_canonical(entry.codepoint, entry.bytes)?;
    }
    debug!("Primary pass: {} entries, {} encode segments", entries.primary.len(), encode.used_segments());

    let invalidated = overrides::invalidate_decodes(&mut decode, &entries.non_roundtrip)?;

    for entry in &entries.encode_only {
        check_codepoint(entry)?;
    }
    let encode_only = overrides::add_encode_only(&mut encode, &entries.encode_only)?;

    Ok(SbcsTables {
        decode,
        encode,
        overrides: NonRoundtrip {
            invalidated,
            decode_only: Vec::new(),
            encode_only,
        },
    })
}

fn check_codepoint(entry: &Entry) -> Result<()> {
    if entry.is_supplementary() {
        return Err(CharmapError::CodepointOutOfRange {
            codepoint: entry.codepoint,
            shape: SHAPE,
        });
    }
    Ok(())
}

/// Position of a byte in the upper-half-first layout.
pub fn rotate(byte: u32) -> u32 {
    if byte >= 0x80 {
        byte - 0x80
    } else {
        byte + 0x80
    }
}

impl SbcsTables {
    pub fn decode_table(&self) -> &DecodeTable {
        &self.decode
    }

    pub fn encode_index(&self) -> &EncodeIndex {
        &self.encode
    }

    pub fn overrides(&self) -> &NonRoundtrip {
        &self.overrides
    }

    pub fn decode(&self, bytes: u32) -> Option<u32> {
        Some(self.decode.get(bytes)).filter(|&cp| cp != UNMAPPABLE_DECODING)
    }

    pub fn encode(&self, codepoint: u32) -> Option<u32> {
        self.encode.lookup(codepoint)
    }

    pub fn render_text(&self) -> TextOutput {
        let cells = text::units(self.decode.cells());
        let mut table = String::new();
        text::write_commented_literal(&mut table, &cells[0x80..], 0x80, " +");
        text::write_commented_literal(&mut table, &cells[..0x80], 0x00, ";");

        let rotated: Vec<u16> = self
            .overrides
            .invalidated
            .iter()
            .map(|&byte| rotate(byte) as u16)
            .collect();

        let mut out = TextOutput::new();
        out.push("B2C_TABLE", table);
        out.push("B2C_NR", text::list_literal(rotated));
        out.push("C2B_NR", text::list_literal(text::pair_units(&self.overrides.encode_only)));
        out.push("C2B_LENGTH", format!("{:#x}", self.encode.len()));
        out
    }
}
