//! Generic double-byte variants (Shift_JIS, GBK, Big5, EUC-KR style maps).
//!
//! Entries at or below 0xFF go into a separate single-byte table; everything
//! else lands in the 64K double-byte table, segmented by lead byte. `.nr`
//! pairs are decode-only: they stay in the decode table and travel as a side
//! list, but never fill an encode cell.

use log::debug;

use crate::charmap::codec::text::{self, TextOutput};
use crate::charmap::sources::EntrySet;
use crate::charmap::tables::decode::{self, DecodeTable};
use crate::charmap::tables::encode::EncodeIndex;
use crate::charmap::tables::overrides::{self, DecodeOnlySet, NonRoundtrip};
use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::{ByteRange, Entry, SEGMENT_SIZE, UNMAPPABLE_DECODING};

const SHAPE: &str = "double-byte";

/// Trailing-byte bounds of every emitted decode segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DbcsLayout {
    pub b2: ByteRange,
}

impl DbcsLayout {
    pub const fn new(b2: ByteRange) -> Self {
        Self { b2 }
    }
}

#[derive(Debug, Clone)]
pub struct DbcsTables {
    layout: DbcsLayout,
    single: DecodeTable,
    double: DecodeTable,
    encode: EncodeIndex,
    overrides: NonRoundtrip,
}

pub fn build(entries: &EntrySet, layout: DbcsLayout) -> Result<DbcsTables> {
    let mut single = DecodeTable::single_byte();
    let mut double = DecodeTable::double_byte();
    let mut encode = EncodeIndex::new("c2b", SEGMENT_SIZE as u32);
    let decode_only = DecodeOnlySet::from_entries(&entries.non_roundtrip);

    for entry in &entries.primary {
        check_codepoint(entry)?;
        if entry.bytes <= 0xFF {
            single.insert(entry.bytes, entry.codepoint)?;
        } else {
            decode::check_trailing_byte(entry.bytes, layout.b2, SHAPE)?;
            double.insert(entry.bytes, entry.codepoint)?;
        }
        overrides::feed_primary(&mut encode, entry, &decode_only)?;
    }
    debug!(
        "Primary pass: {} entries, {} decode segments, {} encode segments",
        entries.primary.len(),
        double.used_segments(),
        encode.used_segments()
    );

    for entry in entries.non_roundtrip.iter().chain(&entries.encode_only) {
        check_codepoint(entry)?;
    }
    let decode_only = overrides::decode_only_pairs(&entries.non_roundtrip);
    let encode_only = overrides::add_encode_only(&mut encode, &entries.encode_only)?;

    Ok(DbcsTables {
        layout,
        single,
        double,
        encode,
        overrides: NonRoundtrip {
            invalidated: Vec::new(),
            decode_only,
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

impl DbcsTables {
    pub fn layout(&self) -> DbcsLayout {
        self.layout
    }

    pub fn single_byte(&self) -> &DecodeTable {
        &self.single
    }

    pub fn double_byte(&self) -> &DecodeTable {
        &self.double
    }

    pub fn encode_index(&self) -> &EncodeIndex {
        &self.encode
    }

    pub fn overrides(&self) -> &NonRoundtrip {
        &self.overrides
    }

    pub fn decode(&self, bytes: u32) -> Option<u32> {
        let cp = if bytes <= 0xFF {
            self.single.get(bytes)
        } else {
            self.double.get(bytes)
        };
        Some(cp).filter(|&cp| cp != UNMAPPABLE_DECODING)
    }

    pub fn encode(&self, codepoint: u32) -> Option<u32> {
        self.encode.lookup(codepoint)
    }

    /// Decode segments keyed by lead byte, `None` for segments without data.
    pub fn segments(&self) -> impl Iterator<Item = Option<Vec<u16>>> + '_ {
        (0..SEGMENT_SIZE).map(|high| {
            self.double
                .segment(high, self.layout.b2)
                .map(|cells| text::units(&cells))
        })
    }

    pub fn render_text(&self) -> TextOutput {
        let mut b2c = String::new();
        text::write_segments(&mut b2c, self.segments());

        let mut out = TextOutput::new();
        out.push("B2C_SB", text::literal(&text::units(self.single.cells())));
        out.push("B2C", b2c);
        out.push("B2_MIN", format!("{:#04x}", self.layout.b2.min));
        out.push("B2_MAX", format!("{:#04x}", self.layout.b2.max));
        out.push("B2C_NR", text::list_literal(text::pair_units(&self.overrides.decode_only)));
        out.push("C2B_NR", text::list_literal(text::pair_units(&self.overrides.encode_only)));
        out.push("C2B_INDEX", text::literal(&self.encode.index_units()));
        out.push("C2B_LENGTH", format!("{:#x}", self.encode.len()));
        out
    }
}
