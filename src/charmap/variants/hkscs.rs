//! HKSCS: Big5 extension with supplementary codepoints and PUA alternates.
//!
//! Byte sequences decoding to a codepoint at or above 0x10000 live in a
//! separate supplementary table keyed like the BMP one; the emitted cells keep
//! the low 16 bits and the runtime adds the plane back. A third field in the
//! primary map names the PUA codepoint older releases used for the same
//! character; those, plus in-range `.c2b` pairs, fill the PUA reverse table.

use log::debug;

use crate::charmap::codec::text::{self, TextOutput};
use crate::charmap::sources::EntrySet;
use crate::charmap::tables::composite::{PuaTable, PUA_END, PUA_END_LEGACY};
use crate::charmap::tables::decode::{self, DecodeTable};
use crate::charmap::tables::encode::SplitEncodeIndex;
use crate::charmap::tables::overrides::{self, DecodeOnlySet, NonRoundtrip};
use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::{ByteRange, SEGMENT_SIZE, UNMAPPABLE_DECODING};

const SHAPE: &str = "supplementary";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HkscsLayout {
    pub b2: ByteRange,
    /// Last codepoint of the PUA reverse table.
    pub pua_upper: u32,
}

impl Default for HkscsLayout {
    fn default() -> Self {
        Self {
            b2: ByteRange::new(0x40, 0xFE),
            pua_upper: PUA_END,
        }
    }
}

impl HkscsLayout {
    /// The 2001 layout, whose PUA alternates run past U+F8FF.
    pub fn legacy() -> Self {
        Self {
            pua_upper: PUA_END_LEGACY,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct HkscsTables {
    layout: HkscsLayout,
    bmp: DecodeTable,
    supp: DecodeTable,
    pua: PuaTable,
    encode: SplitEncodeIndex,
    overrides: NonRoundtrip,
}

pub fn build(entries: &EntrySet, layout: HkscsLayout) -> Result<HkscsTables> {
    let mut bmp = DecodeTable::double_byte();
    let mut supp = DecodeTable::double_byte();
    let mut pua = PuaTable::new(layout.pua_upper);
    let mut encode = SplitEncodeIndex::new(SEGMENT_SIZE as u32);
    let decode_only = DecodeOnlySet::from_entries(&entries.non_roundtrip);

    for entry in &entries.primary {
        if entry.bytes <= 0xFF {
            return Err(CharmapError::ByteSequenceOutOfRange {
                bytes: entry.bytes,
                shape: SHAPE,
            });
        }
        decode::check_trailing_byte(entry.bytes, layout.b2, SHAPE)?;
        // A byte sequence lives in exactly one of the two tables.
        let (target, other) = if entry.is_supplementary() {
            (&mut supp, &mut bmp)
        } else {
            (&mut bmp, &mut supp)
        };
        target.insert(entry.bytes, entry.codepoint)?;
        other.remove(entry.bytes)?;
        pua.record_secondary(entry)?;
        overrides::feed_primary(&mut encode, entry, &decode_only)?;
    }
    debug!(
        "Primary pass: {} entries, {} BMP segments, {} supplementary segments, {} PUA cells",
        entries.primary.len(),
        bmp.used_segments(),
        supp.used_segments(),
        pua.len()
    );

    let decode_only = overrides::decode_only_pairs(&entries.non_roundtrip);

    let before = pua.len();
    for entry in &entries.encode_only {
        if pua.covers(entry.codepoint) {
            pua.record(entry.codepoint, entry.bytes)?;
        }
    }
    debug!("PUA override pass: {} new cells", pua.len() - before);
    let encode_only = overrides::add_encode_only(&mut encode, &entries.encode_only)?;

    Ok(HkscsTables {
        layout,
        bmp,
        supp,
        pua,
        encode,
        overrides: NonRoundtrip {
            invalidated: Vec::new(),
            decode_only,
            encode_only,
        },
    })
}

impl HkscsTables {
    pub fn layout(&self) -> HkscsLayout {
        self.layout
    }

    pub fn bmp(&self) -> &DecodeTable {
        &self.bmp
    }

    pub fn supplementary(&self) -> &DecodeTable {
        &self.supp
    }

    pub fn pua(&self) -> &PuaTable {
        &self.pua
    }

    pub fn encode_index(&self) -> &SplitEncodeIndex {
        &self.encode
    }

    pub fn overrides(&self) -> &NonRoundtrip {
        &self.overrides
    }

    /// Full codepoint for `bytes`, with the supplementary plane restored.
    pub fn decode(&self, bytes: u32) -> Option<u32> {
        if self.bmp.is_mapped(bytes) {
            return Some(self.bmp.get(bytes));
        }
        let cp = self.supp.get(bytes);
        (cp != UNMAPPABLE_DECODING).then_some(cp)
    }

    pub fn encode(&self, codepoint: u32) -> Option<u32> {
        self.encode.lookup(codepoint)
    }

    fn write_table(&self, table: &DecodeTable) -> String {
        let mut out = String::new();
        text::write_segments(
            &mut out,
            (0..SEGMENT_SIZE).map(|high| table.segment(high, self.layout.b2).map(|cells| text::units(&cells))),
        );
        out
    }

    pub fn render_text(&self) -> TextOutput {
        let supp = if self.supp.is_empty() {
            text::optional_literal(None)
        } else {
            self.write_table(&self.supp)
        };
        let pua = self.pua.cells().map(text::units);

        let mut out = TextOutput::new();
        out.push("B2C_BMP", self.write_table(&self.bmp));
        out.push("B2C_SUPP", supp);
        out.push("PUA", text::optional_literal(pua.as_deref()));
        out.push("B2_MIN", format!("{:#04x}", self.layout.b2.min));
        out.push("B2_MAX", format!("{:#04x}", self.layout.b2.max));
        out.push("B2C_NR", text::list_literal(text::wide_pair_units(&self.overrides.decode_only)));
        out.push("C2B_NR", text::list_literal(text::wide_pair_units(&self.overrides.encode_only)));
        out.push("C2B_INDEX", text::literal(&self.encode.bmp().index_units()));
        out.push("C2B_LENGTH", format!("{:#x}", self.encode.bmp().len()));
        out.push("C2B_SUPP_INDEX", text::literal(&self.encode.supp().index_units()));
        out.push("C2B_SUPP_LENGTH", format!("{:#x}", self.encode.supp().len()));
        out
    }
}
