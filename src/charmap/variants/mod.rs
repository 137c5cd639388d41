//! Table shapes: one builder per family of charsets.
//!
//! Every shape consumes the same [`EntrySet`] and shares the table primitives;
//! they differ in how byte sequences are partitioned and what gets emitted.

pub mod dbcs;
pub mod euc_tw;
pub mod hkscs;
pub mod jis0213;
pub mod sbcs;

use std::fmt;

use self::dbcs::{DbcsLayout, DbcsTables};
use self::euc_tw::EucTwTables;
use self::hkscs::{HkscsLayout, HkscsTables};
use self::jis0213::Jis0213Tables;
use self::sbcs::SbcsTables;
use super::codec::Artifact;
use super::parser::LinePattern;
use super::sources::EntrySet;
use super::types::error::Result;
use super::types::models::ByteRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableShape {
    SingleByte,
    DoubleByte(DbcsLayout),
    MultiPlane,
    Supplementary(HkscsLayout),
    Jis0213,
}

impl TableShape {
    /// Look up a shape by its command-line name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "sbcs" => Some(TableShape::SingleByte),
            "dbcs" => Some(TableShape::DoubleByte(DbcsLayout::default())),
            "dbcs-euc" => Some(TableShape::DoubleByte(DbcsLayout::new(ByteRange::new(0xA1, 0xFE)))),
            "euc-tw" => Some(TableShape::MultiPlane),
            "hkscs" => Some(TableShape::Supplementary(HkscsLayout::default())),
            "hkscs-2001" => Some(TableShape::Supplementary(HkscsLayout::legacy())),
            "jis0213" => Some(TableShape::Jis0213),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TableShape::SingleByte => "single-byte",
            TableShape::DoubleByte(_) => "double-byte",
            TableShape::MultiPlane => "multi-plane",
            TableShape::Supplementary(_) => "supplementary",
            TableShape::Jis0213 => "JIS X 0213",
        }
    }

    pub fn line_pattern(&self) -> LinePattern {
        match self {
            TableShape::SingleByte | TableShape::DoubleByte(_) => LinePattern::Basic,
            TableShape::MultiPlane => LinePattern::EucTw,
            TableShape::Supplementary(_) => LinePattern::Hkscs,
            TableShape::Jis0213 => LinePattern::Jis0213,
        }
    }

    /// Whether `.nr` / `.c2b` companions take part in the build.
    pub fn uses_companions(&self) -> bool {
        !matches!(self, TableShape::Jis0213)
    }

    pub fn build(&self, entries: &EntrySet) -> Result<CompiledTables> {
        Ok(match *self {
            TableShape::SingleByte => CompiledTables::SingleByte(sbcs::build(entries)?),
            TableShape::DoubleByte(layout) => CompiledTables::DoubleByte(dbcs::build(entries, layout)?),
            TableShape::MultiPlane => CompiledTables::MultiPlane(euc_tw::build(entries)?),
            TableShape::Supplementary(layout) => CompiledTables::Supplementary(hkscs::build(entries, layout)?),
            TableShape::Jis0213 => CompiledTables::Jis0213(jis0213::build(entries)?),
        })
    }
}

impl fmt::Display for TableShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The fully built tables of one variant.
#[derive(Debug, Clone)]
pub enum CompiledTables {
    SingleByte(SbcsTables),
    DoubleByte(DbcsTables),
    MultiPlane(EucTwTables),
    Supplementary(HkscsTables),
    Jis0213(Jis0213Tables),
}

impl CompiledTables {
    /// Decode one byte sequence as packed in the mapping files.
    pub fn decode(&self, bytes: u32) -> Option<u32> {
        match self {
            CompiledTables::SingleByte(t) => t.decode(bytes),
            CompiledTables::DoubleByte(t) => t.decode(bytes),
            CompiledTables::MultiPlane(t) => t.decode(bytes),
            CompiledTables::Supplementary(t) => t.decode(bytes),
            CompiledTables::Jis0213(t) => t.decode(bytes),
        }
    }

    /// Encode one codepoint. JIS X 0213 tables carry no build-time encode
    /// lookup and always return `None`.
    pub fn encode(&self, codepoint: u32) -> Option<u32> {
        match self {
            CompiledTables::SingleByte(t) => t.encode(codepoint),
            CompiledTables::DoubleByte(t) => t.encode(codepoint),
            CompiledTables::MultiPlane(t) => t.encode(codepoint),
            CompiledTables::Supplementary(t) => t.encode(codepoint),
            CompiledTables::Jis0213(_) => None,
        }
    }

    /// Serialize into the shape's output form.
    pub fn artifact(&self) -> Result<Artifact> {
        Ok(match self {
            CompiledTables::SingleByte(t) => Artifact::Text(t.render_text()),
            CompiledTables::DoubleByte(t) => Artifact::Text(t.render_text()),
            CompiledTables::MultiPlane(t) => Artifact::Text(t.render_text()),
            CompiledTables::Supplementary(t) => Artifact::Text(t.render_text()),
            CompiledTables::Jis0213(t) => Artifact::Binary(t.to_binary()?),
        })
    }
}
