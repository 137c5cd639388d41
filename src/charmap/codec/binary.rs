//! Tagged binary stream used for the JIS X 0213 tables.
//!
//! # Stream Structure
//! ```text
//! [4 bytes] Body length (big-endian u32), header excluded
//! Sections, each:
//!   [2 bytes] Tag
//!   [8 bytes] b1 min, b1 max, b2 min, b2 max   (double-byte sections only)
//!   [2 bytes] Unit count
//!   [2 * count bytes] Units (big-endian u16)
//! ```
//!
//! There is no version field and no checksum; the runtime loader trusts the
//! stream, so identical input must always produce identical bytes.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use log::trace;

use crate::charmap::types::error::{CharmapError, Result};
use crate::charmap::types::models::ByteRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionTag {
    SingleByte = 1,
    DoubleByte1 = 2,
    DoubleByte2 = 3,
    Supplement = 5,
    SupplementC2b = 6,
    Composite = 7,
    IndexC2b = 8,
}

impl SectionTag {
    pub fn name(&self) -> &'static str {
        match self {
            SectionTag::SingleByte => "SINGLEBYTE",
            SectionTag::DoubleByte1 => "DOUBLEBYTE1",
            SectionTag::DoubleByte2 => "DOUBLEBYTE2",
            SectionTag::Supplement => "SUPPLEMENT",
            SectionTag::SupplementC2b => "SUPPLEMENT_C2B",
            SectionTag::Composite => "COMPOSITE",
            SectionTag::IndexC2b => "INDEXC2B",
        }
    }

    /// Whether the section carries byte1/byte2 bounds before its count.
    pub fn has_bounds(&self) -> bool {
        matches!(self, SectionTag::DoubleByte1 | SectionTag::DoubleByte2)
    }
}

impl TryFrom<u16> for SectionTag {
    type Error = CharmapError;
    fn try_from(value: u16) -> Result<Self> {
        match value {
            1 => Ok(Self::SingleByte),
            2 => Ok(Self::DoubleByte1),
            3 => Ok(Self::DoubleByte2),
            5 => Ok(Self::Supplement),
            6 => Ok(Self::SupplementC2b),
            7 => Ok(Self::Composite),
            8 => Ok(Self::IndexC2b),
            _ => Err(CharmapError::InvalidFormat(format!("Unknown section tag: {}", value))),
        }
    }
}

/// One decoded section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub tag: SectionTag,
    /// `(b1, b2)` bounds, present on double-byte sections.
    pub bounds: Option<(ByteRange, ByteRange)>,
    pub units: Vec<u16>,
}

/// Accumulates sections in memory; [`StreamWriter::finish`] yields the framed stream.
#[derive(Debug, Default)]
pub struct StreamWriter {
    body: Vec<u8>,
}

impl StreamWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain section.
    pub fn section(&mut self, tag: SectionTag, units: &[u16]) -> Result<()> {
        let count = unit_count(tag, units.len())?;
        trace!("Writing section {} ({} units)", tag.name(), count);
        self.body.write_u16::<BigEndian>(tag as u16)?;
        self.body.write_u16::<BigEndian>(count)?;
        self.write_units(units)
    }

    /// Append a double-byte section with its lead/trail bounds.
    pub fn bounded_section(&mut self, tag: SectionTag, b1: ByteRange, b2: ByteRange, units: &[u16]) -> Result<()> {
        let count = unit_count(tag, units.len())?;
        trace!("Writing section {} (b1 {}, b2 {}, {} units)", tag.name(), b1, b2, count);
        self.body.write_u16::<BigEndian>(tag as u16)?;
        for bound in [b1.min, b1.max, b2.min, b2.max] {
            self.body.write_u16::<BigEndian>(bound as u16)?;
        }
        self.body.write_u16::<BigEndian>(count)?;
        self.write_units(units)
    }

    fn write_units(&mut self, units: &[u16]) -> Result<()> {
        for &unit in units {
            self.body.write_u16::<BigEndian>(unit)?;
        }
        Ok(())
    }

    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// The complete stream: length header followed by the body.
    pub fn finish(self) -> Result<Vec<u8>> {
        let len = u32::try_from(self.body.len())
            .map_err(|_| CharmapError::InvalidFormat(format!("Stream body too large: {} bytes", self.body.len())))?;
        let mut stream = Vec::with_capacity(self.body.len() + 4);
        stream.write_u32::<BigEndian>(len)?;
        stream.extend_from_slice(&self.body);
        Ok(stream)
    }
}

fn unit_count(tag: SectionTag, units: usize) -> Result<u16> {
    u16::try_from(units).map_err(|_| CharmapError::SectionOverflow {
        section: tag.name(),
        units,
    })
}

/// Parse a complete stream back into its sections.
///
/// # Errors
/// - Length header disagreeing with the stream size
/// - Unknown tags or out-of-range bounds
/// - Truncated sections
pub fn read_stream(stream: &[u8]) -> Result<Vec<Section>> {
    let mut reader = stream;
    let declared = reader.read_u32::<BigEndian>()? as usize;
    if declared != reader.len() {
        return Err(CharmapError::InvalidFormat(format!(
            "Length header says {} bytes, stream holds {}",
            declared,
            reader.len()
        )));
    }

    let mut sections = Vec::new();
    while !reader.is_empty() {
        let tag = SectionTag::try_from(reader.read_u16::<BigEndian>()?)?;
        let bounds = if tag.has_bounds() {
            let mut bound = || -> Result<u8> {
                let value = reader.read_u16::<BigEndian>()?;
                u8::try_from(value).map_err(|_| {
                    CharmapError::InvalidFormat(format!("Byte bound {:#x} in {} exceeds 0xff", value, tag.name()))
                })
            };
            let b1 = ByteRange::new(bound()?, bound()?);
            let b2 = ByteRange::new(bound()?, bound()?);
            Some((b1, b2))
        } else {
            None
        };
        let count = reader.read_u16::<BigEndian>()? as usize;
        if reader.len() < count * 2 {
            return Err(CharmapError::InvalidFormat(format!(
                "Section {} declares {} units, only {} bytes remain",
                tag.name(),
                count,
                reader.len()
            )));
        }
        let mut units = Vec::with_capacity(count);
        for _ in 0..count {
            units.push(reader.read_u16::<BigEndian>()?);
        }
        sections.push(Section { tag, bounds, units });
    }
    Ok(sections)
}
