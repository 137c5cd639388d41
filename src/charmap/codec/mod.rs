//! Serialization layer for compiled tables.
//!
//! # Submodules
//!
//! - [`text`][]: escaped string-literal fragments for source templates
//! - [`binary`][]: tagged big-endian stream (JIS X 0213)

pub mod binary;
pub mod text;

use std::io::Write;

use self::text::TextOutput;
use super::types::error::Result;

/// What a variant build hands to its caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Text(TextOutput),
    Binary(Vec<u8>),
}

impl Artifact {
    pub fn size(&self) -> usize {
        match self {
            Artifact::Text(output) => output.size(),
            Artifact::Binary(stream) => stream.len(),
        }
    }

    /// Write the artifact to `sink`: text as one rendered document, binary verbatim.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<()> {
        match self {
            Artifact::Text(output) => sink.write_all(output.render().as_bytes())?,
            Artifact::Binary(stream) => sink.write_all(stream)?,
        }
        Ok(())
    }
}
