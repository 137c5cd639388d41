//! Custom error types for the charmap-compiler crate.

use std::path::PathBuf;
use thiserror::Error;

/// The primary error type for all operations in this crate.
#[derive(Debug, Error)]
pub enum CharmapError {
    /// An error originating from I/O operations.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// The required primary mapping file does not exist.
    #[error("Missing input mapping file: {}", path.display())]
    MissingInput { path: PathBuf },

    /// A line did not match the mapping pattern. Only raised in strict parse mode.
    #[error("Malformed line {line} in {origin}: {text:?}")]
    MalformedLine {
        origin: String,
        line: usize,
        text: String,
    },

    /// A hex field matched the pattern but does not fit in 32 bits.
    #[error("Invalid hex field {field:?} on line {line} of {origin}")]
    InvalidField {
        origin: String,
        line: usize,
        field: String,
    },

    /// A byte sequence is wider than the table shape can hold, or its trailing
    /// byte falls outside the configured segment bounds.
    #[error("Byte sequence {bytes:#x} does not fit a {shape} table")]
    ByteSequenceOutOfRange { bytes: u32, shape: &'static str },

    /// A codepoint cannot be stored by the table shape (e.g. supplementary in a BMP-only table).
    #[error("Codepoint U+{codepoint:04X} does not fit a {shape} table")]
    CodepointOutOfRange { codepoint: u32, shape: &'static str },

    /// A multi-plane byte sequence names a plane that has no table.
    #[error("Byte sequence {bytes:#x} names plane {plane}, which has no table")]
    PlaneOutOfRange { bytes: u32, plane: u32 },

    /// More encode segments were allocated than the index can address.
    #[error("Encode index {index} overflowed allocating high byte {high_byte:#04x} (limit {limit:#x} cells)")]
    StructuralOverflow {
        index: &'static str,
        high_byte: u8,
        limit: u32,
    },

    /// Supplementary codepoints of one variant span more than one plane.
    #[error("Supplementary codepoint U+{found:04X} is outside plane {expected:#x} used by earlier entries")]
    MixedSupplementaryPlanes { expected: u32, found: u32 },

    /// A codepoint handed to the PUA reverse table lies outside its range.
    #[error("Codepoint U+{codepoint:04X} is outside the PUA range U+E000..=U+{upper:04X}")]
    PuaOutOfRange { codepoint: u32, upper: u32 },

    /// A binary section holds more units than its 16-bit count field can describe.
    #[error("Section {section} holds {units} units, more than a 16-bit count allows")]
    SectionOverflow { section: &'static str, units: usize },

    /// The binary stream is structurally invalid.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Any failure while building one variant, tagged with the variant name.
    #[error("Failed to build {variant}: {source}")]
    Build {
        variant: String,
        #[source]
        source: Box<CharmapError>,
    },
}

impl CharmapError {
    /// Wraps this error with the name of the variant being built.
    pub fn in_variant(self, variant: &str) -> Self {
        match self {
            already @ CharmapError::Build { .. } => already,
            other => CharmapError::Build {
                variant: variant.to_string(),
                source: Box::new(other),
            },
        }
    }
}

/// A convenience `Result` type alias using the crate's `CharmapError` type.
pub type Result<T> = std::result::Result<T, CharmapError>;
