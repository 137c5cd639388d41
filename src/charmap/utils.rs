//! Low-level field and byte helpers

use super::types::error::{CharmapError, Result};

/// Parse one hex field of a mapping line.
///
/// The line patterns only admit hex digits, so the only failure left is a
/// field wider than 32 bits.
pub fn parse_hex(field: &str, origin: &str, line: usize) -> Result<u32> {
    u32::from_str_radix(field, 16).map_err(|_| CharmapError::InvalidField {
        origin: origin.to_string(),
        line,
        field: field.to_string(),
    })
}

/// Bits 8-15 of a value: the segment key for byte sequences and codepoints.
pub fn high_byte(value: u32) -> usize {
    ((value >> 8) & 0xFF) as usize
}

/// Bits 0-7 of a value: the position inside a segment.
pub fn low_byte(value: u32) -> usize {
    (value & 0xFF) as usize
}

/// Truncate a table cell to the 16-bit unit that is emitted.
///
/// Supplementary codepoints keep only their low 16 bits; the shapes that
/// allow them record the plane separately.
pub fn to_unit(value: u32) -> u16 {
    (value & 0xFFFF) as u16
}
