//! Core data structures shared by the table builders.
//!
//! This module defines the fundamental types used throughout the library:
//! - Parsed mapping entries
//! - Sentinel values for unmappable cells
//! - Byte ranges bounding decode segments
//! - Parse statistics and modes

use std::fmt;

/// Decode-side sentinel: the byte sequence has no mapping.
pub const UNMAPPABLE_DECODING: u32 = 0xFFFD;

/// Encode-side sentinel: the codepoint has no mapping.
pub const UNMAPPABLE_ENCODING: u32 = 0xFFFD;

/// Number of cells in one segment, keyed by a high byte.
pub const SEGMENT_SIZE: usize = 0x100;

/// One mapping line from a charset file.
///
/// `bytes` packs 1-3 bytes big-endian (plane prefixes included for multi-plane maps).
/// `secondary` is the combining codepoint (JIS X 0213) or the alternate/PUA
/// codepoint (HKSCS); it is 0 when the line has no third field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Entry {
    pub bytes: u32,
    pub codepoint: u32,
    pub secondary: u32,
}

impl Entry {
    pub fn new(bytes: u32, codepoint: u32) -> Self {
        Self { bytes, codepoint, secondary: 0 }
    }

    pub fn with_secondary(bytes: u32, codepoint: u32, secondary: u32) -> Self {
        Self { bytes, codepoint, secondary }
    }

    /// Whether the primary codepoint lies beyond the BMP.
    pub fn is_supplementary(&self) -> bool {
        self.codepoint >= 0x10000
    }
}

/// Inclusive byte range, used for the lead and trailing bytes of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub min: u8,
    pub max: u8,
}

impl ByteRange {
    /// Every byte value, 0x00-0xFF.
    pub const FULL: ByteRange = ByteRange { min: 0x00, max: 0xFF };

    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn len(&self) -> usize {
        (self.max as usize).saturating_sub(self.min as usize) + 1
    }

    pub fn is_empty(&self) -> bool {
        self.max < self.min
    }

    pub fn contains(&self, byte: u32) -> bool {
        byte >= self.min as u32 && byte <= self.max as u32
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> {
        self.min as u32..=self.max as u32
    }
}

impl Default for ByteRange {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:#04x}-{:#04x}", self.min, self.max)
    }
}

/// How the parser treats lines that do not match the mapping pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Skip silently. This is the established behavior for mapping files.
    #[default]
    Lenient,
    /// Skip, but log every skipped line and report the count.
    Diagnostic,
    /// Abort on the first unmatched, non-comment, non-blank line.
    Strict,
}

/// Line counts gathered while parsing one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseStats {
    /// Lines read, including blanks and comments.
    pub lines: usize,
    /// Lines that produced an entry.
    pub entries: usize,
    /// Blank lines and lines starting with `#`.
    pub comments: usize,
    /// Non-comment lines that did not match the pattern.
    pub skipped: usize,
}

impl ParseStats {
    /// Adds the counts of another file (e.g. a companion) into this one.
    pub fn absorb(&mut self, other: ParseStats) {
        self.lines += other.lines;
        self.entries += other.entries;
        self.comments += other.comments;
        self.skipped += other.skipped;
    }
}

/// Where an encode lookup cell came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeOrigin {
    /// Filled from the primary map.
    Canonical,
    /// Filled from an encode-only (`.c2b`) override.
    Override,
}

/// Companion files that may sit next to a primary `.map` file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Companion {
    /// `.nr`: decode-side non-roundtrip entries.
    NonRoundtrip,
    /// `.c2b`: encode-only additions.
    EncodeOnly,
}

impl Companion {
    pub fn extension(&self) -> &'static str {
        match self {
            Companion::NonRoundtrip => "nr",
            Companion::EncodeOnly => "c2b",
        }
    }
}

impl fmt::Display for Companion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ".{}", self.extension())
    }
}
