//! Mapping-file line parsing.
//!
//! Mapping files are line oriented. Each significant line carries
//! whitespace-separated hex fields:
//!
//! ```text
//! 0x8140  0x3000          # generic double-byte: bytes, codepoint
//! 8EA2A1A1  4E42          # EUC-TW: optional 8EA plane prefix
//! 0x8840  U+00CA  U+E000  # HKSCS: bytes, codepoint, alternate/PUA codepoint
//! 0x82F5  U+304B+309A  # JIS X 0213: codepoint with combining suffix
//! ```
//!
//! Lines starting with `#` and blank lines are comments. Lines that do not
//! match the variant's pattern are skipped without producing an entry; how
//! loudly that happens is governed by [`ParseMode`].

use std::io::BufRead;
use std::sync::OnceLock;
use log::{debug, trace, warn};
use regex::Regex;

use super::types::error::{CharmapError, Result};
use super::types::models::{Entry, ParseMode, ParseStats};
use super::utils;

static BASIC_PATTERN: OnceLock<Regex> = OnceLock::new();
static EUC_TW_PATTERN: OnceLock<Regex> = OnceLock::new();
static HKSCS_PATTERN: OnceLock<Regex> = OnceLock::new();
static JIS0213_PATTERN: OnceLock<Regex> = OnceLock::new();

/// The per-variant shape of a mapping line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinePattern {
    /// `(0x)?<bytes> (0x|U+)?<codepoint>`
    Basic,
    /// `(0x)?(8EA)?<bytes> (0x|U+)?<codepoint>`; the plane digit stays in bits 16-23.
    EucTw,
    /// `(0x)?<bytes> (0x|U+)?<codepoint> [(0x|U+)?<alternate>]`
    Hkscs,
    /// `0x<bytes> U+<codepoint>[+<combining>]`
    Jis0213,
}

impl LinePattern {
    fn regex(&self) -> &'static Regex {
        match self {
            LinePattern::Basic => BASIC_PATTERN.get_or_init(|| {
                Regex::new(r"^(?:0x)?([[:xdigit:]]+)\s+(?:0x|U\+)?([[:xdigit:]]+)")
                    .expect("Invalid basic mapping pattern")
            }),
            LinePattern::EucTw => EUC_TW_PATTERN.get_or_init(|| {
                Regex::new(r"^(?:0x)?(?i:8ea)?([[:xdigit:]]+)\s+(?:0x|U\+)?([[:xdigit:]]+)")
                    .expect("Invalid EUC-TW mapping pattern")
            }),
            LinePattern::Hkscs => HKSCS_PATTERN.get_or_init(|| {
                Regex::new(
                    r"^(?:0x)?([[:xdigit:]]+)\s+(?:0x|U\+)?([[:xdigit:]]+)(?:\s+(?:0x|U\+)?([[:xdigit:]]+))?",
                )
                .expect("Invalid HKSCS mapping pattern")
            }),
            LinePattern::Jis0213 => JIS0213_PATTERN.get_or_init(|| {
                Regex::new(r"^0x([[:xdigit:]]+)\s+U\+([[:xdigit:]]+)(?:\+([[:xdigit:]]+))?(?:\s|$)")
                    .expect("Invalid JIS X 0213 mapping pattern")
            }),
        }
    }

    /// Match one line. `Ok(None)` means the line is not a mapping line.
    fn capture(&self, line: &str, origin: &str, line_no: usize) -> Result<Option<Entry>> {
        let Some(caps) = self.regex().captures(line) else {
            return Ok(None);
        };
        let field = |group: usize| -> Result<Option<u32>> {
            caps.get(group)
                .map(|m| utils::parse_hex(m.as_str(), origin, line_no))
                .transpose()
        };

        let bytes = field(1)?;
        let codepoint = field(2)?;
        let secondary = field(3)?.unwrap_or(0);

        Ok(match (bytes, codepoint) {
            (Some(bytes), Some(codepoint)) => Some(Entry::with_secondary(bytes, codepoint, secondary)),
            _ => None,
        })
    }
}

/// Streams [`Entry`] values out of a mapping file, one line at a time.
pub struct EntryParser<R> {
    reader: R,
    pattern: LinePattern,
    mode: ParseMode,
    origin: String,
    line_no: usize,
    buf: Vec<u8>,
    stats: ParseStats,
    finished: bool,
}

impl<R: BufRead> EntryParser<R> {
    /// Create a parser. `origin` names the input in diagnostics and errors.
    pub fn new(reader: R, pattern: LinePattern, origin: impl Into<String>) -> Self {
        Self {
            reader,
            pattern,
            mode: ParseMode::default(),
            origin: origin.into(),
            line_no: 0,
            buf: Vec::new(),
            stats: ParseStats::default(),
            finished: false,
        }
    }

    pub fn with_mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    /// Counts gathered so far.
    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    /// Returns the next matching entry, or `None` at end of input.
    ///
    /// # Errors
    /// - I/O failures while reading
    /// - A hex field too wide for 32 bits
    /// - An unmatched line in [`ParseMode::Strict`]
    pub fn next_entry(&mut self) -> Result<Option<Entry>> {
        if self.finished {
            return Ok(None);
        }
        loop {
            self.buf.clear();
            if self.reader.read_until(b'\n', &mut self.buf)? == 0 {
                self.finish();
                return Ok(None);
            }
            self.line_no += 1;
            self.stats.lines += 1;

            // Mapping files are ASCII; comments occasionally are not.
            let text = String::from_utf8_lossy(&self.buf).into_owned();
            let line = text.trim_end_matches(['\n', '\r']);
            let significant = line.trim_start();
            if significant.is_empty() || significant.starts_with('#') {
                self.stats.comments += 1;
                continue;
            }

            match self.pattern.capture(line, &self.origin, self.line_no)? {
                Some(entry) => {
                    self.stats.entries += 1;
                    trace!(
                        "{}:{}: {:#x} -> U+{:04X} (+{:#x})",
                        self.origin, self.line_no, entry.bytes, entry.codepoint, entry.secondary
                    );
                    return Ok(Some(entry));
                }
                None => self.skip(line)?,
            }
        }
    }

    /// Drain the remaining input into a vector.
    pub fn collect_entries(mut self) -> Result<(Vec<Entry>, ParseStats)> {
        let mut entries = Vec::new();
        while let Some(entry) = self.next_entry()? {
            entries.push(entry);
        }
        Ok((entries, self.stats))
    }

    fn skip(&mut self, line: &str) -> Result<()> {
        self.stats.skipped += 1;
        match self.mode {
            ParseMode::Lenient => Ok(()),
            ParseMode::Diagnostic => {
                warn!("{}:{}: skipping unmatched line {:?}", self.origin, self.line_no, line);
                Ok(())
            }
            ParseMode::Strict => Err(CharmapError::MalformedLine {
                origin: self.origin.clone(),
                line: self.line_no,
                text: line.to_string(),
            }),
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        debug!(
            "Parsed {}: {} lines, {} entries, {} comments, {} skipped",
            self.origin, self.stats.lines, self.stats.entries, self.stats.comments, self.stats.skipped
        );
        if self.mode == ParseMode::Diagnostic && self.stats.skipped > 0 {
            warn!("{}: {} unmatched lines skipped", self.origin, self.stats.skipped);
        }
    }
}

impl<R: BufRead> Iterator for EntryParser<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

/// Parse an in-memory mapping text in one go.
pub fn parse_str(text: &str, pattern: LinePattern, mode: ParseMode) -> Result<Vec<Entry>> {
    let (entries, _) = EntryParser::new(text.as_bytes(), pattern, "<memory>")
        .with_mode(mode)
        .collect_entries()?;
    Ok(entries)
}
