//! Escaped string-literal rendering.
//!
//! Tables are handed to a templating step as source-code string literals made
//! of 16-bit units:
//!
//! ```text
//!         "\u3000\u3001\u3002\uFF0C\uFF0E\u30FB\uFF1A\uFF1B" +
//!         "\uFF1F\uFF01",
//!         null,
//! ```
//!
//! Every line holds at most [`UNITS_PER_LINE`] escapes. A segment that never
//! received data is rendered as `null` instead of a literal full of
//! unmappable cells.

use std::fmt::Write as _;

use crate::charmap::types::models::Entry;
use crate::charmap::utils;

/// Escapes per literal line before the `+` continuation.
pub const UNITS_PER_LINE: usize = 8;

/// Marker rendered in place of an absent segment or table.
pub const ABSENT: &str = "null";

const INDENT: &str = "        ";

/// Append the escape for one unit.
///
/// Control and quoting characters get their two-character escape, everything
/// else a `\uXXXX` escape.
pub fn escape_unit(out: &mut String, unit: u16) {
    match unit {
        0x08 => out.push_str("\\b"),
        0x09 => out.push_str("\\t"),
        0x0A => out.push_str("\\n"),
        0x0C => out.push_str("\\f"),
        0x0D => out.push_str("\\r"),
        0x22 => out.push_str("\\\""),
        0x27 => out.push_str("\\'"),
        0x5C => out.push_str("\\\\"),
        _ => {
            _ = write!(out, "\\u{:04X}", unit);
        }
    }
}

/// Append `units` as one literal. Every line but the last ends with `" +`;
/// the last ends with `"` followed by `closure`.
pub fn write_literal(out: &mut String, units: &[u16], closure: &str) {
    if units.is_empty() {
        _ = writeln!(out, "{INDENT}\"\"{closure}");
        return;
    }
    let lines = units.chunks(UNITS_PER_LINE).count();
    for (i, chunk) in units.chunks(UNITS_PER_LINE).enumerate() {
        out.push_str(INDENT);
        out.push('"');
        for &unit in chunk {
            escape_unit(out, unit);
        }
        out.push('"');
        if i + 1 == lines {
            out.push_str(closure);
        } else {
            out.push_str(" +");
        }
        out.push('\n');
    }
}

/// Like [`write_literal`], with a `// 0xNN - 0xMM` comment after every line
/// naming the byte values it covers. `first` is the byte value of `units[0]`.
pub fn write_commented_literal(out: &mut String, units: &[u16], first: usize, closure: &str) {
    let lines = units.chunks(UNITS_PER_LINE).count();
    for (i, chunk) in units.chunks(UNITS_PER_LINE).enumerate() {
        let start = first + i * UNITS_PER_LINE;
        let end = start + chunk.len() - 1;
        out.push_str(INDENT);
        out.push('"');
        for &unit in chunk {
            escape_unit(out, unit);
        }
        if i + 1 == lines {
            _ = writeln!(out, "\"{closure}      // {start:#04x} - {end:#04x}");
        } else {
            _ = writeln!(out, "\" +      // {start:#04x} - {end:#04x}");
        }
    }
}

/// Append the absent marker line.
pub fn write_absent(out: &mut String, closure: &str) {
    _ = writeln!(out, "{INDENT}{ABSENT}{closure}");
}

/// Append one array element per segment: a literal, or `null` when absent.
pub fn write_segments(out: &mut String, segments: impl IntoIterator<Item = Option<Vec<u16>>>) {
    for segment in segments {
        match segment {
            Some(units) => write_literal(out, &units, ","),
            None => write_absent(out, ","),
        }
    }
}

/// A standalone literal terminated with `;`.
pub fn literal(units: &[u16]) -> String {
    let mut out = String::new();
    write_literal(&mut out, units, ";");
    out
}

/// A standalone literal, or the absent marker when `units` is `None`.
pub fn optional_literal(units: Option<&[u16]>) -> String {
    match units {
        Some(units) => literal(units),
        None => {
            let mut out = String::new();
            write_absent(&mut out, ";");
            out
        }
    }
}

/// Cells narrowed to the emitted 16-bit units.
pub fn units(cells: &[u32]) -> Vec<u16> {
    cells.iter().map(|&cell| utils::to_unit(cell)).collect()
}

/// `(bytes, codepoint)` pairs flattened to two units each.
pub fn pair_units(entries: &[Entry]) -> Vec<u16> {
    entries
        .iter()
        .flat_map(|e| [utils::to_unit(e.bytes), utils::to_unit(e.codepoint)])
        .collect()
}

/// `(bytes, codepoint)` pairs flattened to four units each (high then low
/// half of each value), for shapes whose bytes or codepoints exceed 16 bits.
pub fn wide_pair_units(entries: &[Entry]) -> Vec<u16> {
    entries
        .iter()
        .flat_map(|e| {
            [
                utils::to_unit(e.bytes >> 16),
                utils::to_unit(e.bytes),
                utils::to_unit(e.codepoint >> 16),
                utils::to_unit(e.codepoint),
            ]
        })
        .collect()
}

/// A side list as a literal, or the absent marker when it is empty.
pub fn list_literal(units: Vec<u16>) -> String {
    optional_literal((!units.is_empty()).then_some(units.as_slice()))
}

/// One named piece of generated text, keyed by its template placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub name: String,
    pub text: String,
}

/// The text artifacts of one variant, in emission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextOutput {
    fragments: Vec<Fragment>,
}

impl TextOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.fragments.push(Fragment {
            name: name.into(),
            text: text.into(),
        });
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fragments
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.text.as_str())
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.fragments
    }

    /// Total emitted size in bytes, over all fragments.
    pub fn size(&self) -> usize {
        self.fragments.iter().map(|f| f.text.len()).sum()
    }

    /// All fragments in one document, each under a `// $NAME$` header line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for fragment in &self.fragments {
            _ = writeln!(out, "// ${}$", fragment.name);
            out.push_str(&fragment.text);
            if !fragment.text.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}
