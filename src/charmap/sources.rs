//! Input file set resolution.
//!
//! A variant is compiled from one required primary map, `<name>.map`, and up
//! to two optional companions next to it:
//! - `<name>.nr`: decode-side non-roundtrip entries
//! - `<name>.c2b`: encode-only additions
//!
//! Companion presence is decided by file existence alone. A missing companion
//! is never opened and contributes zero entries.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use log::{debug, info};

use super::parser::{EntryParser, LinePattern};
use super::types::error::{CharmapError, Result};
use super::types::models::{Companion, Entry, ParseMode, ParseStats};

/// Paths of one variant's mapping files.
#[derive(Debug, Clone)]
pub struct MappingSources {
    dir: PathBuf,
    name: String,
}

impl MappingSources {
    pub fn new(dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_path(&self) -> PathBuf {
        self.dir.join(format!("{}.map", self.name))
    }

    pub fn companion_path(&self, companion: Companion) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, companion.extension()))
    }

    /// Open the primary map.
    ///
    /// # Errors
    /// [`CharmapError::MissingInput`] when the file does not exist.
    pub fn open_primary(&self, pattern: LinePattern, mode: ParseMode) -> Result<EntryParser<BufReader<File>>> {
        let path = self.primary_path();
        if !path.is_file() {
            return Err(CharmapError::MissingInput { path });
        }
        open_parser(&path, pattern, mode)
    }

    /// Open a companion file, or `None` when it does not exist.
    pub fn open_companion(
        &self,
        companion: Companion,
        pattern: LinePattern,
        mode: ParseMode,
    ) -> Result<Option<EntryParser<BufReader<File>>>> {
        let path = self.companion_path(companion);
        if !path.is_file() {
            debug!("No {} companion for {}", companion, self.name);
            return Ok(None);
        }
        open_parser(&path, pattern, mode).map(Some)
    }

    /// Read the whole file set into memory.
    pub fn load(&self, pattern: LinePattern, mode: ParseMode) -> Result<EntrySet> {
        info!("Loading mapping files for {} from {}", self.name, self.dir.display());

        let (primary, mut stats) = self.open_primary(pattern, mode)?.collect_entries()?;

        let mut read_companion = |companion: Companion| -> Result<Vec<Entry>> {
            match self.open_companion(companion, pattern, mode)? {
                Some(parser) => {
                    let (entries, companion_stats) = parser.collect_entries()?;
                    stats.absorb(companion_stats);
                    Ok(entries)
                }
                None => Ok(Vec::new()),
            }
        };
        let non_roundtrip = read_companion(Companion::NonRoundtrip)?;
        let encode_only = read_companion(Companion::EncodeOnly)?;

        info!(
            "Loaded {}: {} primary, {} non-roundtrip, {} encode-only entries",
            self.name,
            primary.len(),
            non_roundtrip.len(),
            encode_only.len()
        );

        Ok(EntrySet {
            primary,
            non_roundtrip,
            encode_only,
            stats,
        })
    }

    /// Read the primary map only; companions are ignored even when present.
    pub fn load_primary(&self, pattern: LinePattern, mode: ParseMode) -> Result<EntrySet> {
        info!("Loading primary map for {} from {}", self.name, self.dir.display());
        let (primary, stats) = self.open_primary(pattern, mode)?.collect_entries()?;
        Ok(EntrySet {
            primary,
            stats,
            ..Default::default()
        })
    }
}

fn open_parser(path: &Path, pattern: LinePattern, mode: ParseMode) -> Result<EntryParser<BufReader<File>>> {
    let file = File::open(path)?;
    Ok(EntryParser::new(BufReader::new(file), pattern, path.display().to_string()).with_mode(mode))
}

/// Every entry of a variant's file set, in file order.
#[derive(Debug, Clone, Default)]
pub struct EntrySet {
    pub primary: Vec<Entry>,
    pub non_roundtrip: Vec<Entry>,
    pub encode_only: Vec<Entry>,
    /// Combined parse counts over all files that were present.
    pub stats: ParseStats,
}

impl EntrySet {
    /// A set with only a primary map, as when no companions exist.
    pub fn from_primary(primary: Vec<Entry>) -> Self {
        Self {
            primary,
            ..Default::default()
        }
    }

    pub fn with_non_roundtrip(mut self, entries: Vec<Entry>) -> Self {
        self.non_roundtrip = entries;
        self
    }

    pub fn with_encode_only(mut self, entries: Vec<Entry>) -> Self {
        self.encode_only = entries;
        self
    }
}
