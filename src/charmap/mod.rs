//! Charset mapping compiler.
//!
//! # Pipeline
//!
//! 1. [`sources`]: resolve `<name>.map` and its optional `.nr` / `.c2b` companions
//! 2. [`parser`]: turn each file into ordered [`Entry`](types::models::Entry) records
//! 3. [`variants`]: build decode tables and the encode index for the variant's
//!    [`TableShape`], apply overrides, shape PUA / composite tables
//! 4. [`codec`]: serialize to text fragments or the binary stream
//!
//! A variant either builds completely or fails with an error naming it;
//! nothing is written for a failed build.

pub mod codec;
pub mod parser;
pub mod sources;
pub mod tables;
pub mod types;
pub mod utils;
pub mod variants;

use std::path::Path;
use log::info;

use self::codec::Artifact;
use self::sources::{EntrySet, MappingSources};
use self::types::error::Result;
use self::types::models::ParseMode;
use self::variants::{CompiledTables, TableShape};

/// Knobs shared by every variant build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub parse_mode: ParseMode,
}

/// One charset to compile: its file-set name and table shape.
#[derive(Debug, Clone)]
pub struct Variant {
    pub name: String,
    pub shape: TableShape,
}

impl Variant {
    pub fn new(name: impl Into<String>, shape: TableShape) -> Self {
        Self {
            name: name.into(),
            shape,
        }
    }

    /// Compile this variant from the mapping files in `dir`.
    pub fn compile(&self, dir: impl AsRef<Path>, options: &CompileOptions) -> Result<CompiledTables> {
        compile(&MappingSources::new(dir, self.name.as_str()), &self.shape, options)
    }

    /// Compile and serialize in one step.
    pub fn emit(&self, dir: impl AsRef<Path>, options: &CompileOptions) -> Result<Artifact> {
        let tables = self.compile(dir, options)?;
        emit(&self.name, &tables)
    }
}

/// Load a variant's file set and build its tables.
///
/// # Errors
/// Any failure is wrapped in [`Build`](types::error::CharmapError::Build)
/// carrying the variant name.
pub fn compile(sources: &MappingSources, shape: &TableShape, options: &CompileOptions) -> Result<CompiledTables> {
    info!("Compiling {} as {}", sources.name(), shape);
    let pattern = shape.line_pattern();
    let loaded = if shape.uses_companions() {
        sources.load(pattern, options.parse_mode)
    } else {
        sources.load_primary(pattern, options.parse_mode)
    };
    let entries = loaded.map_err(|e| e.in_variant(sources.name()))?;
    compile_entries(sources.name(), shape, &entries)
}

/// Build tables from entries already in memory.
pub fn compile_entries(name: &str, shape: &TableShape, entries: &EntrySet) -> Result<CompiledTables> {
    let tables = shape.build(entries).map_err(|e| e.in_variant(name))?;
    info!(
        "Compiled {}: {} entries ({} lines, {} skipped)",
        name,
        entries.primary.len() + entries.non_roundtrip.len() + entries.encode_only.len(),
        entries.stats.lines,
        entries.stats.skipped
    );
    Ok(tables)
}

/// Serialize built tables.
pub fn emit(name: &str, tables: &CompiledTables) -> Result<Artifact> {
    let artifact = tables.artifact().map_err(|e| e.in_variant(name))?;
    info!("Emitted {}: {} bytes", name, artifact.size());
    Ok(artifact)
}
