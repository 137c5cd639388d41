//! # charmap-compiler
//!
//! Compiles legacy charset mapping files (`<name>.map` plus optional `.nr` and
//! `.c2b` companions) into compact lookup tables: segmented decode tables, a
//! two-level encode index, and the auxiliary PUA / composite tables some
//! charsets need. Output is either escaped string-literal fragments for a
//! source template or, for JIS X 0213, a tagged binary stream.
pub mod charmap;

// Re-export the main types for convenience
pub use charmap::{
    compile, compile_entries, emit,
    codec::{text::TextOutput, Artifact},
    sources::{EntrySet, MappingSources},
    types::{
        error::{CharmapError, Result},
        models::{ByteRange, Entry, ParseMode},
    },
    variants::{dbcs::DbcsLayout, hkscs::HkscsLayout, CompiledTables, TableShape},
    CompileOptions, Variant,
};
