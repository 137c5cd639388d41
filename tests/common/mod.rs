#![allow(dead_code)]

use charmap_compiler::{Artifact, CharmapError, TextOutput};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub fn scratch_dir() -> TempDir {
    tempfile::tempdir().unwrap_or_else(|e| panic!("failed to create temp dir: {}", e))
}

pub fn write_file(dir: &Path, file: &str, contents: &str) {
    let path = dir.join(file);
    fs::write(&path, contents).unwrap_or_else(|e| panic!("failed to write {}: {}", path.display(), e));
}

/// `(bytes, codepoint)` pairs as mapping-file lines.
pub fn map_lines(pairs: &[(u32, u32)]) -> String {
    pairs
        .iter()
        .map(|(bytes, cp)| format!("0x{:02X}\t0x{:04X}\n", bytes, cp))
        .collect()
}

pub fn text_of(artifact: &Artifact) -> &TextOutput {
    match artifact {
        Artifact::Text(output) => output,
        Artifact::Binary(_) => panic!("expected a text artifact"),
    }
}

pub fn fragment<'a>(output: &'a TextOutput, name: &str) -> &'a str {
    output
        .get(name)
        .unwrap_or_else(|| panic!("missing fragment {}", name))
}

/// Unwrap the variant-name wrapper, checking the name.
pub fn build_source(err: CharmapError, variant: &str) -> CharmapError {
    match err {
        CharmapError::Build { variant: name, source } => {
            assert_eq!(name, variant, "error tagged with the wrong variant");
            *source
        }
        other => panic!("expected a Build error, got {:?}", other),
    }
}
