mod common;

use charmap_compiler::charmap::types::models::EncodeOrigin;
use charmap_compiler::charmap::variants::sbcs::{self, SbcsTables};
use charmap_compiler::{
    compile_entries, CharmapError, CompileOptions, CompiledTables, Entry, EntrySet, TableShape, Variant,
};
use common::{build_source, fragment, map_lines, scratch_dir, text_of, write_file};
use encoding_rs::WINDOWS_1252;
use std::path::Path;

fn compile_sbcs(dir: &Path, name: &str) -> SbcsTables {
    match Variant::new(name, TableShape::SingleByte)
        .compile(dir, &CompileOptions::default())
        .unwrap_or_else(|e| panic!("failed to compile {}: {}", name, e))
    {
        CompiledTables::SingleByte(tables) => tables,
        other => panic!("expected single-byte tables, got {:?}", other),
    }
}

/// Every byte of windows-1252 with its codepoint, straight from encoding_rs.
fn windows_1252_pairs() -> Vec<(u32, u32)> {
    (0u32..=0xFF)
        .map(|byte| {
            let input = [byte as u8];
            let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(&input);
            assert!(!had_errors, "windows-1252 byte {:#x} failed to decode", byte);
            let ch = text.chars().next().unwrap_or_else(|| panic!("empty decode for {:#x}", byte));
            (byte, ch as u32)
        })
        .collect()
}

#[test]
fn two_entry_map() {
    let dir = scratch_dir();
    write_file(dir.path(), "ab.map", &map_lines(&[(0x41, 0x41), (0x42, 0x42)]));
    let tables = compile_sbcs(dir.path(), "ab");

    let decode = tables.decode_table();
    assert_eq!(decode.cells().len(), 256);
    for byte in 0u32..=0xFF {
        let expected = match byte {
            0x41 | 0x42 => byte,
            _ => 0xFFFD,
        };
        assert_eq!(decode.get(byte), expected, "cell {:#x}", byte);
    }

    let encode = tables.encode_index();
    assert_eq!(encode.used_segments(), 1);
    assert!(encode.is_used(0x00));
    assert_eq!(encode.len(), 256);
    assert_eq!(tables.encode(0x42), Some(0x42));
    assert_eq!(tables.encode(0x43), None);
}

#[test]
fn nr_invalidates_decode_but_keeps_encode() {
    let dir = scratch_dir();
    write_file(dir.path(), "euro.map", &map_lines(&[(0x80, 0x20AC), (0x41, 0x41)]));
    write_file(dir.path(), "euro.nr", &map_lines(&[(0x80, 0x20AC)]));
    let tables = compile_sbcs(dir.path(), "euro");

    assert_eq!(tables.decode(0x80), None, "0x80 must no longer decode");
    assert_eq!(tables.decode(0x41), Some(0x41));
    assert_eq!(tables.encode(0x20AC), Some(0x80), "U+20AC must still encode");
    assert_eq!(tables.overrides().invalidated, vec![0x80]);

    let output = tables.render_text();
    // 0x80 sits first in the upper-half-first layout.
    assert_eq!(fragment(&output, "B2C_NR"), "        \"\\u0000\";\n");
}

#[test]
fn c2b_allocates_a_new_segment() {
    let dir = scratch_dir();
    write_file(dir.path(), "bullet.map", &map_lines(&[(0x41, 0x41)]));
    write_file(dir.path(), "bullet.c2b", &map_lines(&[(0x3F, 0x2022)]));
    let tables = compile_sbcs(dir.path(), "bullet");

    let encode = tables.encode_index();
    assert!(encode.is_used(0x20), "c2b codepoint must mark its high byte");
    assert_eq!(encode.used_segments(), 2);
    assert_eq!(encode.base_offset(0x20), Some(0x100));
    assert_eq!(tables.encode(0x2022), Some(0x3F));
    assert_eq!(encode.origin(0x2022), Some(EncodeOrigin::Override));
    assert_eq!(encode.origin(0x41), Some(EncodeOrigin::Canonical));
    assert_eq!(tables.decode(0x3F), None, "encode-only pairs never decode");

    let output = tables.render_text();
    assert_eq!(fragment(&output, "C2B_NR"), "        \"\\u003F\\u2022\";\n");
    assert_eq!(fragment(&output, "C2B_LENGTH"), "0x200");
}

#[test]
fn round_trips_windows_1252() {
    let pairs = windows_1252_pairs();
    let dir = scratch_dir();
    write_file(dir.path(), "cp1252.map", &map_lines(&pairs));
    let tables = compile_sbcs(dir.path(), "cp1252");

    for &(byte, cp) in &pairs {
        assert_eq!(tables.decode(byte), Some(cp), "decode {:#x}", byte);
        let encoded = tables
            .encode(cp)
            .unwrap_or_else(|| panic!("U+{:04X} does not encode", cp));
        assert_eq!(tables.decode(encoded), Some(cp), "U+{:04X} does not round-trip", cp);
    }
    // High bytes 0x00, 0x01, 0x02, 0x20 and 0x21 are in use.
    assert_eq!(tables.encode_index().used_segments(), 5);
    assert_eq!(fragment(&tables.render_text(), "C2B_LENGTH"), "0x500");
}

#[test]
fn table_literal_is_upper_half_first() {
    let pairs = windows_1252_pairs();
    let dir = scratch_dir();
    write_file(dir.path(), "cp1252.map", &map_lines(&pairs));
    let output = compile_sbcs(dir.path(), "cp1252").render_text();

    let table = fragment(&output, "B2C_TABLE");
    let lines: Vec<&str> = table.lines().collect();
    assert_eq!(lines.len(), 32);
    assert!(lines[0].starts_with("        \"\\u20AC"), "first cell is 0x80: {}", lines[0]);
    assert!(lines[0].ends_with("\" +      // 0x80 - 0x87"), "got {}", lines[0]);
    assert!(lines[15].ends_with("\" +      // 0xf8 - 0xff"), "got {}", lines[15]);
    assert!(lines[16].ends_with("\" +      // 0x00 - 0x07"), "got {}", lines[16]);
    assert!(lines[31].ends_with("\";      // 0x78 - 0x7f"), "got {}", lines[31]);
}

#[test]
fn empty_side_lists_render_null() {
    let entries = EntrySet::from_primary(vec![Entry::new(0x41, 0x41)]);
    let tables = sbcs::build(&entries).expect("build");
    let output = tables.render_text();
    assert_eq!(fragment(&output, "B2C_NR"), "        null;\n");
    assert_eq!(fragment(&output, "C2B_NR"), "        null;\n");

    let artifact = tables_artifact(&entries);
    assert_eq!(text_of(&artifact).fragments().len(), 4);
}

fn tables_artifact(entries: &EntrySet) -> charmap_compiler::Artifact {
    compile_entries("plain", &TableShape::SingleByte, entries)
        .and_then(|tables| tables.artifact())
        .expect("artifact")
}

#[test]
fn supplementary_codepoint_is_rejected() {
    let dir = scratch_dir();
    write_file(dir.path(), "emoji.map", "0x41 0x1F600\n");
    let err = Variant::new("emoji", TableShape::SingleByte)
        .compile(dir.path(), &CompileOptions::default())
        .expect_err("supplementary codepoint should fail");
    let source = build_source(err, "emoji");
    assert!(
        matches!(source, CharmapError::CodepointOutOfRange { codepoint: 0x1F600, .. }),
        "got {:?}",
        source
    );
}

#[test]
fn missing_primary_names_the_variant() {
    let dir = scratch_dir();
    let err = Variant::new("nowhere", TableShape::SingleByte)
        .compile(dir.path(), &CompileOptions::default())
        .expect_err("missing map should fail");
    let message = err.to_string();
    assert!(message.contains("nowhere"), "message should name the variant: {}", message);
    assert!(matches!(build_source(err, "nowhere"), CharmapError::MissingInput { .. }));
}

#[test]
fn double_byte_sequence_is_rejected() {
    let entries = EntrySet::from_primary(vec![Entry::new(0x8140, 0x3000)]);
    let err = sbcs::build(&entries).expect_err("two-byte sequence should fail");
    assert!(matches!(err, CharmapError::ByteSequenceOutOfRange { bytes: 0x8140, .. }), "got {:?}", err);
}
