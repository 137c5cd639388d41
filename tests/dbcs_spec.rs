mod common;

use charmap_compiler::charmap::codec::text;
use charmap_compiler::charmap::tables::decode::DecodeTable;
use charmap_compiler::charmap::types::models::EncodeOrigin;
use charmap_compiler::charmap::variants::dbcs::{self, DbcsTables};
use charmap_compiler::{
    compile_entries, ByteRange, CharmapError, CompileOptions, CompiledTables, DbcsLayout, Entry, EntrySet,
    TableShape, Variant,
};
use common::{build_source, fragment, map_lines, scratch_dir, write_file};
use encoding_rs::EUC_KR;
use std::path::Path;

const EUC_LAYOUT: DbcsLayout = DbcsLayout::new(ByteRange::new(0xA1, 0xFE));

fn compile_dbcs(dir: &Path, name: &str, layout: DbcsLayout) -> DbcsTables {
    match Variant::new(name, TableShape::DoubleByte(layout))
        .compile(dir, &CompileOptions::default())
        .unwrap_or_else(|e| panic!("failed to compile {}: {}", name, e))
    {
        CompiledTables::DoubleByte(tables) => tables,
        other => panic!("expected double-byte tables, got {:?}", other),
    }
}

fn build(entries: Vec<Entry>) -> DbcsTables {
    dbcs::build(&EntrySet::from_primary(entries), DbcsLayout::default()).expect("build")
}

#[test]
fn empty_segments_are_absent() {
    let dir = scratch_dir();
    write_file(dir.path(), "one.map", &map_lines(&[(0x8140, 0x3000)]));
    let tables = compile_dbcs(dir.path(), "one", DbcsLayout::default());

    let segments: Vec<Option<Vec<u16>>> = tables.segments().collect();
    assert_eq!(segments.len(), 256);
    assert!(segments[0x82].is_none(), "segment 0x82 has no data");
    let lead = segments[0x81].as_ref().expect("segment 0x81 holds the entry");
    for (low, &unit) in lead.iter().enumerate() {
        let expected = if low == 0x40 { 0x3000 } else { 0xFFFD };
        assert_eq!(unit, expected, "cell 0x81{:02x}", low);
    }

    assert_eq!(tables.decode(0x8140), Some(0x3000));
    assert_eq!(tables.encode(0x3000), Some(0x8140));

    let output = tables.render_text();
    let b2c = fragment(&output, "B2C");
    assert_eq!(b2c.matches("        null,\n").count(), 255);

    let mut dense = String::new();
    text::write_segments(&mut dense, (0..256).map(|_| Some(vec![0xFFFDu16; 256])));
    assert!(b2c.len() < dense.len(), "absent segments must shrink the output");
}

#[test]
fn encode_index_starts_after_reserved_area() {
    let tables = build(vec![Entry::new(0x8140, 0x3000)]);
    let encode = tables.encode_index();
    assert_eq!(encode.reserved(), 0x100);
    assert_eq!(encode.base_offset(0x30), Some(0x100));
    assert_eq!(encode.len(), 0x200);

    let output = tables.render_text();
    let index = fragment(&output, "C2B_INDEX");
    assert_eq!(index.matches("\\u0100").count(), 1);
    assert_eq!(index.matches("\\uFFFD").count(), 255);
    assert_eq!(fragment(&output, "C2B_LENGTH"), "0x200");
}

#[test]
fn first_byte_sequence_wins_the_encode_cell() {
    let tables = build(vec![Entry::new(0x8140, 0x3000), Entry::new(0x8141, 0x3000)]);
    assert_eq!(tables.encode(0x3000), Some(0x8140));
    assert_eq!(tables.decode(0x8141), Some(0x3000));
}

#[test]
fn byte_sequence_equal_to_sentinel_still_wins_first() {
    let tables = build(vec![Entry::new(0xFFFD, 0x3000), Entry::new(0x8140, 0x3000)]);
    assert_eq!(tables.encode(0x3000), Some(0xFFFD));
    assert_eq!(tables.encode_index().origin(0x3000), Some(EncodeOrigin::Canonical));
}

#[test]
fn remove_drops_the_segment_but_invalidate_keeps_it() {
    let mut table = DecodeTable::double_byte();
    table.insert(0x8140, 0x3000).expect("insert");
    table.insert(0x8240, 0x3001).expect("insert");

    table.invalidate(0x8140).expect("invalidate");
    assert!(!table.is_mapped(0x8140));
    assert!(table.has_data(0x81), "invalidation keeps the segment");

    table.remove(0x8240).expect("remove");
    assert!(!table.has_data(0x82));
    assert_eq!(table.used_segments(), 1);
    table.remove(0x8240).expect("removing twice is a no-op");
    assert_eq!(table.used_segments(), 1);
}

#[test]
fn later_entry_wins_the_decode_cell() {
    let tables = build(vec![Entry::new(0x8140, 0x3000), Entry::new(0x8140, 0x3001)]);
    assert_eq!(tables.decode(0x8140), Some(0x3001));
}

#[test]
fn single_bytes_stay_out_of_double_byte_segments() {
    let tables = build(vec![Entry::new(0x41, 0x41), Entry::new(0x8140, 0x3000)]);
    assert_eq!(tables.single_byte().get(0x41), 0x41);
    assert!(!tables.double_byte().has_data(0x00));
    assert_eq!(tables.decode(0x41), Some(0x41));

    let output = tables.render_text();
    assert_eq!(fragment(&output, "B2C_SB").lines().count(), 32);
    assert_eq!(fragment(&output, "B2_MIN"), "0x00");
    assert_eq!(fragment(&output, "B2_MAX"), "0xff");
}

#[test]
fn nr_pairs_are_decode_only() {
    let dir = scratch_dir();
    write_file(dir.path(), "dup.map", &map_lines(&[(0x8140, 0x3000), (0x81A1, 0x3000)]));
    write_file(dir.path(), "dup.nr", &map_lines(&[(0x8140, 0x3000)]));
    let tables = compile_dbcs(dir.path(), "dup", DbcsLayout::default());

    assert_eq!(tables.decode(0x8140), Some(0x3000), "decode-only pair still decodes");
    assert_eq!(tables.encode(0x3000), Some(0x81A1), "encoding falls back to the next sequence");
    assert_eq!(tables.overrides().decode_only, vec![Entry::new(0x8140, 0x3000)]);
    assert_eq!(fragment(&tables.render_text(), "B2C_NR"), "        \"\\u8140\\u3000\";\n");
}

#[test]
fn c2b_extends_allocation_in_file_order() {
    let dir = scratch_dir();
    write_file(dir.path(), "dash.map", &map_lines(&[(0x8140, 0x3000)]));
    write_file(dir.path(), "dash.c2b", &map_lines(&[(0x815C, 0x2015)]));
    let tables = compile_dbcs(dir.path(), "dash", DbcsLayout::default());

    let encode = tables.encode_index();
    assert!(encode.is_used(0x20));
    // Allocated after the primary pass, regardless of the lower high byte.
    assert_eq!(encode.base_offset(0x30), Some(0x100));
    assert_eq!(encode.base_offset(0x20), Some(0x200));
    assert_eq!(tables.encode(0x2015), Some(0x815C));
    assert_eq!(encode.origin(0x2015), Some(EncodeOrigin::Override));
    assert_eq!(tables.decode(0x815C), None);
}

#[test]
fn last_c2b_entry_wins() {
    let entries = EntrySet::from_primary(vec![Entry::new(0x8140, 0x3000)])
        .with_encode_only(vec![Entry::new(0x815C, 0x2015), Entry::new(0x815D, 0x2015)]);
    let tables = dbcs::build(&entries, DbcsLayout::default()).expect("build");
    assert_eq!(tables.encode(0x2015), Some(0x815D));
    assert_eq!(tables.overrides().encode_only.len(), 2);
}

#[test]
fn round_trips_euc_kr_hangul() {
    let mut pairs: Vec<(u32, u32)> = (0x20u32..0x7F).map(|b| (b, b)).collect();
    for b1 in 0xB0u32..=0xC8 {
        for b2 in 0xA1u32..=0xFE {
            let input = [b1 as u8, b2 as u8];
            let (text, had_errors) = EUC_KR.decode_without_bom_handling(&input);
            assert!(!had_errors, "EUC-KR {:02x}{:02x} failed to decode", b1, b2);
            let ch = text.chars().next().unwrap_or_else(|| panic!("empty decode"));
            pairs.push((b1 << 8 | b2, ch as u32));
        }
    }
    let dir = scratch_dir();
    write_file(dir.path(), "euckr.map", &map_lines(&pairs));
    let tables = compile_dbcs(dir.path(), "euckr", EUC_LAYOUT);

    for &(bytes, cp) in &pairs {
        assert_eq!(tables.decode(bytes), Some(cp), "decode {:#x}", bytes);
        let encoded = tables
            .encode(cp)
            .unwrap_or_else(|| panic!("U+{:04X} does not encode", cp));
        assert_eq!(tables.decode(encoded), Some(cp));
    }

    let segments: Vec<Option<Vec<u16>>> = tables.segments().collect();
    assert!(segments[0xAF].is_none());
    let row = segments[0xB0].as_ref().expect("row 0xB0");
    assert_eq!(row.len(), 94, "segments are cut to the trailing-byte bounds");
    assert_eq!(row[0], 0xAC00, "0xB0A1 is the first Hangul syllable");
}

#[test]
fn trailing_byte_outside_bounds_is_rejected() {
    let entries = EntrySet::from_primary(vec![Entry::new(0xB040, 0xAC00)]);
    let err = dbcs::build(&entries, EUC_LAYOUT).expect_err("0x40 trail should fail");
    assert!(matches!(err, CharmapError::ByteSequenceOutOfRange { bytes: 0xB040, .. }), "got {:?}", err);
}

#[test]
fn index_overflow_fails_fast() {
    // One segment per high byte: the 256th would end past 0x10000.
    let entries: Vec<Entry> = (0u32..=0xFF).map(|high| Entry::new(0x8000 | high, high << 8)).collect();
    let err = compile_entries("wide", &TableShape::DoubleByte(DbcsLayout::default()), &EntrySet::from_primary(entries))
        .expect_err("overflow should fail");
    let source = build_source(err, "wide");
    assert!(
        matches!(source, CharmapError::StructuralOverflow { high_byte: 0xFF, .. }),
        "got {:?}",
        source
    );
}
