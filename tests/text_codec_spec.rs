use charmap_compiler::charmap::codec::text::{self, TextOutput};
use charmap_compiler::Artifact;

#[test]
fn escapes_and_line_breaks() {
    let units = [0x08, 0x09, 0x0A, 0x0C, 0x0D, 0x22, 0x27, 0x5C, 0x41];
    assert_eq!(
        text::literal(&units),
        "        \"\\b\\t\\n\\f\\r\\\"\\'\\\\\" +\n        \"\\u0041\";\n"
    );
}

#[test]
fn hex_escapes_are_upper_case() {
    let mut out = String::new();
    text::escape_unit(&mut out, 0xfffd);
    text::escape_unit(&mut out, 0x00e9);
    assert_eq!(out, "\\uFFFD\\u00E9");
}

#[test]
fn full_lines_hold_eight_units() {
    let literal = text::literal(&[0x3000; 16]);
    let lines: Vec<&str> = literal.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("\" +"));
    assert!(lines[1].ends_with("\";"));
    assert_eq!(lines[1].matches("\\u3000").count(), 8);
}

#[test]
fn empty_literal_stays_well_formed() {
    assert_eq!(text::literal(&[]), "        \"\";\n");
}

#[test]
fn segment_arrays_mark_absent_segments() {
    let mut out = String::new();
    text::write_segments(&mut out, vec![None, Some(vec![0x41]), None]);
    assert_eq!(out, "        null,\n        \"\\u0041\",\n        null,\n");
}

#[test]
fn rendered_document_and_artifact_agree() {
    let mut output = TextOutput::new();
    output.push("B2C_NR", text::list_literal(Vec::new()));
    output.push("C2B_LENGTH", "0x100");
    assert_eq!(output.get("C2B_LENGTH"), Some("0x100"));
    assert_eq!(output.get("B2C"), None);

    let rendered = output.render();
    assert_eq!(rendered, "// $B2C_NR$\n        null;\n// $C2B_LENGTH$\n0x100\n");

    let artifact = Artifact::Text(output.clone());
    assert_eq!(artifact.size(), output.size());
    let mut sink = Vec::new();
    artifact.write_to(&mut sink).expect("write");
    assert_eq!(String::from_utf8(sink).expect("utf-8"), rendered);
}
