//! Text table files through the public API

use std::path::PathBuf;

use proptest::prelude::*;
use tableio::text_codec::{list_text_tables, read_text_table, write_text_table};
use tableio::{
    parse_number, CollectingReporter, ElementKind, ErrorKind, Severity, Table, TableConfig,
    TableIo, TableIoError,
};
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn io() -> TableIo<CollectingReporter> {
    TableIo::with_reporter(TableConfig::default(), CollectingReporter::new())
}

#[test]
fn reads_the_basic_example() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "t.txt", "#1\ndouble T(2,2)\n1 2\n3 4\n");
    let io = io();
    let table = io.read_table(&path, "T").unwrap();
    assert_eq!(table, Table::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap());
    assert!(io.reporter().is_empty());
}

#[test]
fn mixed_delimiters_and_comments() {
    let dir = tempfile::tempdir().unwrap();
    let content = "#1 created by a test\n\
        # a comment line\n\
        float other(1,1)\n\
        99\n\
        double tab1( 3 , 2 )\n\
        \n\
        0, 1.5 # trailing comment\n\
        \t# indented comment\n\
        1;-2e3\n\
        2.5\t\t+7\r\n";
    let path = write_file(&dir, "t.txt", content);
    let table = io().read_table(&path, "tab1").unwrap();
    assert_eq!(table.dimensions(), (3, 2));
    assert_eq!(table.data(), &[0.0, 1.5, 1.0, -2000.0, 2.5, 7.0]);
}

#[test]
fn signature_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let io = io();

    let cases = [
        ("empty.txt", ""),
        ("blank.txt", "\ndouble T(1,1)\n1\n"),
        ("single.txt", "#\n"),
        ("two.txt", "#2\ndouble T(1,1)\n1\n"),
    ];
    let kinds: Vec<_> = cases
        .iter()
        .map(|(name, content)| {
            let path = write_file(&dir, name, content);
            io.read_table(&path, "T").unwrap_err()
        })
        .collect();

    assert!(matches!(kinds[0], TableIoError::FirstLineEof { .. }));
    for err in &kinds[1..] {
        assert!(matches!(err, TableIoError::BadSignature { .. }), "{err}");
        assert_eq!(err.kind(), ErrorKind::Format);
    }
    // Each variant describes what was found differently
    let texts: Vec<String> = kinds[1..].iter().map(|e| e.to_string()).collect();
    assert_ne!(texts[0], texts[1]);
    assert_ne!(texts[1], texts[2]);
}

#[test]
fn malformed_headers_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let content = "#1\n\
        double T(x,2)\n\
        double T 1\n\
        int T(1,1)\n\
        double T(1,2)\n\
        5 6\n";
    let path = write_file(&dir, "t.txt", content);
    assert_eq!(io().read_table(&path, "T").unwrap().data(), &[5.0, 6.0]);
}

#[test]
fn names_match_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "t.txt", "#1\ndouble tab(1,1)\n1\n");
    let err = io().read_table(&path, "Tab").unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("Table matrix \"Tab\" not found on file \"{}\".", path.display())
    );
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn declared_size_classification() {
    let dir = tempfile::tempdir().unwrap();

    // Excess value on the row that completes the table
    let path = write_file(&dir, "a.txt", "#1\ndouble T(2,2)\n1 2\n3 4 5\n");
    let err = io().read_table(&path, "T").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DeclaredSizeMismatch);
    assert!(err.to_string().ends_with("(line 4)."), "{err}");

    // Excess non-number on that row
    let path = write_file(&dir, "b.txt", "#1\ndouble T(2,2)\n1 2\n3 4 x\n");
    let err = io().read_table(&path, "T").unwrap_err();
    assert!(matches!(err, TableIoError::Parse { line: 4, .. }), "{err}");

    // A further row after the table: warning, declared size kept
    let path = write_file(&dir, "c.txt", "#1\ndouble T(2,2)\n1 2\n3 4\n\n5 6\n");
    let io = io();
    let table = io.read_table(&path, "T").unwrap();
    assert_eq!(table.dimensions(), (2, 2));
    let warnings = io.reporter().with_severity(Severity::Warning);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("do not match the actual table size (line 6)"));

    // A comment ending the last row closes the table: no check follows
    let path = write_file(&dir, "e.txt", "#1\ndouble T(2,2)\n1 2\n3 4 # end\n5 6\n");
    let io = self::io();
    assert_eq!(io.read_table(&path, "T").unwrap().data(), &[1.0, 2.0, 3.0, 4.0]);
    assert!(io.reporter().is_empty());

    // Fewer rows than declared
    let path = write_file(&dir, "d.txt", "#1\ndouble T(3,2)\n1 2\n3 4\n\n");
    let err = io.read_table(&path, "T").unwrap_err();
    assert!(matches!(err, TableIoError::UnexpectedEof { .. }), "{err}");
}

#[test]
fn zero_dimension_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(&dir, "t.txt", "#1\ndouble T(0,3)\n");
    let err = io().read_table(&path, "T").unwrap_err();
    assert!(matches!(err, TableIoError::ZeroDimension { .. }));
}

#[test]
fn long_lines_are_read_whole() {
    let dir = tempfile::tempdir().unwrap();
    let cols = 2000;
    let row: Vec<String> = (0..cols).map(|k| format!("{}.25", k)).collect();
    let content = format!("#1\ndouble wide(1,{cols})\n{}\n", row.join(" "));
    let path = write_file(&dir, "t.txt", &content);

    let config = TableConfig::default().with_line_buffer_capacity(1);
    let table = read_text_table(&path, "wide", &config, &CollectingReporter::new()).unwrap();
    assert_eq!(table.cols(), cols);
    assert_eq!(table.get(0, cols - 1), Some(1999.25));
}

#[test]
fn write_append_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let a = Table::new(2, 2, vec![0.1, -2.0, 1e-300, 3.5]).unwrap();
    let b = Table::new(1, 3, vec![1.0, 2.0, 3.0]).unwrap();

    write_text_table(&path, [("a", &a)], false).unwrap();
    write_text_table(&path, [("b", &b)], true).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("#1\ndouble a(2,2)\n0.1\t-2.0\n"));

    let listed = list_text_tables(&path).unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[1].name, "b");
    assert_eq!(listed[1].kind, ElementKind::Double);
    assert_eq!((listed[1].rows, listed[1].cols), (1, 3));
    assert_eq!(listed[1].line, 5);

    let io = io();
    assert_eq!(io.read_table(&path, "a").unwrap(), a);
    assert_eq!(io.read_table(&path, "b").unwrap(), b);
}

#[test]
fn invalid_names_are_not_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let t = Table::new(1, 1, vec![1.0]).unwrap();
    for name in ["", "a b", "a(1)", "#x"] {
        let err = write_text_table(&path, [(name, &t)], false).unwrap_err();
        assert!(matches!(err, TableIoError::Write { .. }), "{name:?}");
    }
    assert!(!path.exists());
}

#[test]
fn number_parsing_ignores_locale() {
    let parsed = parse_number("3.14");
    assert!(parsed.fully_consumed);
    assert_eq!(parsed.value, 3.14);
    // A decimal comma is a delimiter, never a separator
    assert!(!parse_number("3,14").fully_consumed);
}

#[cfg(feature = "serde")]
#[test]
fn deserialized_tables_are_checked() {
    let table: Table = serde_json::from_str(r#"{"rows":1,"cols":2,"data":[1.0,2.5]}"#).unwrap();
    assert_eq!(table.dimensions(), (1, 2));
    assert_eq!(table.data(), &[1.0, 2.5]);

    for text in [
        r#"{"rows":2,"cols":2,"data":[]}"#,
        r#"{"rows":1,"cols":2,"data":[1.0,2.0,3.0]}"#,
        r#"{"rows":0,"cols":3,"data":[]}"#,
    ] {
        assert!(serde_json::from_str::<Table>(text).is_err(), "{text}");
    }

    let absent = serde_json::to_string(&Table::absent()).unwrap();
    assert!(serde_json::from_str::<Table>(&absent).unwrap().is_absent());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_written_tables_read_back(
        (rows, cols, data) in (1usize..6, 1usize..6).prop_flat_map(|(r, c)| {
            (Just(r), Just(c), prop::collection::vec(-1.0e12f64..1.0e12, r * c))
        }),
    ) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("p.txt");
        let table = Table::new(rows, cols, data).unwrap();
        write_text_table(&path, [("p", &table)], false).unwrap();
        let back = read_text_table(&path, "p", &TableConfig::default(), &CollectingReporter::new()).unwrap();
        prop_assert_eq!(back, table);
    }
}
