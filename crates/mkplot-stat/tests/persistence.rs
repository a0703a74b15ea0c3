use std::fs;

use mkplot_stat::{FailureSign, ResultCollection, ResultTable, StatError};
use serde_json::json;
use tempfile::tempdir;

fn fixture() -> serde_json::Value {
    json!({
        "preamble": {
            "program": "glucose",
            "prog_args": "-model",
            "benchmark": "sc2014",
            "runsolver_args": "-C 3600"
        },
        "stats": {
            "x.cnf": {"status": true, "rtime": 12, "verified": true},
            "y.cnf": {"status": true, "rtime": 0.25},
            "z.cnf": {"status": false, "rtime": 3600.0, "mem": 2048}
        }
    })
}

#[test]
fn write_after_load_reproduces_content() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("glucose.json");
    let copy = dir.path().join("copy.json");
    fs::write(&source, fixture().to_string()).expect("write fixture");

    let table = ResultTable::load(&source).expect("load");
    assert_eq!(table.origin(), Some(source.as_path()));
    table.write(Some(&copy)).expect("write copy");

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&copy).expect("read copy")).expect("json");
    assert_eq!(written, fixture());
    assert!(written["preamble"].get("origin").is_none());
}

#[test]
fn update_status_persists_to_origin() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("glucose.json");
    fs::write(&source, fixture().to_string()).expect("write fixture");

    let mut collection = ResultCollection::load([&source]).expect("load");
    let sign: FailureSign = "no-verified".parse().expect("sign");
    let flipped = collection.update_status(&sign).expect("update");
    assert_eq!(flipped, 1);

    let reloaded = ResultTable::load(&source).expect("reload");
    assert!(reloaded.get("x.cnf").expect("x").status());
    assert!(!reloaded.get("y.cnf").expect("y").status());
    assert!(!reloaded.get("z.cnf").expect("z").status());
}

#[test]
fn malformed_files_are_parse_errors() {
    let dir = tempdir().expect("tempdir");
    let not_json = dir.path().join("table.csv");
    fs::write(&not_json, "|x| a b\n|i1| 1.0 2.0\n").expect("write");
    assert!(matches!(
        ResultTable::load(&not_json),
        Err(StatError::Parse { .. })
    ));

    let no_status = dir.path().join("broken.json");
    fs::write(
        &no_status,
        json!({"preamble": {}, "stats": {"i": {"rtime": 1.0}}}).to_string(),
    )
    .expect("write");
    assert!(matches!(
        ResultTable::load(&no_status),
        Err(StatError::Parse { .. })
    ));

    let missing = dir.path().join("missing.json");
    assert!(matches!(
        ResultTable::load(&missing),
        Err(StatError::Io { .. })
    ));
}

#[test]
fn write_with_wrong_destination_count_fails() {
    let dir = tempdir().expect("tempdir");
    let source = dir.path().join("glucose.json");
    fs::write(&source, fixture().to_string()).expect("write fixture");

    let collection = ResultCollection::load([&source]).expect("load");
    let result = collection.write(Some(&[]));
    assert!(matches!(
        result,
        Err(StatError::DestinationCount {
            expected: 1,
            actual: 0
        })
    ));
}
