use std::{fs, path::PathBuf};

use mkplot_series::{
    CsvError, LoadError, PlotOptions, Series, clamp, load_series, sort_series,
};
use proptest::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

/// Tool `a` solves `i1` only; tool `b` solves both instances.
fn two_tools(dir: &TempDir) -> Vec<PathBuf> {
    let a = json!({
        "preamble": {"program": "a", "prog_args": "", "benchmark": "set"},
        "stats": {
            "i1": {"status": true, "rtime": 1.0},
            "i2": {"status": false, "rtime": 10.0},
        },
    });
    let b = json!({
        "preamble": {"program": "b", "prog_args": "", "benchmark": "set"},
        "stats": {
            "i1": {"status": true, "rtime": 2.0},
            "i2": {"status": true, "rtime": 0.5},
        },
    });
    vec![
        write_file(dir, "a.json", &a.to_string()),
        write_file(dir, "b.json", &b.to_string()),
    ]
}

fn options(settings: serde_json::Value) -> PlotOptions {
    serde_json::from_value(settings).expect("options")
}

fn labels(series: &[Series]) -> Vec<&str> {
    series.iter().map(|s| s.label.as_str()).collect()
}

#[test]
fn test_tool_series_sorted_best_first() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = two_tools(&dir);

    let series = load_series(&paths, &options(json!({"timeout": 10}))).expect("series");
    assert_eq!(labels(&series), ["b", "a"]);
    assert_eq!(series[0].solved, 2);
    assert_eq!(series[0].values, [2.0, 0.5]);
    assert_eq!(series[1].solved, 1);
    assert_eq!(series[1].values, [1.0, 100.0]);

    let reversed =
        load_series(&paths, &options(json!({"timeout": 10, "reverse": true}))).expect("series");
    assert_eq!(labels(&reversed), ["a", "b"]);
}

#[test]
fn test_vbs_over_all_tools() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = two_tools(&dir);

    let settings = json!({"timeout": 10, "vbs": {"vbs": "all"}});
    let series = load_series(&paths, &options(settings)).expect("series");
    assert_eq!(labels(&series), ["vbs", "b", "a"]);

    let vbs = &series[0];
    assert_eq!(vbs.values, [1.0, 0.5]);
    assert_eq!(vbs.solved, 2);
    assert!((vbs.max_solved - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_only_and_replacements_apply_after_vbs() {
    let dir = tempfile::tempdir().expect("tempdir");
    let paths = two_tools(&dir);

    let settings = json!({
        "timeout": 10,
        "vbs": {"best": ["a", "b"]},
        "only": ["a", "best"],
        "repls": {"a": "Tool A"},
    });
    let series = load_series(&paths, &options(settings)).expect("series");
    assert_eq!(labels(&series), ["best", "Tool A"]);
}

#[test]
fn test_clustered_tables_form_one_series() {
    let dir = tempfile::tempdir().expect("tempdir");
    let part = |bench: &str, rtime: f64| {
        json!({
            "preamble": {"program": "a", "prog_args": "-x", "benchmark": bench},
            "stats": {"i1": {"status": true, "rtime": rtime}},
        })
        .to_string()
    };
    let paths = [
        write_file(&dir, "part1.json", &part("set1", 1.0)),
        write_file(&dir, "part2.json", &part("set2", 3.0)),
    ];

    let settings = json!({"timeout": 10, "join_key": ["program", "prog_args"]});
    let series = load_series(&paths, &options(settings)).expect("series");
    assert_eq!(series.len(), 1);
    assert_eq!(series[0].values, [1.0, 3.0]);
    assert_eq!(series[0].solved, 2);
}

#[test]
fn test_row_table_fallback_for_single_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(
        &dir,
        "runtimes.csv",
        "|instance| |a| |b|\n|i1| 1.0 2.0\n|i2| 20.0 2.0\n|i3| 3.0 2.0\n",
    );

    let cactus = load_series(&[&path], &options(json!({"timeout": 10}))).expect("series");
    let a = cactus.iter().find(|s| s.label == "a").expect("a");
    assert_eq!(a.values, [1.0, 100.0, 3.0]);
    assert_eq!(a.solved, 2);

    let settings = json!({"timeout": 10, "plot_type": "scatter"});
    let scatter = load_series(&[&path], &options(settings)).expect("series");
    let a = scatter.iter().find(|s| s.label == "a").expect("a");
    assert_eq!(a.values, [1.0, 10.0, 3.0]);
}

#[test]
fn test_unreadable_single_file_reports_both_formats() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = write_file(&dir, "broken.txt", "{\"preamble\": 1}\n|i1| fast\n");

    let err = load_series(&[&path], &PlotOptions::default()).expect_err("mismatch");
    assert!(matches!(err, LoadError::FormatMismatch { .. }));
}

#[test]
fn test_one_line_table_with_bad_record_is_not_a_row_table() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bad = json!({
        "preamble": {"program": "a"},
        "stats": {"i1": {"rtime": 1.0}},
    });
    let path = write_file(&dir, "a.json", &bad.to_string());

    let err = load_series(&[&path], &PlotOptions::default()).expect_err("mismatch");
    assert!(matches!(
        err,
        LoadError::FormatMismatch {
            csv: CsvError::NoRows,
            ..
        }
    ));
}

#[test]
fn test_parse_failure_among_several_files_is_fatal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut paths = two_tools(&dir);
    paths.push(write_file(&dir, "runtimes.csv", "|instance| |a|\n|i1| 1.0\n"));

    let err = load_series(&paths, &PlotOptions::default()).expect_err("fatal");
    assert!(matches!(err, LoadError::Stat(_)));
}

#[test]
fn test_missing_file_does_not_fall_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("missing.json");

    let err = load_series(&[&path], &PlotOptions::default()).expect_err("missing");
    assert!(matches!(err, LoadError::Stat(_)));
}

#[test]
fn test_scatter_needs_equal_series() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut paths = two_tools(&dir);
    let c = json!({
        "preamble": {"program": "c"},
        "stats": {"i1": {"status": true, "rtime": 1.0}},
    });
    paths.insert(0, write_file(&dir, "c.json", &c.to_string()));

    let settings = json!({"timeout": 10, "plot_type": "scatter", "only": ["a", "c"]});
    let err = load_series(&paths, &options(settings)).expect_err("unequal");
    assert!(matches!(err, LoadError::Series(_)));

    let settings = json!({"timeout": 10, "plot_type": "scatter", "only": ["a", "b"]});
    let series = load_series(&paths, &options(settings)).expect("series");
    assert_eq!(labels(&series), ["b", "a"]);
}

fn arb_series() -> impl Strategy<Value = Vec<Series>> {
    prop::collection::vec((0usize..5, prop::collection::vec(0.1f64..100.0, 0..5)), 0..8).prop_map(
        |specs| {
            specs
                .into_iter()
                .enumerate()
                .map(|(index, (solved, values))| Series {
                    label: index.to_string(),
                    values,
                    solved,
                    max_solved: -1.0,
                })
                .collect()
        },
    )
}

proptest! {
    #[test]
    fn clamp_is_idempotent_and_bounded(
        value in -1000.0f64..1000.0,
        floor in 0.0f64..10.0,
        span in 0.0f64..100.0,
    ) {
        let ceiling = floor + span;
        let once = clamp(value, floor, ceiling);
        prop_assert!(once >= floor && once <= ceiling);
        prop_assert_eq!(clamp(once, floor, ceiling), once);
    }

    #[test]
    fn reverse_sort_is_exact_inverse(series in arb_series()) {
        let mut best_first = series.clone();
        sort_series(&mut best_first, false);
        let mut worst_first = series;
        sort_series(&mut worst_first, true);

        worst_first.reverse();
        prop_assert_eq!(labels(&best_first), labels(&worst_first));
    }
}
