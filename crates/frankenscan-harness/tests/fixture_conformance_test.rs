//! Integration test: every checked-in fixture set passes in both modes.

use std::path::{Path, PathBuf};

use frankenscan_harness::fixtures::fixture_paths;
use frankenscan_harness::structured_log::{LogEmitter, validate_log_line};
use frankenscan_harness::{FixtureSet, TestRunner, VerificationSummary};

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("tests/conformance/fixtures")
}

fn load_all() -> Vec<FixtureSet> {
    let paths = fixture_paths(&fixture_dir()).expect("fixture directory is readable");
    assert!(!paths.is_empty(), "no fixtures under {}", fixture_dir().display());
    paths
        .iter()
        .map(|p| {
            FixtureSet::from_file(p).unwrap_or_else(|e| panic!("bad fixture {}: {e}", p.display()))
        })
        .collect()
}

fn assert_all_pass(mode: &str) {
    let runner = TestRunner::new("fixture-conformance", mode);
    let results: Vec<_> = load_all().iter().flat_map(|set| runner.run(set)).collect();
    let summary = VerificationSummary::from_results(results);
    let failures: Vec<String> = summary
        .failures()
        .map(|r| format!("{} ({}):\n{}", r.case_name, r.family, r.diff.clone().unwrap_or_default()))
        .collect();
    assert!(failures.is_empty(), "{mode} failures:\n{}", failures.join("\n"));
    assert!(summary.total > 0);
}

// ---------------------------------------------------------------------------
// Fixture sets
// ---------------------------------------------------------------------------

#[test]
fn fixtures_pass_in_strict_mode() {
    assert_all_pass("strict");
}

#[test]
fn fixtures_pass_in_hardened_mode() {
    assert_all_pass("hardened");
}

#[test]
fn fixture_names_are_unique_per_mode() {
    for set in load_all() {
        let mut seen = std::collections::HashSet::new();
        for case in &set.cases {
            assert!(
                seen.insert((case.name.clone(), case.mode.clone())),
                "duplicate case {} in {}",
                case.name,
                set.family
            );
            assert!(
                ["strict", "hardened", "both"].contains(&case.mode.as_str()),
                "bad mode on {}",
                case.name
            );
        }
    }
}

#[test]
fn every_family_covers_hardened_and_strict() {
    for set in load_all() {
        let strict = TestRunner::new("c", "strict").run(&set).len();
        let hardened = TestRunner::new("c", "hardened").run(&set).len();
        assert!(strict > 0 && hardened > 0, "{} lacks cases for a mode", set.family);
    }
}

// ---------------------------------------------------------------------------
// Structured log
// ---------------------------------------------------------------------------

#[test]
fn logged_run_is_schema_valid() {
    let mut emitter = LogEmitter::to_buffer("scanf", "fixture-log");
    let runner = TestRunner::new("fixture-log", "hardened");
    let mut total = 0;
    for set in load_all() {
        total += runner.run_logged(&set, &mut emitter).unwrap().len();
    }
    let text = String::from_utf8(emitter.buffered().to_vec()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), total);
    for (i, line) in lines.iter().enumerate() {
        if let Err(errs) = validate_log_line(line, i + 1) {
            panic!("line {} invalid: {}", i + 1, errs[0]);
        }
    }
}
