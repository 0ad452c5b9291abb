//! Test execution engine.

use std::time::Instant;

use frankenscan_membrane::evidence::global_evidence;

use crate::diff;
use crate::execute::{HarnessError, execute_fixture_case, parse_mode};
use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, StreamKind};
use crate::verify::VerificationResult;

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
    /// Mode being tested (strict or hardened).
    pub mode: String,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>, mode: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
            mode: mode.into(),
        }
    }

    /// Run all fixtures in a set and return results.
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        self.cases(fixture_set)
            .map(|case| self.run_case(fixture_set, case).0)
            .collect()
    }

    /// Like [`Self::run`], emitting one `case_result` entry per case.
    pub fn run_logged(
        &self,
        fixture_set: &FixtureSet,
        emitter: &mut LogEmitter,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let mut results = Vec::new();
        for case in self.cases(fixture_set) {
            let (result, trace) = self.run_case(fixture_set, case);
            let level = if result.passed {
                LogLevel::Info
            } else {
                LogLevel::Error
            };
            let mut entry = LogEntry::new("", level, "case_result")
                .with_stream(StreamKind::Conformance)
                .with_mode(self.mode.to_ascii_lowercase())
                .with_api(&fixture_set.family, &case.function)
                .with_case(&result.case_name)
                .with_outcome(if result.passed {
                    Outcome::Pass
                } else {
                    Outcome::Fail
                })
                .with_latency_ns(trace.latency_ns);
            if let Some(action) = trace.healing_action {
                entry = entry.with_healing_action(action);
            }
            if !result.passed {
                entry = entry.with_details(serde_json::json!({
                    "expected": result.expected,
                    "actual": result.actual,
                }));
            }
            emitter.emit_entry(entry)?;
            results.push(result);
        }
        Ok(results)
    }

    fn cases<'s>(&'s self, fixture_set: &'s FixtureSet) -> impl Iterator<Item = &'s FixtureCase> {
        fixture_set
            .cases
            .iter()
            .filter(|case| mode_matches(&self.mode, &case.mode))
    }

    fn run_case(
        &self,
        fixture_set: &FixtureSet,
        case: &FixtureCase,
    ) -> (VerificationResult, CaseTrace) {
        let (actual, diff, trace) = execute_case(case, &self.mode);
        let case_name = if case.mode.eq_ignore_ascii_case("both") {
            format!("{} [{}]", case.name, self.mode)
        } else {
            case.name.clone()
        };
        let result = VerificationResult {
            case_name,
            family: fixture_set.family.clone(),
            reference: case.reference.clone(),
            mode: self.mode.clone(),
            passed: actual == case.expected_output,
            expected: case.expected_output.clone(),
            actual,
            diff,
        };
        (result, trace)
    }
}

/// Timing and healing observed while running one case.
#[derive(Debug, Default)]
struct CaseTrace {
    latency_ns: u64,
    healing_action: Option<&'static str>,
}

fn mode_matches(active_mode: &str, case_mode: &str) -> bool {
    let active = active_mode.to_ascii_lowercase();
    let case = case_mode.to_ascii_lowercase();
    case == active || case == "both"
}

fn execute_case(case: &FixtureCase, active_mode: &str) -> (String, Option<String>, CaseTrace) {
    let mut trace = CaseTrace::default();
    let since = global_evidence().next_seqno();
    let started = Instant::now();
    let execution = parse_mode(active_mode)
        .and_then(|mode| execute_fixture_case(&case.function, &case.inputs, mode));
    trace.latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
    // Other threads may heal concurrently; the ledger entry is only a hint.
    trace.healing_action = global_evidence()
        .since(since)
        .first()
        .map(|ev| ev.action.name());

    match execution {
        Ok(actual) => {
            let diff_out = (actual != case.expected_output)
                .then(|| diff::render_diff(&case.expected_output, &actual));
            (actual, diff_out, trace)
        }
        Err(err) => {
            let actual = unsupported(&err);
            let diff_out = Some(diff::render_diff(&case.expected_output, &actual));
            (actual, diff_out, trace)
        }
    }
}

fn unsupported(err: &HarnessError) -> String {
    format!("unsupported:{err}")
}
