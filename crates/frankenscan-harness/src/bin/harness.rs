//! CLI entrypoint for the FrankenScan conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use frankenscan_harness::execute::parse_mode;
use frankenscan_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogLevel, validate_log_file,
};
use frankenscan_harness::{
    ConformanceReport, FixtureSet, ScanRequest, SlotBuffer, TestRunner, VerificationSummary,
};
use frankenscan_membrane::config::DecimalPoint;
use frankenscan_membrane::evidence::global_evidence;

/// Conformance tooling for FrankenScan.
#[derive(Debug, Parser)]
#[command(name = "frankenscan-harness")]
#[command(about = "Conformance testing harness for the FrankenScan sscanf engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Verify the engine against fixture sets.
    Verify {
        /// Fixture JSON file, or a directory of them.
        #[arg(long)]
        fixture: PathBuf,
        /// Mode to run (`strict`, `hardened`, or `both`).
        #[arg(long, default_value = "both")]
        mode: String,
        /// Output report path (markdown); JSON and an artifact index are
        /// written alongside.
        #[arg(long)]
        report: Option<PathBuf>,
        /// Structured JSONL log output path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// Optional fixed timestamp string for deterministic report generation.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Run a single scan and print the outcome as JSON.
    Scan {
        /// Source text.
        #[arg(long)]
        source: String,
        /// Format string.
        #[arg(long)]
        format: String,
        /// Comma-separated slot specs, e.g. `long,str:16,double`.
        #[arg(long, default_value = "")]
        slots: String,
        /// Decimal-point string.
        #[arg(long, default_value = ".")]
        decimal_point: String,
        /// `strict` or `hardened`.
        #[arg(long, default_value = "strict")]
        mode: String,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        #[arg(long)]
        log: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Verify {
            fixture,
            mode,
            report,
            log,
            timestamp,
        } => {
            eprintln!("Verifying against fixtures in {}", fixture.display());
            let modes: Vec<&str> = match mode.to_ascii_lowercase().as_str() {
                "both" => vec!["strict", "hardened"],
                "strict" => vec!["strict"],
                "hardened" => vec!["hardened"],
                other => {
                    return Err(
                        format!("Unsupported mode '{other}', expected strict|hardened|both").into(),
                    );
                }
            };

            let mut fixture_sets = Vec::new();
            for path in frankenscan_harness::fixtures::fixture_paths(&fixture)? {
                match FixtureSet::from_file(&path) {
                    Ok(set) => fixture_sets.push(set),
                    Err(err) => eprintln!("Skipping {}: {}", path.display(), err),
                }
            }
            if fixture_sets.is_empty() {
                return Err(format!("No fixture JSON files found in {}", fixture.display()).into());
            }

            let run_id = format!("run-{}", std::process::id());
            let mut emitter = match &log {
                Some(path) => Some(LogEmitter::to_file(path, "scanf", &run_id)?),
                None => None,
            };
            let since = global_evidence().next_seqno();

            let mut results = Vec::new();
            for mode in &modes {
                let runner = TestRunner::new("fixture-verify", *mode);
                for set in &fixture_sets {
                    match emitter.as_mut() {
                        Some(emitter) => results.extend(runner.run_logged(set, emitter)?),
                        None => results.extend(runner.run(set)),
                    }
                }
            }

            // Stabilize report ordering for reproducible output.
            results.sort_by(|a, b| {
                a.family
                    .cmp(&b.family)
                    .then_with(|| a.mode.cmp(&b.mode))
                    .then_with(|| a.case_name.cmp(&b.case_name))
            });

            let summary = VerificationSummary::from_results(results);
            let report_doc = ConformanceReport::from_globals(
                "FrankenScan Conformance Report",
                modes.join("+"),
                timestamp.unwrap_or_else(|| format!("{:?}", std::time::SystemTime::now())),
                summary,
                since,
            );

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for failure in report_doc.summary.failures() {
                eprintln!("FAIL {} ({})", failure.case_name, failure.family);
                if let Some(diff) = &failure.diff {
                    eprintln!("{diff}");
                }
            }

            if let Some(emitter) = emitter.as_mut() {
                emitter.emit(LogLevel::Info, "verify_complete")?;
                emitter.flush()?;
            }

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                std::fs::write(&report_path, report_doc.to_markdown())?;
                let json_path = report_path.with_extension("json");
                std::fs::write(&json_path, report_doc.to_json())?;

                let mut index = ArtifactIndex::new(&run_id, "scanf");
                index.add_file(&report_path, "report_markdown")?;
                index.add_file(&json_path, "report_json")?;
                if let Some(log_path) = &log {
                    index.add_file(log_path, "log")?;
                }
                let index_path = report_path.with_extension("artifacts.json");
                std::fs::write(&index_path, index.to_json()?)?;
                eprintln!("Wrote artifact index to {}", index_path.display());
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::Scan {
            source,
            format,
            slots,
            decimal_point,
            mode,
        } => {
            let mode = parse_mode(&mode)?;
            let decimal_point = DecimalPoint::new(&decimal_point)
                .ok_or_else(|| format!("Unusable decimal point {decimal_point:?}"))?;
            let mut request = ScanRequest {
                source: source.into_bytes(),
                format: format.into_bytes(),
                slots: SlotBuffer::parse_list(&slots)?,
                decimal_point,
            };
            let outcome = request.run(mode);
            let body = match &outcome {
                Ok(report) => serde_json::json!({
                    "rendered": request.render(&outcome),
                    "assignments": report.assignments,
                    "chars_consumed": report.chars_consumed,
                    "any_matched": report.any_matched,
                    "halted": report.halted.map(|e| e.to_string()),
                    "heals": report.heals,
                    "values": request.slots.iter().map(SlotBuffer::render).collect::<Vec<_>>(),
                }),
                Err(err) => serde_json::json!({
                    "rendered": request.render(&outcome),
                    "error": err.name(),
                    "message": err.to_string(),
                }),
            };
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!("Validated {lines} lines: {} errors", errors.len());
            if !errors.is_empty() {
                return Err(format!("{} log schema violations", errors.len()).into());
            }
        }
    }

    Ok(())
}
