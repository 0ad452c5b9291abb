//! Report generation for conformance results.

use serde::{Deserialize, Serialize};

use frankenscan_membrane::evidence::{EvidenceLog, global_evidence};
use frankenscan_membrane::heal::{HealingPolicy, global_healing_policy};

use crate::verify::VerificationSummary;

/// One healing counter from the membrane.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealingCounter {
    pub name: String,
    pub value: u64,
}

/// One heal recorded in the membrane evidence ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EvidenceRow {
    pub seqno: u64,
    pub mode: String,
    pub action: String,
    pub slot_index: usize,
    /// BLAKE3 of the format string, hex.
    pub format_digest: String,
}

/// A conformance report combining verification and healing data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub title: String,
    /// Modes tested, e.g. `strict+hardened`.
    pub mode: String,
    pub timestamp: String,
    pub summary: VerificationSummary,
    /// Healing counters at the end of the run.
    pub healing: Vec<HealingCounter>,
    /// Heals recorded during the run.
    pub evidence: Vec<EvidenceRow>,
}

impl ConformanceReport {
    /// Build a report, reading healing counters from `policy` and the
    /// evidence recorded in `log` from `since` onwards.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        mode: impl Into<String>,
        timestamp: impl Into<String>,
        summary: VerificationSummary,
        policy: &HealingPolicy,
        log: &EvidenceLog,
        since: u64,
    ) -> Self {
        let healing = policy
            .counters()
            .iter()
            .map(|(name, value)| HealingCounter {
                name: (*name).to_string(),
                value: *value,
            })
            .collect();
        let evidence = log
            .since(since)
            .iter()
            .map(|ev| EvidenceRow {
                seqno: ev.seqno,
                mode: ev.mode.as_str().to_string(),
                action: ev.action.name().to_string(),
                slot_index: ev.slot_index,
                format_digest: ev.digest_hex(),
            })
            .collect();
        Self {
            title: title.into(),
            mode: mode.into(),
            timestamp: timestamp.into(),
            summary,
            healing,
            evidence,
        }
    }

    /// [`Self::new`] against the process-wide membrane state.
    #[must_use]
    pub fn from_globals(
        title: impl Into<String>,
        mode: impl Into<String>,
        timestamp: impl Into<String>,
        summary: VerificationSummary,
        since: u64,
    ) -> Self {
        Self::new(
            title,
            mode,
            timestamp,
            summary,
            global_healing_policy(),
            global_evidence(),
            since,
        )
    }

    /// Render the report as markdown.
    #[must_use]
    pub fn to_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# {}\n\n", self.title));
        out.push_str(&format!("- Mode: {}\n", self.mode));
        out.push_str(&format!("- Timestamp: {}\n", self.timestamp));
        out.push_str(&format!("- Total: {}\n", self.summary.total));
        out.push_str(&format!("- Passed: {}\n", self.summary.passed));
        out.push_str(&format!("- Failed: {}\n\n", self.summary.failed));

        out.push_str("| Case | Family | Mode | Reference | Status |\n");
        out.push_str("|------|--------|------|-----------|--------|\n");
        for r in &self.summary.results {
            let status = if r.passed { "PASS" } else { "FAIL" };
            out.push_str(&format!(
                "| {} | {} | {} | {} | {} |\n",
                r.case_name, r.family, r.mode, r.reference, status
            ));
        }

        let failures: Vec<_> = self.summary.failures().collect();
        if !failures.is_empty() {
            out.push_str("\n## Failures\n");
            for r in failures {
                out.push_str(&format!("\n### {} [{}]\n\n```\n", r.case_name, r.mode));
                out.push_str(r.diff.as_deref().unwrap_or(""));
                out.push_str("\n```\n");
            }
        }

        out.push_str("\n## Healing\n\n| Counter | Value |\n|---------|-------|\n");
        for c in &self.healing {
            out.push_str(&format!("| {} | {} |\n", c.name, c.value));
        }
        if !self.evidence.is_empty() {
            out.push_str("\n| Seq | Mode | Action | Slot | Format |\n");
            out.push_str("|-----|------|--------|------|--------|\n");
            for ev in &self.evidence {
                out.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    ev.seqno,
                    ev.mode,
                    ev.action,
                    ev.slot_index,
                    &ev.format_digest[..16]
                ));
            }
        }
        out
    }

    /// Render the report as JSON.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::VerificationResult;
    use frankenscan_membrane::config::SafetyLevel;
    use frankenscan_membrane::heal::HealingAction;

    fn summary() -> VerificationSummary {
        VerificationSummary::from_results(vec![VerificationResult {
            case_name: String::from("narrow_buffer"),
            family: String::from("scanf/string"),
            reference: String::from("C11 7.21.6.2p12"),
            mode: String::from("hardened"),
            passed: false,
            expected: String::from("a"),
            actual: String::from("b"),
            diff: Some(String::from("-a\n+b")),
        }])
    }

    #[test]
    fn report_includes_local_healing_state() {
        let policy = HealingPolicy::new();
        let log = EvidenceLog::with_capacity(8);
        let action = HealingAction::TruncateWithNull {
            requested: 9,
            truncated: 3,
        };
        policy.record(&action);
        log.record(SafetyLevel::Hardened, action, 0, b"%s");

        let report = ConformanceReport::new("t", "hardened", "now", summary(), &policy, &log, 0);
        assert_eq!(report.evidence.len(), 1);
        assert_eq!(report.evidence[0].action, action.name());
        assert_eq!(report.evidence[0].format_digest.len(), 64);
        assert!(report
            .healing
            .iter()
            .any(|c| c.name == "null_truncations" && c.value == 1));

        let md = report.to_markdown();
        assert!(md.contains("| narrow_buffer | scanf/string | hardened |"));
        assert!(md.contains("## Failures"));
        assert!(md.contains("| null_truncations | 1 |"));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["summary"]["failed"], 1);
        assert_eq!(json["evidence"][0]["slot_index"], 0);
    }

    #[test]
    fn evidence_before_since_is_excluded() {
        let policy = HealingPolicy::new();
        let log = EvidenceLog::with_capacity(8);
        log.record(SafetyLevel::Hardened, HealingAction::ReturnSafeDefault, 0, b"%d");
        let since = log.next_seqno();
        let report = ConformanceReport::new("t", "m", "now", summary(), &policy, &log, since);
        assert!(report.evidence.is_empty());
    }
}
