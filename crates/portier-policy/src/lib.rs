//! Policy evaluation
//!
//! The static policy is the authoritative gate for every install: a
//! package must be protocol compliant, security verified, and meet the
//! minimum trust threshold. Evaluation is a pure function of the record
//! and the threshold -- no I/O, no clock, no network -- so the same inputs
//! always produce the same decision.
//!
//! The optional remote intent check (see [`intent`]) is a supplementary
//! signal layered on top by the gateway; it never replaces this gate.

pub mod intent;

pub use intent::IntentValidator;
pub use portier_core::config::DEFAULT_MIN_TRUST;

use portier_core::{PackageRecord, PolicyDecision};

/// Evaluate a package record against the static policy rules.
///
/// Every failing check contributes its own reason so callers can report
/// all simultaneous violations, not just the first. The threshold is
/// recorded on the decision and is never adjusted here.
pub fn evaluate(record: &PackageRecord, min_trust: f64) -> PolicyDecision {
    let mut reasons = Vec::new();

    if !record.compliant {
        reasons.push("package is not protocol compliant".to_string());
    }
    if !record.verified {
        reasons.push("package is not verified by security review".to_string());
    }
    if record.trust_score < min_trust {
        reasons.push(format!(
            "trust score {} below threshold {}",
            record.trust_score, min_trust
        ));
    }

    PolicyDecision {
        package: record.name.clone(),
        verdict: reasons.is_empty(),
        min_trust,
        reasons,
        intent: None,
    }
}

/// Evaluate with the default minimum-trust threshold (0.5)
pub fn evaluate_default(record: &PackageRecord) -> PolicyDecision {
    evaluate(record, DEFAULT_MIN_TRUST)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, compliant: bool, verified: bool, trust: f64) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            author: "Unknown".to_string(),
            ecosystem: "pip".to_string(),
            target: name.to_string(),
            compliant,
            verified,
            trust_score: trust,
            dependencies: vec![],
        }
    }

    #[test]
    fn test_fully_compliant_package_passes() {
        let decision = evaluate(&record("rabel", true, true, 0.95), 0.5);
        assert!(decision.verdict);
        assert!(decision.reasons.is_empty());
        assert_eq!(decision.min_trust, 0.5);
    }

    #[test]
    fn test_unverified_package_denied_with_reason() {
        let decision = evaluate(&record("shady", true, false, 0.9), 0.5);
        assert!(!decision.verdict);
        assert!(decision.reasons.iter().any(|r| r.contains("not verified")));
    }

    #[test]
    fn test_low_trust_reason_wording() {
        let decision = evaluate(&record("low-trust", true, true, 0.3), 0.5);
        assert!(!decision.verdict);
        assert_eq!(
            decision.reasons,
            vec!["trust score 0.3 below threshold 0.5".to_string()]
        );
    }

    #[test]
    fn test_all_violations_reported() {
        let decision = evaluate(&record("bad", false, false, 0.1), 0.5);
        assert!(!decision.verdict);
        assert_eq!(decision.reasons.len(), 3);
    }

    #[test]
    fn test_verdict_equals_conjunction() {
        // verdict == compliant && verified && trust >= threshold, exhaustively
        for &compliant in &[false, true] {
            for &verified in &[false, true] {
                for &trust in &[0.0, 0.49, 0.5, 1.0] {
                    let decision = evaluate(&record("p", compliant, verified, trust), 0.5);
                    assert_eq!(decision.verdict, compliant && verified && trust >= 0.5);
                }
            }
        }
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let decision = evaluate(&record("edge", true, true, 0.5), 0.5);
        assert!(decision.verdict);
    }

    #[test]
    fn test_threshold_monotonicity() {
        // Any record passing at a higher threshold also passes at a lower one
        let thresholds = [0.0, 0.2, 0.4, 0.5, 0.7, 0.9, 1.0];
        let trusts = [0.0, 0.3, 0.5, 0.65, 0.8, 1.0];
        for &trust in &trusts {
            let rec = record("p", true, true, trust);
            for (i, &t1) in thresholds.iter().enumerate() {
                for &t2 in &thresholds[i..] {
                    if evaluate(&rec, t2).verdict {
                        assert!(evaluate(&rec, t1).verdict, "t1={} t2={} trust={}", t1, t2, trust);
                    }
                }
            }
        }
    }

    #[test]
    fn test_default_threshold() {
        let decision = evaluate_default(&record("p", true, true, 0.5));
        assert!(decision.verdict);
        assert_eq!(decision.min_trust, DEFAULT_MIN_TRUST);
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let rec = record("p", true, false, 0.7);
        assert_eq!(evaluate(&rec, 0.5), evaluate(&rec, 0.5));
    }
}
