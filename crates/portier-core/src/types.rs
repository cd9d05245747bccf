//! Shared type definitions for the Portier gateway
//!
//! These types flow through the whole pipeline: a `PackageRecord` is looked
//! up in the registry, evaluated into a `PolicyDecision`, optionally
//! installed into an `InstallResult`, and the invocation is captured as an
//! `AuditRecord`. Decisions, results, and audit records are snapshots --
//! they are never mutated after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A package known to the registry.
///
/// Loaded once at registry initialization and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageRecord {
    /// Display name; unique within the registry after case normalization
    pub name: String,

    /// Package version string
    #[serde(default = "default_version")]
    pub version: String,

    /// Human-readable description
    #[serde(default)]
    pub description: String,

    /// Package author
    #[serde(default = "default_author")]
    pub author: String,

    /// Installer family tag (e.g. "pip", "npm"); resolved to a backend at
    /// install time
    pub ecosystem: String,

    /// Concrete distribution name handed to the installer; may differ from
    /// the display name
    pub target: String,

    /// Protocol compliance flag
    #[serde(default)]
    pub compliant: bool,

    /// Independent security review passed
    #[serde(default)]
    pub verified: bool,

    /// Normalized reputation value in [0.0, 1.0]
    #[serde(default)]
    pub trust_score: f64,

    /// Names of packages this one depends on
    #[serde(default)]
    pub dependencies: Vec<String>,
}

fn default_version() -> String {
    "0.0.0".to_string()
}

fn default_author() -> String {
    "Unknown".to_string()
}

impl PackageRecord {
    /// Lookup key for this record (lowercased name)
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Outcome of the optional remote intent check.
///
/// Three-valued so callers cannot conflate "not checked" with "checked and
/// safe": an unreachable endpoint yields `Unchecked`, never `Clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentStatus {
    /// Endpoint unconfigured, unreachable, or timed out
    Unchecked,
    /// Checked and classified as intent-safe
    Clear,
    /// Checked and classified as an injection attempt
    Flagged,
}

/// Result of an intent-analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentCheck {
    pub status: IntentStatus,

    /// Classifier rationale, or the reason the check did not run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
}

impl IntentCheck {
    /// Build an unchecked result with the given reason
    pub fn unchecked(reason: impl Into<String>) -> Self {
        Self {
            status: IntentStatus::Unchecked,
            rationale: Some(reason.into()),
        }
    }

    /// Whether the endpoint actually classified the text
    pub fn checked(&self) -> bool {
        self.status != IntentStatus::Unchecked
    }
}

/// Pass/fail verdict for a package against the static policy rules.
///
/// Immutable once produced; the threshold used is recorded so the decision
/// is self-describing in the audit trail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyDecision {
    /// Name of the evaluated package
    pub package: String,

    /// Overall verdict: all static checks passed
    pub verdict: bool,

    /// Minimum-trust threshold the evaluation used
    pub min_trust: f64,

    /// One human-readable reason per failing check
    pub reasons: Vec<String>,

    /// Supplementary intent-check result, if one was performed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<IntentCheck>,
}

/// Captured outcome of a single installer subprocess invocation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstallResult {
    /// Package display name
    pub package: String,

    /// Installer backend used ("pip", "npm")
    pub backend: String,

    /// Process exit code; None when the process was killed by a signal or
    /// the wall-clock bound expired
    pub exit_code: Option<i32>,

    /// Captured stdout, verbatim
    pub stdout: String,

    /// Captured stderr, verbatim
    pub stderr: String,

    /// True iff the process exited with code zero
    pub success: bool,

    /// When the invocation completed
    pub timestamp: DateTime<Utc>,
}

/// Terminal outcome of one pipeline invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Policy passed and the installer exited zero
    Installed,
    /// Policy passed but the installer exited nonzero
    InstallFailed,
    /// Static policy verdict was false; no install attempted
    PolicyDenied,
    /// No such package in the registry
    NotFound,
    /// Ecosystem tag matched no supported backend
    UnsupportedEcosystem,
    /// Installer binary could not be spawned
    InstallerUnavailable,
}

impl Outcome {
    /// Short description used in audit output
    pub fn describe(&self) -> &'static str {
        match self {
            Outcome::Installed => "installed",
            Outcome::InstallFailed => "install failed",
            Outcome::PolicyDenied => "policy denied",
            Outcome::NotFound => "not found",
            Outcome::UnsupportedEcosystem => "unsupported ecosystem",
            Outcome::InstallerUnavailable => "installer unavailable",
        }
    }
}

/// One append-only entry in the audit trail.
///
/// Records are hash-chained: `digest` covers this record's body plus the
/// previous record's digest, so any edit or deletion breaks verification
/// of every later record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Monotonic sequence number, starting at 1
    pub seq: u64,

    /// When the record was written
    pub timestamp: DateTime<Utc>,

    /// Package the invocation targeted
    pub package: String,

    /// Terminal outcome of the invocation
    pub outcome: Outcome,

    /// Policy decision snapshot; None when the pipeline aborted before
    /// evaluation (e.g. package not found)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<PolicyDecision>,

    /// Install result snapshot; None when no install was attempted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub install: Option<InstallResult>,

    /// Actor/context tag (e.g. "cli")
    pub actor: String,

    /// Digest of the previous record ("genesis" for the first)
    pub prev_digest: String,

    /// SHA-256 over prev_digest + this record's body
    pub digest: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> PackageRecord {
        PackageRecord {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            description: String::new(),
            author: "Unknown".to_string(),
            ecosystem: "pip".to_string(),
            target: name.to_string(),
            compliant: true,
            verified: true,
            trust_score: 0.9,
            dependencies: vec![],
        }
    }

    #[test]
    fn test_key_is_lowercased() {
        assert_eq!(record("Rabel").key(), "rabel");
    }

    #[test]
    fn test_intent_unchecked_is_not_checked() {
        let check = IntentCheck::unchecked("endpoint unconfigured");
        assert!(!check.checked());
        assert_eq!(check.status, IntentStatus::Unchecked);
    }

    #[test]
    fn test_intent_flagged_is_checked() {
        let check = IntentCheck {
            status: IntentStatus::Flagged,
            rationale: Some("imperative override phrasing".to_string()),
        };
        assert!(check.checked());
    }

    #[test]
    fn test_record_minimal_deserialization_defaults() {
        let json = r#"{"name":"rabel","ecosystem":"pip","target":"mcp-server-rabel"}"#;
        let rec: PackageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(rec.version, "0.0.0");
        assert_eq!(rec.author, "Unknown");
        assert!(!rec.compliant);
        assert_eq!(rec.trust_score, 0.0);
        assert!(rec.dependencies.is_empty());
    }

    #[test]
    fn test_intent_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&IntentStatus::Flagged).unwrap(),
            "\"flagged\""
        );
    }
}
