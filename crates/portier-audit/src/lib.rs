//! Append-only audit trail
//!
//! Every pipeline invocation -- including aborts -- produces exactly one
//! record in a JSONL file (~/.portier/audit.jsonl by default). Appends are
//! synchronous, file-locked, and fsynced before the pipeline reports its
//! final status; a failed append is loud, never silent, because the audit
//! guarantee is the system's core value proposition.
//!
//! Records are hash-chained: each record's digest covers the previous
//! record's digest plus its own body, so edits or deletions anywhere in
//! the file break verification of everything after them.

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use fs4::fs_std::FileExt;
use portier_core::{AuditRecord, InstallResult, Outcome, PolicyDecision};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Seek, SeekFrom, Write};
use std::path::PathBuf;
use tracing::debug;

/// Digest value chained into the first record
const GENESIS_DIGEST: &str = "genesis";

/// Filter criteria for querying the audit history
#[derive(Debug, Default, Clone)]
pub struct HistoryFilter {
    /// Only records for this package
    pub package: Option<String>,
    /// Return at most the N most recent matching records
    pub limit: Option<usize>,
}

/// The fields a record's digest commits to
#[derive(Serialize)]
struct RecordBody<'a> {
    seq: u64,
    timestamp: &'a DateTime<Utc>,
    package: &'a str,
    outcome: Outcome,
    decision: &'a Option<PolicyDecision>,
    install: &'a Option<InstallResult>,
    actor: &'a str,
}

/// Append-only, hash-chained audit trail
pub struct AuditTrail {
    trail_path: PathBuf,
}

impl AuditTrail {
    /// Trail at the default location (~/.portier/audit.jsonl)
    pub fn load_default() -> Result<Self> {
        let dir = portier_core::portier_dir();
        fs::create_dir_all(&dir).context("Failed to create .portier directory")?;
        Ok(Self {
            trail_path: dir.join("audit.jsonl"),
        })
    }

    /// Trail at a custom path
    pub fn new(trail_path: PathBuf) -> Self {
        Self { trail_path }
    }

    /// Append one record for a pipeline invocation.
    ///
    /// Holds an exclusive lock for the whole read-tail-then-append so the
    /// sequence number and digest chain stay monotonic under concurrent
    /// invocations. The write is fsynced before returning.
    pub fn record(
        &self,
        package: &str,
        outcome: Outcome,
        decision: Option<PolicyDecision>,
        install: Option<InstallResult>,
        actor: &str,
    ) -> Result<AuditRecord> {
        if let Some(parent) = self.trail_path.parent() {
            fs::create_dir_all(parent).context("Failed to create audit trail directory")?;
        }

        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.trail_path)
            .context("Failed to open audit trail")?;

        file.lock_exclusive()
            .context("Failed to acquire exclusive lock on audit trail")?;

        // Tail of the existing chain, read under the lock
        let (prev_seq, prev_digest) = Self::read_tail(&mut file)?;

        let timestamp = Utc::now();
        let body = RecordBody {
            seq: prev_seq + 1,
            timestamp: &timestamp,
            package,
            outcome,
            decision: &decision,
            install: &install,
            actor,
        };
        let body_json =
            serde_json::to_string(&body).context("Failed to serialize audit record body")?;
        let digest = chain_digest(&prev_digest, &body_json);

        let record = AuditRecord {
            seq: prev_seq + 1,
            timestamp,
            package: package.to_string(),
            outcome,
            decision,
            install,
            actor: actor.to_string(),
            prev_digest,
            digest,
        };

        let line =
            serde_json::to_string(&record).context("Failed to serialize audit record")?;
        writeln!(file, "{}", line).context("Failed to write audit record")?;
        file.sync_all().context("Failed to sync audit trail")?;

        debug!("Audit record #{} written for '{}'", record.seq, package);
        Ok(record)

        // Lock released when `file` drops
    }

    /// Sequence number and digest of the last record, or the genesis pair
    fn read_tail(file: &mut fs::File) -> Result<(u64, String)> {
        file.seek(SeekFrom::Start(0))
            .context("Failed to seek audit trail")?;
        let reader = BufReader::new(&mut *file);
        let mut tail = (0, GENESIS_DIGEST.to_string());
        for line in reader.lines() {
            let line = line.context("Failed to read audit trail")?;
            if line.trim().is_empty() {
                continue;
            }
            let record: AuditRecord =
                serde_json::from_str(&line).context("Corrupt audit record")?;
            tail = (record.seq, record.digest);
        }
        Ok(tail)
    }

    /// Records matching a filter, oldest first. `limit` keeps the most
    /// recent N matches (tail semantics).
    pub fn history(&self, filter: &HistoryFilter) -> Result<Vec<AuditRecord>> {
        let mut records = self.read_all()?;

        if let Some(package) = &filter.package {
            let key = package.to_lowercase();
            records.retain(|r| r.package.to_lowercase() == key);
        }
        if let Some(limit) = filter.limit {
            if records.len() > limit {
                records = records.split_off(records.len() - limit);
            }
        }
        Ok(records)
    }

    /// Total number of records
    pub fn len(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    /// Whether the trail holds no records
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Walk the hash chain and verify every link, returning the number of
    /// verified records. The error names the first record whose digest or
    /// chaining does not match.
    pub fn verify(&self) -> Result<usize> {
        let records = self.read_all()?;
        let mut prev_digest = GENESIS_DIGEST.to_string();
        let mut expected_seq = 1;

        for record in &records {
            if record.seq != expected_seq {
                return Err(anyhow!(
                    "Audit chain broken at record {}: expected seq {}",
                    record.seq,
                    expected_seq
                ));
            }
            if record.prev_digest != prev_digest {
                return Err(anyhow!(
                    "Audit chain broken at record {}: prev_digest mismatch",
                    record.seq
                ));
            }
            let body = RecordBody {
                seq: record.seq,
                timestamp: &record.timestamp,
                package: &record.package,
                outcome: record.outcome,
                decision: &record.decision,
                install: &record.install,
                actor: &record.actor,
            };
            let body_json = serde_json::to_string(&body)?;
            if chain_digest(&prev_digest, &body_json) != record.digest {
                return Err(anyhow!(
                    "Audit chain broken at record {}: digest mismatch",
                    record.seq
                ));
            }
            prev_digest = record.digest.clone();
            expected_seq += 1;
        }
        Ok(records.len())
    }

    fn read_all(&self) -> Result<Vec<AuditRecord>> {
        if !self.trail_path.exists() {
            return Ok(Vec::new());
        }
        let file = fs::File::open(&self.trail_path).context("Failed to open audit trail")?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line.context("Failed to read audit trail")?;
            if line.trim().is_empty() {
                continue;
            }
            records.push(
                serde_json::from_str(&line).context("Failed to deserialize audit record")?,
            );
        }
        Ok(records)
    }
}

/// SHA-256 over the previous digest concatenated with the record body
fn chain_digest(prev_digest: &str, body_json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(prev_digest.as_bytes());
    hasher.update(body_json.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trail() -> (AuditTrail, tempfile::TempDir) {
        let dir = tempfile::TempDir::new().unwrap();
        let trail = AuditTrail::new(dir.path().join("audit.jsonl"));
        (trail, dir)
    }

    #[test]
    fn test_sequence_is_monotonic_from_one() {
        let (trail, _dir) = trail();
        let first = trail
            .record("rabel", Outcome::Installed, None, None, "cli")
            .unwrap();
        let second = trail
            .record("rabel", Outcome::InstallFailed, None, None, "cli")
            .unwrap();
        assert_eq!(first.seq, 1);
        assert_eq!(second.seq, 2);
        assert_eq!(second.prev_digest, first.digest);
    }

    #[test]
    fn test_history_oldest_first() {
        let (trail, _dir) = trail();
        trail
            .record("a", Outcome::NotFound, None, None, "cli")
            .unwrap();
        trail
            .record("b", Outcome::PolicyDenied, None, None, "cli")
            .unwrap();

        let records = trail.history(&HistoryFilter::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].package, "a");
        assert_eq!(records[1].package, "b");
    }

    #[test]
    fn test_history_package_filter_and_limit() {
        let (trail, _dir) = trail();
        for i in 0..5 {
            let package = if i % 2 == 0 { "a" } else { "b" };
            trail
                .record(package, Outcome::Installed, None, None, "cli")
                .unwrap();
        }

        let filtered = trail
            .history(&HistoryFilter {
                package: Some("a".to_string()),
                limit: None,
            })
            .unwrap();
        assert_eq!(filtered.len(), 3);

        let tail = trail
            .history(&HistoryFilter {
                package: None,
                limit: Some(2),
            })
            .unwrap();
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[1].seq, 5);
    }

    #[test]
    fn test_verify_intact_chain() {
        let (trail, _dir) = trail();
        for _ in 0..4 {
            trail
                .record("rabel", Outcome::Installed, None, None, "cli")
                .unwrap();
        }
        assert_eq!(trail.verify().unwrap(), 4);
    }

    #[test]
    fn test_verify_detects_tampering() {
        let (trail, dir) = trail();
        trail
            .record("rabel", Outcome::Installed, None, None, "cli")
            .unwrap();
        trail
            .record("shady", Outcome::PolicyDenied, None, None, "cli")
            .unwrap();

        let path = dir.path().join("audit.jsonl");
        let tampered = fs::read_to_string(&path)
            .unwrap()
            .replace("\"shady\"", "\"clean\"");
        fs::write(&path, tampered).unwrap();

        assert!(trail.verify().is_err());
    }

    #[test]
    fn test_empty_trail() {
        let (trail, _dir) = trail();
        assert!(trail.is_empty().unwrap());
        assert_eq!(trail.verify().unwrap(), 0);
        assert!(trail.history(&HistoryFilter::default()).unwrap().is_empty());
    }
}
