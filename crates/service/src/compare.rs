//! Key-wise comparison of two JSON snapshot files.
//!
//! Every key of the baseline is looked up in the candidate and the compact
//! JSON renderings of both values are compared. Keys that only exist in the
//! candidate are ignored. A baseline key missing from the candidate counts as
//! a mismatch.

use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::ServiceError;

pub type SnapshotDoc = Map<String, Value>;

/// Read and decode a snapshot file. The top level must be a JSON object.
pub fn load_snapshot(path: &Path) -> Result<SnapshotDoc, ServiceError> {
    let bytes = std::fs::read(path).map_err(|e| ServiceError::storage(path, e))?;
    match serde_json::from_slice::<Value>(&bytes).map_err(|e| ServiceError::parse(path, e))? {
        Value::Object(map) => {
            debug!(path = %path.display(), keys = map.len(), "snapshot file decoded");
            Ok(map)
        }
        other => Err(ServiceError::parse(path, format!("expected a JSON object, found {}", kind(&other)))),
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// One baseline key whose candidate value differs or is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub key: String,
    pub baseline: String,
    /// `None` when the candidate has no such key.
    pub candidate: Option<String>,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let candidate = self.candidate.as_deref().unwrap_or("<missing>");
        write!(f, "{}: a=({}) != b({})", self.key, self.baseline, candidate)
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompareReport {
    pub compared: usize,
    pub mismatches: Vec<Mismatch>,
}

impl CompareReport {
    pub fn is_match(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Process exit status: 0 when everything matched, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.is_match() { 0 } else { 1 }
    }
}

/// Compare `candidate` against every key of `baseline`, in key order.
pub fn compare_docs(baseline: &SnapshotDoc, candidate: &SnapshotDoc) -> CompareReport {
    let mut keys: Vec<&String> = baseline.keys().collect();
    keys.sort();

    let mut report = CompareReport::default();
    for key in keys {
        report.compared += 1;
        let a = baseline[key.as_str()].to_string();
        let b = candidate.get(key.as_str()).map(Value::to_string);
        if b.as_deref() != Some(a.as_str()) {
            report.mismatches.push(Mismatch { key: key.clone(), baseline: a, candidate: b });
        }
    }
    report
}

/// Load both files, then compare. Either file failing to load aborts before
/// any comparison happens.
pub fn compare_files(baseline: &Path, candidate: &Path) -> Result<CompareReport, ServiceError> {
    let a = load_snapshot(baseline)?;
    let b = load_snapshot(candidate)?;
    Ok(compare_docs(&a, &b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    fn doc(v: Value) -> SnapshotDoc {
        match v {
            Value::Object(m) => m,
            _ => panic!("test doc must be an object"),
        }
    }

    fn write_tmp(contents: &str) -> PathBuf {
        let p = std::env::temp_dir().join(format!("pvsave_cmp_{}.json", uuid::Uuid::new_v4()));
        std::fs::write(&p, contents).unwrap();
        p
    }

    #[test]
    fn identical_docs_match() {
        let a = doc(json!({"A": {"type": "int", "value": "1"}, "B": {"type": "string", "value": "hi"}}));
        let report = compare_docs(&a, &a.clone());
        assert!(report.is_match());
        assert_eq!(report.compared, 2);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn value_change_is_reported() {
        let a = doc(json!({"A": {"type": "int", "value": "1"}}));
        let b = doc(json!({"A": {"type": "int", "value": "2"}}));
        let report = compare_docs(&a, &b);
        assert_eq!(report.exit_code(), 1);
        assert_eq!(
            report.mismatches[0].to_string(),
            r#"A: a=({"type":"int","value":"1"}) != b({"type":"int","value":"2"})"#
        );
    }

    #[test]
    fn missing_candidate_key_is_a_mismatch() {
        let a = doc(json!({"A": {"type": "int", "value": "1"}}));
        let b = doc(json!({}));
        let report = compare_docs(&a, &b);
        assert_eq!(report.mismatches.len(), 1);
        assert_eq!(report.mismatches[0].candidate, None);
        assert!(report.mismatches[0].to_string().ends_with("!= b(<missing>)"));
    }

    #[test]
    fn extra_candidate_keys_are_ignored() {
        let a = doc(json!({"A": 1}));
        let b = doc(json!({"A": 1, "Z": 2}));
        assert!(compare_docs(&a, &b).is_match());
    }

    #[test]
    fn field_order_does_not_matter() -> Result<(), anyhow::Error> {
        let a = write_tmp(r#"{"A": {"type": "int", "value": "1"}}"#);
        let b = write_tmp(r#"{"A": {"value": "1", "type": "int"}}"#);
        assert!(compare_files(&a, &b)?.is_match());
        let _ = std::fs::remove_file(a);
        let _ = std::fs::remove_file(b);
        Ok(())
    }

    #[test]
    fn unreadable_and_malformed_files_fail() {
        let missing = std::env::temp_dir().join(format!("pvsave_cmp_missing_{}.json", uuid::Uuid::new_v4()));
        let good = write_tmp("{}");
        let bad = write_tmp("{\"A\":");
        let array = write_tmp("[1, 2]");

        assert!(matches!(compare_files(&missing, &good), Err(ServiceError::Storage(_))));
        assert!(matches!(compare_files(&good, &bad), Err(ServiceError::Parse(_))));
        assert!(matches!(compare_files(&array, &good), Err(ServiceError::Parse(_))));

        for p in [good, bad, array] {
            let _ = std::fs::remove_file(p);
        }
    }
}
