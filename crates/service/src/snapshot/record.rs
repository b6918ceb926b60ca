use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// On-disk value of one snapshot entry: `{"type": ..., "value": ...}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PvEntry {
    #[serde(rename = "type")]
    pub pv_type: String,
    pub value: String,
}

/// One process variable's last known type and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub pv_type: String,
    pub value: String,
}

impl Record {
    pub fn new(name: impl Into<String>, pv_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), pv_type: pv_type.into(), value: value.into() }
    }

    pub fn from_entry(name: impl Into<String>, entry: PvEntry) -> Self {
        Self { name: name.into(), pv_type: entry.pv_type, value: entry.value }
    }

    pub fn into_entry(self) -> (String, PvEntry) {
        (self.name, PvEntry { pv_type: self.pv_type, value: self.value })
    }

    /// Parse a write descriptor `"<name> <type> <value>"`.
    ///
    /// The descriptor must split into exactly three whitespace-separated
    /// tokens; the trailing newline clients append is just more whitespace.
    pub fn parse_descriptor(descriptor: &str) -> Result<Self, ServiceError> {
        let mut tokens = descriptor.split_whitespace();
        match (tokens.next(), tokens.next(), tokens.next(), tokens.next()) {
            (Some(name), Some(pv_type), Some(value), None) => Ok(Self::new(name, pv_type, value)),
            _ => Err(ServiceError::MalformedDescriptor(descriptor.to_string())),
        }
    }

    /// Response line for a read: `"<name> <type> <value>\n"`.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl FromStr for Record {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_descriptor(s)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.pv_type, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triple_and_strips_newline() {
        let r: Record = "PV:TEST double 1.23\n".parse().unwrap();
        assert_eq!(r, Record::new("PV:TEST", "double", "1.23"));
        assert_eq!(r.to_line(), "PV:TEST double 1.23\n");
    }

    #[test]
    fn extra_tokens_are_malformed() {
        for bad in ["A int 1 2", "MSG string \"hello world\"\n"] {
            assert!(matches!(
                Record::parse_descriptor(bad),
                Err(ServiceError::MalformedDescriptor(d)) if d == bad
            ));
        }
    }

    #[test]
    fn repeated_separators_collapse() {
        let r = Record::parse_descriptor("  A\tint   1  ").unwrap();
        assert_eq!(r, Record::new("A", "int", "1"));
    }

    #[test]
    fn short_descriptors_are_malformed() {
        for bad in ["", "   ", "A", "A int", "A int \n"] {
            match Record::parse_descriptor(bad) {
                Err(ServiceError::MalformedDescriptor(d)) => assert_eq!(d, bad),
                other => panic!("expected malformed for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn entry_serializes_with_type_key() {
        let (name, entry) = Record::new("A", "int", "1").into_entry();
        assert_eq!(name, "A");
        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"type":"int","value":"1"}"#);
    }
}
