//! Lab panel input boundary.
//!
//! Raw readings are checked here, once, before any scoring. The scorer
//! assumes every value in a [`LabPanel`] is finite and physically plausible.

use crate::normalise::range_deviation;
use metabolyx_kb::{canonical_key, KnowledgeBase};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Readings further than this many spread units from the reference centre
/// are outside any physical domain and rejected.
pub const MAX_ABS_DEVIATION: f64 = 1.0e6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Not a number and not a string that parses as one
    NonNumeric,
    NonFinite,
    Negative,
    /// Zero or negative for a marker that must be strictly positive
    NonPositive,
    /// So far outside the reference interval that it cannot be a real measurement
    OutOfDomain,
    /// A second reading that normalises to an already accepted key
    Duplicate,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RejectReason::NonNumeric => "not a number",
            RejectReason::NonFinite => "not finite",
            RejectReason::Negative => "negative",
            RejectReason::NonPositive => "must be greater than zero",
            RejectReason::OutOfDomain => "outside the physical domain",
            RejectReason::Duplicate => "duplicate reading",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedReading {
    pub key: String,
    pub raw: String,
    pub reason: RejectReason,
}

/// Validated readings keyed by canonical biomarker key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabPanel {
    readings: BTreeMap<String, f64>,
}

/// Outcome of checking a raw panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PanelValidation {
    pub panel: LabPanel,
    /// Keys outside the recognised vocabulary, or explicit nulls
    pub ignored: Vec<String>,
    pub rejected: Vec<RejectedReading>,
}

impl PanelValidation {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

impl LabPanel {
    /// Check a JSON-like object of biomarker → value.
    pub fn validate(raw: &serde_json::Map<String, Value>, kb: &KnowledgeBase) -> PanelValidation {
        let mut out = PanelValidation::default();
        for (name, value) in raw {
            let parsed = match value {
                Value::Null => {
                    debug!("Skipping null reading for '{name}'");
                    out.ignored.push(name.clone());
                    continue;
                }
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            out.accept(name, parsed, &value.to_string(), kb);
        }
        out
    }

    /// Build from numeric pairs, applying the same checks as [`LabPanel::validate`].
    pub fn from_values<'a, I>(values: I, kb: &KnowledgeBase) -> PanelValidation
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut out = PanelValidation::default();
        for (name, value) in values {
            out.accept(name, Some(value), &value.to_string(), kb);
        }
        out
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.readings.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.readings.contains_key(key)
    }

    /// Readings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.readings.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

impl PanelValidation {
    fn accept(&mut self, name: &str, parsed: Option<f64>, raw: &str, kb: &KnowledgeBase) {
        let key = canonical_key(name);
        if !kb.is_recognized(&key) {
            debug!("Ignoring unrecognised biomarker '{name}'");
            self.ignored.push(name.to_string());
            return;
        }

        let strictly_positive = kb.rules.get(&key).is_some_and(|r| r.strictly_positive);
        let out_of_domain = parsed
            .zip(kb.references.get(&key))
            .is_some_and(|(v, r)| !(range_deviation(v, r).abs() <= MAX_ABS_DEVIATION));
        let reason = match parsed {
            None => RejectReason::NonNumeric,
            Some(v) if !v.is_finite() => RejectReason::NonFinite,
            Some(v) if v < 0.0 => RejectReason::Negative,
            Some(v) if strictly_positive && v <= 0.0 => RejectReason::NonPositive,
            Some(_) if out_of_domain => RejectReason::OutOfDomain,
            Some(_) if self.panel.readings.contains_key(&key) => RejectReason::Duplicate,
            Some(v) => {
                self.panel.readings.insert(key, v);
                return;
            }
        };

        warn!("Rejected reading {name} = {raw}: {reason}");
        self.rejected.push(RejectedReading {
            key,
            raw: raw.to_string(),
            reason,
        });
    }
}
