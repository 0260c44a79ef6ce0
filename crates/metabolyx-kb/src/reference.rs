//! Reference range table: biomarker key → normal interval and unit.
//!
//! The interval also stands in for population statistics: its midpoint is
//! used as the centre and a quarter of its width as the spread, so the
//! normal range spans ±2 spread units.

use crate::dedup::collapse_duplicates;
use metabolyx_common::{MetabolyxError, ReadingStatus, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closed reference interval `[min, max]` for one biomarker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub key: String,
    pub min: f64,
    pub max: f64,
    pub unit: String,
}

impl ReferenceRange {
    pub fn new(key: &str, min: f64, max: f64, unit: &str) -> Self {
        Self {
            key: key.to_string(),
            min,
            max,
            unit: unit.to_string(),
        }
    }

    /// Midpoint of the interval.
    pub fn center(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// A quarter of the interval width.
    pub fn spread(&self) -> f64 {
        (self.max - self.min) / 4.0
    }

    /// Inclusive interval membership.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    pub fn status(&self, value: f64) -> ReadingStatus {
        if value < self.min {
            ReadingStatus::Low
        } else if value > self.max {
            ReadingStatus::High
        } else {
            ReadingStatus::Normal
        }
    }

    /// `min + q * (max - min)`.
    pub fn quantile_cut(&self, q: f64) -> f64 {
        self.min + q * (self.max - self.min)
    }

    fn validate(&self) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(MetabolyxError::InvalidReferenceRange {
                key: self.key.clone(),
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Immutable lookup table of reference ranges, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ReferenceTable {
    ranges: Vec<ReferenceRange>,
    index: HashMap<String, usize>,
}

impl ReferenceTable {
    /// Validate and index a list of ranges.
    pub fn new(ranges: Vec<ReferenceRange>) -> Result<Self> {
        for range in &ranges {
            range.validate()?;
        }
        let ranges = collapse_duplicates(ranges, "reference range", |r| r.key.as_str())?;
        let index = ranges
            .iter()
            .enumerate()
            .map(|(i, r)| (r.key.clone(), i))
            .collect();
        Ok(Self { ranges, index })
    }

    /// Parse a YAML sequence of ranges.
    pub fn from_yaml_str(src: &str) -> Result<Self> {
        let ranges: Vec<ReferenceRange> = serde_yaml::from_str(src)?;
        Self::new(ranges)
    }

    pub fn get(&self, key: &str) -> Option<&ReferenceRange> {
        self.index.get(key).map(|&i| &self.ranges[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReferenceRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
