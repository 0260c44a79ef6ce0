//! Reading classification relative to a reference interval.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a deviation from the reference centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    High,
    Low,
}

impl Direction {
    /// Positive deviations are `High`; zero and negative are `Low`.
    pub fn of(deviation: f64) -> Self {
        if deviation > 0.0 {
            Direction::High
        } else {
            Direction::Low
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::High => f.write_str("High"),
            Direction::Low => f.write_str("Low"),
        }
    }
}

/// Where a reading falls with respect to its closed reference interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadingStatus {
    Low,
    Normal,
    High,
    /// No reference interval is known for the biomarker.
    Unreferenced,
}

impl ReadingStatus {
    pub fn is_abnormal(self) -> bool {
        matches!(self, ReadingStatus::Low | ReadingStatus::High)
    }
}

impl fmt::Display for ReadingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReadingStatus::Low => "Low",
            ReadingStatus::Normal => "Normal",
            ReadingStatus::High => "High",
            ReadingStatus::Unreferenced => "N/A",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_zero_is_low() {
        assert_eq!(Direction::of(0.0), Direction::Low);
        assert_eq!(Direction::of(-3.1), Direction::Low);
        assert_eq!(Direction::of(0.01), Direction::High);
    }

    #[test]
    fn test_abnormal_statuses() {
        assert!(ReadingStatus::High.is_abnormal());
        assert!(ReadingStatus::Low.is_abnormal());
        assert!(!ReadingStatus::Normal.is_abnormal());
        assert!(!ReadingStatus::Unreferenced.is_abnormal());
    }
}
