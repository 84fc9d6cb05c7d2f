use crate::error::ClassificationError;
use serde::{Deserialize, Serialize};

/// One qualitative band: a label plus an optional inclusive lower and upper
/// bound. A band with neither bound matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBand {
    pub label: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ThresholdBand {
    /// `value >= min`, no upper bound.
    pub const fn at_least(label: &'static str, min: f64) -> Self {
        Self {
            label,
            min: Some(min),
            max: None,
        }
    }

    /// `value <= max`, no lower bound.
    pub const fn at_most(label: &'static str, max: f64) -> Self {
        Self {
            label,
            min: None,
            max: Some(max),
        }
    }

    /// `min <= value <= max`.
    pub const fn between(label: &'static str, min: f64, max: f64) -> Self {
        Self {
            label,
            min: Some(min),
            max: Some(max),
        }
    }

    /// Inclusive containment check on both ends.
    pub fn contains(&self, value: f64) -> bool {
        if let Some(min) = self.min {
            if value < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if value > max {
                return false;
            }
        }
        true
    }
}

/// An ordered set of bands for one metric. Declaration order is evaluation
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdTable {
    bands: &'static [ThresholdBand],
}

impl ThresholdTable {
    pub const fn new(bands: &'static [ThresholdBand]) -> Self {
        Self { bands }
    }

    pub fn bands(&self) -> &[ThresholdBand] {
        self.bands
    }

    /// True if `label` belongs to this table's vocabulary.
    pub fn declares(&self, label: &str) -> bool {
        self.bands.iter().any(|b| b.label == label)
    }

    /// Checks that every band is internally consistent (`min <= max`).
    /// Registry startup runs this over all tables so a malformed table is a
    /// configuration error, not a silent misclassification.
    pub fn validate(&self) -> Result<(), ClassificationError> {
        for band in self.bands {
            if let (Some(min), Some(max)) = (band.min, band.max) {
                if min > max {
                    return Err(ClassificationError::InvalidBand {
                        label: band.label,
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let band = ThresholdBand::between("good", 1.5, 2.5);
        assert!(band.contains(1.5));
        assert!(band.contains(2.5));
        assert!(!band.contains(1.4999));
        assert!(!band.contains(2.5001));
    }

    #[test]
    fn validate_rejects_inverted_bounds() {
        const BAD: ThresholdTable =
            ThresholdTable::new(&[ThresholdBand::between("broken", 2.0, 1.0)]);
        assert!(BAD.validate().is_err());

        const OK: ThresholdTable =
            ThresholdTable::new(&[ThresholdBand::at_least("fine", 0.0)]);
        assert!(OK.validate().is_ok());
    }
}
