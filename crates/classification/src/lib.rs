//! # Finsight Classification Engine
//!
//! Maps a numeric metric value to a qualitative interpretation band given an
//! ordered threshold table. Every metric in the library shares this one
//! interpreter, so edge policy lives in exactly one place.
//!
//! ## Architectural Principles
//!
//! - **Pure and stateless:** `interpret` is a deterministic function of its
//!   inputs. No configuration, no globals.
//! - **Table-driven:** thresholds are structured data (`ThresholdBand`), not
//!   ad hoc conditionals, so tables can be tested independently of formulas.
//!
//! ## Edge policy
//!
//! Bands are evaluated in declaration order and the first match wins. Bounds
//! are inclusive on both ends, so at a shared boundary the earlier-declared
//! band takes the value. Tables are not required to partition the real line;
//! an unmatched value classifies as `"unclassified"`.

pub mod error;
pub mod table;

pub use error::ClassificationError;
pub use table::{ThresholdBand, ThresholdTable};

/// Interpretation returned for an absent value.
pub const INSUFFICIENT_DATA: &str = "insufficient_data";
/// Interpretation returned when no band matches.
pub const UNCLASSIFIED: &str = "unclassified";

/// Classifies `value` against an ordered threshold table.
///
/// `None` short-circuits to `"insufficient_data"` before any band is
/// consulted; a value matching no band yields `"unclassified"`.
pub fn interpret(value: Option<f64>, table: &ThresholdTable) -> &'static str {
    let Some(value) = value else {
        return INSUFFICIENT_DATA;
    };

    for band in table.bands() {
        if band.contains(value) {
            return band.label;
        }
    }

    UNCLASSIFIED
}

#[cfg(test)]
mod tests {
    use super::*;

    // The Current Ratio table from the metric library, reproduced here so the
    // engine's edge policy is pinned independently of any formula.
    const CURRENT_RATIO: ThresholdTable = ThresholdTable::new(&[
        ThresholdBand::at_least("excellent", 2.5),
        ThresholdBand::between("good", 1.5, 2.5),
        ThresholdBand::between("average", 1.0, 1.5),
        ThresholdBand::at_most("poor", 1.0),
    ]);

    #[test]
    fn value_inside_a_band_takes_its_label() {
        assert_eq!(interpret(Some(2.0), &CURRENT_RATIO), "good");
        assert_eq!(interpret(Some(1.2), &CURRENT_RATIO), "average");
        assert_eq!(interpret(Some(0.4), &CURRENT_RATIO), "poor");
    }

    #[test]
    fn shared_boundary_goes_to_the_earlier_band() {
        // 2.5 satisfies both "excellent" (min-only) and "good" (max = 2.5);
        // declaration order decides.
        assert_eq!(interpret(Some(2.5), &CURRENT_RATIO), "excellent");
        assert_eq!(interpret(Some(1.5), &CURRENT_RATIO), "good");
        assert_eq!(interpret(Some(1.0), &CURRENT_RATIO), "average");
    }

    #[test]
    fn absent_value_is_insufficient_data() {
        assert_eq!(interpret(None, &CURRENT_RATIO), INSUFFICIENT_DATA);
    }

    #[test]
    fn gaps_in_the_table_are_reachable() {
        const GAPPY: ThresholdTable = ThresholdTable::new(&[
            ThresholdBand::between("low", 0.0, 1.0),
            ThresholdBand::between("high", 2.0, 3.0),
        ]);
        assert_eq!(interpret(Some(1.5), &GAPPY), UNCLASSIFIED);
        assert_eq!(interpret(Some(-1.0), &GAPPY), UNCLASSIFIED);
    }
}
