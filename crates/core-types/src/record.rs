use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The canonicalized mapping of financial statement line items to numeric
/// values for one company/period.
///
/// Built once per analysis run by normalizing heterogeneous extracted labels
/// into canonical field names (e.g. `current_assets`, `net_income`, `ebit`).
/// Fields that were not found in the source document are simply absent (or
/// explicitly `None`); both read back as "no data". Existing fields are never
/// mutated; later pipeline stages may only derive and add new fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FinancialDataRecord {
    fields: BTreeMap<String, Option<f64>>,
}

impl FinancialDataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a canonical field. Absent and explicit-null both come back as
    /// `None`; callers must not conflate that with a computed zero.
    pub fn get(&self, field: &str) -> Option<f64> {
        self.fields.get(field).copied().flatten()
    }

    /// Sets a field during initial construction (normalization stage).
    pub fn set(&mut self, field: impl Into<String>, value: Option<f64>) {
        self.fields.insert(field.into(), value);
    }

    /// Adds a derived field only if it is not already populated. Derivation
    /// never overwrites a value that came from the source document.
    pub fn insert_derived(&mut self, field: impl Into<String>, value: f64) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.fields.insert(field, Some(value));
        }
    }

    /// True if the record carries a usable value for the field.
    pub fn has(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(|v| v.is_none())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Option<f64>)> {
        self.fields.iter()
    }
}

impl FromIterator<(String, Option<f64>)> for FinancialDataRecord {
    fn from_iter<I: IntoIterator<Item = (String, Option<f64>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(&str, f64); N]> for FinancialDataRecord {
    fn from(pairs: [(&str, f64); N]) -> Self {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), Some(v)))
            .collect()
    }
}

/// One requested metric in a run: the registry name plus the caller-supplied
/// localized labels that get attached to the computed result.
///
/// Selections are chosen before a run starts and are immutable for the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisTypeSelection {
    /// Display name used to resolve the metric in the registry
    /// (e.g. "Current Ratio").
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_ar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AnalysisTypeSelection {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label_en: None,
            label_ar: None,
            description: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_fields_read_as_none() {
        let mut record = FinancialDataRecord::new();
        record.set("net_income", None);

        assert_eq!(record.get("net_income"), None);
        assert_eq!(record.get("revenue"), None);
        assert!(!record.has("net_income"));
    }

    #[test]
    fn derived_fields_never_overwrite_source_values() {
        let mut record = FinancialDataRecord::from([("gross_profit", 60_000.0)]);
        record.insert_derived("gross_profit", 12_345.0);
        record.insert_derived("working_capital", 50_000.0);

        assert_eq!(record.get("gross_profit"), Some(60_000.0));
        assert_eq!(record.get("working_capital"), Some(50_000.0));
    }
}
