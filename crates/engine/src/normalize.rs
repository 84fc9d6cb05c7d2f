//! Field normalization: heterogeneous extracted labels into the canonical
//! vocabulary the metric functions read.

use core_types::{FinancialDataRecord, ProcessedDocument};

/// Known label variants, lowercase, mapped to canonical field names. Covers
/// the English and Arabic statement captions the document processor emits.
const SYNONYMS: &[(&str, &str)] = &[
    // Balance sheet
    ("current assets", "current_assets"),
    ("total current assets", "current_assets"),
    ("الأصول المتداولة", "current_assets"),
    ("current liabilities", "current_liabilities"),
    ("total current liabilities", "current_liabilities"),
    ("الخصوم المتداولة", "current_liabilities"),
    ("total assets", "total_assets"),
    ("إجمالي الأصول", "total_assets"),
    ("total liabilities", "total_liabilities"),
    ("إجمالي الخصوم", "total_liabilities"),
    ("total equity", "total_equity"),
    ("shareholders equity", "total_equity"),
    ("shareholders' equity", "total_equity"),
    ("stockholders equity", "total_equity"),
    ("حقوق الملكية", "total_equity"),
    ("total debt", "total_debt"),
    ("إجمالي الديون", "total_debt"),
    ("long term debt", "long_term_debt"),
    ("long-term debt", "long_term_debt"),
    ("inventory", "inventory"),
    ("inventories", "inventory"),
    ("المخزون", "inventory"),
    ("cash", "cash"),
    ("cash and cash equivalents", "cash"),
    ("النقد وما في حكمه", "cash"),
    ("marketable securities", "marketable_securities"),
    ("accounts receivable", "accounts_receivable"),
    ("trade receivables", "accounts_receivable"),
    ("الذمم المدينة", "accounts_receivable"),
    ("accounts payable", "accounts_payable"),
    ("trade payables", "accounts_payable"),
    ("الذمم الدائنة", "accounts_payable"),
    ("fixed assets", "fixed_assets"),
    ("property plant and equipment", "fixed_assets"),
    ("retained earnings", "retained_earnings"),
    ("الأرباح المحتجزة", "retained_earnings"),
    // Income statement
    ("revenue", "revenue"),
    ("total revenue", "revenue"),
    ("sales", "revenue"),
    ("net sales", "revenue"),
    ("الإيرادات", "revenue"),
    ("المبيعات", "revenue"),
    ("cost of goods sold", "cogs"),
    ("cost of sales", "cogs"),
    ("cost of revenue", "cogs"),
    ("تكلفة المبيعات", "cogs"),
    ("gross profit", "gross_profit"),
    ("إجمالي الربح", "gross_profit"),
    ("operating income", "operating_income"),
    ("operating profit", "operating_income"),
    ("الربح التشغيلي", "operating_income"),
    ("operating expenses", "operating_expenses"),
    ("المصاريف التشغيلية", "operating_expenses"),
    ("ebit", "ebit"),
    ("ebitda", "ebitda"),
    ("interest expense", "interest_expense"),
    ("مصاريف الفوائد", "interest_expense"),
    ("pretax income", "pretax_income"),
    ("income before tax", "pretax_income"),
    ("net income", "net_income"),
    ("net profit", "net_income"),
    ("profit for the year", "net_income"),
    ("صافي الربح", "net_income"),
    ("صافي الدخل", "net_income"),
    ("depreciation and amortization", "depreciation_amortization"),
    // Cash flow statement
    ("operating cash flow", "operating_cash_flow"),
    ("cash flow from operations", "operating_cash_flow"),
    ("net cash from operating activities", "operating_cash_flow"),
    ("التدفق النقدي التشغيلي", "operating_cash_flow"),
    ("capital expenditures", "capital_expenditures"),
    ("capex", "capital_expenditures"),
    ("النفقات الرأسمالية", "capital_expenditures"),
    ("free cash flow", "free_cash_flow"),
    ("dividends paid", "dividends_paid"),
    ("توزيعات الأرباح المدفوعة", "dividends_paid"),
    // Market data
    ("share price", "share_price"),
    ("stock price", "share_price"),
    ("سعر السهم", "share_price"),
    ("shares outstanding", "shares_outstanding"),
    ("عدد الأسهم", "shares_outstanding"),
    ("market capitalization", "market_cap"),
    ("market cap", "market_cap"),
    ("القيمة السوقية", "market_cap"),
    ("dividends per share", "dividends_per_share"),
    ("tax rate", "tax_rate"),
];

/// Resolves one extracted label to its canonical field name. Labels that are
/// already canonical snake_case names pass through unchanged.
fn canonical_field(label: &str) -> Option<&'static str> {
    let needle = label.trim().to_lowercase();
    if let Some((_, canonical)) = SYNONYMS.iter().find(|(synonym, _)| *synonym == needle) {
        return Some(canonical);
    }
    SYNONYMS
        .iter()
        .map(|(_, canonical)| *canonical)
        .find(|canonical| *canonical == needle)
}

/// Parses an extracted value into a number. Accepts JSON numbers directly and
/// strings with thousands separators ("1,234,567.89").
fn numeric_value(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| !matches!(c, ',' | ' ' | '\u{a0}'))
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

/// Builds the canonical record from a processed document. Unrecognized labels
/// and non-numeric values are skipped, not errors.
pub fn normalize(document: &ProcessedDocument) -> FinancialDataRecord {
    let mut record = FinancialDataRecord::new();
    for (label, value) in &document.extracted_fields {
        let Some(field) = canonical_field(label) else {
            tracing::debug!(label = %label, "unrecognized field label skipped");
            continue;
        };
        let Some(number) = numeric_value(value) else {
            tracing::debug!(label = %label, "non-numeric field value skipped");
            continue;
        };
        record.set(field, Some(number));
    }
    record
}

/// Derives standard composite fields when their inputs are present. Derived
/// values never overwrite extracted ones.
pub fn derive_fields(record: &mut FinancialDataRecord) {
    if let (Some(ca), Some(cl)) = (record.get("current_assets"), record.get("current_liabilities"))
    {
        record.insert_derived("working_capital", ca - cl);
    }
    if let (Some(revenue), Some(cogs)) = (record.get("revenue"), record.get("cogs")) {
        record.insert_derived("gross_profit", revenue - cogs);
    }
    if let (Some(ocf), Some(capex)) = (
        record.get("operating_cash_flow"),
        record.get("capital_expenditures"),
    ) {
        record.insert_derived("free_cash_flow", ocf - capex);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn document(fields: &[(&str, serde_json::Value)]) -> ProcessedDocument {
        ProcessedDocument {
            extracted_fields: fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect::<BTreeMap<_, _>>(),
            tables: Vec::new(),
            confidence: 0.9,
        }
    }

    #[test]
    fn maps_english_and_arabic_labels() {
        let doc = document(&[
            ("Total Revenue", json!(150000.0)),
            ("صافي الربح", json!(20000.0)),
            ("current_assets", json!(100000.0)),
        ]);
        let record = normalize(&doc);
        assert_eq!(record.get("revenue"), Some(150000.0));
        assert_eq!(record.get("net_income"), Some(20000.0));
        assert_eq!(record.get("current_assets"), Some(100000.0));
    }

    #[test]
    fn parses_separated_string_amounts_and_skips_junk() {
        let doc = document(&[
            ("Total Assets", json!("1,250,000.50")),
            ("Inventory", json!("n/a")),
            ("Mystery Caption", json!(42.0)),
        ]);
        let record = normalize(&doc);
        assert_eq!(record.get("total_assets"), Some(1_250_000.50));
        assert_eq!(record.get("inventory"), None);
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn derives_composites_without_overwriting() {
        let doc = document(&[
            ("current assets", json!(100000.0)),
            ("current liabilities", json!(50000.0)),
            ("revenue", json!(150000.0)),
            ("cost of goods sold", json!(90000.0)),
            ("gross profit", json!(55000.0)),
        ]);
        let mut record = normalize(&doc);
        derive_fields(&mut record);
        assert_eq!(record.get("working_capital"), Some(50000.0));
        // Extracted gross profit wins over the derived 60000.
        assert_eq!(record.get("gross_profit"), Some(55000.0));
        assert_eq!(record.get("free_cash_flow"), None);
    }
}
