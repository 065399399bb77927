// src/extractors/features.rs

// --- Imports ---
use crate::extractors::pattern::TransactionPattern;
use crate::statement::document::StatementDocument;
use crate::statement::models::{Direction, StatementPeriod, TransactionLine};
use crate::utils::error::ExtractError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// --- Constants ---
// Column names the classifier was fitted against, in input order.
pub const FEATURE_COLUMNS: [&str; 8] = [
    "Income",
    "Expenses",
    "Active_Loans",
    "Loan_Amount",
    "Repayment_History",
    "Income_Expense_Ratio",
    "Debt_Burden",
    "Credit_Score_Indicator",
];

// Report labels, parallel to FEATURE_COLUMNS.
pub const REPORT_LABELS: [&str; 8] = [
    "Total Income",
    "Total Expenses",
    "Active Loans",
    "Loan Amount",
    "Repayment History",
    "Income-Expense Ratio",
    "Debt Burden",
    "Credit Score Indicator",
];

// --- Data Structures ---

/// Running totals for one statement scan.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Accumulator {
    pub total_income: f64,
    pub total_expenses: f64,
    pub loan_amount: f64,
    pub loan_repayments: f64,
    pub active_loans: u32,
    pub matched_lines: usize,
    pub skipped_pages: usize,
    pub period: StatementPeriod,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one transaction into the totals.
    ///
    /// Direction decides income vs expenses. The loan keywords are checked on
    /// every line regardless of direction, and independently of each other.
    pub fn record(&mut self, tx: &TransactionLine) {
        match tx.direction {
            Direction::Credit => self.total_income += tx.amount,
            Direction::Debit => self.total_expenses += tx.amount,
        }

        if tx.is_loan_disbursement() {
            self.loan_amount += tx.amount;
            self.active_loans += 1;
        }
        if tx.is_loan_repayment() {
            self.loan_repayments += tx.amount;
        }

        if let Some(date) = tx.date() {
            self.period.include(date);
        }
        self.matched_lines += 1;
    }

    /// Derives the feature vector from the final totals.
    ///
    /// The `+ 1` in both denominators is the zero-division guard the model was
    /// trained with and must stay exactly `+ 1`.
    pub fn finalize(&self) -> FeatureVector {
        let income_expense_ratio = self.total_income / (self.total_expenses + 1.0);
        let debt_burden = self.loan_amount / (self.total_income + 1.0);
        let repayment_history: u32 = if self.loan_repayments > 0.0 { 1 } else { 0 };
        let credit_score_indicator = (repayment_history as i64) * 2 - self.active_loans as i64;

        FeatureVector {
            values: [
                self.total_income,
                self.total_expenses,
                self.active_loans as f64,
                self.loan_amount,
                repayment_history as f64,
                income_expense_ratio,
                debt_burden,
                credit_score_indicator as f64,
            ],
        }
    }
}

/// The 8 classifier inputs, in `FEATURE_COLUMNS` order, at full precision.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureVector {
    values: [f64; 8],
}

impl FeatureVector {
    pub const COLUMNS: [&'static str; 8] = FEATURE_COLUMNS;

    pub fn from_values(values: [f64; 8]) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64; 8] {
        &self.values
    }

    pub fn columns(&self) -> &'static [&'static str] {
        &Self::COLUMNS
    }

    /// Value by column name.
    pub fn get(&self, column: &str) -> Option<f64> {
        FEATURE_COLUMNS
            .iter()
            .position(|c| *c == column)
            .map(|i| self.values[i])
    }

    /// (column, value) pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        let columns: &'static [&'static str; 8] = &FEATURE_COLUMNS;
        columns.iter().copied().zip(self.values.iter().copied())
    }

    pub fn income(&self) -> f64 { self.values[0] }
    pub fn expenses(&self) -> f64 { self.values[1] }
    pub fn active_loans(&self) -> f64 { self.values[2] }
    pub fn loan_amount(&self) -> f64 { self.values[3] }
    pub fn repayment_history(&self) -> f64 { self.values[4] }
    pub fn income_expense_ratio(&self) -> f64 { self.values[5] }
    pub fn debt_burden(&self) -> f64 { self.values[6] }
    pub fn credit_score_indicator(&self) -> f64 { self.values[7] }
}

// Serialized as a single labeled record, the shape the classifier consumes.
impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COLUMNS.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}

/// Human-readable view of the feature vector. Ratios are rounded for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FinancialReport {
    #[serde(rename = "Total Income")]
    pub total_income: f64,
    #[serde(rename = "Total Expenses")]
    pub total_expenses: f64,
    #[serde(rename = "Active Loans")]
    pub active_loans: u32,
    #[serde(rename = "Loan Amount")]
    pub loan_amount: f64,
    #[serde(rename = "Repayment History")]
    pub repayment_history: u8,
    #[serde(rename = "Income-Expense Ratio")]
    pub income_expense_ratio: f64,
    #[serde(rename = "Debt Burden")]
    pub debt_burden: f64,
    #[serde(rename = "Credit Score Indicator")]
    pub credit_score_indicator: i64,
}

impl FinancialReport {
    pub fn from_features(features: &FeatureVector) -> Self {
        Self {
            total_income: features.income(),
            total_expenses: features.expenses(),
            active_loans: features.active_loans() as u32,
            loan_amount: features.loan_amount(),
            repayment_history: features.repayment_history() as u8,
            income_expense_ratio: round2(features.income_expense_ratio()),
            debt_burden: round2(features.debt_burden()),
            credit_score_indicator: features.credit_score_indicator() as i64,
        }
    }

    /// (label, value) pairs in display order.
    pub fn entries(&self) -> [(&'static str, f64); 8] {
        [
            (REPORT_LABELS[0], self.total_income),
            (REPORT_LABELS[1], self.total_expenses),
            (REPORT_LABELS[2], self.active_loans as f64),
            (REPORT_LABELS[3], self.loan_amount),
            (REPORT_LABELS[4], self.repayment_history as f64),
            (REPORT_LABELS[5], self.income_expense_ratio),
            (REPORT_LABELS[6], self.debt_burden),
            (REPORT_LABELS[7], self.credit_score_indicator as f64),
        ]
    }
}

/// Rounds to 2 decimal places, ties to even (`1.125` shows as `1.12`).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Everything one scan produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extraction {
    pub features: FeatureVector,
    pub report: FinancialReport,
    pub totals: Accumulator,
}

// --- Main Extractor Structure ---
#[derive(Debug, Clone, Default)]
pub struct StatementFeatureExtractor {
    pattern: TransactionPattern,
}

impl StatementFeatureExtractor {
    pub fn new() -> Self {
        Self { pattern: TransactionPattern::new() }
    }

    pub fn pattern(&self) -> &TransactionPattern {
        &self.pattern
    }

    /// Scans every page of the document and derives features and report.
    ///
    /// Pages without text and lines that are not transactions contribute
    /// nothing. A statement with no transactions gives the all-zero vector.
    pub fn extract(&self, document: &dyn StatementDocument) -> Result<Extraction, ExtractError> {
        let mut totals = Accumulator::new();

        for index in 0..document.page_count() {
            match document.page_text(index) {
                Some(text) if !text.is_empty() => self.scan_page(text, &mut totals)?,
                _ => {
                    tracing::debug!("Page {} has no extractable text, skipping", index + 1);
                    totals.skipped_pages += 1;
                }
            }
        }

        tracing::info!(
            "Scanned {} pages: {} transaction lines, {} pages without text",
            document.page_count(),
            totals.matched_lines,
            totals.skipped_pages
        );

        let features = totals.finalize();
        let report = FinancialReport::from_features(&features);
        Ok(Extraction { features, report, totals })
    }

    /// Convenience for a single page of statement text.
    pub fn extract_text(&self, text: &str) -> Result<Extraction, ExtractError> {
        let document = crate::statement::document::TextStatement::from_pages(vec![Some(text.to_string())]);
        self.extract(&document)
    }

    fn scan_page(&self, text: &str, totals: &mut Accumulator) -> Result<(), ExtractError> {
        for line in text.split('\n') {
            if let Some(tx) = self.pattern.parse_line(line)? {
                tracing::trace!(
                    "Matched {} {} {} '{}'",
                    tx.date_text,
                    tx.direction.tag(),
                    tx.amount,
                    tx.description
                );
                totals.record(&tx);
            }
        }
        Ok(())
    }
}
