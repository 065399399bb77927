// src/scoring/mod.rs
use std::fmt;

use serde::{Serialize, Serializer};

use crate::extractors::features::{FeatureVector, FEATURE_COLUMNS};
use crate::utils::error::ScoringError;

// Defaults for the rule-based classifier
pub const DEFAULT_MAX_DEBT_BURDEN: f64 = 0.5;
pub const DEFAULT_MIN_INCOME_EXPENSE_RATIO: f64 = 1.0;
pub const DEFAULT_MIN_CREDIT_SCORE: f64 = 0.0;

/// Binary outcome of a risk assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLabel {
    Low = 0,
    High = 1,
}

impl RiskLabel {
    /// Maps a raw model output. Only 0 and 1 are labels.
    pub fn from_code(code: u8) -> Result<Self, ScoringError> {
        match code {
            0 => Ok(RiskLabel::Low),
            1 => Ok(RiskLabel::High),
            other => Err(ScoringError::InvalidLabel(other)),
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn message(&self) -> &'static str {
        match self {
            RiskLabel::Low => "Low Risk: Likely to Repay",
            RiskLabel::High => "High Risk: Likely to Default",
        }
    }
}

impl fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl Serialize for RiskLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// A fitted binary classifier over the statement feature vector.
pub trait RiskClassifier {
    /// Column names, in order, the classifier was fitted on.
    fn expected_columns(&self) -> &[&str];

    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ScoringError>;
}

/// Scores features after checking the classifier agrees on the column schema.
///
/// A classifier fitted on differently named or ordered columns would still
/// return a label, just a meaningless one, so the mismatch is an error here.
pub fn score(classifier: &dyn RiskClassifier, features: &FeatureVector) -> Result<RiskLabel, ScoringError> {
    let expected = classifier.expected_columns();
    if expected != features.columns() {
        return Err(ScoringError::SchemaMismatch {
            expected: expected.iter().map(|c| c.to_string()).collect(),
            actual: features.columns().iter().map(|c| c.to_string()).collect(),
        });
    }

    let label = classifier.predict(features)?;
    tracing::info!("Classifier returned label {} ({})", label.code(), label);
    Ok(label)
}

/// Threshold rules over the derived ratios.
/// Stands in for a trained model when none is wired in.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBasedClassifier {
    pub max_debt_burden: f64,
    pub min_income_expense_ratio: f64,
    pub min_credit_score: f64,
}

impl Default for RuleBasedClassifier {
    fn default() -> Self {
        Self {
            max_debt_burden: DEFAULT_MAX_DEBT_BURDEN,
            min_income_expense_ratio: DEFAULT_MIN_INCOME_EXPENSE_RATIO,
            min_credit_score: DEFAULT_MIN_CREDIT_SCORE,
        }
    }
}

impl RuleBasedClassifier {
    pub fn new(max_debt_burden: f64, min_income_expense_ratio: f64, min_credit_score: f64) -> Self {
        Self { max_debt_burden, min_income_expense_ratio, min_credit_score }
    }
}

impl RiskClassifier for RuleBasedClassifier {
    fn expected_columns(&self) -> &[&str] {
        &FEATURE_COLUMNS
    }

    fn predict(&self, features: &FeatureVector) -> Result<RiskLabel, ScoringError> {
        let mut reasons = Vec::new();
        if features.credit_score_indicator() < self.min_credit_score {
            reasons.push("credit score indicator");
        }
        if features.debt_burden() > self.max_debt_burden {
            reasons.push("debt burden");
        }
        if features.income_expense_ratio() < self.min_income_expense_ratio {
            reasons.push("income-expense ratio");
        }

        if reasons.is_empty() {
            Ok(RiskLabel::Low)
        } else {
            tracing::debug!("High risk triggered by: {}", reasons.join(", "));
            Ok(RiskLabel::High)
        }
    }
}
