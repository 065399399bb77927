// src/statement/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction tag printed at the end of a transaction line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// `CR`: money coming into the account
    Credit,
    /// `DR`: money leaving the account
    Debit,
}

impl Direction {
    /// Maps the two-letter tag. Anything other than `CR`/`DR` is not a direction.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "CR" => Some(Direction::Credit),
            "DR" => Some(Direction::Debit),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Direction::Credit => "CR",
            Direction::Debit => "DR",
        }
    }
}

/// One matched statement line. Lives only for the duration of a scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionLine {
    pub date_text: String,   // As printed, DD/MM/YYYY
    pub description: String, // Trimmed and upper-cased
    pub amount: f64,         // Grouping commas stripped, never negative
    pub direction: Direction,
}

impl TransactionLine {
    /// Calendar date of the line, if the printed text is a real date.
    ///
    /// The pattern only checks digit shape, so `31/02/2024` still matches
    /// and still counts towards totals; it just has no calendar date.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date_text, "%d/%m/%Y").ok()
    }

    pub fn is_loan_disbursement(&self) -> bool {
        self.description.contains("LOAN DISBURSEMENT")
    }

    pub fn is_loan_repayment(&self) -> bool {
        self.description.contains("LOAN REPAYMENT")
    }
}

/// First and last calendar date seen in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl StatementPeriod {
    pub fn include(&mut self, date: NaiveDate) {
        self.start = Some(self.start.map_or(date, |s| s.min(date)));
        self.end = Some(self.end.map_or(date, |e| e.max(date)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(date: &str, description: &str) -> TransactionLine {
        TransactionLine {
            date_text: date.to_string(),
            description: description.to_string(),
            amount: 100.0,
            direction: Direction::Debit,
        }
    }

    #[test]
    fn test_direction_tags() {
        assert_eq!(Direction::from_tag("CR"), Some(Direction::Credit));
        assert_eq!(Direction::from_tag("DR"), Some(Direction::Debit));
        assert_eq!(Direction::from_tag("XX"), None);
        assert_eq!(Direction::from_tag("cr"), None, "Tags are case sensitive");
        assert_eq!(Direction::Credit.tag(), "CR");
    }

    #[test]
    fn test_date_parsing_is_best_effort() {
        assert_eq!(line("15/02/2024", "X").date(), NaiveDate::from_ymd_opt(2024, 2, 15));
        assert_eq!(line("31/02/2024", "X").date(), None);
    }

    #[test]
    fn test_loan_keywords() {
        let both = line("01/01/2024", "LOAN DISBURSEMENT AND LOAN REPAYMENT");
        assert!(both.is_loan_disbursement());
        assert!(both.is_loan_repayment());
        assert!(!line("01/01/2024", "LOAN FEE").is_loan_repayment());
    }

    #[test]
    fn test_period_tracks_min_and_max() {
        let mut period = StatementPeriod::default();
        let d = |day| NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        period.include(d(10));
        period.include(d(2));
        period.include(d(20));
        assert_eq!(period.start, Some(d(2)));
        assert_eq!(period.end, Some(d(20)));
    }
}
