// src/extractors/pattern.rs

// --- Imports ---
use crate::statement::models::{Direction, TransactionLine};
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Regex Patterns (Lazy Static) ---
// DD/MM/YYYY, then a non-greedy description, then the amount with optional
// comma grouping, then the CR/DR tag. Unanchored: the first match on the line wins.
// The amount must sit directly before the tag; a currency symbol in between
// means the line is not a transaction.
static TRANSACTION_LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([0-9]{2}/[0-9]{2}/[0-9]{4})\s+(.*?)\s+([0-9,]+)\s+(CR|DR)")
        .expect("Failed to compile TRANSACTION_LINE_RE")
});

/// The statement line grammar.
#[derive(Debug, Clone)]
pub struct TransactionPattern {
    re: &'static Regex,
}

impl Default for TransactionPattern {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionPattern {
    pub fn new() -> Self {
        Self { re: &TRANSACTION_LINE_RE }
    }

    /// Parses one line of statement text.
    ///
    /// Returns `Ok(None)` for lines that are not transactions. A numeral that fits
    /// the pattern but is not a number (only commas, say) is an error: there is
    /// no sensible amount to record and silently dropping it would skew totals.
    pub fn parse_line(&self, line: &str) -> Result<Option<TransactionLine>, ExtractError> {
        let caps = match self.re.captures(line) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        let numeral = &caps[3];
        let amount: f64 = numeral.replace(',', "").parse().map_err(|_| ExtractError::MalformedAmount {
            line: line.to_string(),
            numeral: numeral.to_string(),
        })?;

        // The alternation only admits CR or DR
        let direction = match Direction::from_tag(&caps[4]) {
            Some(direction) => direction,
            None => return Ok(None),
        };

        Ok(Some(TransactionLine {
            date_text: caps[1].to_string(),
            description: caps[2].trim().to_uppercase(),
            amount,
            direction,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Option<TransactionLine> {
        TransactionPattern::new().parse_line(line).expect("line should not error")
    }

    #[test]
    fn test_basic_credit_line() {
        let tx = parse("01/02/2024 SALARY 10,000 CR").expect("should match");
        assert_eq!(tx.date_text, "01/02/2024");
        assert_eq!(tx.description, "SALARY");
        assert_eq!(tx.amount, 10000.0);
        assert_eq!(tx.direction, Direction::Credit);
    }

    #[test]
    fn test_all_grouping_commas_stripped() {
        let tx = parse("03/03/2024 Business payment 1,234,567 DR").expect("should match");
        assert_eq!(tx.amount, 1234567.0);
        assert_eq!(tx.description, "BUSINESS PAYMENT");
        assert_eq!(tx.direction, Direction::Debit);
    }

    #[test]
    fn test_invalid_direction_tag_ignored() {
        assert!(parse("01/02/2024 SALARY 10,000 XX").is_none());
        assert!(parse("01/02/2024 SALARY 10,000 cr").is_none());
    }

    #[test]
    fn test_non_transaction_lines_ignored() {
        assert!(parse("").is_none());
        assert!(parse("MPESA FULL STATEMENT").is_none());
        assert!(parse("Receipt No. Completion Time Details Paid In Withdrawn").is_none());
        // Currency symbol between amount and tag breaks the shape
        assert!(parse("01/02/2024 SALARY 10,000 KES CR").is_none());
        // Decimal amounts are not part of the grammar
        assert!(parse("01/02/2024 SALARY 10,000.50 CR").is_none());
        // Single digit day
        assert!(parse("1/02/2024 SALARY 10,000 CR").is_none());
    }

    #[test]
    fn test_non_ascii_digits_do_not_match() {
        assert!(parse("٠١/٠٢/٢٠٢٤ SALARY ١٠,٠٠٠ CR").is_none());
        assert!(parse("01/02/2024 SALARY ١٠,٠٠٠ CR").is_none());
    }

    #[test]
    fn test_description_is_non_greedy_but_backtracks() {
        let tx = parse("05/06/2024 Paid 2 items at shop 300 DR").expect("should match");
        assert_eq!(tx.description, "PAID 2 ITEMS AT SHOP");
        assert_eq!(tx.amount, 300.0);
    }

    #[test]
    fn test_match_may_start_mid_line() {
        let tx = parse("RCPT123 07/07/2024 Airtime purchase 50 DR balance 900").expect("should match");
        assert_eq!(tx.date_text, "07/07/2024");
        assert_eq!(tx.description, "AIRTIME PURCHASE");
        assert_eq!(tx.amount, 50.0);
    }

    #[test]
    fn test_tag_prefix_of_longer_word_still_matches() {
        let tx = parse("08/08/2024 Refund 75 CREDITED").expect("should match");
        assert_eq!(tx.direction, Direction::Credit);
    }

    #[test]
    fn test_impossible_date_still_matches() {
        let tx = parse("31/02/2024 SALARY 10 CR").expect("shape decides, not the calendar");
        assert!(tx.date().is_none());
    }

    #[test]
    fn test_comma_only_numeral_is_error() {
        let result = TransactionPattern::new().parse_line("01/02/2024 SOMETHING ,,, DR");
        match result {
            Err(ExtractError::MalformedAmount { numeral, .. }) => assert_eq!(numeral, ",,,"),
            other => panic!("Expected MalformedAmount, got {:?}", other),
        }
    }
}
