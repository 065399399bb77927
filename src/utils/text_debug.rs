// src/utils/text_debug.rs
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::extractors::pattern::TransactionPattern;
use crate::statement::document::StatementDocument;
use crate::utils::error::AppError;

/// Annotates every line of the document with whether the transaction pattern took it.
///
/// Lines look like `p1:12 MATCH | <text>`. Pages without text get a single
/// `EMPTY` marker. Lines whose amount cannot be parsed are marked `ERROR`.
pub fn annotate_lines(document: &dyn StatementDocument, pattern: &TransactionPattern) -> String {
    let mut annotated = String::new();

    for index in 0..document.page_count() {
        let page = index + 1;
        let text = match document.page_text(index) {
            Some(text) if !text.is_empty() => text,
            _ => {
                annotated.push_str(&format!("p{} EMPTY\n", page));
                continue;
            }
        };

        for (line_no, line) in text.split('\n').enumerate() {
            let marker = match pattern.parse_line(line) {
                Ok(Some(_)) => "MATCH",
                Ok(None) => "SKIP ",
                Err(_) => "ERROR",
            };
            annotated.push_str(&format!("p{}:{} {} | {}\n", page, line_no + 1, marker, line));
        }
    }

    annotated
}

/// Saves the annotated line listing to a file
pub fn save_annotated_lines(
    document: &dyn StatementDocument,
    pattern: &TransactionPattern,
    filename: &Path,
) -> Result<(), AppError> {
    let mut file = File::create(filename)?;
    file.write_all(annotate_lines(document, pattern).as_bytes())?;

    tracing::info!("Saved annotated lines to {}", filename.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::statement::document::TextStatement;

    #[test]
    fn test_annotation_markers() {
        let doc = TextStatement::from_pages(vec![
            Some("HEADER\n01/02/2024 SALARY 10,000 CR\n01/02/2024 X ,, DR".to_string()),
            None,
        ]);
        let annotated = annotate_lines(&doc, &TransactionPattern::new());
        let lines: Vec<&str> = annotated.lines().collect();
        assert_eq!(lines[0], "p1:1 SKIP  | HEADER");
        assert_eq!(lines[1], "p1:2 MATCH | 01/02/2024 SALARY 10,000 CR");
        assert!(lines[2].starts_with("p1:3 ERROR"));
        assert_eq!(lines[3], "p2 EMPTY");
    }

    #[test]
    fn test_save_annotated_lines() {
        let path = std::env::temp_dir().join(format!("mpesa_risk_annotated_{}.txt", std::process::id()));
        let doc = TextStatement::from_text("01/02/2024 SALARY 10 CR");
        save_annotated_lines(&doc, &TransactionPattern::new(), &path).unwrap();
        let saved = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert!(saved.contains("MATCH"));
    }
}
