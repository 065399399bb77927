// src/presenter/mod.rs
use std::fmt::Write as _;
use std::io::Write;

use serde::Serialize;

use crate::extractors::features::{Extraction, FeatureVector, FinancialReport};
use crate::scoring::RiskLabel;
use crate::statement::models::StatementPeriod;

// Width of the longest bar in the overview chart
const BAR_WIDTH: usize = 40;

/// How results are written to the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Single JSON document for `--output json`.
#[derive(Debug, Serialize)]
struct JsonView<'a> {
    prediction: &'static str,
    label: RiskLabel,
    report: &'a FinancialReport,
    features: &'a FeatureVector,
    period: &'a StatementPeriod,
}

pub struct ReportPresenter {
    format: OutputFormat,
}

impl ReportPresenter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Renders the assessment as a string in the configured format.
    pub fn render(&self, label: RiskLabel, extraction: &Extraction) -> Result<String, serde_json::Error> {
        match self.format {
            OutputFormat::Json => {
                let view = JsonView {
                    prediction: label.message(),
                    label,
                    report: &extraction.report,
                    features: &extraction.features,
                    period: &extraction.totals.period,
                };
                serde_json::to_string_pretty(&view)
            }
            OutputFormat::Text => self.render_text(label, extraction),
        }
    }

    /// Renders and writes to `out`.
    pub fn present<W: Write>(&self, out: &mut W, label: RiskLabel, extraction: &Extraction) -> std::io::Result<()> {
        let rendered = self
            .render(label, extraction)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(out, "{}", rendered)
    }

    fn render_text(&self, label: RiskLabel, extraction: &Extraction) -> Result<String, serde_json::Error> {
        let mut out = String::new();

        out.push_str("Prediction Result\n");
        out.push_str("-----------------\n");
        let _ = writeln!(out, "{}", label);
        if let (Some(start), Some(end)) = (extraction.totals.period.start, extraction.totals.period.end) {
            let _ = writeln!(out, "Statement period: {} to {}", start.format("%d/%m/%Y"), end.format("%d/%m/%Y"));
        }

        out.push_str("\nFinancial Report\n");
        out.push_str("----------------\n");
        out.push_str(&serde_json::to_string_pretty(&extraction.report)?);
        out.push('\n');

        out.push_str("\nFinancial Overview\n");
        out.push_str("------------------\n");
        out.push_str(&bar_chart(&extraction.report.entries()));

        Ok(out)
    }
}

/// Horizontal bar chart, one row per entry. Negative values extend left of the axis.
pub fn bar_chart(entries: &[(&str, f64)]) -> String {
    let label_width = entries.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    let max_abs = entries.iter().map(|(_, v)| v.abs()).fold(0.0_f64, f64::max);
    let has_negative = entries.iter().any(|(_, v)| *v < 0.0);

    let mut chart = String::new();
    for (label, value) in entries {
        let length = if max_abs > 0.0 {
            ((value.abs() / max_abs) * BAR_WIDTH as f64).round() as usize
        } else {
            0
        };
        // Keep non-zero values visible even when dwarfed by the largest one
        let length = if *value != 0.0 { length.max(1) } else { 0 };

        let (left, right) = if *value < 0.0 {
            (format!("{:>width$}", "#".repeat(length), width = BAR_WIDTH), String::new())
        } else if has_negative {
            (" ".repeat(BAR_WIDTH), "#".repeat(length))
        } else {
            (String::new(), "#".repeat(length))
        };

        let _ = writeln!(
            chart,
            "{:<label_width$} {}|{} {}",
            label,
            left,
            right,
            value,
            label_width = label_width
        );
    }
    chart
}
