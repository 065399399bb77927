// src/main.rs
mod utils;
mod statement;
mod extractors;
mod scoring;
mod presenter;
mod storage;

use std::path::PathBuf;

use clap::Parser;
use utils::AppError;
use extractors::StatementFeatureExtractor;
use presenter::{OutputFormat, ReportPresenter};
use scoring::RuleBasedClassifier;
use statement::{StatementFormat, TextStatement};
use storage::StorageManager;

/// Input format of the statement file
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum InputFormat {
    /// Decide from the file extension
    Auto,
    Pdf,
    /// Plain text, pages separated by form feeds
    Text,
}

/// Command Line Interface for the M-Pesa statement risk assessor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Statement to analyse (PDF or plain-text export)
    statement: PathBuf,

    /// How to read the statement
    #[arg(short, long, value_enum, default_value = "auto")]
    format: InputFormat,

    /// Terminal output format
    #[arg(short, long, value_enum, default_value = "text")]
    output: OutputFormat,

    /// Directory for the saved report and assessment (optional)
    #[arg(long, env = "MPESA_RISK_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Debt burden above which a statement is high risk
    #[arg(long, default_value_t = scoring::DEFAULT_MAX_DEBT_BURDEN)]
    max_debt_burden: f64,

    /// Income-expense ratio below which a statement is high risk
    #[arg(long, default_value_t = scoring::DEFAULT_MIN_INCOME_EXPENSE_RATIO)]
    min_income_expense_ratio: f64,

    /// Credit score indicator below which a statement is high risk
    #[arg(long, default_value_t = scoring::DEFAULT_MIN_CREDIT_SCORE, allow_negative_numbers = true)]
    min_credit_score: f64,

    /// Debug mode - save extracted text and annotated lines (needs --output-dir)
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting processing for args: {:?}", args);

    if args.debug && args.output_dir.is_none() {
        return Err(AppError::Config("--debug needs --output-dir to write its files".to_string()));
    }

    // 3. Open the statement
    let format = match args.format {
        InputFormat::Auto => StatementFormat::detect(&args.statement)?,
        InputFormat::Pdf => StatementFormat::Pdf,
        InputFormat::Text => StatementFormat::Text,
    };
    tracing::info!("Reading {} as {:?}", args.statement.display(), format);
    let document = TextStatement::open(&args.statement, format)?;

    // 4. Initialize storage if requested
    let storage = match &args.output_dir {
        Some(dir) => Some(StorageManager::new(dir)?),
        None => None,
    };

    // 5. Extract features
    let extractor = StatementFeatureExtractor::new();

    if args.debug {
        if let Some(storage) = &storage {
            let debug_dir = storage.debug_dir(&args.statement)?;

            let raw_text_path = debug_dir.join("extracted_text.txt");
            std::fs::write(&raw_text_path, document.to_text())?;
            tracing::info!("Saved extracted text to: {}", raw_text_path.display());

            let annotated_path = debug_dir.join("annotated_lines.txt");
            if let Err(e) = utils::text_debug::save_annotated_lines(&document, extractor.pattern(), &annotated_path) {
                tracing::warn!("Failed to create annotated lines: {}", e);
            }
        }
    }

    let extraction = extractor.extract(&document)?;
    if extraction.totals.matched_lines == 0 {
        tracing::warn!("No transaction lines found in {}", args.statement.display());
    }

    // 6. Score
    let classifier = RuleBasedClassifier::new(
        args.max_debt_burden,
        args.min_income_expense_ratio,
        args.min_credit_score,
    );
    let label = scoring::score(&classifier, &extraction.features)?;

    // 7. Present
    let presenter = ReportPresenter::new(args.output);
    presenter.present(&mut std::io::stdout().lock(), label, &extraction)?;

    // 8. Save results
    if let Some(storage) = &storage {
        let (report_path, assessment_path) = storage.save_results(&args.statement, label, &extraction)?;
        tracing::info!("Saved report to: {}", report_path.display());
        tracing::info!("Saved assessment to: {}", assessment_path.display());
    }

    tracing::info!("Processing finished: {}", label);
    Ok(())
}
