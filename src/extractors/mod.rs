// src/extractors/mod.rs
pub mod features;
pub mod pattern;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use features::{
    Accumulator,
    Extraction,
    FeatureVector,
    FinancialReport,
    StatementFeatureExtractor,
    FEATURE_COLUMNS,
    REPORT_LABELS,
};
pub use pattern::TransactionPattern;
