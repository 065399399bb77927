// src/statement/mod.rs
pub mod document;
pub mod models;

// Re-export key statement types for convenience
#[allow(unused_imports)]
pub use document::{StatementDocument, StatementFormat, TextStatement};
#[allow(unused_imports)]
pub use models::{Direction, StatementPeriod, TransactionLine};
