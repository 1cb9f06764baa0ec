//! # Report Sink
//!
//! The outbound edge of the system: takes the ordered yield reports the
//! screening loop accepted and renders them somewhere an operator can read
//! them, sorted descending by post-tax annualized yield.
//!
//! Two implementations are provided: `SpreadsheetSink`, which rewrites a
//! spreadsheet worksheet in full on every run, and `ConsoleSink`, which
//! prints the same table to stdout for dry runs.

use async_trait::async_trait;
use yield_engine::YieldReport;

// Declare the modules that constitute this crate.
pub mod console;
pub mod error;
pub mod rows;
pub mod sheets;

// Re-export the key components to create a clean, public-facing API.
pub use console::ConsoleSink;
pub use error::SinkError;
pub use sheets::SpreadsheetSink;

/// The abstract interface for rendering a finished ranking.
///
/// Implementations receive rows in source order and are responsible for
/// the final descending sort by the numeric ranking key.
#[async_trait]
pub trait ReportSink: Send + Sync {
    async fn publish(&self, reports: &[YieldReport]) -> Result<(), SinkError>;
}
