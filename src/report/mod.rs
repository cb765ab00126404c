//! Report rendering
//!
//! - `text` - The fixed-width human-readable report
//! - `summary` - The JSON analytics summary
//! - `format` - Currency and percentage formatting shared by both

pub mod format;
pub mod summary;
pub mod text;

pub use summary::AnalyticsSummary;
pub use text::{render_report, write_report, ReportOptions};
