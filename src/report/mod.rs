//! Filtering and summary statistics over a join result

pub mod chart;
pub mod filter;
pub mod summary;

pub use chart::render_bar_chart;
pub use filter::{FilterSpec, MISSING_LABEL, category_key, category_label};
pub use summary::{COUNT_COLUMN, Report, ReportAssembler, SummaryStats};
