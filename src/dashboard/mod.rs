//! Dashboard module
//!
//! Provides the overview page with summary cards, a map of merchant locations
//! and a searchable, paginated table of transactions.

mod cards;
mod charts;
mod handlers;
mod stats;
mod table;

pub use handlers::{get_dashboard_page, get_dashboard_transactions};
