//! Pure helpers the listing and dashboard handlers run over fetched rows.

pub mod display;
pub mod filter;
pub mod revenue;

pub use filter::{filter_records, Searchable, StatusFilter};
pub use revenue::{aggregate_monthly_revenue, Billable, MonthlyBucket};
