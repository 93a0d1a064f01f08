//! Bookkeeping for an olive-oil harvest: a CSV ledger of harvest and milling
//! events, oil yield derived from the containers filled, and per-year series
//! for comparison charts.

pub mod aggregate;
pub mod calc;
pub mod config;
pub mod entry;
pub mod record;
pub mod report;
pub mod store;

use anyhow::Error;

pub type Result<T> = std::result::Result<T, Error>;

pub use aggregate::{
    aggregate_costs_by_year, available_years, cost_series, default_selection, production_series,
    select_years, CostKind, CostPoint, ProductionPoint, YearCosts,
};
pub use calc::{compute_yield, enrich, oil_kg_total, EnrichedRecord, YieldMetrics};
pub use config::Config;
pub use entry::{submit_entry, EntryError, HarvestEntry, Submission};
pub use record::{parse_date, ContainerKind, HarvestRecord, HarvestTable, COLUMNS};
pub use report::ComparisonReport;
pub use store::{load, save};
