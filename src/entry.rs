use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::{
    record::{parse_date, HarvestRecord, HarvestTable, MAX_YEAR, MIN_YEAR},
    store, Result,
};

/// Reasons a submitted entry is refused. None of them touch stored data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EntryError {
    #[error("{field} `{value}` is not a valid date, expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("year {0} is outside {}-{}", MIN_YEAR, MAX_YEAR)]
    YearOutOfRange(i32),

    #[error("{field} must be a non-negative number, got {value}")]
    InvalidAmount { field: &'static str, value: f64 },
}

/// Raw input of the entry form. Dates are kept as typed until validated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestEntry {
    pub year: i32,
    pub harvest_date: String,
    pub milling_date: String,
    pub drum_30kg: u32,
    pub drum_12kg: u32,
    pub drum_10kg: u32,
    pub can_5l: u32,
    pub can_3l: u32,
    pub can_2l: u32,
    pub can_1l: u32,
    pub farmer_cost_total: f64,
    pub milling_cost_total: f64,
    pub milling_cost_per_quintal: f64,
    pub olive_kg_total: f64,
}

impl HarvestEntry {
    pub fn validate(&self) -> std::result::Result<HarvestRecord, EntryError> {
        let harvest_date = parse_date(&self.harvest_date).ok_or_else(|| EntryError::InvalidDate {
            field: "harvest_date",
            value: self.harvest_date.clone(),
        })?;
        let milling_date = parse_date(&self.milling_date).ok_or_else(|| EntryError::InvalidDate {
            field: "milling_date",
            value: self.milling_date.clone(),
        })?;
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(EntryError::YearOutOfRange(self.year));
        }
        for (field, value) in [
            ("farmer_cost_total", self.farmer_cost_total),
            ("milling_cost_total", self.milling_cost_total),
            ("milling_cost_per_quintal", self.milling_cost_per_quintal),
            ("olive_kg_total", self.olive_kg_total),
        ] {
            if !value.is_finite() || value < 0. {
                return Err(EntryError::InvalidAmount { field, value });
            }
        }

        Ok(HarvestRecord {
            year: self.year,
            harvest_date,
            milling_date,
            drum_30kg: self.drum_30kg,
            drum_12kg: self.drum_12kg,
            drum_10kg: self.drum_10kg,
            can_5l: self.can_5l,
            can_3l: self.can_3l,
            can_2l: self.can_2l,
            can_1l: self.can_1l,
            farmer_cost_total: self.farmer_cost_total,
            milling_cost_total: self.milling_cost_total,
            milling_cost_per_quintal: self.milling_cost_per_quintal,
            olive_kg_total: self.olive_kg_total,
        })
    }
}

/// Outcome of a form submission.
#[derive(Debug)]
pub enum Submission {
    /// The record was appended and the file rewritten; holds the new table.
    Accepted(HarvestTable),
    Rejected(EntryError),
}

/// Validates `entry` and, if it is acceptable, appends it to the table
/// stored at `path`. A rejected entry leaves the file untouched.
pub fn submit_entry<P: AsRef<Path>>(path: P, entry: &HarvestEntry) -> Result<Submission> {
    let record = match entry.validate() {
        Ok(record) => record,
        Err(err) => {
            warn!(%err, "entry rejected");
            return Ok(Submission::Rejected(err));
        }
    };
    let table = store::load(&path)?.append(record);
    store::save(&path, &table)?;
    info!(year = entry.year, rows = table.len(), "entry recorded");
    Ok(Submission::Accepted(table))
}
