use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::{
    calc::EnrichedRecord,
    record::{HarvestRecord, HarvestTable},
};

/// Costs summed over all records of one year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YearCosts {
    pub year: i32,
    pub farmer_cost_total: f64,
    pub milling_cost_total: f64,
    /// Summed like the other costs even though it is a per-quintal rate.
    pub milling_cost_per_quintal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CostKind {
    FarmerCostTotal,
    MillingCostTotal,
    MillingCostPerQuintal,
}

impl CostKind {
    pub const ALL: [CostKind; 3] = [
        CostKind::FarmerCostTotal,
        CostKind::MillingCostTotal,
        CostKind::MillingCostPerQuintal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CostKind::FarmerCostTotal => "Farmer cost total",
            CostKind::MillingCostTotal => "Milling cost total",
            CostKind::MillingCostPerQuintal => "Milling cost per quintal",
        }
    }

    fn of(self, costs: &YearCosts) -> f64 {
        match self {
            CostKind::FarmerCostTotal => costs.farmer_cost_total,
            CostKind::MillingCostTotal => costs.milling_cost_total,
            CostKind::MillingCostPerQuintal => costs.milling_cost_per_quintal,
        }
    }
}

/// One bar of the grouped cost chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostPoint {
    pub year: i32,
    pub kind: CostKind,
    pub amount: f64,
}

/// Oil produced against olives milled, for a single record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProductionPoint {
    pub year: i32,
    pub oil_kg_total: f64,
    pub olive_kg_total: f64,
}

/// Records whose year is in `years`, in table order.
pub fn select_years(table: &HarvestTable, years: &BTreeSet<i32>) -> HarvestTable {
    table
        .iter()
        .filter(|r| years.contains(&r.year))
        .cloned()
        .collect()
}

/// Same filter as [`select_years`] for rows that already carry metrics.
pub fn select_enriched_years(
    rows: &[EnrichedRecord],
    years: &BTreeSet<i32>,
) -> Vec<EnrichedRecord> {
    rows.iter()
        .filter(|r| years.contains(&r.record.year))
        .cloned()
        .collect()
}

pub fn aggregate_costs_by_year(table: &HarvestTable) -> Vec<YearCosts> {
    let by_year = table.iter().fold(
        BTreeMap::<i32, YearCosts>::new(),
        |mut by_year, r: &HarvestRecord| {
            let costs = by_year.entry(r.year).or_insert_with(|| YearCosts {
                year: r.year,
                ..Default::default()
            });
            costs.farmer_cost_total += r.farmer_cost_total;
            costs.milling_cost_total += r.milling_cost_total;
            costs.milling_cost_per_quintal += r.milling_cost_per_quintal;
            by_year
        },
    );
    by_year.into_values().collect()
}

/// Distinct years present in the table, ascending.
pub fn available_years(table: &HarvestTable) -> Vec<i32> {
    table
        .iter()
        .map(|r| r.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The two most recent years, used when the user has not picked any.
pub fn default_selection(table: &HarvestTable) -> BTreeSet<i32> {
    available_years(table).into_iter().rev().take(2).collect()
}

pub fn production_series(rows: &[EnrichedRecord]) -> Vec<ProductionPoint> {
    rows.iter()
        .map(|r| ProductionPoint {
            year: r.record.year,
            oil_kg_total: r.metrics.oil_kg_total,
            olive_kg_total: r.record.olive_kg_total,
        })
        .collect()
}

/// Long-form cost rows: one per year and cost kind.
pub fn cost_series(costs: &[YearCosts]) -> Vec<CostPoint> {
    costs
        .iter()
        .flat_map(|c| {
            CostKind::ALL.into_iter().map(move |kind| CostPoint {
                year: c.year,
                kind,
                amount: kind.of(c),
            })
        })
        .collect()
}
