use serde::Serialize;

use crate::record::{CapacityUnit, ContainerKind, HarvestRecord, HarvestTable};

/// Average density of olive oil, kg per liter.
pub const OIL_DENSITY_KG_PER_L: f64 = 0.916;

/// Weight of an empty container, in kg.
pub fn tare_kg(kind: ContainerKind) -> f64 {
    match kind {
        ContainerKind::Drum30Kg => 3.70,
        ContainerKind::Drum12Kg => 1.75,
        ContainerKind::Drum10Kg => 1.95,
        ContainerKind::Can5L => 0.400,
        ContainerKind::Can3L => 0.268,
        ContainerKind::Can2L => 0.221,
        ContainerKind::Can1L => 0.200,
    }
}

/// Net oil mass held by one full container: nominal capacity in kg (cans
/// are converted from liters through the oil density) minus its tare.
pub fn net_oil_kg(kind: ContainerKind) -> f64 {
    let capacity_kg = match kind.unit() {
        CapacityUnit::Kilograms => kind.capacity(),
        CapacityUnit::Liters => kind.capacity() * OIL_DENSITY_KG_PER_L,
    };
    capacity_kg - tare_kg(kind)
}

pub fn oil_kg_total(record: &HarvestRecord) -> f64 {
    ContainerKind::ALL.iter().fold(0., |total, &kind| {
        total + f64::from(record.count(kind)) * net_oil_kg(kind)
    })
}

/// Values derived from a record's container counts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YieldMetrics {
    pub oil_kg_total: f64,
    pub oil_liters_total: f64,
    /// `None` when no olive mass was recorded, since the ratio is undefined.
    pub yield_pct: Option<f64>,
}

pub fn compute_yield(record: &HarvestRecord) -> YieldMetrics {
    let oil_kg_total = oil_kg_total(record);
    let yield_pct = if record.olive_kg_total == 0. {
        None
    } else {
        Some(oil_kg_total / record.olive_kg_total * 100.)
    };
    YieldMetrics {
        oil_kg_total,
        oil_liters_total: oil_kg_total / OIL_DENSITY_KG_PER_L,
        yield_pct,
    }
}

/// A raw record together with its derived metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    #[serde(flatten)]
    pub record: HarvestRecord,
    #[serde(flatten)]
    pub metrics: YieldMetrics,
}

pub fn enrich(table: &HarvestTable) -> Vec<EnrichedRecord> {
    table
        .iter()
        .map(|record| EnrichedRecord {
            record: record.clone(),
            metrics: compute_yield(record),
        })
        .collect()
}
