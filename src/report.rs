use std::{collections::BTreeSet, io::Write, path::Path};

use serde::Serialize;

use crate::{
    aggregate::{
        aggregate_costs_by_year, cost_series, production_series, select_enriched_years,
        select_years, CostKind, CostPoint, ProductionPoint, YearCosts,
    },
    calc::{enrich, EnrichedRecord},
    record::{format_date, HarvestTable, COLUMNS},
    Result,
};

const NOT_AVAILABLE: &str = "N/A";

/// Everything the comparison charts need for one year selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonReport {
    /// Set when no year was picked, so there is nothing to chart.
    pub selection_empty: bool,
    pub years: BTreeSet<i32>,
    pub records: Vec<EnrichedRecord>,
    pub production: Vec<ProductionPoint>,
    pub costs: Vec<YearCosts>,
    pub cost_series: Vec<CostPoint>,
}

impl ComparisonReport {
    pub fn build(table: &HarvestTable, years: BTreeSet<i32>) -> Self {
        let records = select_enriched_years(&enrich(table), &years);
        let costs = aggregate_costs_by_year(&select_years(table, &years));
        Self {
            production: production_series(&records),
            cost_series: cost_series(&costs),
            selection_empty: years.is_empty(),
            years,
            records,
            costs,
        }
    }
}

fn fmt_yield(yield_pct: Option<f64>) -> String {
    yield_pct.map_or_else(|| NOT_AVAILABLE.to_string(), |pct| format!("{pct:.2}"))
}

pub fn write_table<W: Write>(out: &mut W, table: &HarvestTable) -> Result<()> {
    if table.is_empty() {
        writeln!(out, "No harvest recorded yet.")?;
        return Ok(());
    }
    writeln!(out, "{}", COLUMNS.join(" | "))?;
    for r in table {
        writeln!(
            out,
            "{} | {} | {} | {} | {} | {} | {} | {} | {} | {} | {:.2} | {:.2} | {:.2} | {:.2}",
            r.year,
            format_date(r.harvest_date),
            format_date(r.milling_date),
            r.drum_30kg,
            r.drum_12kg,
            r.drum_10kg,
            r.can_5l,
            r.can_3l,
            r.can_2l,
            r.can_1l,
            r.farmer_cost_total,
            r.milling_cost_total,
            r.milling_cost_per_quintal,
            r.olive_kg_total,
        )?;
    }
    Ok(())
}

pub fn write_metrics<W: Write>(out: &mut W, rows: &[EnrichedRecord]) -> Result<()> {
    if rows.is_empty() {
        writeln!(out, "No harvest recorded yet.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:>6} {:>14} {:>14} {:>10}",
        "Year", "Oil (kg)", "Oil (l)", "Yield %"
    )?;
    for r in rows {
        writeln!(
            out,
            "{:>6} {:>14.2} {:>14.2} {:>10}",
            r.record.year,
            r.metrics.oil_kg_total,
            r.metrics.oil_liters_total,
            fmt_yield(r.metrics.yield_pct)
        )?;
    }
    Ok(())
}

pub fn write_comparison<W: Write>(out: &mut W, report: &ComparisonReport) -> Result<()> {
    if report.selection_empty {
        writeln!(out, "Please select at least one year to compare.")?;
        return Ok(());
    }
    let years: Vec<String> = report.years.iter().map(i32::to_string).collect();
    if report.records.is_empty() {
        writeln!(out, "No records for the selected years ({}).", years.join(", "))?;
        return Ok(());
    }

    writeln!(out, "\n=== OIL AND OLIVES FOR {} ===\n", years.join(", "))?;
    writeln!(out, "{:>6} {:>14} {:>14}", "Year", "Oil (kg)", "Olives (kg)")?;
    for p in &report.production {
        writeln!(
            out,
            "{:>6} {:>14.2} {:>14.2}",
            p.year, p.oil_kg_total, p.olive_kg_total
        )?;
    }

    writeln!(out, "\n=== COSTS PER YEAR ===\n")?;
    write!(out, "{:>6}", "Year")?;
    for kind in CostKind::ALL {
        write!(out, " {:>26}", kind.label())?;
    }
    writeln!(out)?;
    for c in &report.costs {
        writeln!(
            out,
            "{:>6} {:>25.2}€ {:>25.2}€ {:>25.2}€",
            c.year, c.farmer_cost_total, c.milling_cost_total, c.milling_cost_per_quintal
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Writes raw columns followed by the derived ones, for external charting.
pub fn write_enriched_as_csv<P: AsRef<Path>>(rows: &[EnrichedRecord], file_path: P) -> Result<()> {
    let mut wtr = csv::Writer::from_path(&file_path)?;
    wtr.write_record(
        COLUMNS
            .iter()
            .chain(&["oil_kg_total", "oil_liters_total", "yield_pct"]),
    )?;
    for EnrichedRecord { record: r, metrics } in rows {
        wtr.write_record(&[
            r.year.to_string(),
            format_date(r.harvest_date),
            format_date(r.milling_date),
            r.drum_30kg.to_string(),
            r.drum_12kg.to_string(),
            r.drum_10kg.to_string(),
            r.can_5l.to_string(),
            r.can_3l.to_string(),
            r.can_2l.to_string(),
            r.can_1l.to_string(),
            r.farmer_cost_total.to_string(),
            r.milling_cost_total.to_string(),
            r.milling_cost_per_quintal.to_string(),
            r.olive_kg_total.to_string(),
            metrics.oil_kg_total.to_string(),
            metrics.oil_liters_total.to_string(),
            metrics.yield_pct.map(|p| p.to_string()).unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
