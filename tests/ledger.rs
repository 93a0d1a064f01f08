use std::{collections::BTreeSet, fs};

use olive_harvest::{
    aggregate_costs_by_year, enrich, load, report::write_enriched_as_csv, save, select_years,
    submit_entry, EntryError, HarvestEntry, HarvestTable, Submission, COLUMNS,
};

fn entry(year: i32, farmer_cost: f64) -> HarvestEntry {
    HarvestEntry {
        year,
        harvest_date: format!("{year}-10-01"),
        milling_date: format!("{year}-10-05"),
        farmer_cost_total: farmer_cost,
        ..Default::default()
    }
}

fn table_of(entries: &[HarvestEntry]) -> HarvestTable {
    entries
        .iter()
        .map(|e| e.validate().unwrap())
        .fold(HarvestTable::new(), HarvestTable::append)
}

#[test]
fn missing_file_loads_as_empty_table() {
    let dir = tempfile::tempdir().unwrap();
    let table = load(dir.path().join("absent.csv")).unwrap();
    assert!(table.is_empty());
    assert_eq!(HarvestTable::columns(), &COLUMNS);
}

#[test]
fn saved_table_loads_back_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let mut mixed = entry(2021, 1234.56);
    mixed.drum_30kg = 3;
    mixed.can_5l = 11;
    mixed.can_1l = 2;
    mixed.milling_cost_total = 80.25;
    mixed.milling_cost_per_quintal = 12.5;
    mixed.olive_kg_total = 642.3;
    let table = table_of(&[entry(2022, 100.), mixed, entry(2020, 0.1)]);

    save(&path, &table).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(loaded, table);

    save(&path, &loaded).unwrap();
    assert_eq!(load(&path).unwrap(), table);
}

#[test]
fn saved_file_has_schema_header_and_no_derived_columns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    save(&path, &table_of(&[entry(2023, 5.)])).unwrap();
    let content = fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some(COLUMNS.join(",").as_str()));
    let row = lines.next().unwrap();
    assert!(row.starts_with("2023,2023-10-01,2023-10-05,"), "{row}");
    assert_eq!(row.split(',').count(), COLUMNS.len());
    assert_eq!(lines.next(), None);
}

#[test]
fn accepted_submission_is_appended_and_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    save(&path, &table_of(&[entry(2021, 100.), entry(2022, 200.)])).unwrap();

    let submitted = HarvestEntry {
        year: 2023,
        harvest_date: "2023-10-01".to_string(),
        milling_date: "2023-10-05".to_string(),
        drum_30kg: 2,
        olive_kg_total: 60.,
        ..Default::default()
    };
    let Submission::Accepted(table) = submit_entry(&path, &submitted).unwrap() else {
        panic!("entry should be accepted");
    };
    assert_eq!(table.len(), 3);
    assert_eq!(table.records()[2], submitted.validate().unwrap());

    let loaded = load(&path).unwrap();
    assert_eq!(loaded, table);
    let metrics = enrich(&loaded)[2].metrics;
    assert!((metrics.oil_kg_total - 52.6).abs() < 1e-9);
    assert!((metrics.yield_pct.unwrap() - 87.67).abs() < 0.01);
}

#[test]
fn first_submission_creates_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    assert!(matches!(
        submit_entry(&path, &entry(2024, 10.)).unwrap(),
        Submission::Accepted(ref t) if t.len() == 1
    ));
    assert_eq!(load(&path).unwrap().len(), 1);
}

#[test]
fn rejected_submission_leaves_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    save(&path, &table_of(&[entry(2021, 100.)])).unwrap();
    let before = fs::read(&path).unwrap();

    let mut bad = entry(2023, 50.);
    bad.harvest_date = "not-a-date".to_string();
    match submit_entry(&path, &bad).unwrap() {
        Submission::Rejected(EntryError::InvalidDate { field, .. }) => {
            assert_eq!(field, "harvest_date")
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(fs::read(&path).unwrap(), before);
    assert_eq!(load(&path).unwrap().len(), 1);
}

#[test]
fn rejected_first_submission_creates_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let mut bad = entry(2023, 50.);
    bad.milling_date = "2023-10-32".to_string();
    assert!(matches!(
        submit_entry(&path, &bad).unwrap(),
        Submission::Rejected(_)
    ));
    assert!(!path.exists());
}

#[test]
fn costs_of_selected_years_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    for e in [entry(2021, 100.), entry(2022, 200.), entry(2020, 7.), entry(2021, 150.)] {
        submit_entry(&path, &e).unwrap();
    }
    let table = load(&path).unwrap();
    let subset = select_years(&table, &BTreeSet::from([2021, 2022]));
    let costs = aggregate_costs_by_year(&subset);
    let totals: Vec<(i32, f64)> = costs.iter().map(|c| (c.year, c.farmer_cost_total)).collect();
    assert_eq!(totals, vec![(2021, 250.), (2022, 200.)]);
}

#[test]
fn enriched_export_has_derived_columns() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("report.csv");
    let mut e = entry(2023, 0.);
    e.drum_12kg = 1;
    write_enriched_as_csv(&enrich(&table_of(&[e])), &out).unwrap();

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(headers.len(), COLUMNS.len() + 3);
    assert_eq!(&headers[COLUMNS.len()], "oil_kg_total");
    let row = rdr.records().next().unwrap().unwrap();
    assert_eq!(row[COLUMNS.len()].parse::<f64>().unwrap(), 12. - 1.75);
    // No olive mass recorded, so the yield is left blank.
    assert_eq!(&row[COLUMNS.len() + 2], "");
}
