use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

pub(crate) static ISO_DATE_FMT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Persisted header row, in file order. Derived columns are never stored.
pub const COLUMNS: [&str; 14] = [
    "year",
    "harvest_date",
    "milling_date",
    "drum_30kg",
    "drum_12kg",
    "drum_10kg",
    "can_5l",
    "can_3l",
    "can_2l",
    "can_1l",
    "farmer_cost_total",
    "milling_cost_total",
    "milling_cost_per_quintal",
    "olive_kg_total",
];

/// Parses a `YYYY-MM-DD` date. Returns `None` for anything malformed or for
/// a date that does not exist in the calendar.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();
    // `[year]` alone would also take a leading sign.
    let well_formed = text.len() == 10
        && text.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    Date::parse(text, ISO_DATE_FMT).ok()
}

pub fn format_date(date: Date) -> String {
    // The ISO format only fails on years outside 0..=9999.
    date.format(ISO_DATE_FMT).unwrap_or_else(|_| date.to_string())
}

/// Unit a container's nominal capacity is rated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityUnit {
    Kilograms,
    Liters,
}

/// The seven container types oil is bottled into after milling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Drum30Kg,
    Drum12Kg,
    Drum10Kg,
    Can5L,
    Can3L,
    Can2L,
    Can1L,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 7] = [
        ContainerKind::Drum30Kg,
        ContainerKind::Drum12Kg,
        ContainerKind::Drum10Kg,
        ContainerKind::Can5L,
        ContainerKind::Can3L,
        ContainerKind::Can2L,
        ContainerKind::Can1L,
    ];

    /// Nominal capacity, in kg for drums and in liters for cans.
    pub fn capacity(self) -> f64 {
        match self {
            ContainerKind::Drum30Kg => 30.,
            ContainerKind::Drum12Kg => 12.,
            ContainerKind::Drum10Kg => 10.,
            ContainerKind::Can5L => 5.,
            ContainerKind::Can3L => 3.,
            ContainerKind::Can2L => 2.,
            ContainerKind::Can1L => 1.,
        }
    }

    pub fn unit(self) -> CapacityUnit {
        match self {
            ContainerKind::Drum30Kg | ContainerKind::Drum12Kg | ContainerKind::Drum10Kg => {
                CapacityUnit::Kilograms
            }
            _ => CapacityUnit::Liters,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            ContainerKind::Drum30Kg => "drum_30kg",
            ContainerKind::Drum12Kg => "drum_12kg",
            ContainerKind::Drum10Kg => "drum_10kg",
            ContainerKind::Can5L => "can_5l",
            ContainerKind::Can3L => "can_3l",
            ContainerKind::Can2L => "can_2l",
            ContainerKind::Can1L => "can_1l",
        }
    }
}

/// One harvest and milling event, exactly as entered by the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestRecord {
    pub year: i32,
    #[serde(with = "iso_date")]
    pub harvest_date: Date,
    #[serde(with = "iso_date")]
    pub milling_date: Date,
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

impl HarvestRecord {
    pub fn count(&self, kind: ContainerKind) -> u32 {
        match kind {
            ContainerKind::Drum30Kg => self.drum_30kg,
            ContainerKind::Drum12Kg => self.drum_12kg,
            ContainerKind::Drum10Kg => self.drum_10kg,
            ContainerKind::Can5L => self.can_5l,
            ContainerKind::Can3L => self.can_3l,
            ContainerKind::Can2L => self.can_2l,
            ContainerKind::Can1L => self.can_1l,
        }
    }
}

/// Insertion-ordered list of harvest records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HarvestTable {
    records: Vec<HarvestRecord>,
}

impl HarvestTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn columns() -> &'static [&'static str] {
        &COLUMNS
    }

    /// Returns the table with `record` as its last row.
    pub fn append(mut self, record: HarvestRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn records(&self) -> &[HarvestRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HarvestRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<HarvestRecord>> for HarvestTable {
    fn from(records: Vec<HarvestRecord>) -> Self {
        Self { records }
    }
}

impl FromIterator<HarvestRecord> for HarvestTable {
    fn from_iter<I: IntoIterator<Item = HarvestRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a HarvestTable {
    type Item = &'a HarvestRecord;
    type IntoIter = std::slice::Iter<'a, HarvestRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

mod iso_date {
    use serde::{de, ser, Deserialize, Deserializer, Serializer};
    use time::Date;

    use super::{parse_date, ISO_DATE_FMT};

    pub fn serialize<S: Serializer>(date: &Date, serializer: S) -> Result<S::Ok, S::Error> {
        let text = date.format(ISO_DATE_FMT).map_err(ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Date, D::Error> {
        let text = String::deserialize(deserializer)?;
        parse_date(&text).ok_or_else(|| de::Error::custom(format!("invalid date `{text}`")))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use time::macros::date;

    pub(crate) fn record(year: i32) -> HarvestRecord {
        HarvestRecord {
            year,
            harvest_date: date!(2023 - 10 - 01),
            milling_date: date!(2023 - 10 - 05),
            drum_30kg: 0,
            drum_12kg: 0,
            drum_10kg: 0,
            can_5l: 0,
            can_3l: 0,
            can_2l: 0,
            can_1l: 0,
            farmer_cost_total: 0.,
            milling_cost_total: 0.,
            milling_cost_per_quintal: 0.,
            olive_kg_total: 0.,
        }
    }

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_date("2023-10-01"), Some(date!(2023 - 10 - 01)));
        assert_eq!(parse_date(" 2024-02-29 "), Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn rejects_malformed_dates() {
        for text in [
            "not-a-date",
            "",
            "2023-13-01",
            "2023-02-30",
            "2023/10/01",
            "01-10-2023",
            "2023-10-01T00:00",
            "+2023-10-01",
            "-0500-10-01",
            "2023-1-01",
        ] {
            assert_eq!(parse_date(text), None, "{text} should not parse");
        }
    }

    #[test]
    fn formats_dates_as_iso() {
        assert_eq!(format_date(date!(2023 - 01 - 07)), "2023-01-07");
    }

    #[test]
    fn append_keeps_prior_rows_in_order() {
        let table: HarvestTable = vec![record(2021), record(2020)].into();
        let appended = table.clone().append(record(2023));
        assert_eq!(appended.len(), 3);
        assert_eq!(&appended.records()[..2], table.records());
        assert_eq!(appended.records()[2], record(2023));
    }

    #[test]
    fn container_columns_match_schema() {
        let containers: Vec<&str> = ContainerKind::ALL.iter().map(|k| k.column()).collect();
        assert_eq!(containers, &COLUMNS[3..10]);
    }

    #[test]
    fn count_reads_matching_field() {
        let mut r = record(2022);
        r.can_3l = 4;
        r.drum_12kg = 2;
        assert_eq!(r.count(ContainerKind::Can3L), 4);
        assert_eq!(r.count(ContainerKind::Drum12Kg), 2);
        assert_eq!(r.count(ContainerKind::Can1L), 0);
    }
}
