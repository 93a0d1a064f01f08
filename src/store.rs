use std::{
    ffi::OsString,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use anyhow::Context;
use tracing::debug;

use crate::{
    record::{HarvestRecord, HarvestTable, COLUMNS},
    Result,
};

/// Reads the table stored at `path`. A missing file is an empty table.
pub fn load<P: AsRef<Path>>(path: P) -> Result<HarvestTable> {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no data file yet, starting empty");
            return Ok(HarvestTable::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open {}", path.display()));
        }
    };

    let mut rdr = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for (row, result) in rdr.deserialize::<HarvestRecord>().enumerate() {
        // Row 1 is the header.
        let record = result.with_context(|| {
            format!("malformed record on row {} of {}", row + 2, path.display())
        })?;
        records.push(record);
    }
    debug!(path = %path.display(), rows = records.len(), "loaded harvest table");
    Ok(records.into())
}

/// Overwrites `path` with the whole table. The rows are written to a
/// sibling file first and renamed into place.
pub fn save<P: AsRef<Path>>(path: P, table: &HarvestTable) -> Result<()> {
    let path = path.as_ref();
    let tmp_path = sibling_tmp_path(path);
    let result = write_table(&tmp_path, table)
        .with_context(|| format!("failed to write {}", tmp_path.display()))
        .and_then(|()| {
            fs::rename(&tmp_path, path).with_context(|| {
                format!(
                    "failed to move {} to {}",
                    tmp_path.display(),
                    path.display()
                )
            })
        });
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;
    debug!(path = %path.display(), rows = table.len(), "saved harvest table");
    Ok(())
}

fn write_table(path: &Path, table: &HarvestTable) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    // Written by hand so an empty table still carries the schema.
    wtr.write_record(COLUMNS)?;
    for record in table {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn sibling_tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("harvest"));
    name.push(".tmp");
    path.with_file_name(name)
}
