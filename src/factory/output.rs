use super::record::OutputRecord;
use crate::core::errors::{SimError, SimResult};
use log::info;
use std::fs;
use std::path::Path;

/// Write the series as CSV, creating parent directories; returns the row count
pub fn write_series(path: impl AsRef<Path>, records: &[OutputRecord]) -> SimResult<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| SimError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let csv_err = |source| SimError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for record in records {
        writer.serialize(record).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Simulation data saved to {} ({} rows)", path.display(), records.len());
    Ok(records.len())
}

/// Read a series previously written by `write_series`
pub fn load_series(path: impl AsRef<Path>) -> SimResult<Vec<OutputRecord>> {
    let path = path.as_ref();
    let csv_err = |source| SimError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<OutputRecord>, csv::Error>>()
        .map_err(csv_err)
}
