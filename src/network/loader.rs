//! CSV loading for network measurements.
//!
//! Records are validated at the boundary: a missing required column, a cell that is
//! not a finite number, a non-positive bandwidth or a negative latency all fail with
//! [`AdvisorError::Schema`] before any computation sees the data.

use crate::error::{AdvisorError, Result};
use crate::network::sample::{NetworkFeatures, NetworkSample, FEATURE_COLUMNS, LABEL_COLUMN};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::debug;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Positions of the required columns in the header row.
struct ColumnIndex {
    bandwidth: usize,
    latency: usize,
    signal_strength: usize,
    uptime: Option<usize>,
}

impl ColumnIndex {
    fn resolve(headers: &StringRecord, require_label: bool) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let mut required: Vec<&str> = FEATURE_COLUMNS.to_vec();
        if require_label {
            required.push(LABEL_COLUMN);
        }
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|name| find(name).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(AdvisorError::Schema(format!(
                "missing required column(s): {}",
                missing.join(", ")
            )));
        }

        // Presence was checked above.
        let index = |name: &str| find(name).unwrap_or_default();
        Ok(Self {
            bandwidth: index(FEATURE_COLUMNS[0]),
            latency: index(FEATURE_COLUMNS[1]),
            signal_strength: index(FEATURE_COLUMNS[2]),
            uptime: require_label.then(|| index(LABEL_COLUMN)),
        })
    }

    fn features(&self, record: &StringRecord, row: usize) -> Result<NetworkFeatures> {
        let bandwidth = parse_cell(record, self.bandwidth, FEATURE_COLUMNS[0], row)?;
        if bandwidth <= 0.0 {
            return Err(AdvisorError::Schema(format!(
                "row {}: bandwidth must be > 0, got {}",
                row, bandwidth
            )));
        }
        let latency = parse_cell(record, self.latency, FEATURE_COLUMNS[1], row)?;
        if latency < 0.0 {
            return Err(AdvisorError::Schema(format!(
                "row {}: latency must be >= 0, got {}",
                row, latency
            )));
        }
        let signal_strength = parse_cell(record, self.signal_strength, FEATURE_COLUMNS[2], row)?;
        Ok(NetworkFeatures::new(bandwidth, latency, signal_strength))
    }

    fn sample(&self, record: &StringRecord, row: usize) -> Result<NetworkSample> {
        let features = self.features(record, row)?;
        let uptime_idx = self
            .uptime
            .ok_or_else(|| AdvisorError::Schema(format!("missing column '{}'", LABEL_COLUMN)))?;
        let uptime = parse_cell(record, uptime_idx, LABEL_COLUMN, row)?;
        Ok(NetworkSample::new(
            features.bandwidth,
            features.latency,
            features.signal_strength,
            uptime,
        ))
    }
}

fn parse_cell(record: &StringRecord, idx: usize, column: &str, row: usize) -> Result<f64> {
    let raw = record.get(idx).unwrap_or("");
    let value: f64 = raw.parse().map_err(|_| {
        AdvisorError::Schema(format!(
            "row {}: column '{}' is not a number: '{}'",
            row, column, raw
        ))
    })?;
    if !value.is_finite() {
        return Err(AdvisorError::Schema(format!(
            "row {}: column '{}' must be finite, got {}",
            row, column, raw
        )));
    }
    Ok(value)
}

fn read_rows<R, T, F>(reader: R, require_label: bool, mut parse: F) -> Result<Vec<T>>
where
    R: Read,
    F: FnMut(&ColumnIndex, &StringRecord, usize) -> Result<T>,
{
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers()?.clone();
    let columns = ColumnIndex::resolve(&headers, require_label)?;

    let mut rows = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        // 1-based data row, header excluded
        rows.push(parse(&columns, &record, i + 1)?);
    }
    if rows.is_empty() {
        return Err(AdvisorError::EmptyData("table has no data rows".into()));
    }
    debug!("loaded {} network rows", rows.len());
    Ok(rows)
}

/// Parses labelled training rows from delimited text with a header row.
///
/// # Errors
/// - [`AdvisorError::Schema`] if any of `bandwidth`, `latency`, `signal_strength`,
///   `uptime` is absent or a cell is invalid.
/// - [`AdvisorError::EmptyData`] if the table has no data rows.
pub fn load_samples<R: Read>(reader: R) -> Result<Vec<NetworkSample>> {
    read_rows(reader, true, |columns, record, row| columns.sample(record, row))
}

pub fn load_samples_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NetworkSample>> {
    load_samples(BufReader::new(File::open(path)?))
}

/// Parses inference rows; only the three feature columns are required.
pub fn load_features<R: Read>(reader: R) -> Result<Vec<NetworkFeatures>> {
    read_rows(reader, false, |columns, record, row| {
        columns.features(record, row)
    })
}

pub fn load_features_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<NetworkFeatures>> {
    load_features(BufReader::new(File::open(path)?))
}
