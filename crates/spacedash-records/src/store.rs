//! RecordStore — immutable in-memory launch records.
//!
//! Loaded once from a CSV file with a header row. Columns are matched by
//! header name, so extra columns (and their order) do not matter. Every
//! row is validated on the way in; a single bad row fails the whole load.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::error::{RecordError, RecordResult};
use crate::types::*;

/// One CSV row as it appears on disk.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Flight Number", default)]
    flight_number: Option<u32>,
    #[serde(rename = "Launch Site")]
    launch_site: String,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version", default)]
    booster_version: Option<String>,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: String,
}

impl CsvRow {
    fn into_record(self, line: u64) -> RecordResult<LaunchRecord> {
        let outcome_class = match self.class {
            0 => OUTCOME_FAILURE,
            1 => OUTCOME_SUCCESS,
            value => return Err(RecordError::InvalidOutcome { line, value }),
        };
        let record = LaunchRecord {
            flight_number: self.flight_number,
            launch_site: self.launch_site,
            payload_mass_kg: self.payload_mass_kg,
            booster_version: self.booster_version.filter(|v| !v.is_empty()),
            booster_version_category: self.booster_version_category,
            outcome_class,
        };
        validate(&record, line)?;
        Ok(record)
    }
}

fn validate(record: &LaunchRecord, line: u64) -> RecordResult<()> {
    if record.launch_site.is_empty() {
        return Err(RecordError::MissingSite { line });
    }
    if !record.payload_mass_kg.is_finite() || record.payload_mass_kg < 0.0 {
        return Err(RecordError::InvalidPayload {
            line,
            value: record.payload_mass_kg,
        });
    }
    if record.outcome_class > OUTCOME_SUCCESS {
        return Err(RecordError::InvalidOutcome {
            line,
            value: i64::from(record.outcome_class),
        });
    }
    Ok(())
}

struct StoreInner {
    records: Vec<LaunchRecord>,
    /// Distinct launch sites in first-appearance order.
    sites: Vec<String>,
    bounds: Option<PayloadBounds>,
}

/// Read-only launch record store, cheap to clone.
#[derive(Clone)]
pub struct RecordStore {
    inner: Arc<StoreInner>,
}

impl RecordStore {
    /// Load records from a CSV file. Fails on a missing file, a malformed
    /// row, or a file with no data rows.
    pub fn load(path: &Path) -> RecordResult<Self> {
        let file = File::open(path).map_err(|source| RecordError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_reader(file)?;
        debug!(?path, records = store.len(), "record store loaded");
        Ok(store)
    }

    /// Parse CSV from any reader. Rejects input with no data rows.
    pub fn from_reader<R: Read>(reader: R) -> RecordResult<Self> {
        let mut csv = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (idx, row) in csv.deserialize::<CsvRow>().enumerate() {
            // Line 1 is the header.
            let line = idx as u64 + 2;
            records.push(row?.into_record(line)?);
        }

        if records.is_empty() {
            return Err(RecordError::Empty);
        }
        Ok(Self::build(records))
    }

    /// Build a store from already-parsed records. An empty list is allowed
    /// and yields a store without payload bounds.
    pub fn from_records(records: Vec<LaunchRecord>) -> RecordResult<Self> {
        for (idx, record) in records.iter().enumerate() {
            validate(record, idx as u64 + 1)?;
        }
        Ok(Self::build(records))
    }

    fn build(records: Vec<LaunchRecord>) -> Self {
        let mut sites: Vec<String> = Vec::new();
        for record in &records {
            if !sites.iter().any(|s| s == &record.launch_site) {
                sites.push(record.launch_site.clone());
            }
        }

        let bounds = records
            .iter()
            .map(|r| r.payload_mass_kg)
            .fold(None, |acc: Option<PayloadBounds>, mass| match acc {
                None => Some(PayloadBounds {
                    min: mass,
                    max: mass,
                }),
                Some(b) => Some(PayloadBounds {
                    min: b.min.min(mass),
                    max: b.max.max(mass),
                }),
            });

        Self {
            inner: Arc::new(StoreInner {
                records,
                sites,
                bounds,
            }),
        }
    }

    pub fn records(&self) -> &[LaunchRecord] {
        &self.inner.records
    }

    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }

    /// Distinct launch sites, in the order they first appear in the data.
    pub fn sites(&self) -> &[String] {
        &self.inner.sites
    }

    /// Observed min/max payload. `None` only for an empty store.
    pub fn payload_bounds(&self) -> Option<PayloadBounds> {
        self.inner.bounds
    }
}
