use std::path::PathBuf;

use contagion_core::data::{DataSource, Observation, ObservedData};
use contagion_core::error::{Result, SirError};

/// Reads a `day,cases` CSV file as the observed series for a region.
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for CsvSource {
    fn observed(&self, region: &str) -> Result<ObservedData> {
        let mut reader = csv::Reader::from_path(&self.path).map_err(|e| {
            SirError::DataUnavailable(format!("cannot read {}: {e}", self.path.display()))
        })?;
        let mut points = Vec::new();
        for row in reader.deserialize() {
            let observation: Observation = row.map_err(|e| {
                SirError::DataUnavailable(format!("bad row in {}: {e}", self.path.display()))
            })?;
            points.push(observation);
        }
        if points.is_empty() {
            return Err(SirError::DataUnavailable(format!(
                "{} holds no observations",
                self.path.display()
            )));
        }
        Ok(ObservedData::new(region, points))
    }
}
