use std::path::Path;

use anyhow::Result;
use contagion_core::plot::Series;
use serde::Serialize;

#[derive(Serialize)]
struct Row<'a> {
    series: &'a str,
    time: f64,
    value: f64,
}

/// Writes plot series as long-format CSV: one `series,time,value` row per point.
pub fn write_series(path: &Path, series: &[Series]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for s in series {
        for &[time, value] in &s.points {
            writer.serialize(Row {
                series: &s.name,
                time,
                value,
            })?;
        }
    }
    writer.flush()?;
    Ok(())
}
