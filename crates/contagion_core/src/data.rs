use serde::{Deserialize, Serialize};

use crate::error::{Result, SirError};

/// A single real-world data point: the active case count on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub day: f64,
    pub cases: f64,
}

/// An ordered case-count series for one region.
///
/// Read-only input to the core: it is compared against simulated trajectories
/// and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedData {
    region: String,
    points: Vec<Observation>,
}

impl ObservedData {
    /// Builds a series, ordering the observations by day.
    pub fn new(region: impl Into<String>, mut points: Vec<Observation>) -> Self {
        points.sort_by(|a, b| a.day.total_cmp(&b.day));
        Self {
            region: region.into(),
            points,
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn points(&self) -> &[Observation] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Day of the last observation, or 0 for an empty series.
    pub fn last_day(&self) -> f64 {
        self.points.last().map_or(0.0, |o| o.day)
    }
}

/// Supplies observed case data for a named region.
///
/// The numerical core stays decoupled from where the numbers come from; a
/// file reader, an HTTP client, or a fixture all fit behind this trait.
pub trait DataSource {
    fn observed(&self, region: &str) -> Result<ObservedData>;
}

/// Per-country epidemic figures: a fitted transmission rate β
/// (arXiv:2003.11221), census population, and the active case count at the
/// time the table was compiled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountryRecord {
    pub name: &'static str,
    pub beta: f64,
    pub population: f64,
    pub current_cases: f64,
}

/// Built-in lookup of [`CountryRecord`]s by exact country name.
pub struct CountryTable;

impl CountryTable {
    pub fn lookup(name: &str) -> Result<&'static CountryRecord> {
        COUNTRIES
            .iter()
            .find(|record| record.name == name)
            .ok_or_else(|| SirError::DataUnavailable(format!("no data on country {name:?}")))
    }

    pub fn all() -> &'static [CountryRecord] {
        COUNTRIES
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        COUNTRIES.iter().map(|record| record.name)
    }
}

macro_rules! country {
    ($name:literal, $beta:literal, $population:literal, $cases:literal) => {
        CountryRecord {
            name: $name,
            beta: $beta,
            population: $population,
            current_cases: $cases,
        }
    };
}

const COUNTRIES: &[CountryRecord] = &[
    country!("Australia", 0.29, 21_515_754.0, 701.0),
    country!("Austria", 0.29, 8_205_000.0, 1_290.0),
    country!("Belgium", 0.27, 10_403_000.0, 30_604.0),
    country!("Brazil", 0.37, 201_103_330.0, 83_720.0),
    country!("Canada", 0.33, 33_679_000.0, 31_760.0),
    country!("Chile", 0.37, 16_746_491.0, 14_248.0),
    country!("China", 0.0012, 1_330_044_000.0, 148.0),
    country!("Czechia", 0.29, 10_476_000.0, 3_372.0),
    country!("Denmark", 0.12, 5_484_000.0, 1_700.0),
    country!("Ecuador", 0.48, 14_790_608.0, 23_921.0),
    country!("France", 0.24, 64_768_389.0, 94_310.0),
    country!("Germany", 0.28, 81_802_257.0, 19_375.0),
    country!("Iran", 0.11, 76_923_300.0, 14_567.0),
    country!("Ireland", 0.35, 4_622_917.0, 4_204.0),
    country!("Israel", 0.3, 7_353_985.0, 4_831.0),
    country!("Italy", 0.19, 60_340_328.0, 84_842.0),
    country!("Japan", 0.077, 127_288_000.0, 9_150.0),
    country!("South Korea", 0.02, 48_422_644.0, 1_008.0),
    country!("Luxembourg", 0.42, 497_538.0, 226.0),
    country!("Malaysia", 0.26, 28_274_729.0, 1_552.0),
    country!("Netherlands", 0.25, 16_645_000.0, 36_710.0),
    country!("Norway", 0.15, 5_009_150.0, 7_848.0),
    country!("Pakistan", 0.31, 184_404_791.0, 20_803.0),
    country!("Poland", 0.31, 38_500_000.0, 9_429.0),
    country!("Spain", 0.28, 46_505_963.0, 63_148.0),
    country!("Sweden", 0.15, 9_828_655.0, 17_730.0),
    country!("Switzerland", 0.28, 7_581_000.0, 2_021.0),
    country!("United States", 0.38, 310_232_863.0, 1_029_198.0),
    country!("United Kingdom", 0.29, 62_348_447.0, 183_329.0),
];
