use std::fmt;

use serde::{Deserialize, Serialize};

use super::device::DeviceSchema;
use super::numeric::{format_g4, format_g6};

// ---------------------------------------------------------------------------
// Tabular – anything that renders as a grid and exports as a text table
// ---------------------------------------------------------------------------

/// A read-only grid of text cells. `None` cells are shown and exported empty.
pub trait Tabular {
    fn column_titles(&self) -> Vec<String>;
    fn row_count(&self) -> usize;
    fn cell(&self, row: usize, column: usize) -> Option<String>;
}

// ---------------------------------------------------------------------------
// DerivedCell / DerivedRow – permittivity values attached to a raw row
// ---------------------------------------------------------------------------

/// Text shown in place of a value that could not be computed.
pub const ERROR_MARKER: &str = "Error";

/// Titles of the derived columns appended after the instrument columns.
pub const DERIVED_TITLES: [&str; 3] = ["ε", "ε′", "ε″"];

/// One computed value, or an explicit marker when its inputs did not parse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DerivedCell {
    Value(f64),
    Error,
}

impl DerivedCell {
    pub fn value(&self) -> Option<f64> {
        match self {
            DerivedCell::Value(v) => Some(*v),
            DerivedCell::Error => None,
        }
    }
}

impl fmt::Display for DerivedCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DerivedCell::Value(v) => f.write_str(&format_g6(*v)),
            DerivedCell::Error => f.write_str(ERROR_MARKER),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedRow {
    pub epsilon: DerivedCell,
    pub epsilon_prime: DerivedCell,
    pub epsilon_double_prime: DerivedCell,
}

impl DerivedRow {
    pub const ERROR: DerivedRow = DerivedRow {
        epsilon: DerivedCell::Error,
        epsilon_prime: DerivedCell::Error,
        epsilon_double_prime: DerivedCell::Error,
    };

    pub fn has_error(&self) -> bool {
        [self.epsilon, self.epsilon_prime, self.epsilon_double_prime]
            .iter()
            .any(|c| *c == DerivedCell::Error)
    }

    fn get(&self, i: usize) -> Option<&DerivedCell> {
        match i {
            0 => Some(&self.epsilon),
            1 => Some(&self.epsilon_prime),
            2 => Some(&self.epsilon_double_prime),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – one loaded instrument export
// ---------------------------------------------------------------------------

/// A parsed file: verbatim headers and cells, plus the derived permittivity
/// columns once they have been calculated.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Display name and store key. Only the store may change it.
    pub(crate) label: String,
    pub headers: Vec<String>,
    /// Every row has exactly `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
    pub device: &'static DeviceSchema,
    /// Positionally aligned with `rows` when present.
    pub(crate) derived: Option<Vec<DerivedRow>>,
}

impl Dataset {
    pub fn new(
        label: impl Into<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
        device: &'static DeviceSchema,
    ) -> Self {
        Self {
            label: label.into(),
            headers,
            rows,
            device,
            derived: None,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn derived(&self) -> Option<&[DerivedRow]> {
        self.derived.as_deref()
    }

    /// Replace the derived columns. Called with a full recomputation, so the
    /// columns are overwritten rather than appended a second time.
    pub fn set_derived(&mut self, derived: Vec<DerivedRow>) {
        debug_assert_eq!(derived.len(), self.rows.len());
        self.derived = Some(derived);
    }

    /// The dataset's label read as a temperature in °C, if it is numeric.
    pub fn temperature(&self) -> Option<f64> {
        super::numeric::parse_number(&self.label)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl Tabular for Dataset {
    fn column_titles(&self) -> Vec<String> {
        let mut titles = self.headers.clone();
        if self.derived.is_some() {
            titles.extend(DERIVED_TITLES.iter().map(|t| t.to_string()));
        }
        titles
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn cell(&self, row: usize, column: usize) -> Option<String> {
        let raw = self.rows.get(row)?;
        if column < raw.len() {
            return Some(raw[column].clone());
        }
        let derived = self.derived.as_ref()?.get(row)?;
        derived.get(column - raw.len()).map(|c| c.to_string())
    }
}

// ---------------------------------------------------------------------------
// FrequencySeries – measurements at one frequency across temperatures
// ---------------------------------------------------------------------------

/// One aggregated measurement: a dataset's row at a given frequency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub temperature_c: f64,
    pub tg: f64,
    pub epsilon: f64,
    pub epsilon_prime: f64,
    pub epsilon_double_prime: f64,
}

/// Which value of a [`SeriesPoint`] to chart against temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChartQuantity {
    Tg,
    #[default]
    Epsilon,
    EpsilonPrime,
    EpsilonDoublePrime,
}

impl ChartQuantity {
    pub const ALL: [ChartQuantity; 4] = [
        ChartQuantity::Tg,
        ChartQuantity::Epsilon,
        ChartQuantity::EpsilonPrime,
        ChartQuantity::EpsilonDoublePrime,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartQuantity::Tg => "tg(δ)",
            ChartQuantity::Epsilon => "ε",
            ChartQuantity::EpsilonPrime => "ε′",
            ChartQuantity::EpsilonDoublePrime => "ε″",
        }
    }

    pub fn of(self, point: &SeriesPoint) -> f64 {
        match self {
            ChartQuantity::Tg => point.tg,
            ChartQuantity::Epsilon => point.epsilon,
            ChartQuantity::EpsilonPrime => point.epsilon_prime,
            ChartQuantity::EpsilonDoublePrime => point.epsilon_double_prime,
        }
    }
}

pub const SERIES_TITLES: [&str; 5] = ["T, °C", "tg(δ)", "ε", "ε′", "ε″"];

/// Everything measured at one frequency, ordered by ascending temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySeries {
    pub frequency_hz: f64,
    pub points: Vec<SeriesPoint>,
}

impl FrequencySeries {
    /// Tab title, e.g. `2.79E+04 Hz`.
    pub fn title(&self) -> String {
        format!("{} Hz", format_g4(self.frequency_hz))
    }

    /// `(temperature, value)` pairs for a chart.
    pub fn chart_points(&self, quantity: ChartQuantity) -> Vec<[f64; 2]> {
        self.points
            .iter()
            .map(|p| [p.temperature_c, quantity.of(p)])
            .collect()
    }
}

impl Tabular for FrequencySeries {
    fn column_titles(&self) -> Vec<String> {
        SERIES_TITLES.iter().map(|t| t.to_string()).collect()
    }

    fn row_count(&self) -> usize {
        self.points.len()
    }

    fn cell(&self, row: usize, column: usize) -> Option<String> {
        let p = self.points.get(row)?;
        let value = match column {
            0 => return Some(format_g4(p.temperature_c)),
            1 => p.tg,
            2 => p.epsilon,
            3 => p.epsilon_prime,
            4 => p.epsilon_double_prime,
            _ => return None,
        };
        // An absent component is exported as an empty cell.
        (!value.is_nan()).then(|| format_g6(value))
    }
}
