use std::f64::consts::PI;

use super::columns::{CAPACITANCE, FREQUENCY, LOSS_TANGENT};
use super::device::DeviceSchema;
use super::model::{Dataset, DerivedCell, DerivedRow};
use super::numeric::parse_number;
use super::store::{CurvePoint, DatasetStore};
use crate::error::LabError;

/// Vacuum permittivity, F/m.
pub const EPSILON_0: f64 = 8.854187817e-12;

// ---------------------------------------------------------------------------
// Sample geometry
// ---------------------------------------------------------------------------

/// A flat disc sample between circular electrodes, dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub thickness_mm: f64,
    pub diameter_mm: f64,
}

impl Geometry {
    pub fn new(thickness_mm: f64, diameter_mm: f64) -> Result<Self, LabError> {
        for (name, v) in [("thickness", thickness_mm), ("diameter", diameter_mm)] {
            if !(v.is_finite() && v > 0.0) {
                return Err(LabError::InvalidGeometry(format!(
                    "{name} must be a positive number, got {v}"
                )));
            }
        }
        Ok(Self {
            thickness_mm,
            diameter_mm,
        })
    }

    /// Parse the two text inputs, accepting either decimal separator.
    pub fn parse(thickness: &str, diameter: &str) -> Result<Self, LabError> {
        let read = |name: &str, s: &str| {
            parse_number(s).ok_or_else(|| {
                LabError::InvalidGeometry(format!("{name} '{}' is not a number", s.trim()))
            })
        };
        Self::new(read("thickness", thickness)?, read("diameter", diameter)?)
    }

    /// Sample thickness, m.
    pub fn thickness_m(&self) -> f64 {
        self.thickness_mm / 1000.0
    }

    /// Electrode area, m².
    pub fn area_m2(&self) -> f64 {
        let radius = self.diameter_mm / 2000.0;
        PI * radius * radius
    }

    /// ε, ε′ and ε″ for one measurement. `tg` is `None` when the loss tangent
    /// could not be read, in which case only ε is available. A value that
    /// overflows to a non-finite result is marked as an error.
    pub fn derive(&self, capacitance: f64, tg: Option<f64>) -> DerivedRow {
        let epsilon = capacitance * self.thickness_m() / (EPSILON_0 * self.area_m2());
        if !epsilon.is_finite() {
            return DerivedRow::ERROR;
        }
        match tg {
            Some(tg) => {
                let epsilon_prime = epsilon / 1.0f64.hypot(tg);
                DerivedRow {
                    epsilon: DerivedCell::Value(epsilon),
                    epsilon_prime: finite(epsilon_prime),
                    epsilon_double_prime: finite(epsilon_prime * tg),
                }
            }
            None => DerivedRow {
                epsilon: DerivedCell::Value(epsilon),
                ..DerivedRow::ERROR
            },
        }
    }
}

fn finite(value: f64) -> DerivedCell {
    if value.is_finite() {
        DerivedCell::Value(value)
    } else {
        DerivedCell::Error
    }
}

// ---------------------------------------------------------------------------
// Table-level calculation
// ---------------------------------------------------------------------------

/// Outcome of computing one table.
#[derive(Debug, Default, PartialEq)]
pub struct TableOutcome {
    /// Rows with at least one error-marked cell.
    pub error_rows: usize,
    pub curve: Vec<CurvePoint>,
}

/// Compute the derived columns of `dataset` in place.
///
/// Fails only when the capacitance or loss-tangent column is missing; cells
/// that do not parse mark just their own row.
pub fn compute_dataset(dataset: &mut Dataset, geometry: &Geometry) -> Result<TableOutcome, LabError> {
    let missing = |quantity: &'static str| LabError::MissingColumn {
        label: dataset.label().to_string(),
        quantity,
    };
    let cap_col = CAPACITANCE
        .locate(&dataset.headers)
        .ok_or_else(|| missing(CAPACITANCE.name))?;
    let tg_col = LOSS_TANGENT
        .locate(&dataset.headers)
        .ok_or_else(|| missing(LOSS_TANGENT.name))?;
    let freq_col = FREQUENCY.locate(&dataset.headers);

    let mut outcome = TableOutcome::default();
    let mut derived = Vec::with_capacity(dataset.rows.len());

    for (i, row) in dataset.rows.iter().enumerate() {
        let Some(capacitance) = parse_number(&row[cap_col]) else {
            log::debug!(
                "{}",
                LabError::CellParse {
                    row: i,
                    column: dataset.headers[cap_col].clone(),
                    value: row[cap_col].clone(),
                }
            );
            outcome.error_rows += 1;
            derived.push(DerivedRow::ERROR);
            continue;
        };
        let values = geometry.derive(capacitance, parse_number(&row[tg_col]));
        if values.has_error() {
            outcome.error_rows += 1;
        }

        if let (Some(f), Some(eps)) = (
            freq_col.and_then(|c| parse_number(&row[c])),
            values.epsilon.value(),
        ) {
            outcome.curve.push(CurvePoint {
                frequency_hz: f,
                epsilon: eps,
            });
        }
        derived.push(values);
    }

    dataset.set_derived(derived);
    Ok(outcome)
}

/// Summary of a calculation over every visible table.
#[derive(Debug, Default)]
pub struct CalcReport {
    pub computed: Vec<String>,
    pub warnings: Vec<LabError>,
}

/// Compute permittivity for every dataset of `device`. A table missing a
/// required column is skipped with a warning; the others are still computed.
pub fn compute_all(store: &mut DatasetStore, device: &DeviceSchema, geometry: &Geometry) -> CalcReport {
    let mut report = CalcReport::default();
    let mut curves = Vec::new();

    for dataset in store.active_view_mut(device) {
        match compute_dataset(dataset, geometry) {
            Ok(outcome) => {
                if outcome.error_rows > 0 {
                    log::warn!(
                        "'{}': {} rows could not be fully computed",
                        dataset.label(),
                        outcome.error_rows
                    );
                }
                report.computed.push(dataset.label().to_string());
                curves.push((dataset.label().to_string(), outcome.curve));
            }
            Err(e) => {
                log::warn!("{e}");
                report.warnings.push(e);
            }
        }
    }

    for (label, curve) in curves {
        store.set_curve(&label, curve);
    }
    log::info!(
        "Computed permittivity for {} tables ({} skipped)",
        report.computed.len(),
        report.warnings.len()
    );
    report
}
