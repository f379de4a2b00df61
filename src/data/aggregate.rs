use std::collections::HashMap;

use super::columns::{FREQUENCY, LOSS_TANGENT};
use super::model::{Dataset, FrequencySeries, SeriesPoint};
use super::numeric::parse_number;
use crate::error::LabError;

/// Result of regrouping temperature tables into frequency series.
#[derive(Debug, Default)]
pub struct Aggregation {
    /// Ascending by frequency; points within a series ascend by temperature.
    pub series: Vec<FrequencySeries>,
    pub warnings: Vec<LabError>,
}

/// Regroup every calculated, temperature-labelled dataset by frequency.
///
/// Datasets whose label is not a number, or that have no derived columns yet,
/// take no part. A table without a frequency or loss-tangent column is skipped
/// with a warning. Rows are only used when frequency, tg and ε all parse;
/// rows whose ε is error-marked are left out.
///
/// Every call rebuilds the series from scratch.
pub fn aggregate<'a>(datasets: impl IntoIterator<Item = &'a Dataset>) -> Aggregation {
    let mut aggregation = Aggregation::default();
    // Frequency bit pattern -> index into `aggregation.series`.
    let mut index: HashMap<u64, usize> = HashMap::new();

    for dataset in datasets {
        let (Some(temperature), Some(derived)) = (dataset.temperature(), dataset.derived()) else {
            continue;
        };
        let (Some(f_col), Some(tg_col)) = (
            FREQUENCY.locate(&dataset.headers),
            LOSS_TANGENT.locate(&dataset.headers),
        ) else {
            let quantity = if FREQUENCY.locate(&dataset.headers).is_none() {
                FREQUENCY.name
            } else {
                LOSS_TANGENT.name
            };
            aggregation.warnings.push(LabError::MissingColumn {
                label: dataset.label().to_string(),
                quantity,
            });
            continue;
        };

        for (row, values) in dataset.rows.iter().zip(derived) {
            let (Some(frequency), Some(tg), Some(epsilon)) = (
                parse_number(&row[f_col]),
                parse_number(&row[tg_col]),
                values.epsilon.value(),
            ) else {
                continue;
            };
            let point = SeriesPoint {
                temperature_c: temperature,
                tg,
                epsilon,
                epsilon_prime: values.epsilon_prime.value().unwrap_or(f64::NAN),
                epsilon_double_prime: values.epsilon_double_prime.value().unwrap_or(f64::NAN),
            };
            let slot = *index.entry(frequency_key(frequency)).or_insert_with(|| {
                aggregation.series.push(FrequencySeries {
                    frequency_hz: frequency,
                    points: Vec::new(),
                });
                aggregation.series.len() - 1
            });
            aggregation.series[slot].points.push(point);
        }
    }

    // Stable sorts: equal temperatures keep dataset order.
    for series in &mut aggregation.series {
        series
            .points
            .sort_by(|a, b| a.temperature_c.total_cmp(&b.temperature_c));
    }
    aggregation
        .series
        .sort_by(|a, b| a.frequency_hz.total_cmp(&b.frequency_hz));

    log::info!(
        "Aggregated {} frequency series ({} tables skipped)",
        aggregation.series.len(),
        aggregation.warnings.len()
    );
    aggregation
}

/// Group key for a frequency; `-0.0` and `0.0` share a group.
fn frequency_key(frequency: f64) -> u64 {
    if frequency == 0.0 {
        0.0f64.to_bits()
    } else {
        frequency.to_bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::device::{E7_30, VECTOR};
    use crate::data::model::{DerivedCell, DerivedRow};
    use crate::data::permittivity::{compute_dataset, Geometry};

    fn calculated(label: &str, rows: &[(&str, &str, &str)]) -> Dataset {
        let headers = E7_30.column_headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .map(|(f, c, d)| {
                let mut cells = vec!["0".to_string(); 12];
                cells[0] = f.to_string();
                cells[1] = c.to_string();
                cells[8] = d.to_string();
                cells
            })
            .collect();
        let mut ds = Dataset::new(label, headers, rows, &E7_30);
        compute_dataset(&mut ds, &Geometry::new(1.0, 10.0).unwrap()).unwrap();
        ds
    }

    fn temperatures(series: &FrequencySeries) -> Vec<f64> {
        series.points.iter().map(|p| p.temperature_c).collect()
    }

    #[test]
    fn groups_rows_by_frequency_ordered_by_temperature() {
        let hot = calculated("40", &[("1000", "2E-10", "0.03")]);
        let cold = calculated("20", &[("1000", "1E-10", "0.02")]);
        let result = aggregate([&hot, &cold]);

        assert_eq!(result.series.len(), 1);
        let series = &result.series[0];
        assert_eq!(series.frequency_hz, 1000.0);
        assert_eq!(temperatures(series), vec![20.0, 40.0]);
        assert_eq!(series.points[0].tg, 0.02);
        assert!((series.points[0].epsilon - 143.8008286).abs() < 1e-6);
    }

    #[test]
    fn series_are_ordered_by_frequency() {
        let a = calculated("20", &[("5000", "1E-10", "0.02"), ("100", "1E-10", "0.02")]);
        let b = calculated("30", &[("1000", "1E-10", "0.02"), ("1e2", "1E-10", "0.02")]);
        let result = aggregate([&a, &b]);
        let freqs: Vec<f64> = result.series.iter().map(|s| s.frequency_hz).collect();
        assert_eq!(freqs, vec![100.0, 1000.0, 5000.0]);
        assert_eq!(temperatures(&result.series[0]), vec![20.0, 30.0]);
    }

    #[test]
    fn comma_decimals_group_with_point_decimals() {
        let a = calculated("-10,5", &[("27900,0", "1E-10", "0,02")]);
        let b = calculated("15", &[("27900.0", "1E-10", "0.02")]);
        let result = aggregate([&a, &b]);
        assert_eq!(result.series.len(), 1);
        assert_eq!(temperatures(&result.series[0]), vec![-10.5, 15.0]);
    }

    #[test]
    fn non_numeric_labels_and_uncalculated_tables_are_ignored() {
        let named = calculated("sample", &[("1000", "1E-10", "0.02")]);
        let headers = E7_30.column_headers.iter().map(|h| h.to_string()).collect();
        let raw = Dataset::new("50", headers, vec![vec!["1000".to_string(); 12]], &E7_30);
        let result = aggregate([&named, &raw]);
        assert!(result.series.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn unparseable_rows_are_excluded() {
        let ds = calculated(
            "20",
            &[
                ("1000", "bad", "0.02"),
                ("2000", "1E-10", "bad"),
                ("n/a", "1E-10", "0.02"),
                ("3000", "1E-10", "0.02"),
            ],
        );
        let result = aggregate([&ds]);
        let freqs: Vec<f64> = result.series.iter().map(|s| s.frequency_hz).collect();
        assert_eq!(freqs, vec![3000.0]);
    }

    #[test]
    fn missing_frequency_column_warns() {
        let mut ds = calculated("20", &[("1000", "1E-10", "0.02")]);
        ds.headers[0] = "Freq".to_string();
        let result = aggregate([&ds]);
        assert!(result.series.is_empty());
        assert!(matches!(
            result.warnings.as_slice(),
            [LabError::MissingColumn { quantity: "frequency", .. }]
        ));
    }

    #[test]
    fn error_marked_epsilon_is_excluded() {
        let mut ds = calculated("20", &[("1000", "1E-10", "0.02")]);
        ds.set_derived(vec![DerivedRow {
            epsilon: DerivedCell::Error,
            epsilon_prime: DerivedCell::Value(1.0),
            epsilon_double_prime: DerivedCell::Value(1.0),
        }]);
        assert!(aggregate([&ds]).series.is_empty());
    }

    #[test]
    fn non_finite_labels_and_frequencies_are_ignored() {
        let nan_label = calculated("NaN", &[("1000", "1E-10", "0.02")]);
        let inf_label = calculated("inf", &[("1000", "1E-10", "0.02")]);
        let inf_freq = calculated("20", &[("inf", "1E-10", "0.02"), ("100", "1E-10", "0.02")]);
        let result = aggregate([&nan_label, &inf_label, &inf_freq]);

        assert_eq!(result.series.len(), 1);
        assert_eq!(result.series[0].frequency_hz, 100.0);
        assert_eq!(temperatures(&result.series[0]), vec![20.0]);
    }

    #[test]
    fn vector_tables_aggregate_through_their_own_captions() {
        let headers: Vec<String> = VECTOR.column_headers.iter().map(|h| h.to_string()).collect();
        let vector = |label: &str, rows: &[(&str, &str, &str)]| {
            let rows = rows
                .iter()
                .map(|(f, c, tg)| {
                    let mut cells = vec!["0".to_string(); 8];
                    cells[0] = f.to_string();
                    cells[2] = tg.to_string();
                    cells[6] = c.to_string();
                    cells
                })
                .collect();
            let mut ds = Dataset::new(label, headers.clone(), rows, &VECTOR);
            compute_dataset(&mut ds, &Geometry::new(1.0, 10.0).unwrap()).unwrap();
            ds
        };
        let warm = vector("25,5", &[("1000,0", "1,0E-10", "0,02"), ("100", "1,0E-10", "0,03")]);
        let cold = vector("-5", &[("1000", "1,0E-10", "0,01")]);
        let result = aggregate([&warm, &cold]);

        assert!(result.warnings.is_empty());
        let freqs: Vec<f64> = result.series.iter().map(|s| s.frequency_hz).collect();
        assert_eq!(freqs, vec![100.0, 1000.0]);
        assert_eq!(temperatures(&result.series[1]), vec![-5.0, 25.5]);
        assert_eq!(result.series[1].points[1].tg, 0.02);
        assert!((result.series[1].points[1].epsilon - 143.8008286).abs() < 1e-6);
    }

    #[test]
    fn empty_input_gives_empty_result() {
        let result = aggregate(std::iter::empty());
        assert!(result.series.is_empty());
    }
}
