use std::collections::BTreeMap;

use super::device::DeviceSchema;
use super::model::Dataset;
use crate::error::LabError;

/// A point of a dataset's ε(f) curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub frequency_hz: f64,
    pub epsilon: f64,
}

// ---------------------------------------------------------------------------
// DatasetStore – the single owner of every label-keyed collection
// ---------------------------------------------------------------------------

/// All loaded datasets, keyed by label, plus every derived store keyed by the
/// same label.
///
/// Labels are only changed through [`DatasetStore::rename`], which re-keys the
/// raw datasets and all derived stores together.
#[derive(Debug, Default)]
pub struct DatasetStore {
    /// Insertion order is display order.
    datasets: Vec<Dataset>,
    /// ε(f) per dataset, filled by the permittivity calculation.
    curves: BTreeMap<String, Vec<CurvePoint>>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a dataset, replacing any dataset with the same label in place.
    /// A replaced dataset's derived data is discarded with it.
    pub fn put(&mut self, dataset: Dataset) {
        self.curves.remove(dataset.label());
        match self.position(dataset.label()) {
            Some(i) => {
                log::info!("Replacing dataset '{}'", dataset.label());
                self.datasets[i] = dataset;
            }
            None => self.datasets.push(dataset),
        }
    }

    pub fn get(&self, label: &str) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.label() == label)
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Datasets produced by `device`, in insertion order. The others stay
    /// resident and reappear when their instrument is selected again.
    pub fn active_view(&self, device: &DeviceSchema) -> Vec<&Dataset> {
        self.datasets
            .iter()
            .filter(|d| d.device == device)
            .collect()
    }

    /// Mutable access for the calculators, restricted to one instrument.
    pub(crate) fn active_view_mut(&mut self, device: &DeviceSchema) -> Vec<&mut Dataset> {
        self.datasets
            .iter_mut()
            .filter(|d| d.device == device)
            .collect()
    }

    pub fn curve(&self, label: &str) -> Option<&[CurvePoint]> {
        self.curves.get(label).map(Vec::as_slice)
    }

    pub(crate) fn set_curve(&mut self, label: &str, curve: Vec<CurvePoint>) {
        if self.contains(label) {
            self.curves.insert(label.to_string(), curve);
        }
    }

    /// Rename a dataset in every store at once.
    ///
    /// Refused, with nothing changed, when `old` does not exist, `new` is
    /// empty after trimming, or `new` is already taken.
    pub fn rename(&mut self, old: &str, new: &str) -> Result<(), LabError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(LabError::InvalidLabel(new.to_string()));
        }
        let index = self
            .position(old)
            .ok_or_else(|| LabError::UnknownLabel(old.to_string()))?;
        if self.contains(new) || self.curves.contains_key(new) {
            log::warn!("Rename '{old}' -> '{new}' refused: target exists");
            return Err(LabError::RenameConflict {
                from: old.to_string(),
                to: new.to_string(),
            });
        }

        // All checks are done; nothing below can fail.
        log::debug!("Renaming '{old}' -> '{new}'");
        self.datasets[index].label = new.to_string();
        if let Some(curve) = self.curves.remove(old) {
            self.curves.insert(new.to_string(), curve);
        }
        Ok(())
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.datasets.iter().position(|d| d.label() == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::device::{E7_30, VECTOR};

    fn dataset(label: &str, device: &'static DeviceSchema) -> Dataset {
        let headers = device.column_headers.iter().map(|h| h.to_string()).collect();
        Dataset::new(label, headers, Vec::new(), device)
    }

    fn point(f: f64) -> Vec<CurvePoint> {
        vec![CurvePoint {
            frequency_hz: f,
            epsilon: 2.0,
        }]
    }

    fn labels(store: &DatasetStore) -> Vec<&str> {
        store.datasets.iter().map(|d| d.label()).collect()
    }

    #[test]
    fn put_keeps_insertion_order_and_overwrites() {
        let mut store = DatasetStore::new();
        store.put(dataset("40", &E7_30));
        store.put(dataset("20", &E7_30));
        store.set_curve("40", point(1.0));
        store.put(dataset("40", &VECTOR));
        assert_eq!(labels(&store), vec!["40", "20"]);
        assert_eq!(store.get("40").unwrap().device, &VECTOR);
        assert!(store.curve("40").is_none());
    }

    #[test]
    fn active_view_filters_by_instrument() {
        let mut store = DatasetStore::new();
        store.put(dataset("a", &E7_30));
        store.put(dataset("b", &VECTOR));
        store.put(dataset("c", &E7_30));
        let view: Vec<&str> = store.active_view(&E7_30).iter().map(|d| d.label()).collect();
        assert_eq!(view, vec!["a", "c"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn rename_rekeys_every_store() {
        let mut store = DatasetStore::new();
        store.put(dataset("A", &E7_30));
        store.set_curve("A", point(1000.0));
        store.rename("A", " 25 ").unwrap();
        assert!(!store.contains("A"));
        assert!(store.curve("A").is_none());
        assert_eq!(store.get("25").unwrap().label(), "25");
        assert_eq!(store.curve("25"), Some(point(1000.0).as_slice()));
    }

    #[test]
    fn rename_onto_existing_label_changes_nothing() {
        let mut store = DatasetStore::new();
        store.put(dataset("A", &E7_30));
        store.put(dataset("B", &E7_30));
        store.set_curve("A", point(1.0));
        store.set_curve("B", point(2.0));

        let err = store.rename("A", "B").unwrap_err();
        assert!(matches!(err, LabError::RenameConflict { .. }));
        assert_eq!(labels(&store), vec!["A", "B"]);
        assert_eq!(store.curve("A"), Some(point(1.0).as_slice()));
        assert_eq!(store.curve("B"), Some(point(2.0).as_slice()));
    }

    #[test]
    fn rename_to_same_label_is_a_conflict() {
        let mut store = DatasetStore::new();
        store.put(dataset("A", &E7_30));
        assert!(matches!(
            store.rename("A", "A"),
            Err(LabError::RenameConflict { .. })
        ));
    }

    #[test]
    fn rename_unknown_or_blank_is_refused() {
        let mut store = DatasetStore::new();
        store.put(dataset("A", &E7_30));
        assert!(matches!(store.rename("Z", "B"), Err(LabError::UnknownLabel(_))));
        assert!(matches!(store.rename("A", "  "), Err(LabError::InvalidLabel(_))));
        assert_eq!(labels(&store), vec!["A"]);
    }

    #[test]
    fn curves_only_attach_to_known_labels() {
        let mut store = DatasetStore::new();
        store.set_curve("ghost", point(1.0));
        assert!(store.curve("ghost").is_none());
    }
}
