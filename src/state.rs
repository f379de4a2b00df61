use std::path::{Path, PathBuf};

use crate::data::aggregate::aggregate;
use crate::data::device::DeviceSchema;
use crate::data::export::export_all;
use crate::data::loader::load_file;
use crate::data::model::{ChartQuantity, Dataset, FrequencySeries};
use crate::data::permittivity::{compute_all, Geometry};
use crate::data::store::DatasetStore;
use crate::error::LabError;
use crate::settings::Settings;

// ---------------------------------------------------------------------------
// Notifications shown in the status area
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

/// Which table the central panel shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Tab {
    Dataset(String),
    Frequency(usize),
}

/// An in-progress inline tab rename.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameEdit {
    pub label: String,
    pub text: String,
}

/// The project-name prompt shown after picking an export folder.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportPrompt {
    pub base: PathBuf,
    pub name: String,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering. Every user action goes
/// through a method here, which calls into the core and records notices.
pub struct AppState {
    pub settings: Settings,
    pub store: DatasetStore,

    /// Instrument whose tables are visible.
    pub device: &'static DeviceSchema,

    /// Geometry text inputs, in millimetres.
    pub thickness_input: String,
    pub diameter_input: String,

    /// Frequency series from the last aggregation.
    pub series: Vec<FrequencySeries>,

    pub active_tab: Option<Tab>,
    pub chart_quantity: ChartQuantity,
    pub renaming: Option<RenameEdit>,
    pub export_prompt: Option<ExportPrompt>,

    /// Newest last.
    pub notices: Vec<Notice>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            device: settings.instrument(),
            thickness_input: settings.thickness_mm.clone(),
            diameter_input: settings.diameter_mm.clone(),
            chart_quantity: settings.chart_quantity,
            settings,
            store: DatasetStore::new(),
            series: Vec::new(),
            active_tab: None,
            renaming: None,
            export_prompt: None,
            notices: Vec::new(),
        }
    }

    /// Tables of the selected instrument, in load order.
    pub fn visible(&self) -> Vec<&Dataset> {
        self.store.active_view(self.device)
    }

    pub fn active_dataset(&self) -> Option<&Dataset> {
        match &self.active_tab {
            Some(Tab::Dataset(label)) => self
                .store
                .get(label)
                .filter(|d| d.device == self.device),
            _ => None,
        }
    }

    pub fn active_series(&self) -> Option<&FrequencySeries> {
        match self.active_tab {
            Some(Tab::Frequency(i)) => self.series.get(i),
            _ => None,
        }
    }

    // -- notices --

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(Level::Info, message.into());
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.push(Level::Warning, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    fn push(&mut self, level: Level, message: String) {
        self.notices.push(Notice { level, message });
    }

    pub fn clear_notices(&mut self) {
        self.notices.clear();
    }

    // -- actions --

    /// Load every file; files that fail are reported and skipped.
    pub fn load_files(&mut self, paths: &[PathBuf]) {
        for path in paths {
            match load_file(path) {
                Ok(parsed) => {
                    let label = parsed.dataset.label().to_string();
                    let visible = parsed.dataset.device == self.device;
                    if parsed.dropped_rows > 0 {
                        self.warn(format!(
                            "'{label}': {} malformed rows skipped",
                            parsed.dropped_rows
                        ));
                    }
                    self.store.put(parsed.dataset);
                    if visible {
                        self.active_tab = Some(Tab::Dataset(label));
                    }
                }
                Err(e) => {
                    log::warn!("Failed to load {}: {e:#}", path.display());
                    match e.downcast_ref::<LabError>() {
                        Some(lab @ LabError::SchemaMismatch { .. }) => self.warn(lab.to_string()),
                        _ => self.error(format!("{e:#}")),
                    }
                }
            }
        }
    }

    /// Switch the visible instrument. Loaded tables of other instruments stay
    /// in the store.
    pub fn select_device(&mut self, device: &'static DeviceSchema) {
        if self.device == device {
            return;
        }
        self.device = device;
        self.renaming = None;
        let first = self
            .visible()
            .first()
            .map(|d| Tab::Dataset(d.label().to_string()));
        self.active_tab = first;
    }

    pub fn begin_rename(&mut self, label: &str) {
        self.renaming = Some(RenameEdit {
            label: label.to_string(),
            text: label.to_string(),
        });
    }

    pub fn cancel_rename(&mut self) {
        self.renaming = None;
    }

    /// Apply the pending inline rename, if any.
    pub fn confirm_rename(&mut self) {
        if let Some(edit) = self.renaming.take() {
            self.rename(&edit.label, &edit.text);
        }
    }

    /// Rename a table everywhere. Returns whether the rename happened.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        let new = new.trim();
        if new == old {
            return false;
        }
        match self.store.rename(old, new) {
            Ok(()) => {
                if self.active_tab == Some(Tab::Dataset(old.to_string())) {
                    self.active_tab = Some(Tab::Dataset(new.to_string()));
                }
                true
            }
            Err(e) => {
                self.warn(e.to_string());
                false
            }
        }
    }

    /// Compute ε, ε′ and ε″ for every visible table.
    pub fn calculate(&mut self) {
        let geometry = match Geometry::parse(&self.thickness_input, &self.diameter_input) {
            Ok(g) => g,
            Err(e) => {
                self.warn(e.to_string());
                return;
            }
        };
        let report = compute_all(&mut self.store, self.device, &geometry);
        for warning in &report.warnings {
            self.warn(warning.to_string());
        }
        if !report.computed.is_empty() {
            self.info(format!(
                "ε, ε′ and ε″ added to {} tables",
                report.computed.len()
            ));
        }
    }

    /// Rebuild the frequency series from the visible tables.
    pub fn aggregate(&mut self) {
        let result = aggregate(self.store.active_view(self.device));
        for warning in &result.warnings {
            self.warn(warning.to_string());
        }
        self.series = result.series;
        if matches!(self.active_tab, Some(Tab::Frequency(_))) {
            self.active_tab = None;
        }
        self.info(format!(
            "Temperature dependences built for {} frequencies",
            self.series.len()
        ));
    }

    pub fn begin_export(&mut self, base: PathBuf) {
        self.export_prompt = Some(ExportPrompt {
            base,
            name: String::new(),
        });
    }

    /// Finish the export prompt. An empty project name aborts with no effect.
    pub fn confirm_export(&mut self) {
        let Some(prompt) = self.export_prompt.take() else {
            return;
        };
        let name = prompt.name.trim();
        if name.is_empty() {
            return;
        }
        self.export_to(&prompt.base.join(name));
    }

    /// Write the visible tables and the frequency series under `root`.
    pub fn export_to(&mut self, root: &Path) {
        let layout = self.settings.export_layout();
        let result = export_all(root, &layout, self.store.active_view(self.device), &self.series);
        match result {
            Ok(report) => self.info(format!(
                "{} tables saved to {}",
                report.written.len(),
                report.root.display()
            )),
            Err(e) => {
                log::error!("Export failed: {e:#}");
                self.error(format!("Export failed: {e:#}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::device::{E7_30, VECTOR};

    fn write_export(dir: &Path, name: &str, rows: &[(&str, &str, &str)]) -> PathBuf {
        let mut text = E7_30.column_headers.join("\t");
        for (f, c, d) in rows {
            let mut cells = vec!["0"; 12];
            cells[0] = *f;
            cells[1] = *c;
            cells[8] = *d;
            text.push('\n');
            text.push_str(&cells.join("\t"));
        }
        let path = dir.join(name);
        std::fs::write(&path, text).unwrap();
        path
    }

    fn loaded() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write_export(dir.path(), "run___20___a.txt", &[("1000", "1E-10", "0.02")]),
            write_export(dir.path(), "run___40___a.txt", &[("1000", "2E-10", "0.03")]),
        ];
        let mut state = AppState::default();
        state.thickness_input = "1".into();
        state.diameter_input = "10".into();
        state.load_files(&paths);
        (dir, state)
    }

    #[test]
    fn load_calculate_aggregate_export() {
        let (dir, mut state) = loaded();
        assert_eq!(state.visible().len(), 2);

        state.calculate();
        state.aggregate();
        assert_eq!(state.series.len(), 1);
        assert_eq!(state.series[0].chart_points(ChartQuantity::Tg), vec![[20.0, 0.02], [40.0, 0.03]]);

        state.begin_export(dir.path().to_path_buf());
        state.export_prompt.as_mut().unwrap().name = "proj".into();
        state.confirm_export();
        let root = dir.path().join("proj");
        assert!(root.join("Temperature/20.txt").is_file());
        assert!(root.join("Frequency dependences/1000 Hz.txt").is_file());
        assert_eq!(state.notices.last().unwrap().level, Level::Info);
    }

    #[test]
    fn mismatched_file_is_reported_and_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.txt");
        std::fs::write(&path, "a\tb\n1\t2\n").unwrap();
        let mut state = AppState::default();
        state.load_files(&[path]);
        assert!(state.store.is_empty());
        assert_eq!(state.notices[0].level, Level::Warning);
    }

    #[test]
    fn switching_instrument_hides_but_keeps_tables() {
        let (_dir, mut state) = loaded();
        state.select_device(&VECTOR);
        assert!(state.visible().is_empty());
        assert_eq!(state.store.len(), 2);
        state.select_device(&E7_30);
        assert_eq!(state.visible().len(), 2);
    }

    #[test]
    fn rename_follows_active_tab_and_refuses_conflicts() {
        let (_dir, mut state) = loaded();
        state.calculate();
        state.active_tab = Some(Tab::Dataset("20".into()));

        assert!(state.rename("20", "25"));
        assert_eq!(state.active_tab, Some(Tab::Dataset("25".into())));
        assert!(state.store.curve("25").is_some());

        assert!(!state.rename("25", "40"));
        assert!(state.store.contains("25"));
        assert!(state.store.curve("25").is_some());
        assert_eq!(state.notices.last().unwrap().level, Level::Warning);
    }

    #[test]
    fn invalid_geometry_changes_nothing() {
        let (_dir, mut state) = loaded();
        state.thickness_input = "abc".into();
        state.calculate();
        assert!(state.visible().iter().all(|d| d.derived().is_none()));
        assert_eq!(state.notices.last().unwrap().level, Level::Warning);
    }

    #[test]
    fn blank_project_name_aborts_export() {
        let (dir, mut state) = loaded();
        state.begin_export(dir.path().to_path_buf());
        state.confirm_export();
        assert!(state.export_prompt.is_none());
        assert!(!dir.path().join("Temperature").exists());
    }
}
