//! File operation callbacks.
//!
//! Handles: workbook import/export, loading the library at startup, and
//! saving it when the window closes.

use super::{confirm, sync_view, SharedComposer, SharedConfig, SharedStore};
use crate::config::{add_recent_file, save_config, AppConfig};
use crate::error::StoreResult;
use crate::sheet::{SheetCodec, XlsxSheet};
use crate::state::{AnnotationStore, ConflictChoice};
use crate::AppWindow;
use slint::ComponentHandle;
use std::path::Path;
use tracing::{error, info, warn};

const WORKBOOK_FILTER: (&str, &[&str]) = ("Excel files", &["xlsx"]);

/// Sets up all file operation callbacks on the UI.
pub fn setup_file_callbacks(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    config: SharedConfig,
    columns: usize,
) {
    setup_import_annotations(ui, store.clone(), composer, config.clone(), columns);
    setup_export_annotations(ui, store, config);
}

fn setup_import_annotations(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    config: SharedConfig,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_import_annotations(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(WORKBOOK_FILTER.0, WORKBOOK_FILTER.1)
            .set_title("Import Annotations")
            .pick_file()
        else {
            return;
        };

        let rows = match XlsxSheet.read(&path) {
            Ok(rows) => rows,
            Err(e) => {
                error!("import failed: {e}");
                ui.set_status_text(format!("Import failed: {e}").into());
                return;
            }
        };

        // Conflict prompts are modal; stage on a copy so no borrow is held
        // while the dialog runs.
        let mut staged = store.borrow().clone();
        let report = staged.import_from(rows, |name| {
            let question = format!("Annotation '{name}' already exists. Overwrite?");
            if confirm("Overwrite?", &question) {
                ConflictChoice::Overwrite
            } else {
                ConflictChoice::Skip
            }
        });
        *store.borrow_mut() = staged;

        record_recent(&config, &path);
        sync_view(&ui, &store.borrow(), &composer.borrow(), columns);
        let mut status = format!("Imported {}: {report}", path.display());
        if let Some(first) = report.rejected.first() {
            status.push_str(&format!(
                " (entry {} '{}': {})",
                first.entry, first.name, first.reason
            ));
        }
        ui.set_status_text(status.into());
    });
}

fn setup_export_annotations(ui: &AppWindow, store: SharedStore, config: SharedConfig) {
    let ui_weak = ui.as_weak();
    ui.on_export_annotations(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(WORKBOOK_FILTER.0, WORKBOOK_FILTER.1)
            .set_title("Export Annotations")
            .set_file_name("annotations.xlsx")
            .save_file()
        else {
            return;
        };

        let result = store.borrow().export_to(&XlsxSheet, &path);
        match result {
            Ok(count) => {
                record_recent(&config, &path);
                ui.set_status_text(
                    format!("Exported {count} annotations to {}", path.display()).into(),
                );
            }
            Err(e) => {
                error!("export failed: {e}");
                ui.set_status_text(format!("Failed to export annotations: {e}").into());
            }
        }
    });
}

fn record_recent(config: &SharedConfig, path: &Path) {
    let mut config = config.borrow_mut();
    add_recent_file(&mut config, path.display().to_string());
    if let Err(e) = save_config(&config) {
        warn!("failed to save config: {e}");
    }
}

/// Load the library workbook named in the config.
pub fn load_library(store: &mut AnnotationStore, config: &AppConfig) -> StoreResult<usize> {
    store.load_from(&XlsxSheet, &config.storage.annotation_path())
}

/// Persist the library on exit when autosave is enabled.
pub fn save_on_exit(store: &AnnotationStore, config: &AppConfig) {
    if !config.storage.autosave_on_exit {
        info!("autosave disabled, leaving library file untouched");
        return;
    }
    let path = config.storage.annotation_path();
    if let Err(e) = store.save_to(&XlsxSheet, &path) {
        error!("failed to save annotations: {e}");
    }
}
