//! Library maintenance callbacks.
//!
//! Handles: add, delete current, remove all, and the edit-all panel.

use super::{confirm, sync_view, SharedComposer, SharedStore};
use crate::state::Annotation;
use crate::{AppWindow, EditEntry};
use slint::ComponentHandle;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

/// Sets up all library-related callbacks on the UI.
pub fn setup_library_callbacks(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    columns: usize,
) {
    // Edits made in the panel, applied together on save
    let pending: Rc<RefCell<Vec<Annotation>>> = Rc::new(RefCell::new(Vec::new()));

    setup_add_annotation(ui, store.clone(), composer.clone(), columns);
    setup_delete_current(ui, store.clone(), composer.clone(), columns);
    setup_remove_all(ui, store.clone(), composer.clone(), columns);
    setup_open_editor(ui, store.clone(), pending.clone());
    setup_entry_edited(ui, pending.clone());
    setup_save_edits(ui, store, composer, pending, columns);
}

fn setup_add_annotation(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_add_annotation(move |name, text| {
        let Some(ui) = ui_weak.upgrade() else { return };
        let result = store.borrow_mut().add(&name, &text);
        match result {
            Ok(()) => {
                ui.set_new_name(Default::default());
                ui.set_new_text(Default::default());
                ui.set_show_add_panel(false);
                sync_view(&ui, &store.borrow(), &composer.borrow(), columns);
                ui.set_status_text(format!("Added '{}'", name.trim()).into());
            }
            Err(e) => ui.set_status_text(e.to_string().into()),
        }
    });
}

fn setup_delete_current(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_delete_current(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let current = composer.borrow().current().map(str::to_owned);
        let Some(name) = current else {
            ui.set_status_text("Please select an annotation to delete.".into());
            return;
        };

        let question = format!("Are you sure you want to delete the annotation '{name}'?");
        if !confirm("Confirm Deletion", &question) {
            return;
        }

        let result = store.borrow_mut().remove(&name);
        match result {
            Ok(_) => {
                composer.borrow_mut().clear();
                ui.set_status_text(format!("Deleted '{name}'").into());
            }
            Err(e) => ui.set_status_text(e.to_string().into()),
        }
        sync_view(&ui, &store.borrow(), &composer.borrow(), columns);
    });
}

fn setup_remove_all(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_remove_all(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        if !confirm(
            "Confirm Removal",
            "Are you sure you want to remove all annotations?",
        ) {
            return;
        }

        let removed = store.borrow().len();
        store.borrow_mut().clear();
        composer.borrow_mut().clear();
        sync_view(&ui, &store.borrow(), &composer.borrow(), columns);
        info!(removed, "all annotations removed");
        ui.set_status_text(format!("Removed {removed} annotations").into());
    });
}

fn setup_open_editor(ui: &AppWindow, store: SharedStore, pending: Rc<RefCell<Vec<Annotation>>>) {
    let ui_weak = ui.as_weak();
    ui.on_open_editor(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let entries = store.borrow().export_all();
        if entries.is_empty() {
            ui.set_status_text("There are no annotations to edit.".into());
            return;
        }

        let rows: Vec<EditEntry> = entries
            .iter()
            .map(|a| EditEntry {
                name: a.name.as_str().into(),
                text: a.text.as_str().into(),
            })
            .collect();
        *pending.borrow_mut() = entries;
        ui.set_edit_entries(slint::ModelRc::new(slint::VecModel::from(rows)));
        ui.set_show_editor(true);
    });
}

fn setup_entry_edited(ui: &AppWindow, pending: Rc<RefCell<Vec<Annotation>>>) {
    ui.on_entry_edited(move |index, text| {
        let Ok(index) = usize::try_from(index) else { return };
        if let Some(entry) = pending.borrow_mut().get_mut(index) {
            entry.text = text.to_string();
        }
    });
}

fn setup_save_edits(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    pending: Rc<RefCell<Vec<Annotation>>>,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_save_edits(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let edits = pending.borrow().clone();
        let result = store.borrow_mut().apply_edits(&edits);
        match result {
            Ok(changed) => {
                ui.set_show_editor(false);
                sync_view(&ui, &store.borrow(), &composer.borrow(), columns);
                ui.set_status_text(
                    format!("All annotations have been updated ({changed} changed).").into(),
                );
            }
            Err(e) => ui.set_status_text(e.to_string().into()),
        }
    });
}
