//! Display callbacks.
//!
//! Handles: grid selection, the remove gesture, mode switch, clear, copy, and
//! free edits of the display text.

use super::{sync_view, SharedComposer, SharedStore};
use crate::clipboard::ClipboardSink;
use crate::state::DisplayMode;
use crate::AppWindow;
use slint::ComponentHandle;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::warn;

/// Sets up all display-related callbacks on the UI.
pub fn setup_display_callbacks(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    clipboard: Rc<RefCell<ClipboardSink>>,
    columns: usize,
) {
    setup_select_annotation(ui, store.clone(), composer.clone(), columns);
    setup_remove_annotation(ui, store.clone(), composer.clone(), columns);
    setup_mode_toggled(ui, store.clone(), composer.clone(), columns);
    setup_clear_display(ui, store, composer.clone(), columns);
    setup_display_edited(ui, composer.clone());
    setup_copy_display(ui, composer, clipboard);
}

fn setup_select_annotation(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_select_annotation(move |name| {
        let Some(ui) = ui_weak.upgrade() else { return };
        let store = store.borrow();
        let Some(text) = store.get(&name) else {
            warn!(%name, "selected annotation is no longer in the store");
            return;
        };
        composer.borrow_mut().activate(&name, text);
        sync_view(&ui, &store, &composer.borrow(), columns);
    });
}

// Secondary gesture on a grid button: retract from view, then delete.
fn setup_remove_annotation(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_remove_annotation(move |name| {
        let Some(ui) = ui_weak.upgrade() else { return };
        composer.borrow_mut().deactivate(&name);
        let result = store.borrow_mut().remove(&name);
        sync_view(&ui, &store.borrow(), &composer.borrow(), columns);
        match result {
            Ok(_) => ui.set_status_text(format!("Removed '{name}'").into()),
            Err(e) => ui.set_status_text(e.to_string().into()),
        }
    });
}

fn setup_mode_toggled(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_mode_toggled(move |accumulate| {
        let Some(ui) = ui_weak.upgrade() else { return };
        let mode = if accumulate {
            DisplayMode::Accumulate
        } else {
            DisplayMode::Replace
        };
        composer.borrow_mut().set_mode(mode);
        sync_view(&ui, &store.borrow(), &composer.borrow(), columns);
        ui.set_status_text(format!("{} mode", mode.label()).into());
    });
}

fn setup_clear_display(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    columns: usize,
) {
    let ui_weak = ui.as_weak();
    ui.on_clear_display(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        composer.borrow_mut().clear();
        sync_view(&ui, &store.borrow(), &composer.borrow(), columns);
    });
}

// Only the composer and the counter change here; re-syncing the text would
// move the cursor under the user.
fn setup_display_edited(ui: &AppWindow, composer: SharedComposer) {
    let ui_weak = ui.as_weak();
    ui.on_display_edited(move |text| {
        let Some(ui) = ui_weak.upgrade() else { return };
        let mut composer = composer.borrow_mut();
        composer.set_visible_text(&text);
        ui.set_char_count(composer.char_count() as i32);
    });
}

fn setup_copy_display(
    ui: &AppWindow,
    composer: SharedComposer,
    clipboard: Rc<RefCell<ClipboardSink>>,
) {
    let ui_weak = ui.as_weak();
    ui.on_copy_display(move || {
        let Some(ui) = ui_weak.upgrade() else { return };
        let Some(text) = composer.borrow().copyable_text().map(str::to_owned) else {
            ui.set_status_text("Nothing to copy".into());
            return;
        };
        match clipboard.borrow_mut().copy(&text) {
            Ok(()) => {
                ui.set_status_text(format!("Copied {} characters", text.chars().count()).into())
            }
            Err(e) => {
                warn!("clipboard copy failed: {e}");
                ui.set_status_text(format!("Copy failed: {e}").into());
            }
        }
    });
}
