//! Callback handlers for the annotation app.
//!
//! This module contains all UI callback implementations organized by functionality:
//! - `display` - grid selection, remove gesture, mode switch, clear, copy, free edits
//! - `library` - add, delete current, remove all, edit all
//! - `file_ops` - workbook import/export, startup load and save on exit
//!
//! Every handler mutates the store and composer first and then re-projects
//! both onto the window with [`sync_view`]; the window is never read back to
//! find out what is selected.

pub mod display;
pub mod file_ops;
pub mod library;

use crate::clipboard::ClipboardSink;
use crate::config::AppConfig;
use crate::state::{grid_rows, layout_grid, AnnotationStore, DisplayComposer, DisplayMode};
use crate::{AppWindow, GridButton};
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedStore = Rc<RefCell<AnnotationStore>>;
pub type SharedComposer = Rc<RefCell<DisplayComposer>>;
pub type SharedConfig = Rc<RefCell<AppConfig>>;

/// Sets up every callback group on the UI.
pub fn setup_callbacks(
    ui: &AppWindow,
    store: SharedStore,
    composer: SharedComposer,
    config: SharedConfig,
) {
    let columns = config.borrow().display.columns();
    let clipboard = Rc::new(RefCell::new(ClipboardSink::new()));

    display::setup_display_callbacks(ui, store.clone(), composer.clone(), clipboard, columns);
    library::setup_library_callbacks(ui, store.clone(), composer.clone(), columns);
    file_ops::setup_file_callbacks(ui, store, composer, config, columns);
}

/// Push store and composer state into the window.
pub fn sync_view(
    ui: &AppWindow,
    store: &AnnotationStore,
    composer: &DisplayComposer,
    columns: usize,
) {
    let cells = layout_grid(store.list(), columns, |name| composer.is_active(name));
    let rows = grid_rows(cells.len(), columns);
    let buttons: Vec<GridButton> = cells
        .into_iter()
        .map(|cell| GridButton {
            name: cell.name.into(),
            row: cell.row as i32,
            col: cell.col as i32,
            active: cell.active,
        })
        .collect();

    ui.set_buttons(slint::ModelRc::new(slint::VecModel::from(buttons)));
    ui.set_grid_columns(columns.max(1) as i32);
    ui.set_grid_rows(rows as i32);
    ui.set_display_text(composer.visible_text().into());
    ui.set_char_count(composer.char_count() as i32);
    ui.set_accumulative(composer.mode() == DisplayMode::Accumulate);
    ui.set_mode_label(composer.mode().label().into());
}

/// Blocking yes/no question. Anything but an explicit "Yes" counts as no.
pub(crate) fn confirm(title: &str, description: &str) -> bool {
    let answer = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Warning)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::YesNo)
        .show();
    matches!(answer, rfd::MessageDialogResult::Yes)
}
