slint::include_modules!();

mod callbacks;
mod clipboard;
mod config;
mod error;
mod sheet;
mod state;

use state::{AnnotationStore, DisplayComposer};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn main() -> Result<(), slint::PlatformError> {
    init_tracing();

    let config = Rc::new(RefCell::new(config::load_config()));
    let ui = AppWindow::new()?;

    // The store and composer are owned here and handed to the callbacks;
    // nothing else holds annotation state.
    let store = Rc::new(RefCell::new(AnnotationStore::new()));
    let composer = Rc::new(RefCell::new(DisplayComposer::new(
        config.borrow().display.start_mode,
    )));

    let loaded = callbacks::file_ops::load_library(&mut store.borrow_mut(), &config.borrow());
    match loaded {
        Ok(count) => ui.set_status_text(format!("{count} annotations loaded").into()),
        Err(e) => {
            warn!("could not load annotation library: {e}");
            ui.set_status_text(format!("Load failed: {e}").into());
        }
    }

    callbacks::setup_callbacks(&ui, store.clone(), composer.clone(), config.clone());
    callbacks::sync_view(
        &ui,
        &store.borrow(),
        &composer.borrow(),
        config.borrow().display.columns(),
    );

    info!("starting annotation window");
    ui.run()?;

    callbacks::file_ops::save_on_exit(&store.borrow(), &config.borrow());
    Ok(())
}
