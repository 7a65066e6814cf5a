//! System clipboard access for the copy button.

use tracing::debug;

/// Lazily opened system clipboard.
///
/// The handle is kept for the life of the app; on X11 the copied text is
/// only served while the owning handle is alive.
#[derive(Default)]
pub struct ClipboardSink {
    clipboard: Option<arboard::Clipboard>,
}

impl ClipboardSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&mut self, text: &str) -> Result<(), arboard::Error> {
        let opened = match self.clipboard.take() {
            Some(clipboard) => clipboard,
            None => arboard::Clipboard::new()?,
        };
        let clipboard = self.clipboard.insert(opened);
        clipboard.set_text(text.to_string())?;
        debug!(chars = text.chars().count(), "copied display text");
        Ok(())
    }
}
