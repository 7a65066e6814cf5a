//! Composition of the visible display text from active annotations.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// How selecting an annotation affects the display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Selecting an annotation replaces whatever was shown.
    #[default]
    Replace,
    /// Selected annotations stack up in the order they were pressed.
    Accumulate,
}

impl DisplayMode {
    pub fn label(self) -> &'static str {
        match self {
            DisplayMode::Replace => "Replace",
            DisplayMode::Accumulate => "Accumulate",
        }
    }
}

/// An active annotation together with the text it put on the display.
#[derive(Debug, Clone)]
struct Contribution {
    name: String,
    text: String,
}

/// Owns the visible text and which annotations currently feed it.
///
/// The text stays freely editable through [`set_visible_text`](Self::set_visible_text);
/// composition works on whatever text is there and never restores edits.
#[derive(Debug, Clone, Default)]
pub struct DisplayComposer {
    mode: DisplayMode,
    // activation order
    contributions: Vec<Contribution>,
    active: HashSet<String>,
    visible_text: String,
    current: Option<String>,
}

impl DisplayComposer {
    pub fn new(mode: DisplayMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn visible_text(&self) -> &str {
        &self.visible_text
    }

    /// Number of characters on display.
    pub fn char_count(&self) -> usize {
        self.visible_text.chars().count()
    }

    pub fn is_active(&self, name: &str) -> bool {
        self.active.contains(name)
    }

    /// Active names in the order they were activated.
    pub fn active_names(&self) -> impl Iterator<Item = &str> {
        self.contributions.iter().map(|c| c.name.as_str())
    }

    /// The most recently shown annotation, if it is still on display.
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Show an annotation. Returns `false` when nothing changed.
    pub fn activate(&mut self, name: &str, text: &str) -> bool {
        match self.mode {
            DisplayMode::Replace => {
                self.reset();
                self.visible_text = text.to_string();
            }
            DisplayMode::Accumulate => {
                if self.active.contains(name) {
                    return false;
                }
                if !self.visible_text.is_empty() {
                    self.visible_text.push('\n');
                }
                self.visible_text.push_str(text);
            }
        }
        self.active.insert(name.to_string());
        self.contributions.push(Contribution {
            name: name.to_string(),
            text: text.to_string(),
        });
        self.current = Some(name.to_string());
        debug!(%name, mode = self.mode.label(), "annotation activated");
        true
    }

    /// Take an annotation off the display. Returns `false` if it was not active.
    ///
    /// In accumulate mode only the first literal occurrence of the text it
    /// contributed is cut out, so an identical substring belonging to another
    /// annotation may be the one removed.
    pub fn deactivate(&mut self, name: &str) -> bool {
        if !self.active.contains(name) {
            return false;
        }
        match self.mode {
            DisplayMode::Replace => self.reset(),
            DisplayMode::Accumulate => {
                self.active.remove(name);
                let Some(idx) = self.contributions.iter().position(|c| c.name == name) else {
                    return true;
                };
                let removed = self.contributions.remove(idx);
                if let Some(start) = self.visible_text.find(&removed.text) {
                    self.visible_text
                        .replace_range(start..start + removed.text.len(), "");
                    self.visible_text = self.visible_text.trim().to_string();
                }
                if self.current.as_deref() == Some(name) {
                    self.current = None;
                }
            }
        }
        debug!(%name, mode = self.mode.label(), "annotation deactivated");
        true
    }

    /// Take the most recently shown annotation off the display.
    #[allow(dead_code)]
    pub fn deactivate_current(&mut self) -> bool {
        match self.current.clone() {
            Some(name) => self.deactivate(&name),
            None => false,
        }
    }

    /// Switch modes. The display never carries over.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
        self.reset();
    }

    pub fn clear(&mut self) {
        self.reset();
    }

    /// Record a free edit made by the user.
    pub fn set_visible_text(&mut self, text: &str) {
        self.visible_text = text.to_string();
    }

    /// Text worth putting on the clipboard, if any.
    pub fn copyable_text(&self) -> Option<&str> {
        let text = self.visible_text.trim();
        (!text.is_empty()).then_some(text)
    }

    fn reset(&mut self) {
        self.contributions.clear();
        self.active.clear();
        self.visible_text.clear();
        self.current = None;
    }
}
