//! Blocking modal dialogs.
//!
//! egui has no native message box, so modals are centered windows drawn
//! on top of the main panels. While one is open the app disables every
//! other control, which gives the same acknowledge-before-continuing
//! behavior as a native modal.

use eframe::egui;

/// Dialog severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    /// Recoverable; the application continues after acknowledgment.
    Warning,
    /// Fatal; acknowledging it closes the application.
    Fatal,
}

/// One pending modal dialog.
#[derive(Debug, Clone)]
pub struct Dialog {
    pub title: String,
    pub message: String,
    pub kind: DialogKind,
}

impl Dialog {
    pub fn warning(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            kind: DialogKind::Warning,
        }
    }

    pub fn fatal(title: &str, message: impl Into<String>) -> Self {
        Self {
            title: title.to_string(),
            message: message.into(),
            kind: DialogKind::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.kind == DialogKind::Fatal
    }
}

/// Draw the dialog. Returns true once the user acknowledges it.
pub fn show(ctx: &egui::Context, dialog: &Dialog) -> bool {
    let mut acknowledged = false;
    egui::Window::new(dialog.title.as_str())
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.set_max_width(360.0);
            ui.label(&dialog.message);
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    acknowledged = true;
                }
            });
        });
    acknowledged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_is_not_fatal() {
        let dialog = Dialog::warning("Input Error", "The prompt box cannot be empty.");
        assert!(!dialog.is_fatal());
        assert_eq!(dialog.title, "Input Error");
    }

    #[test]
    fn fatal_is_fatal() {
        let dialog = Dialog::fatal("Fatal Error", "Model file not found!");
        assert!(dialog.is_fatal());
    }
}
