//! View/controller: the eframe window and its modal dialogs.

pub mod app;
pub mod dialogs;

pub use app::CodegenApp;
pub use dialogs::{Dialog, DialogKind};
