//! cgen: offline C code generator.
//!
//! A desktop application that turns a natural-language request into a C
//! program using a locally loaded CodeLlama GGUF model. The window stays
//! responsive by running the model load and every generation request on
//! its own background thread; results come back to the UI thread through
//! an event channel drained each frame.

pub mod config;
pub mod inference;
pub mod save;
pub mod state;
pub mod task;
pub mod ui;
