//! The main window: prompt input, output area, controls and status bar.
//!
//! All background work flows through one mpsc channel drained at the top
//! of every frame, so UI state is only ever mutated on the UI thread.
//! Control enablement is derived from `SessionState`; the disabled
//! trigger button is what guarantees a single generation in flight.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use tracing::{info, warn};

use crate::config::Config;
use crate::inference::Generator;
use crate::save;
use crate::state::SessionState;
use crate::task::{self, AppEvent};
use crate::ui::dialogs::{self, Dialog};

pub struct CodegenApp {
    config: Config,
    session: SessionState,
    generator: Option<Arc<Generator>>,
    prompt: String,
    output: String,
    status_line: String,
    dialog: Option<Dialog>,
    events: Receiver<AppEvent>,
    events_tx: Sender<AppEvent>,
}

impl CodegenApp {
    /// Create the app and kick off the one-shot model load in the
    /// background so the window appears immediately.
    pub fn new(config: Config) -> Self {
        let (events_tx, events) = mpsc::channel();
        let status_line = format!("Loading model: {}...", config.model.model_filename);

        let app = Self {
            config,
            session: SessionState::new(),
            generator: None,
            prompt: String::new(),
            output: String::new(),
            status_line,
            dialog: None,
            events,
            events_tx,
        };
        app.spawn_model_load();
        app
    }

    fn spawn_model_load(&self) {
        let config = self.config.clone();
        task::run(
            self.events_tx.clone(),
            move || match Generator::load(&config) {
                Ok(generator) => AppEvent::ModelLoaded(Arc::new(generator)),
                Err(e) => AppEvent::ModelFailed(e.user_message()),
            },
            |panic| {
                AppEvent::ModelFailed(format!(
                    "An error occurred while loading the AI model: {panic}"
                ))
            },
        );
    }

    /// Drain completed background work. This is the only state-merge
    /// point; every arm stays idempotent.
    fn poll_events(&mut self, ctx: &egui::Context) {
        let mut any = false;
        while let Ok(event) = self.events.try_recv() {
            any = true;
            match event {
                AppEvent::ModelLoaded(generator) => {
                    self.generator = Some(generator);
                    self.session.model_loaded();
                    self.status_line = "Model loaded successfully. Ready.".to_string();
                }
                AppEvent::ModelFailed(message) => {
                    warn!(%message, "Model load failed");
                    self.session.model_failed();
                    self.status_line = "Model failed to load.".to_string();
                    self.dialog = Some(Dialog::fatal("Model Loading Failed", message));
                }
                AppEvent::GenerationDone(text) => {
                    self.output = text;
                    self.session.generation_done();
                }
            }
        }
        if any {
            ctx.request_repaint();
        }
    }

    fn trigger_generation(&mut self) {
        let prompt = self.prompt.trim().to_string();
        if prompt.is_empty() {
            self.dialog = Some(Dialog::warning(
                "Input Error",
                "The prompt box cannot be empty.",
            ));
            return;
        }
        let Some(generator) = self.generator.clone() else {
            return;
        };
        if !self.session.begin_generation() {
            return;
        }

        info!(prompt_chars = prompt.len(), "Generation triggered");
        self.output = format!("{}\n\n", save::PLACEHOLDER);

        task::run(
            self.events_tx.clone(),
            move || {
                let text = match generator.generate(&prompt) {
                    Ok(code) => code,
                    Err(e) => format!("An error occurred during code generation: {e}"),
                };
                AppEvent::GenerationDone(text)
            },
            |panic| {
                AppEvent::GenerationDone(format!(
                    "An error occurred during code generation: {panic}"
                ))
            },
        );
    }

    fn save_output(&mut self) {
        if save::validate(&self.output).is_err() {
            self.dialog = Some(Dialog::warning("Save Error", "There is no code to save."));
            return;
        }

        let Some(path) = rfd::FileDialog::new()
            .add_filter("C Files", &["c"])
            .add_filter("All Files", &["*"])
            .set_file_name("generated.c")
            .save_file()
        else {
            return;
        };

        if let Err(e) = save::write_source(&path, &self.output) {
            self.dialog = Some(Dialog::warning(
                "Save Error",
                format!("Could not write the file: {e}"),
            ));
        }
    }
}

impl eframe::App for CodegenApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events(ctx);

        // Background events arrive without user input; keep polling while
        // a load or generation is in flight.
        if self.session.is_initializing() || self.session.is_running() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        let dialog_open = self.dialog.is_some();
        let controls_enabled = self.session.can_generate() && !dialog_open;

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.label(&self.status_line);
        });

        egui::TopBottomPanel::top("prompt_panel").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.label(egui::RichText::new("1. Enter C Program Request").strong());
            ui.add_enabled(
                controls_enabled,
                egui::TextEdit::multiline(&mut self.prompt)
                    .desired_rows(6)
                    .desired_width(f32::INFINITY)
                    .hint_text("e.g. write a function that adds two integers"),
            );
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(controls_enabled, egui::Button::new("Generate C Code"))
                    .clicked()
                {
                    self.trigger_generation();
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .add_enabled(!dialog_open, egui::Button::new("Save to .c file"))
                        .clicked()
                    {
                        self.save_output();
                    }
                });
            });
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.label(egui::RichText::new("2. Generated C Code").strong());
            egui::ScrollArea::vertical()
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_enabled(
                        false,
                        egui::TextEdit::multiline(&mut self.output)
                            .font(egui::TextStyle::Monospace)
                            .desired_rows(20)
                            .desired_width(f32::INFINITY),
                    );
                });
        });

        let acknowledged = match &self.dialog {
            Some(dialog) => dialogs::show(ctx, dialog),
            None => false,
        };
        if acknowledged {
            let fatal = self.dialog.take().map(|d| d.is_fatal()).unwrap_or(false);
            if fatal {
                info!("Fatal dialog acknowledged, shutting down");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        }
    }
}
