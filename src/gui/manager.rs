//! Settings window implemented with egui/eframe
//!
//! Owns the preset store and the overlay daemon child process. Every edit is
//! pushed to the daemon over IPC immediately; presets are only written to
//! disk on an explicit save.

use std::process::{Child, Command};
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use eframe::{CreationContext, NativeOptions, egui};
use tracing::{error, info, warn};

use crate::config::{ConfigStore, CrosshairConfig, Placement, StoreError};
use crate::constants::config::DEFAULT_PRESET;
use crate::ipc::{OverlayClient, OverlayRequest, OverlayResponse};
use crate::types::Position;

use super::components::crosshair_settings;
use super::components::preset_selector::{PresetAction, PresetSelector};
use super::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DaemonStatus {
    Starting,
    Running,
    Stopped,
    Crashed(Option<i32>),
}

impl DaemonStatus {
    fn color(&self) -> egui::Color32 {
        match self {
            DaemonStatus::Running => STATUS_RUNNING,
            DaemonStatus::Starting => STATUS_STARTING,
            _ => STATUS_STOPPED,
        }
    }

    fn label(&self) -> String {
        match self {
            DaemonStatus::Running => "\u{25CF}  Running".to_string(),
            DaemonStatus::Starting => "\u{25CF}  Starting...".to_string(),
            DaemonStatus::Stopped => "\u{25CF}  Stopped".to_string(),
            DaemonStatus::Crashed(code) => match code {
                Some(code) => format!("\u{25CF}  Crashed (exit {code})"),
                None => "\u{25CF}  Crashed".to_string(),
            },
        }
    }
}

struct StatusMessage {
    text: String,
    color: egui::Color32,
}

struct SettingsApp {
    store: ConfigStore,
    config: CrosshairConfig,
    preset_names: Vec<String>,
    selected_preset: String,
    preset_selector: PresetSelector,
    store_dir_input: String,
    store_dir_error: Option<String>,

    daemon: Option<Child>,
    daemon_status: DaemonStatus,
    client: Option<OverlayClient>,
    last_health_check: Instant,
    status_message: Option<StatusMessage>,

    overlay_visible: bool,
    drag_mode: bool,
    /// Set when the daemon cannot create its surface (no compositor); the
    /// show control stays disabled until the daemon is restarted
    overlay_failed: bool,
}

impl SettingsApp {
    fn new(_cc: &CreationContext<'_>, store: ConfigStore) -> Self {
        info!(dir = %store.dir().display(), "Initializing settings window");

        let config = store.load(DEFAULT_PRESET);
        let preset_names = Self::preset_names_from(&store);
        let store_dir_input = store.dir().display().to_string();

        let mut app = Self {
            store,
            config,
            preset_names,
            selected_preset: DEFAULT_PRESET.to_string(),
            preset_selector: PresetSelector::new(),
            store_dir_input,
            store_dir_error: None,
            daemon: None,
            daemon_status: DaemonStatus::Stopped,
            client: None,
            last_health_check: Instant::now(),
            status_message: None,
            overlay_visible: false,
            drag_mode: false,
            overlay_failed: false,
        };

        if let Err(err) = app.start_daemon() {
            error!(error = ?err, "Failed to start overlay daemon");
            app.status_message = Some(StatusMessage {
                text: format!("Failed to start daemon: {err}"),
                color: STATUS_STOPPED,
            });
        }

        app
    }

    fn preset_names_from(store: &ConfigStore) -> Vec<String> {
        let mut names = store.list().unwrap_or_else(|err| {
            warn!(error = ?err, "Failed to enumerate presets");
            Vec::new()
        });
        // The default preset is always offered, persisted or not
        if !names.iter().any(|n| n == DEFAULT_PRESET) {
            names.insert(0, DEFAULT_PRESET.to_string());
        }
        names
    }

    fn start_daemon(&mut self) -> Result<()> {
        if self.daemon.is_some() {
            return Ok(());
        }

        let child = spawn_overlay_daemon()?;
        let pid = child.id();
        info!(pid, "Started overlay daemon");

        self.daemon = Some(child);
        self.daemon_status = DaemonStatus::Starting;
        self.status_message = Some(StatusMessage {
            text: format!("Overlay daemon starting (PID: {pid})"),
            color: STATUS_STARTING,
        });
        Ok(())
    }

    fn stop_daemon(&mut self) -> Result<()> {
        if let Some(mut child) = self.daemon.take() {
            info!(pid = child.id(), "Stopping overlay daemon");

            // Ask for a clean exit first; fall back to kill
            let clean = self
                .client
                .as_mut()
                .is_some_and(|client| client.request(OverlayRequest::Shutdown).is_ok());
            if !clean {
                let _ = child.kill();
            }

            let status = child.wait().context("Failed to wait for overlay daemon exit")?;
            self.client = None;
            self.overlay_visible = false;
            self.drag_mode = false;
            self.daemon_status = if status.success() {
                DaemonStatus::Stopped
            } else {
                DaemonStatus::Crashed(status.code())
            };
            self.status_message = Some(StatusMessage {
                text: "Overlay daemon stopped".to_string(),
                color: STATUS_STOPPED,
            });
        }
        Ok(())
    }

    fn restart_daemon(&mut self) {
        info!("Restart requested from UI");
        self.overlay_failed = false;
        if let Err(err) = self.stop_daemon().and_then(|_| self.start_daemon()) {
            error!(error = ?err, "Failed to restart daemon");
            self.status_message = Some(StatusMessage {
                text: format!("Restart failed: {err}"),
                color: STATUS_STOPPED,
            });
        }
    }

    fn poll_daemon(&mut self) {
        if self.last_health_check.elapsed() < Duration::from_millis(DAEMON_CHECK_INTERVAL_MS) {
            return;
        }
        self.last_health_check = Instant::now();

        if let Some(child) = self.daemon.as_mut() {
            match child.try_wait() {
                Ok(Some(status)) => {
                    warn!(pid = child.id(), exit = ?status.code(), "Overlay daemon exited");
                    self.daemon = None;
                    self.client = None;
                    self.overlay_visible = false;
                    self.drag_mode = false;
                    self.daemon_status = if status.success() {
                        DaemonStatus::Stopped
                    } else {
                        DaemonStatus::Crashed(status.code())
                    };
                    self.status_message = Some(StatusMessage {
                        text: "Overlay daemon exited".to_string(),
                        color: STATUS_STOPPED,
                    });
                }
                Ok(None) => {
                    if self.client.is_none() {
                        self.try_connect();
                    }
                }
                Err(err) => {
                    error!(error = ?err, "Failed to query daemon status");
                }
            }
        }
    }

    /// Connect to the daemon socket once it comes up, then push the working
    /// config and show the reticle.
    fn try_connect(&mut self) {
        match OverlayClient::connect() {
            Ok(client) => {
                info!("Connected to overlay daemon");
                self.client = Some(client);
                self.daemon_status = DaemonStatus::Running;
                self.status_message = Some(StatusMessage {
                    text: "Overlay daemon running".to_string(),
                    color: STATUS_RUNNING,
                });
                self.push_config();
                match self.request(OverlayRequest::Show) {
                    Some(OverlayResponse::Ack) => self.overlay_visible = true,
                    // Error reply means the daemon is up but cannot create
                    // its surface; report once and disable the control
                    None if self.client.is_some() => self.overlay_failed = true,
                    _ => {}
                }
            }
            Err(_) => {
                // Socket not up yet; retried on the next health check
            }
        }
    }

    /// Send a request, dropping the connection on transport errors.
    /// Returns None when no daemon is reachable or the request failed.
    fn request(&mut self, request: OverlayRequest) -> Option<OverlayResponse> {
        let client = self.client.as_mut()?;
        match client.request(request) {
            Ok(OverlayResponse::Error(message)) => {
                warn!(message = %message, "Overlay daemon rejected request");
                self.status_message = Some(StatusMessage {
                    text: format!("Overlay error: {message}"),
                    color: STATUS_STOPPED,
                });
                None
            }
            Ok(response) => Some(response),
            Err(err) => {
                warn!(error = ?err, "IPC request failed, dropping connection");
                self.client = None;
                self.status_message = Some(StatusMessage {
                    text: "Lost connection to overlay daemon".to_string(),
                    color: STATUS_STOPPED,
                });
                None
            }
        }
    }

    fn push_config(&mut self) {
        let config = self.config.clone();
        self.request(OverlayRequest::UpdateConfig(config));
    }

    fn toggle_overlay(&mut self) {
        let request = if self.overlay_visible {
            OverlayRequest::Hide
        } else {
            OverlayRequest::Show
        };
        match self.request(request) {
            Some(OverlayResponse::Ack) => self.overlay_visible = !self.overlay_visible,
            None if self.client.is_some() => self.overlay_failed = true,
            _ => {}
        }
    }

    fn toggle_drag_mode(&mut self) {
        if let Some(OverlayResponse::DragMode(dragging)) =
            self.request(OverlayRequest::ToggleDragMode)
        {
            self.drag_mode = dragging;
            if !dragging {
                // Leaving drag mode: adopt the dragged position so a later
                // save persists it
                if let Some(OverlayResponse::Position { x, y }) =
                    self.request(OverlayRequest::GetPosition)
                {
                    self.config.position = Placement::At(Position::new(x, y));
                }
            }
        }
    }

    fn center_reticle(&mut self) {
        self.config.position = Placement::Centered;
        self.request(OverlayRequest::Center);
    }

    fn apply_preset_action(&mut self, action: PresetAction) {
        match action {
            PresetAction::None => {}

            PresetAction::Switch(name) => {
                self.config = self.store.load(&name);
                self.selected_preset = name;
                self.push_config();
            }

            PresetAction::Save => {
                let name = self.selected_preset.clone();
                self.save_preset(&name);
            }

            PresetAction::Create(name) => {
                self.save_preset(&name);
                self.selected_preset = name;
                self.preset_names = Self::preset_names_from(&self.store);
            }

            PresetAction::Delete(name) => match self.store.delete(&name) {
                Ok(()) => {
                    self.preset_names = Self::preset_names_from(&self.store);
                    self.selected_preset = DEFAULT_PRESET.to_string();
                    self.config = self.store.load(DEFAULT_PRESET);
                    self.push_config();
                    self.status_message = Some(StatusMessage {
                        text: format!("Deleted preset '{name}'"),
                        color: STATUS_RUNNING,
                    });
                }
                Err(err) => {
                    error!(preset = %name, error = ?err, "Failed to delete preset");
                    self.status_message = Some(StatusMessage {
                        text: format!("Delete failed: {err}"),
                        color: STATUS_STOPPED,
                    });
                }
            },
        }
    }

    /// Point the store at the directory typed into the settings field.
    ///
    /// A rejected path leaves the active store untouched and shows the
    /// error inline; a successful switch reloads the preset list and the
    /// default preset from the new location.
    fn apply_store_directory(&mut self) {
        match switch_store_directory(&mut self.store, &self.store_dir_input) {
            Ok(()) => {
                self.store_dir_error = None;
                self.preset_names = Self::preset_names_from(&self.store);
                self.selected_preset = DEFAULT_PRESET.to_string();
                self.config = self.store.load(DEFAULT_PRESET);
                self.push_config();
            }
            Err(err) => {
                warn!(dir = %self.store_dir_input, error = ?err, "Rejected preset directory");
                self.store_dir_error = Some(err.to_string());
            }
        }
    }

    fn save_preset(&mut self, name: &str) {
        match self.store.save(name, &self.config) {
            Ok(()) => {
                self.status_message = Some(StatusMessage {
                    text: format!("Saved preset '{name}'"),
                    color: STATUS_RUNNING,
                });
            }
            Err(err) => {
                error!(preset = name, error = ?err, "Failed to save preset");
                self.status_message = Some(StatusMessage {
                    text: format!("Save failed: {err}"),
                    color: STATUS_STOPPED,
                });
            }
        }
    }
}

impl eframe::App for SettingsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_daemon();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(SECTION_SPACING);
            ui.heading("Reticle Settings");
            ui.add_space(SECTION_SPACING);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Overlay Status").strong());
                ui.colored_label(self.daemon_status.color(), self.daemon_status.label());
                if let Some(message) = &self.status_message {
                    ui.colored_label(message.color, &message.text);
                }
            });

            ui.add_space(ITEM_SPACING);

            ui.horizontal(|ui| {
                let connected = self.client.is_some() && !self.overlay_failed;
                let show_label = if self.overlay_visible { "Hide Overlay" } else { "Show Overlay" };
                if ui.add_enabled(connected, egui::Button::new(show_label)).clicked() {
                    self.toggle_overlay();
                }

                let drag_label = if self.drag_mode { "Lock Position" } else { "Move Crosshair" };
                if ui.add_enabled(connected, egui::Button::new(drag_label)).clicked() {
                    self.toggle_drag_mode();
                }

                if ui.add_enabled(connected, egui::Button::new("Center")).clicked() {
                    self.center_reticle();
                }

                if ui.button("\u{1F504} Restart").clicked() {
                    self.restart_daemon();
                }
            });

            if self.drag_mode {
                ui.colored_label(
                    STATUS_STARTING,
                    "Drag mode: click and drag the crosshair, then lock",
                );
            }

            ui.add_space(SECTION_SPACING);
            ui.separator();
            ui.add_space(SECTION_SPACING);

            let names = self.preset_names.clone();
            let action = self.preset_selector.ui(ui, &names, &mut self.selected_preset);
            self.apply_preset_action(action);

            ui.add_space(ITEM_SPACING);

            ui.group(|ui| {
                ui.label(egui::RichText::new("Preset Directory").strong());
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.store_dir_input)
                            .desired_width(260.0),
                    );
                    if ui.button("Apply").clicked() {
                        self.apply_store_directory();
                    }
                });
                if let Some(error) = &self.store_dir_error {
                    ui.colored_label(STATUS_STOPPED, error);
                }
            });

            ui.add_space(ITEM_SPACING);

            if crosshair_settings::ui(ui, &mut self.config) {
                self.config.validate_and_clamp();
                self.push_config();
            }
        });

        ctx.request_repaint_after(Duration::from_millis(DAEMON_CHECK_INTERVAL_MS));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(err) = self.stop_daemon() {
            error!(error = ?err, "Failed to stop daemon during shutdown");
        }
        info!("Settings window exiting");
    }
}

/// Validate and switch the preset directory from raw field input
fn switch_store_directory(store: &mut ConfigStore, input: &str) -> Result<(), StoreError> {
    store.set_directory(std::path::PathBuf::from(input.trim()))
}

fn spawn_overlay_daemon() -> Result<Child> {
    let exe_path = std::env::current_exe().context("Failed to resolve executable path")?;
    Command::new(exe_path)
        .arg("--overlay")
        .spawn()
        .context("Failed to spawn overlay daemon")
}

pub fn run_gui(store: ConfigStore) -> Result<()> {
    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
            .with_min_inner_size([WINDOW_MIN_WIDTH, WINDOW_MIN_HEIGHT])
            .with_title("Reticle Settings"),
        ..Default::default()
    };

    eframe::run_native(
        "Reticle Settings",
        options,
        Box::new(move |cc| Ok(Box::new(SettingsApp::new(cc, store)))),
    )
    .map_err(|err| anyhow!("Failed to launch settings window: {err}"))
}
