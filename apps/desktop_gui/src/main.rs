use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, Sender};
use eframe::egui;
use registration_core::{StatusSeverity, SubmissionState};
use shared::protocol::REGISTER_PATH;

mod backend_bridge;
mod controller;

use backend_bridge::commands::BackendCommand;
use backend_bridge::runtime::{spawn_backend_thread, DEFAULT_SERVER_URL};
use controller::events::UiEvent;
use controller::orchestration::dispatch_backend_command;

const SUBMITTING_STATUS_TEXT: &str = "Sending registration details to the server…";

struct RegistrationApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,

    username: String,
    email: String,

    submission: SubmissionState,
    success_banner: Option<String>,
    bridge_notice: Option<String>,

    attempted_auto_focus: bool,
}

impl RegistrationApp {
    fn new(cmd_tx: Sender<BackendCommand>, ui_rx: Receiver<UiEvent>) -> Self {
        Self {
            cmd_tx,
            ui_rx,
            username: String::new(),
            email: String::new(),
            submission: SubmissionState::Idle,
            success_banner: None,
            bridge_notice: None,
            attempted_auto_focus: false,
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::Submission(state) => {
                    if let SubmissionState::Succeeded { message } = &state {
                        // Mirror the controller: a confirmed registration
                        // clears both inputs and raises the success banner.
                        self.success_banner = Some(message.clone());
                        self.username.clear();
                        self.email.clear();
                    }
                    self.submission = state;
                }
                UiEvent::BackendFailed(message) => {
                    self.bridge_notice = Some(message);
                }
            }
        }
    }

    fn try_submit(&mut self) {
        if self.submission.is_submitting() {
            return;
        }
        self.success_banner = None;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::SubmitRegistration {
                username: self.username.clone(),
                email: self.email.clone(),
            },
            &mut self.bridge_notice,
        );
    }

    /// Editing a field ends the previous attempt.
    fn note_fields_edited(&mut self) {
        self.success_banner = None;
        if self.submission.is_terminal() {
            self.submission = SubmissionState::Idle;
        }
    }

    fn status_line(state: &SubmissionState) -> Option<(String, egui::Color32)> {
        let text = match state {
            SubmissionState::Idle => return None,
            SubmissionState::Submitting => SUBMITTING_STATUS_TEXT.to_string(),
            SubmissionState::Succeeded { message } => format!("Success: {message}"),
            SubmissionState::AmbiguousSuccess { message } => message.clone(),
            SubmissionState::Failed { message } => format!("Registration failed: {message}"),
        };
        Some((text, severity_color(state.severity())))
    }

    fn show_success_banner(&mut self, ui: &mut egui::Ui) {
        if let Some(message) = self.success_banner.clone() {
            egui::Frame::none()
                .fill(egui::Color32::from_rgb(38, 82, 56))
                .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(67, 181, 129)))
                .rounding(8.0)
                .inner_margin(egui::Margin::symmetric(10, 8))
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        ui.label(
                            egui::RichText::new(format!("Registration successful: {message}"))
                                .color(egui::Color32::WHITE),
                        );
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("Dismiss").clicked() {
                                self.success_banner = None;
                            }
                        });
                    });
                });
            ui.add_space(6.0);
        }
    }

    fn show_bridge_notice(&mut self, ui: &mut egui::Ui) {
        if let Some(notice) = &self.bridge_notice {
            ui.label(
                egui::RichText::new(notice)
                    .color(severity_color(StatusSeverity::Error))
                    .small(),
            );
            ui.add_space(6.0);
        }
    }

    fn show_registration_screen(&mut self, ui: &mut egui::Ui) {
        let avail = ui.available_size();
        let card_width = avail.x.clamp(360.0, 520.0);
        ui.add_space((avail.y * 0.12).clamp(18.0, 90.0));

        ui.vertical_centered(|ui| {
            ui.set_width(card_width);

            egui::Frame::none()
                .fill(ui.visuals().panel_fill)
                .rounding(14.0)
                .stroke(egui::Stroke::new(
                    1.0,
                    ui.visuals().widgets.noninteractive.bg_stroke.color,
                ))
                .inner_margin(egui::Margin::symmetric(20, 18))
                .show(ui, |ui| {
                    ui.style_mut().spacing.item_spacing = egui::vec2(10.0, 10.0);

                    ui.heading("Create a new account");
                    ui.weak(format!("Registration via the {REGISTER_PATH} endpoint"));

                    ui.add_space(8.0);
                    self.show_success_banner(ui);
                    self.show_bridge_notice(ui);

                    let submitting = self.submission.is_submitting();

                    let mut username_buf = self.username.clone();
                    let mut email_buf = self.email.clone();
                    let mut edited = false;
                    let mut enter_submit = false;

                    ui.add_enabled_ui(!submitting, |ui| {
                        ui.label(egui::RichText::new("Username").strong());
                        let user_resp = ui.add_sized(
                            [ui.available_width(), 34.0],
                            egui::TextEdit::singleline(&mut username_buf)
                                .hint_text("Username")
                                .desired_width(f32::INFINITY),
                        );

                        ui.add_space(4.0);

                        ui.label(egui::RichText::new("Email").strong());
                        let email_resp = ui.add_sized(
                            [ui.available_width(), 34.0],
                            egui::TextEdit::singleline(&mut email_buf)
                                .hint_text("Email address")
                                .desired_width(f32::INFINITY),
                        );

                        if !self.attempted_auto_focus {
                            self.attempted_auto_focus = true;
                            user_resp.request_focus();
                        }

                        edited = user_resp.changed() || email_resp.changed();

                        // Enter submits while either field has focus.
                        let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
                        enter_submit =
                            enter_pressed && (user_resp.has_focus() || email_resp.has_focus());
                    });

                    self.username = username_buf;
                    self.email = email_buf;
                    if edited {
                        self.note_fields_edited();
                    }
                    if enter_submit {
                        self.try_submit();
                    }

                    ui.add_space(10.0);

                    ui.horizontal(|ui| {
                        let label = if submitting { "Registering…" } else { "Register now" };
                        let button = egui::Button::new(
                            egui::RichText::new(label).strong().size(16.0),
                        )
                        .min_size(egui::vec2(
                            ui.available_width() - if submitting { 30.0 } else { 0.0 },
                            40.0,
                        ));
                        if ui.add_enabled(!submitting, button).clicked() {
                            self.try_submit();
                        }
                        if submitting {
                            ui.add(egui::Spinner::new());
                        }
                    });

                    if let Some((text, color)) = Self::status_line(&self.submission) {
                        ui.add_space(10.0);
                        ui.separator();
                        ui.add_space(6.0);
                        ui.label(egui::RichText::new(text).color(color).strong());
                    }
                });
        });
    }
}

fn severity_color(severity: StatusSeverity) -> egui::Color32 {
    match severity {
        StatusSeverity::Neutral => egui::Color32::GRAY,
        StatusSeverity::Success => egui::Color32::from_rgb(67, 181, 129),
        StatusSeverity::Warning => egui::Color32::from_rgb(250, 166, 26),
        StatusSeverity::Error => egui::Color32::from_rgb(240, 71, 71),
    }
}

impl eframe::App for RegistrationApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        // Keep repainting while a call is pending so the spinner animates and
        // the terminal state is picked up promptly.
        if self.submission.is_submitting() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_registration_screen(ui);
        });
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    tracing::info!(server_url = DEFAULT_SERVER_URL, "starting registration screen");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    spawn_backend_thread(cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Account Registration")
            .with_inner_size([480.0, 440.0])
            .with_min_inner_size([380.0, 380.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Account Registration",
        options,
        Box::new(|_cc| Ok(Box::new(RegistrationApp::new(cmd_tx, ui_rx)))),
    )
}
