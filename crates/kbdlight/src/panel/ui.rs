//! egui rendering of the control panel.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use eframe::egui;
use kbdlight_lib::KbdlightError;
use kbdlight_lib::apply::{self, Applied};
use kbdlight_lib::device::KeyboardBacklight;
use kbdlight_lib::elevate::HelperElevator;
use kbdlight_lib::error::Result;
use kbdlight_lib::led::{BacklightState, PRESETS, Rgb};

use super::{Panel, color_button_label, text_on};

/// How often to check on a running apply.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub struct PanelApp {
    panel: Panel,
    device: KeyboardBacklight,
    elevator: HelperElevator,
    /// Result of the apply running on the worker thread.
    pending: Option<Receiver<Result<Applied>>>,
}

impl PanelApp {
    pub fn new(
        device: KeyboardBacklight,
        elevator: HelperElevator,
        initial: BacklightState,
        cc: &eframe::CreationContext<'_>,
    ) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        let corner_radius = egui::CornerRadius::same(4);
        style.visuals.widgets.noninteractive.corner_radius = corner_radius;
        style.visuals.widgets.inactive.corner_radius = corner_radius;
        style.visuals.widgets.active.corner_radius = corner_radius;
        style.visuals.widgets.hovered.corner_radius = corner_radius;
        cc.egui_ctx.set_style(style);

        Self {
            panel: Panel::new(initial),
            device,
            elevator,
            pending: None,
        }
    }

    /// Run the apply on a worker thread; the escalation may wait on a prompt.
    fn start_apply(&mut self, state: BacklightState) {
        let (tx, rx) = mpsc::channel();
        let device = self.device.clone();
        let elevator = self.elevator.clone();
        std::thread::spawn(move || {
            let _ = tx.send(apply::apply(&device, &elevator, &state));
        });
        self.pending = Some(rx);
    }

    fn poll_apply(&mut self, ctx: &egui::Context) {
        let Some(rx) = &self.pending else {
            return;
        };
        let result = match rx.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => {
                ctx.request_repaint_after(POLL_INTERVAL);
                return;
            }
            Err(TryRecvError::Disconnected) => Err(KbdlightError::Io(std::io::Error::other(
                "apply worker exited without a result",
            ))),
        };
        self.pending = None;
        let brightness = self.device.read_brightness();
        self.panel.finish_apply(result, brightness);
    }

    fn show_error(&mut self, ctx: &egui::Context) {
        let Some(message) = self.panel.error.clone() else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });
        if dismissed {
            self.panel.dismiss_error();
        }
    }
}

impl eframe::App for PanelApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_apply(ctx);

        let mut request = None;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(
                    egui::RichText::new("RGB Keyboard Backlight Control")
                        .strong()
                        .size(16.0),
                );
            });

            // ── Presets ──
            section_frame(ui, "Preset Colors", |ui| {
                ui.horizontal(|ui| {
                    for (name, rgb) in PRESETS {
                        let text = egui::RichText::new(name).strong().color(color32(text_on(rgb)));
                        let button = egui::Button::new(text)
                            .fill(color32(rgb))
                            .min_size(egui::vec2(60.0, 30.0));
                        if ui
                            .add_enabled(self.panel.color_apply_enabled(), button)
                            .clicked()
                        {
                            request = self.panel.begin_preset(rgb);
                        }
                    }
                });
            });

            // ── Brightness ──
            section_frame(ui, "Brightness", |ui| {
                ui.horizontal(|ui| {
                    let slider_width = ui.available_width() - 80.0;
                    ui.spacing_mut().slider_width = slider_width.max(100.0);
                    let slider = ui.add(egui::Slider::new(&mut self.panel.brightness, 0..=255));
                    if slider.changed() {
                        self.panel.device_brightness = self.device.read_brightness();
                    }
                    let apply_btn = egui::Button::new("Apply").min_size(egui::vec2(60.0, 0.0));
                    if ui
                        .add_enabled(self.panel.brightness_apply_enabled(), apply_btn)
                        .clicked()
                    {
                        request = self.panel.begin_apply();
                    }
                });
            });

            // ── Manual color ──
            section_frame(ui, "Manual Color Setup", |ui| {
                ui.spacing_mut().slider_width = (ui.available_width() - 120.0).max(100.0);
                egui::Grid::new("rgb_grid")
                    .num_columns(2)
                    .min_col_width(50.0)
                    .spacing([10.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("RED");
                        ui.add(egui::Slider::new(&mut self.panel.color.r, 0..=255));
                        ui.end_row();
                        ui.label("GREEN");
                        ui.add(egui::Slider::new(&mut self.panel.color.g, 0..=255));
                        ui.end_row();
                        ui.label("BLUE");
                        ui.add(egui::Slider::new(&mut self.panel.color.b, 0..=255));
                        ui.end_row();
                    });
                ui.add_space(4.0);
                let color = self.panel.color;
                let text = egui::RichText::new(color_button_label(color))
                    .strong()
                    .color(color32(text_on(color)));
                let color_btn = egui::Button::new(text)
                    .fill(color32(color))
                    .min_size(egui::vec2(ui.available_width(), 28.0));
                if ui
                    .add_enabled(self.panel.color_apply_enabled(), color_btn)
                    .clicked()
                {
                    request = self.panel.begin_apply();
                }
            });

            if self.panel.in_flight() {
                ui.add_space(4.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Applying...");
                });
            }
        });

        if let Some(state) = request {
            self.start_apply(state);
        }

        self.show_error(ctx);
    }
}

/// Render a section with a title and grouped frame that spans the full width.
fn section_frame(ui: &mut egui::Ui, title: &str, add_contents: impl FnOnce(&mut egui::Ui)) {
    ui.add_space(6.0);
    ui.label(egui::RichText::new(title).strong().size(14.0));
    ui.add_space(2.0);
    egui::Frame::group(ui.style())
        .inner_margin(egui::Margin::same(8))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            add_contents(ui);
        });
}

fn color32(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}
