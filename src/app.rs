//! Solirona dashboard
//!
//! egui app: waveform canvas in the central panel, control sidebar for the
//! simulation commands, status header. All state lives in the
//! [`ViewController`]; this module is glue between egui, the websocket
//! client and the core.

use eframe::egui;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use tracing::debug;

use crate::core::{parse_message, Command, DrawSurface, Rgb, ViewController};
use crate::theme::{colors, minimal_visuals};
use crate::time::now_seconds;
use crate::websocket_wasm::{MessageBuffer, WsClient};
use crate::ws_state::WsState;

/// Default WebSocket URL for the simulation server
/// (override with `window.__solirona_ws_url`)
pub const DEFAULT_WS_URL: &str = "ws://127.0.0.1:5000/ws";

pub struct SolironaApp {
    view: ViewController,
    /// WebSocket connection state
    ws_state: Rc<RefCell<WsState>>,
    /// WebSocket client (kept alive)
    ws_client: Option<WsClient>,
    /// Buffered inbound frames, drained in update() with a time budget
    msg_buffer: MessageBuffer,
    fps_counter: FpsCounter,
    show_controls: bool,
    // Raw operator input; parsed (not validated) when the button fires.
    node_count_input: String,
    connect_prob_input: String,
    phase_angle_input: String,
    interference_gain_input: String,
    collapse_chance_input: String,
}

impl SolironaApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        cc.egui_ctx.set_visuals(minimal_visuals());

        let ws_state = Rc::new(RefCell::new(WsState::Connecting));
        let msg_buffer: MessageBuffer = Rc::new(RefCell::new(VecDeque::new()));

        let ws_url = js_sys::eval("window.__solirona_ws_url")
            .ok()
            .and_then(|v| v.as_string())
            .unwrap_or_else(|| DEFAULT_WS_URL.to_string());
        let ws_client = WsClient::connect(&ws_url, msg_buffer.clone(), ws_state.clone()).ok();

        Self {
            view: ViewController::default(),
            ws_state,
            ws_client,
            msg_buffer,
            fps_counter: FpsCounter::new(),
            show_controls: true,
            node_count_input: String::new(),
            connect_prob_input: String::new(),
            phase_angle_input: String::new(),
            interference_gain_input: String::new(),
            collapse_chance_input: String::new(),
        }
    }

    /// Drain buffered frames with a time budget so one burst cannot stall a
    /// frame. Remaining frames stay buffered for the next update().
    fn process_messages(&mut self) {
        const BUDGET_MS: f64 = 12.0;
        let deadline = js_sys::Date::now() + BUDGET_MS;

        let mut buf = self.msg_buffer.borrow_mut();
        while let Some(msg) = buf.pop_front() {
            if let Some(snapshot) = parse_message(&msg) {
                self.view.on_snapshot(snapshot);
            }
            if js_sys::Date::now() >= deadline {
                break;
            }
        }
    }

    fn send(&self, command: Command) {
        debug!(?command, "control command");
        if let Some(client) = &self.ws_client {
            client.send(&command);
        }
    }

    fn render_header(&mut self, ui: &mut egui::Ui) {
        self.fps_counter.tick();

        let ws_state = self.ws_state.borrow().clone();
        let stats = self.view.stats().clone();

        ui.horizontal(|ui| {
            let (status_color, status_text) = match &ws_state {
                WsState::Connected => (egui::Color32::from_rgb(100, 200, 100), "Connected"),
                WsState::Connecting => (egui::Color32::from_rgb(200, 200, 100), "Connecting..."),
                WsState::Disconnected => (egui::Color32::from_rgb(200, 100, 100), "Disconnected"),
                WsState::Error(_) => (egui::Color32::from_rgb(200, 100, 100), "Error"),
            };

            ui.colored_label(status_color, egui::RichText::new(status_text).size(11.0));

            ui.add_space(10.0);

            ui.label(
                egui::RichText::new(format!("{:.0} fps", self.fps_counter.fps()))
                    .color(colors::TEXT_SECONDARY)
                    .monospace()
                    .size(11.0),
            );

            ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED).size(11.0));

            ui.label(
                egui::RichText::new(format!("{} nodes", stats.total))
                    .color(colors::TEXT_MUTED)
                    .monospace()
                    .size(11.0),
            );

            ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED).size(11.0));

            ui.label(
                egui::RichText::new(format!(
                    "{} collapsed ({:.1}%)",
                    stats.collapsed, stats.collapsed_percent
                ))
                .color(colors::TEXT_MUTED)
                .monospace()
                .size(11.0),
            );

            if !self.view.status_line().is_empty() {
                ui.label(egui::RichText::new("/").color(colors::TEXT_MUTED).size(11.0));
                ui.label(
                    egui::RichText::new(self.view.status_line())
                        .color(colors::TEXT_SECONDARY)
                        .monospace()
                        .size(11.0),
                );
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(
                    egui::RichText::new("SOLIRONA")
                        .color(colors::TEXT_PRIMARY)
                        .size(12.0),
                );

                ui.add_space(10.0);

                let controls_text = if self.show_controls {
                    "Controls ▲"
                } else {
                    "Controls ▼"
                };
                if ui
                    .button(egui::RichText::new(controls_text).size(11.0))
                    .clicked()
                {
                    self.show_controls = !self.show_controls;
                }

                let pause_text = if self.view.is_paused() { "Resume" } else { "Pause" };
                if ui.button(egui::RichText::new(pause_text).size(11.0)).clicked() {
                    self.view.toggle_paused();
                }
            });
        });
    }

    fn render_controls(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("controls")
            .frame(egui::Frame::new().fill(colors::BG_ELEVATED).inner_margin(8.0))
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.label(egui::RichText::new("Simulation").color(colors::TEXT_MUTED).size(10.0));
                ui.horizontal(|ui| {
                    if ui.button("Step").clicked() {
                        self.send(Command::Step { count: 1 });
                    }
                    if ui.button("Step 10").clicked() {
                        self.send(Command::Step { count: 10 });
                    }
                });

                ui.add_space(8.0);
                ui.label(egui::RichText::new("Network").color(colors::TEXT_MUTED).size(10.0));
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.node_count_input);
                    if ui.button("Set count").clicked() {
                        if let Ok(count) = self.node_count_input.trim().parse() {
                            self.send(Command::SetNodeCount { count });
                        }
                    }
                });
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.connect_prob_input);
                    if ui.button("Reconnect").clicked() {
                        if let Ok(connect_prob) = self.connect_prob_input.trim().parse() {
                            self.send(Command::Reconnect { connect_prob });
                        }
                    }
                });
                ui.horizontal(|ui| {
                    if ui.button("Add node").clicked() {
                        self.send(Command::AddNode);
                    }
                    if ui.button("Remove node").clicked() {
                        self.send(Command::RemoveNode);
                    }
                });

                ui.add_space(8.0);
                ui.label(egui::RichText::new("Waveform").color(colors::TEXT_MUTED).size(10.0));
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.phase_angle_input);
                    if ui.button("Rotate phase").clicked() {
                        if let Ok(angle) = self.phase_angle_input.trim().parse() {
                            self.send(Command::RotatePhaseAll { angle });
                        }
                    }
                });
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.interference_gain_input);
                    if ui.button("Interf. gain").clicked() {
                        if let Ok(gain) = self.interference_gain_input.trim().parse() {
                            self.send(Command::SetParams {
                                interference_gain: Some(gain),
                                collapse_chance: None,
                            });
                        }
                    }
                });
                ui.horizontal(|ui| {
                    ui.text_edit_singleline(&mut self.collapse_chance_input);
                    if ui.button("Collapse chance").clicked() {
                        if let Ok(chance) = self.collapse_chance_input.trim().parse() {
                            self.send(Command::SetParams {
                                interference_gain: None,
                                collapse_chance: Some(chance),
                            });
                        }
                    }
                });

                ui.add_space(12.0);
                ui.label(egui::RichText::new("Calculations").color(colors::TEXT_MUTED).size(10.0));
                ui.label(
                    egui::RichText::new(self.view.calc_text())
                        .color(colors::TEXT_SECONDARY)
                        .monospace()
                        .size(11.0),
                );
            });
    }
}

impl eframe::App for SolironaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Request continuous repaint for real-time updates
        ctx.request_repaint();

        self.process_messages();
        self.view.tick(now_seconds());

        egui::TopBottomPanel::top("header")
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY).inner_margin(4.0))
            .show(ctx, |ui| {
                self.render_header(ui);
            });

        if self.show_controls {
            self.render_controls(ctx);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(colors::BG_PRIMARY))
            .show(ctx, |ui| {
                let size = ui.available_size();
                let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
                let painter = ui.painter_at(rect);
                let mut surface = PainterSurface::new(&painter, rect.min);
                self.view.draw(&mut surface, rect.width(), rect.height());
            });
    }
}

/// `DrawSurface` backed by an `egui::Painter`.
///
/// Path ops accumulate points until `stroke`; clear fills the panel
/// background since egui repaints from scratch each frame anyway.
struct PainterSurface<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    stroke_color: Rgb,
    fill_color: Rgb,
    path: Vec<egui::Pos2>,
}

impl<'a> PainterSurface<'a> {
    fn new(painter: &'a egui::Painter, origin: egui::Pos2) -> Self {
        Self {
            painter,
            origin,
            stroke_color: Rgb::new(255, 255, 255),
            fill_color: Rgb::new(255, 255, 255),
            path: Vec::new(),
        }
    }

    fn at(&self, x: f32, y: f32) -> egui::Pos2 {
        self.origin + egui::vec2(x, y)
    }
}

fn color32(c: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(c.r, c.g, c.b)
}

impl DrawSurface for PainterSurface<'_> {
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.painter.rect_filled(
            egui::Rect::from_min_size(self.at(x, y), egui::vec2(width, height)),
            0.0,
            colors::BG_PRIMARY,
        );
    }

    fn set_stroke_color(&mut self, color: Rgb) {
        self.stroke_color = color;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        self.path.clear();
        self.path.push(self.at(x, y));
    }

    fn line_to(&mut self, x: f32, y: f32) {
        self.path.push(self.at(x, y));
    }

    fn stroke(&mut self) {
        if self.path.len() >= 2 {
            self.painter.add(egui::Shape::line(
                std::mem::take(&mut self.path),
                egui::Stroke::new(1.5, color32(self.stroke_color)),
            ));
        } else {
            self.path.clear();
        }
    }

    fn set_fill_color(&mut self, color: Rgb) {
        self.fill_color = color;
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) {
        self.painter
            .circle_filled(self.at(x, y), radius, color32(self.fill_color));
    }
}

/// FPS counter using platform-agnostic time
struct FpsCounter {
    frames: Vec<f64>,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            frames: Vec::with_capacity(60),
        }
    }

    fn tick(&mut self) {
        let now = now_seconds() * 1000.0;
        self.frames.push(now);
        if self.frames.len() > 60 {
            self.frames.remove(0);
        }
    }

    fn fps(&self) -> f64 {
        if self.frames.len() < 2 {
            return 0.0;
        }
        let elapsed = self.frames.last().unwrap() - self.frames.first().unwrap();
        if elapsed == 0.0 {
            return 0.0;
        }
        (self.frames.len() as f64 - 1.0) / (elapsed / 1000.0)
    }
}
