use eframe::egui::{self, Pos2, Rect, Sense, Vec2};

use crate::app::TagApp;
use crate::hit_testing;
use crate::viewport::InteractionMode;

/// The canvas area: renders the composited document and resolves pointer
/// and touch input into drag / pan / pinch interactions.
pub fn canvas_panel(app: &mut TagApp, ctx: &egui::Context) {
    let frame = egui::Frame {
        fill: egui::Color32::from_gray(32),
        ..Default::default()
    };
    egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
        let panel_rect = ui.available_rect_before_wrap();
        app.maybe_fit(panel_rect.size());

        let response = ui.allocate_rect(panel_rect, Sense::click_and_drag());
        let canvas_rect =
            app.viewport
                .canvas_rect(panel_rect, app.document.width, app.document.height);

        let texture_id = app.canvas_texture(ctx);
        ui.painter().image(
            texture_id,
            canvas_rect,
            Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        handle_touch(app, ctx);
        handle_pointer(app, &response, canvas_rect);

        zoom_controls(app, ctx, panel_rect);
    });
}

/// Two simultaneous touch points form a pinch; the pinch supersedes any
/// single-pointer interaction until a finger lifts.
fn handle_touch(app: &mut TagApp, ctx: &egui::Context) {
    let events: Vec<egui::Event> = ctx.input(|i| i.events.clone());
    for event in events {
        if let egui::Event::Touch { id, phase, pos, .. } = event {
            match phase {
                egui::TouchPhase::Start | egui::TouchPhase::Move => {
                    app.touches.insert(id.0, pos);
                }
                egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                    app.touches.remove(&id.0);
                }
            }
        }
    }

    if app.touches.len() >= 2 {
        let points: Vec<Pos2> = app.touches.values().copied().take(2).collect();
        let distance = points[0].distance(points[1]);
        if matches!(app.viewport.mode, InteractionMode::Pinching { .. }) {
            app.viewport.pinch_move(distance);
        } else {
            app.viewport.begin_pinch(distance);
        }
    } else if matches!(app.viewport.mode, InteractionMode::Pinching { .. }) {
        app.viewport.end_interaction();
    }
}

fn handle_pointer(app: &mut TagApp, response: &egui::Response, canvas_rect: Rect) {
    if matches!(app.viewport.mode, InteractionMode::Pinching { .. }) {
        return;
    }

    let (doc_w, doc_h) = (app.document.width, app.document.height);

    if response.drag_started() {
        if let Some(pos) = response.interact_pointer_pos() {
            let doc_pos = hit_testing::screen_to_doc(pos, canvas_rect, doc_w, doc_h);
            let hit = hit_testing::hit_test(doc_pos, &app.document, &app.fonts)
                .map(str::to_owned);
            match hit {
                Some(id) => {
                    // Snapshot before the drag starts mutating positions.
                    app.snapshot();
                    app.selected = Some(id.clone());
                    let anchor = app
                        .document
                        .element(&id)
                        .map(|el| Pos2::new(el.x, el.y))
                        .unwrap_or(doc_pos);
                    app.viewport.begin_drag(id, doc_pos - anchor);
                    app.mark_dirty();
                }
                None => {
                    app.selected = None;
                    app.viewport.begin_pan(pos);
                    app.mark_dirty();
                }
            }
        }
    } else if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            match app.viewport.mode.clone() {
                InteractionMode::Dragging { id, grab_offset } => {
                    let doc_pos = hit_testing::screen_to_doc(pos, canvas_rect, doc_w, doc_h);
                    app.document.move_element(
                        &id,
                        doc_pos.x - grab_offset.x,
                        doc_pos.y - grab_offset.y,
                    );
                    app.mark_dirty();
                }
                InteractionMode::Panning { .. } => app.viewport.pan_move(pos),
                _ => {}
            }
        }
    } else if response.clicked() {
        // Plain click: select without starting a drag.
        if let Some(pos) = response.interact_pointer_pos() {
            let doc_pos = hit_testing::screen_to_doc(pos, canvas_rect, doc_w, doc_h);
            let hit = hit_testing::hit_test(doc_pos, &app.document, &app.fonts)
                .map(str::to_owned);
            if app.selected != hit {
                app.selected = hit;
                app.mark_dirty();
            }
        }
    }

    if response.drag_stopped() {
        app.viewport.end_interaction();
        app.mark_dirty();
    }
}

/// Floating zoom / history controls in the canvas corner.
fn zoom_controls(app: &mut TagApp, ctx: &egui::Context, panel_rect: Rect) {
    egui::Area::new(egui::Id::new("canvas_controls"))
        .fixed_pos(panel_rect.min + Vec2::new(12.0, 12.0))
        .show(ctx, |ui| {
            egui::Frame::window(&ctx.style()).show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    if ui.button("➕").on_hover_text("تكبير").clicked() {
                        app.viewport.zoom_by(0.1);
                    }
                    ui.label(format!("{:.0}%", app.viewport.zoom() * 100.0));
                    if ui.button("➖").on_hover_text("تصغير").clicked() {
                        app.viewport.zoom_by(-0.1);
                    }
                    if ui.button("⟲").on_hover_text("ملاءمة الشاشة").clicked() {
                        app.needs_fit = true;
                    }
                    ui.separator();
                    let can_undo = app.history.can_undo();
                    let can_redo = app.history.can_redo();
                    if ui.add_enabled(can_undo, egui::Button::new("⮪")).clicked() {
                        app.undo();
                    }
                    if ui.add_enabled(can_redo, egui::Button::new("⮫")).clicked() {
                        app.redo();
                    }
                });
            });
        });
}
