use eframe::egui;

use crate::app::TagApp;
use crate::element::{ElementKind, Rgb};
use crate::fonts::FontFamily;
use crate::template::CUSTOM_TEMPLATE_ID;

/// Side panel: template picker, per-element editors, add/export actions.
pub fn controls_panel(app: &mut TagApp, ctx: &egui::Context) {
    egui::SidePanel::right("controls_panel")
        .resizable(true)
        .default_width(320.0)
        .show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                template_picker(app, ui);
                ui.separator();
                element_editors(app, ui);
                ui.separator();
                actions(app, ui);
            });
        });
}

fn template_picker(app: &mut TagApp, ui: &mut egui::Ui) {
    ui.heading("1. اختر القالب");
    let entries: Vec<(String, String, String)> = app
        .catalog
        .templates()
        .iter()
        .map(|t| (t.id.clone(), t.label.clone(), t.desc.clone()))
        .collect();
    for (id, label, desc) in entries {
        let active = app.active_template == id;
        let text = if desc.is_empty() {
            label
        } else {
            format!("{label} — {desc}")
        };
        if ui.selectable_label(active, text).clicked() && !active {
            app.select_template(&id);
        }
    }
    if app.active_template == CUSTOM_TEMPLATE_ID {
        ui.small("اسحب صورة وأفلتها هنا لتعيين الخلفية");
    }
}

fn element_editors(app: &mut TagApp, ui: &mut egui::Ui) {
    ui.heading("2. العناصر والنصوص");
    let slider_max = (app.document.width as f32 / 2.0).max(10.0);
    let ids: Vec<String> = app.document.elements.iter().map(|el| el.id.clone()).collect();
    let mut pending_delete: Option<String> = None;

    for id in ids {
        let Some(el) = app.document.element(&id) else {
            continue;
        };
        let (label, kind, protected) = (el.label.clone(), el.kind, el.protected);
        let is_selected = app.selected.as_deref() == Some(id.as_str());

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.horizontal(|ui| {
                if ui.selectable_label(is_selected, &label).clicked() {
                    app.selected = Some(id.clone());
                    app.mark_dirty();
                }
                if ui.small_button("⌖").on_hover_text("توسيط").clicked() {
                    app.snapshot();
                    app.document.center_horizontally(&id);
                    app.mark_dirty();
                }
                if !protected && ui.small_button("🗑").on_hover_text("حذف").clicked() {
                    pending_delete = Some(id.clone());
                }
            });

            text_editor(app, ui, &id, kind);
            style_editor(app, ui, &id, slider_max);
        });
    }

    if let Some(id) = pending_delete {
        app.delete_element(&id);
    }

    if ui.button("➕ إضافة نص جديد").clicked() {
        app.add_element();
    }
}

/// Text input; price elements get a single-line numeric-style field. The
/// first focus on an untouched placeholder clears it (snapshotting first so
/// the placeholder is undoable).
fn text_editor(app: &mut TagApp, ui: &mut egui::Ui, id: &str, kind: ElementKind) {
    let still_placeholder = app.document.has_placeholder_text(id);
    let mut clear_placeholder = false;
    let mut changed = false;

    if let Some(el) = app.document.element_mut(id) {
        let response = match kind {
            ElementKind::Text => ui.text_edit_multiline(&mut el.text),
            ElementKind::Price => ui.text_edit_singleline(&mut el.text),
        };
        clear_placeholder = response.gained_focus() && still_placeholder;
        changed = response.changed();
    }

    if clear_placeholder {
        app.snapshot();
        if let Some(el) = app.document.element_mut(id) {
            el.text.clear();
        }
        changed = true;
    }
    if changed {
        app.mark_dirty();
    }
}

fn style_editor(app: &mut TagApp, ui: &mut egui::Ui, id: &str, slider_max: f32) {
    let mut changed = false;

    if let Some(el) = app.document.element_mut(id) {
        ui.horizontal(|ui| {
            ui.label("الخط");
            egui::ComboBox::from_id_salt((id, "font"))
                .selected_text(el.font.label())
                .show_ui(ui, |ui| {
                    for family in FontFamily::ALL {
                        changed |= ui
                            .selectable_value(&mut el.font, family, family.label())
                            .changed();
                    }
                });
            let mut fill = el.fill.to_color32();
            if ui.color_edit_button_srgba(&mut fill).changed() {
                el.fill = Rgb::from_color32(fill);
                changed = true;
            }
        });

        changed |= ui
            .add(egui::Slider::new(&mut el.font_size, 10.0..=slider_max).text("حجم الخط"))
            .changed();

        ui.horizontal(|ui| {
            changed |= ui.checkbox(&mut el.stroke_enabled, "حدود (Outline)").changed();
            if el.stroke_enabled {
                let mut stroke = el.stroke_color.to_color32();
                if ui.color_edit_button_srgba(&mut stroke).changed() {
                    el.stroke_color = Rgb::from_color32(stroke);
                    changed = true;
                }
            }
        });
        if el.stroke_enabled {
            changed |= ui
                .add(egui::Slider::new(&mut el.stroke_width, 1.0..=30.0).text("سمك"))
                .changed();
        }
        changed |= ui.checkbox(&mut el.strikethrough, "شطب").changed();
    }

    if changed {
        app.mark_dirty();
    }
}

fn actions(app: &mut TagApp, ui: &mut egui::Ui) {
    if ui.button("💾 حفظ الصورة").clicked() {
        app.export();
    }
    if let Some(status) = app.status.clone() {
        ui.small(status);
    }
}
