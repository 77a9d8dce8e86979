#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use tagpress::TagApp;

fn main() -> eframe::Result {
    env_logger::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([700.0, 500.0])
            .with_title("tagpress"),
        ..Default::default()
    };
    eframe::run_native(
        "tagpress",
        native_options,
        Box::new(|cc| Ok(Box::new(TagApp::new(cc)?))),
    )
}
