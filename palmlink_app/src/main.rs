mod app;

fn main() -> Result<(), eframe::Error> {
    env_logger::init();
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([480.0, 800.0])
            .with_min_inner_size([400.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Palmlink",
        native_options,
        Box::new(|cc| Ok(Box::new(app::PalmlinkApp::new(cc)))),
    )
}
