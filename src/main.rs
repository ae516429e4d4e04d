use eframe::egui;
use miru::app::ViewerApp;
use miru::logging;

fn main() -> eframe::Result<()> {
    logging::init();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 600.0])
            .with_icon(load_icon())
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "miru",
        native_options,
        Box::new(|cc| Ok(Box::new(ViewerApp::new(cc)))),
    )
}

fn load_icon() -> egui::IconData {
    // Simple programmatic icon: a warm diamond on transparent ground
    let size = 64;
    let mut rgba = vec![0u8; size * size * 4];

    for y in 0..size {
        for x in 0..size {
            let idx = (y * size + x) * 4;
            let cx = (x as f32 - size as f32 / 2.0).abs();
            let cy = (y as f32 - size as f32 / 2.0).abs();

            if cx + cy < size as f32 / 2.0 - 2.0 {
                let t = (cx + cy) / (size as f32 / 2.0);
                rgba[idx] = (230.0 - 60.0 * t) as u8; // R
                rgba[idx + 1] = (110.0 + 60.0 * t) as u8; // G
                rgba[idx + 2] = (90.0 + 120.0 * t) as u8; // B
                rgba[idx + 3] = 255; // A
            }
        }
    }

    egui::IconData {
        rgba,
        width: size as u32,
        height: size as u32,
    }
}
