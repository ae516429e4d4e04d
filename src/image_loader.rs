use std::path::Path;

use eframe::egui;
use image::DynamicImage;
use log::debug;

use crate::errors::{Result, ViewerError};

/// Decode an image file for display.
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    if !path.exists() {
        return Err(ViewerError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let image = image::open(path).map_err(|e| ViewerError::MediaLoad {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    debug!(
        "Decoded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image)
}

/// Convert a decoded image into an egui texture image.
pub fn to_color_image(image: &DynamicImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    let rgba = image.to_rgba8();
    egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_flat_samples().as_slice())
}
