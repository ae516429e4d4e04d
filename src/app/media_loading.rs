use eframe::egui::{self, Vec2};
use log::warn;
use std::thread;

use crate::image_loader;

use super::{LoaderMessage, ViewerApp};

impl ViewerApp {
    /// Kick off a background decode of the active page.
    ///
    /// Video pages are never decoded (playback is out of scope); the UI
    /// draws a placeholder panel and the viewport sees no media.
    pub fn request_page_load(&mut self, ctx: &egui::Context) {
        self.load_error = None;

        let Some(page) = self.current_page().cloned() else {
            self.current_texture = None;
            self.is_loading = false;
            self.viewport.set_media_size(Vec2::ZERO);
            return;
        };

        if page.is_video() {
            self.current_texture = None;
            self.is_loading = false;
            self.viewport.set_media_size(Vec2::ZERO);
            return;
        }

        self.is_loading = true;
        let tx = self.loader_tx.clone();
        let ctx = ctx.clone();
        let path = page.path;

        thread::spawn(move || {
            match image_loader::load_image(&path) {
                Ok(image) => {
                    let _ = tx.send(LoaderMessage::PageLoaded(path, image));
                }
                Err(e) => {
                    let _ = tx.send(LoaderMessage::LoadError(path, e.to_string()));
                }
            }
            ctx.request_repaint();
        });
    }

    pub fn process_loader_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.loader_rx.try_recv() {
            match msg {
                LoaderMessage::PageLoaded(path, image) => {
                    // Stale frame for a page we already navigated away from
                    if self.current_page().map_or(true, |p| p.path != path) {
                        continue;
                    }

                    let size = Vec2::new(image.width() as f32, image.height() as f32);
                    let texture = ctx.load_texture(
                        path.to_string_lossy(),
                        image_loader::to_color_image(&image),
                        egui::TextureOptions::LINEAR,
                    );
                    self.current_texture = Some(texture);
                    self.is_loading = false;
                    self.viewport.set_media_size(size);
                    // Fit once the image area has been measured this frame
                    self.pending_fit = true;
                }
                LoaderMessage::LoadError(path, message) => {
                    if self.current_page().map_or(true, |p| p.path != path) {
                        continue;
                    }
                    warn!("Failed to load {}: {}", path.display(), message);
                    self.load_error = Some(message);
                    self.is_loading = false;
                    self.current_texture = None;
                    self.viewport.set_media_size(Vec2::ZERO);
                }
            }
        }
    }
}
