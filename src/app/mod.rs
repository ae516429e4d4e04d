pub mod file_ops;
pub mod media_loading;
pub mod navigation;
pub mod state;

pub use navigation::{Browse, BrowseMode};
pub use state::*;

use eframe::egui;
use std::time::Instant;

use crate::viewport::Tick;

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_loader_messages(ctx);

        // Drive the zoom animation. A deferred step is rescheduled with the
        // remaining delay, so throttling stretches time without dropping steps.
        match self.viewport.tick(Instant::now()) {
            Tick::Idle => {}
            Tick::Deferred(delay) => ctx.request_repaint_after(delay),
            Tick::Advanced => ctx.request_repaint_after(self.viewport.config().animation_delay),
            Tick::Finished => ctx.request_repaint(),
        }

        self.handle_keyboard(ctx);

        self.show_menu_bar(ctx);
        if self.settings.show_statusbar {
            self.show_status_bar(ctx);
        }
        if self.settings.show_page_strip && self.browse.page_count > 1 {
            self.show_page_strip(ctx);
        }
        if self.settings.show_sidebar && self.browse.mode == BrowseMode::Artist {
            self.show_artist_sidebar(ctx);
        }
        self.show_image_area(ctx);

        // Anything that mutated the view this frame gets drawn next frame
        if self.viewport.take_dirty() {
            ctx.request_repaint();
        }

        let status_expired = self
            .status_message
            .as_ref()
            .is_some_and(|(_, shown_at)| shown_at.elapsed().as_secs() >= 4);
        if status_expired {
            self.status_message = None;
        }
    }

    fn save(&mut self, _storage: &mut dyn eframe::Storage) {
        self.settings.save();
    }
}

impl ViewerApp {
    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let canvas = self.available_view_size;
        let input = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowDown),
                i.key_pressed(egui::Key::ArrowUp),
                i.key_pressed(egui::Key::Plus) || i.key_pressed(egui::Key::Equals),
                i.key_pressed(egui::Key::Minus),
                i.key_pressed(egui::Key::Num0),
                i.key_pressed(egui::Key::Delete),
                i.key_pressed(egui::Key::A),
                i.key_pressed(egui::Key::R),
                i.key_pressed(egui::Key::L),
                i.key_pressed(egui::Key::P),
            )
        });
        let (next, prev, page_down, page_up, zoom_in, zoom_out, reset, delete, artist, random, like, point) =
            input;

        if next {
            self.next_work(ctx);
        }
        if prev {
            self.previous_work(ctx);
        }
        if page_down {
            self.next_page(ctx);
        }
        if page_up {
            self.previous_page(ctx);
        }
        if zoom_in {
            self.viewport.zoom_in_centered(canvas);
        }
        if zoom_out {
            self.viewport.zoom_out_centered(canvas);
        }
        if reset {
            self.viewport.reset_view(canvas);
        }
        if delete {
            self.delete_current_page(ctx);
        }
        if artist {
            if self.browse.mode == BrowseMode::Artist {
                self.exit_artist_mode();
            } else {
                self.enter_artist_mode();
            }
        }
        if random {
            self.random_work(ctx);
        }
        if like {
            self.add_like_to_current();
        }
        if point {
            self.add_point_to_current();
        }
    }
}
