use crate::app::{BrowseMode, ViewerApp};
use crate::viewport::ViewParams;
use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, RichText, Vec2};
use std::time::Instant;

impl ViewerApp {
    pub fn show_menu_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Open Archive...").clicked() {
                        ui.close_menu();
                        self.open_archive_dialog(ctx);
                    }
                    ui.menu_button("Recent", |ui| {
                        for folder in self.settings.recent_folders.clone() {
                            if ui.button(folder.display().to_string()).clicked() {
                                ui.close_menu();
                                self.load_archive(folder, ctx);
                            }
                        }
                    });
                    if ui.button("Rescan").clicked() {
                        ui.close_menu();
                        self.rescan_archive(ctx);
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let canvas = self.available_view_size;
                    if ui.button("Zoom In        +").clicked() {
                        self.viewport.zoom_in_centered(canvas);
                    }
                    if ui.button("Zoom Out       -").clicked() {
                        self.viewport.zoom_out_centered(canvas);
                    }
                    if ui.button("Reset Zoom     0").clicked() {
                        self.viewport.reset_view(canvas);
                    }
                    ui.separator();
                    ui.checkbox(&mut self.settings.smooth_zoom, "Smooth zoom");
                    ui.checkbox(&mut self.settings.show_sidebar, "Artist sidebar");
                    ui.checkbox(&mut self.settings.show_page_strip, "Page strip");
                    ui.checkbox(&mut self.settings.show_statusbar, "Status bar");
                });

                ui.menu_button("Browse", |ui| {
                    if ui.button("Next Work          →").clicked() {
                        ui.close_menu();
                        self.next_work(ctx);
                    }
                    if ui.button("Previous Work      ←").clicked() {
                        ui.close_menu();
                        self.previous_work(ctx);
                    }
                    if ui.button("Random Work        R").clicked() {
                        ui.close_menu();
                        self.random_work(ctx);
                    }
                    ui.separator();
                    if self.browse.mode == BrowseMode::Artist {
                        if ui.button("Leave Artist Mode  A").clicked() {
                            ui.close_menu();
                            self.exit_artist_mode();
                        }
                    } else if ui.button("Browse This Artist A").clicked() {
                        ui.close_menu();
                        self.enter_artist_mode();
                    }
                });
            });
        });
    }

    pub fn show_artist_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("artist_panel")
            .default_width(220.0)
            .min_width(160.0)
            .show(ctx, |ui| {
                let artist = self
                    .browse
                    .artist_works
                    .first()
                    .map(|w| w.artist.clone())
                    .unwrap_or_default();
                ui.heading(artist);
                ui.separator();

                let works = self.browse.artist_works.clone();
                egui::ScrollArea::vertical().show(ui, |ui| {
                    for (idx, work) in works.iter().enumerate() {
                        let selected = self.browse.artist_index == idx;
                        let label = format!("{} ({} pages)", work.post_id, work.page_count);
                        if ui.selectable_label(selected, label).clicked() {
                            self.browse.artist_index = idx;
                            let post_id = work.post_id.clone();
                            self.show_work(&post_id, ctx);
                        }
                    }
                });

                ui.separator();
                if ui.button("Back to random").clicked() {
                    self.exit_artist_mode();
                }
            });
    }

    pub fn show_page_strip(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("page_strip").show(ctx, |ui| {
            ui.horizontal(|ui| {
                for idx in 0..self.browse.page_count {
                    let selected = idx == self.browse.page_index;
                    if ui
                        .selectable_label(selected, format!("{}", idx + 1))
                        .clicked()
                    {
                        self.select_page(idx, ctx);
                    }
                }
            });
        });
    }

    pub fn show_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(page) = self.current_page().cloned() {
                    ui.label(RichText::new(&page.title).strong());
                    ui.label(format!("by {}", page.artist));
                    if self.browse.page_count > 1 {
                        ui.label(format!(
                            "page {}/{}",
                            self.browse.page_index + 1,
                            self.browse.page_count
                        ));
                    }
                    ui.separator();
                    ui.label(format!("{:.0}%", self.viewport.scale() * 100.0));
                }

                if let Some((msg, _)) = &self.status_message {
                    ui.separator();
                    ui.label(RichText::new(msg).italics());
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if let Some(post_id) = self.browse.current_post.clone() {
                        let likes = self.scores.likes(&post_id);
                        let points = self.scores.points(&post_id);
                        if ui.button(format!("\u{2764} {}", likes)).clicked() {
                            self.add_like_to_current();
                        }
                        if ui.button(format!("+1 \u{2b50} {}", points)).clicked() {
                            self.add_point_to_current();
                        }
                        for folder in self.settings.quick_move_folders.clone() {
                            if ui.button(format!("\u{2192} {}", folder)).clicked() {
                                self.move_current_page(&folder, ctx);
                            }
                        }
                    }
                });
            });
        });
    }

    pub fn show_image_area(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            self.available_view_size = available;

            // A freshly decoded page fits once the area has been measured
            if self.pending_fit {
                self.viewport.instant_fit(available);
                self.pending_fit = false;
            }

            let (response, painter) =
                ui.allocate_painter(available, egui::Sense::click_and_drag());
            let canvas = response.rect;

            if let Some(texture) = self.current_texture.clone() {
                let ViewParams { scale, offset } = self.viewport.view_params();
                let media = self.viewport.media_size();
                let image_rect = Rect::from_min_size(canvas.min + offset, media * scale);
                painter.image(
                    texture.id(),
                    image_rect,
                    Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0)),
                    Color32::WHITE,
                );
            } else if self.current_page().is_some_and(|p| p.is_video()) {
                let name = self.current_page().map(|p| p.file_name()).unwrap_or_default();
                painter.text(
                    canvas.center(),
                    Align2::CENTER_CENTER,
                    format!("\u{25b6} {}\n(video playback is not supported)", name),
                    FontId::proportional(18.0),
                    ui.visuals().weak_text_color(),
                );
            } else if self.is_loading {
                painter.text(
                    canvas.center(),
                    Align2::CENTER_CENTER,
                    "Loading...",
                    FontId::proportional(16.0),
                    ui.visuals().weak_text_color(),
                );
            } else if let Some(error) = self.load_error.clone() {
                painter.text(
                    canvas.center(),
                    Align2::CENTER_CENTER,
                    error,
                    FontId::proportional(14.0),
                    ui.visuals().error_fg_color,
                );
            } else if self.browse.current_post.is_none() {
                painter.text(
                    canvas.center(),
                    Align2::CENTER_CENTER,
                    "Open an archive folder (File > Open Archive...)",
                    FontId::proportional(16.0),
                    ui.visuals().weak_text_color(),
                );
            }

            // Handle panning with drag
            if response.dragged() {
                let delta = response.drag_delta();
                if delta != Vec2::ZERO {
                    self.viewport.pan(delta, Instant::now());
                }
            }

            // Handle zoom with scroll wheel, anchored at the pointer
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                if let Some(pointer) = response.hover_pos() {
                    let step = self.viewport.config().step_factor;
                    let factor = if scroll > 0.0 { step } else { 1.0 / step };
                    let anchor = (pointer - canvas.min).to_pos2();
                    self.viewport
                        .zoom_to_point(factor, anchor, self.settings.smooth_zoom);
                }
            }

            // Double-click animates back to the fitted view
            if response.double_clicked() {
                self.viewport.reset_view(available);
            }
        });
    }
}
