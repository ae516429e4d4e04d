use anyhow::Context;
use eframe::egui;
use log::{error, info, warn};
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, PageInfo};

use super::navigation::Browse;
use super::ViewerApp;

impl ViewerApp {
    // File dialogs
    pub fn open_archive_dialog(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new().pick_folder() {
            self.load_archive(path, ctx);
        }
    }

    pub fn load_archive(&mut self, path: PathBuf, ctx: &egui::Context) {
        match Catalog::scan(&path, self.settings.include_subfolders) {
            Ok(catalog) => {
                self.catalog = catalog;
                self.settings.archive_folder = Some(path.clone());
                self.settings.add_recent_folder(path);
                self.settings.save();

                self.browse = Browse::default();
                self.browse.rebuild_ring(self.catalog.post_ids());

                let start = self
                    .settings
                    .restore_session
                    .then(|| self.settings.last_post.clone())
                    .flatten()
                    .filter(|id| self.catalog.contains_post(id))
                    .or_else(|| {
                        self.browse
                            .first_post(self.catalog.video_posts(), self.settings.video_first)
                    });

                if let Some(post_id) = start {
                    self.show_work(&post_id, ctx);
                } else {
                    self.set_status_message("Archive is empty".to_string());
                }
            }
            Err(e) => {
                error!("Archive scan failed: {}", e);
                self.load_error = Some(e.user_message());
            }
        }
    }

    pub fn rescan_archive(&mut self, ctx: &egui::Context) {
        if let Some(folder) = self.settings.archive_folder.clone() {
            self.load_archive(folder, ctx);
        }
    }

    /// Move the active page to the trash, then show whatever remains.
    pub fn delete_current_page(&mut self, ctx: &egui::Context) {
        let Some(page) = self.current_page().cloned() else {
            return;
        };

        if let Err(e) = trash::delete(&page.path) {
            warn!("Could not trash {}: {}", page.path.display(), e);
            self.set_status_message(format!("Delete failed: {}", e));
            return;
        }

        info!("Deleted {}", page.path.display());
        self.set_status_message(format!("Deleted {}", page.file_name()));
        self.after_page_removed(page, ctx);
    }

    /// Move the active page into a named subfolder of the archive.
    pub fn move_current_page(&mut self, folder: &str, ctx: &egui::Context) {
        let Some(page) = self.current_page().cloned() else {
            return;
        };

        let target_dir = self.catalog.root().join(folder);
        match move_into(&page.path, &target_dir) {
            Ok(dest) => {
                info!("Moved {} -> {}", page.path.display(), dest.display());
                self.set_status_message(format!("Moved to {}", folder));
                self.after_page_removed(page, ctx);
            }
            Err(e) => {
                warn!("Move failed: {:#}", e);
                self.set_status_message(format!("Move failed: {}", e));
            }
        }
    }

    /// Catalog bookkeeping once a page is gone from the archive root.
    fn after_page_removed(&mut self, page: PageInfo, ctx: &egui::Context) {
        self.catalog.remove_page(&page.path);

        if self.catalog.contains_post(&page.post_id) {
            // Other pages of the work remain; reload it from page one
            let post_id = page.post_id.clone();
            self.show_work(&post_id, ctx);
            return;
        }

        // Whole work is gone: forget its counters and its ring slot
        self.scores.remove_post(&page.post_id);
        self.scores.save();
        self.browse.remove_from_ring(&page.post_id);

        if let Some(next) = self.browse.current_ring_post().map(str::to_string) {
            self.show_work(&next, ctx);
        } else {
            self.browse.current_post = None;
            self.browse.page_count = 0;
            self.browse.page_index = 0;
            self.current_texture = None;
            self.viewport.set_media_size(egui::Vec2::ZERO);
        }
    }
}

fn move_into(src: &Path, target_dir: &Path) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(target_dir)
        .with_context(|| format!("creating {}", target_dir.display()))?;
    let file_name = src
        .file_name()
        .with_context(|| format!("no file name in {}", src.display()))?;
    let dest = target_dir.join(file_name);
    std::fs::rename(src, &dest)
        .with_context(|| format!("moving {} to {}", src.display(), dest.display()))?;
    Ok(dest)
}
