use eframe::egui;
use log::debug;
use rand::seq::SliceRandom;

use crate::catalog::WorkSummary;

use super::ViewerApp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BrowseMode {
    #[default]
    Random,
    Artist,
}

/// Which work/page is active and how next/prev step through the archive.
///
/// Random mode walks a ring of post ids shuffled once per scan, so prev
/// always returns to what was on screen before. Artist mode walks the
/// current artist's works instead.
#[derive(Debug, Default)]
pub struct Browse {
    pub mode: BrowseMode,
    pub ring: Vec<String>,
    pub ring_index: usize,
    pub artist_works: Vec<WorkSummary>,
    pub artist_index: usize,
    pub current_post: Option<String>,
    pub page_index: usize,
    pub page_count: usize,
    pub history: Vec<String>,
}

impl Browse {
    pub fn rebuild_ring(&mut self, post_ids: &[String]) {
        self.ring = post_ids.to_vec();
        self.ring.shuffle(&mut rand::thread_rng());
        self.ring_index = 0;
    }

    /// Post to show after a scan. If the archive has videos, the first
    /// video post in the ring wins.
    pub fn first_post(&self, video_posts: &[String], video_first: bool) -> Option<String> {
        if video_first {
            if let Some(id) = self.ring.iter().find(|id| video_posts.contains(id)) {
                return Some(id.clone());
            }
        }
        self.ring.first().cloned()
    }

    pub fn set_work(&mut self, post_id: &str, page_count: usize) {
        self.current_post = Some(post_id.to_string());
        self.page_index = 0;
        self.page_count = page_count;
        if !self.history.iter().any(|id| id == post_id) {
            self.history.push(post_id.to_string());
        }
        if let Some(idx) = self.ring.iter().position(|id| id == post_id) {
            self.ring_index = idx;
        }
    }

    /// Step to the next/previous work in the active mode, with wraparound.
    pub fn step_work(&mut self, forward: bool) -> Option<String> {
        match self.mode {
            BrowseMode::Artist => {
                if self.artist_works.is_empty() {
                    return None;
                }
                let len = self.artist_works.len();
                self.artist_index = if forward {
                    (self.artist_index + 1) % len
                } else {
                    (self.artist_index + len - 1) % len
                };
                Some(self.artist_works[self.artist_index].post_id.clone())
            }
            BrowseMode::Random => {
                if self.ring.is_empty() {
                    return None;
                }
                let len = self.ring.len();
                self.ring_index = if forward {
                    (self.ring_index + 1) % len
                } else {
                    (self.ring_index + len - 1) % len
                };
                Some(self.ring[self.ring_index].clone())
            }
        }
    }

    /// Page stepping wraps within the work; single-page works ignore it.
    pub fn next_page(&mut self) -> bool {
        if self.page_count > 1 {
            self.page_index = (self.page_index + 1) % self.page_count;
            return true;
        }
        false
    }

    pub fn prev_page(&mut self) -> bool {
        if self.page_count > 1 {
            self.page_index = (self.page_index + self.page_count - 1) % self.page_count;
            return true;
        }
        false
    }

    pub fn select_page(&mut self, index: usize) -> bool {
        if index < self.page_count && index != self.page_index {
            self.page_index = index;
            return true;
        }
        false
    }

    pub fn enter_artist(&mut self, works: Vec<WorkSummary>) {
        self.artist_index = self
            .current_post
            .as_ref()
            .and_then(|post| works.iter().position(|w| &w.post_id == post))
            .unwrap_or(0);
        self.artist_works = works;
        self.mode = BrowseMode::Artist;
    }

    pub fn exit_artist(&mut self) {
        self.mode = BrowseMode::Random;
        self.artist_works.clear();
        self.artist_index = 0;
    }

    /// Drop a post that no longer exists, keeping the ring index pointed
    /// at the element that followed it.
    pub fn remove_from_ring(&mut self, post_id: &str) {
        if let Some(idx) = self.ring.iter().position(|id| id == post_id) {
            self.ring.remove(idx);
            if idx < self.ring_index {
                self.ring_index -= 1;
            }
            if !self.ring.is_empty() && self.ring_index >= self.ring.len() {
                self.ring_index = 0;
            }
        }
        self.artist_works.retain(|w| w.post_id != post_id);
        if !self.artist_works.is_empty() && self.artist_index >= self.artist_works.len() {
            self.artist_index = 0;
        }
    }

    pub fn current_ring_post(&self) -> Option<&str> {
        self.ring.get(self.ring_index).map(String::as_str)
    }
}

impl ViewerApp {
    /// Load a work and show its first page.
    pub fn show_work(&mut self, post_id: &str, ctx: &egui::Context) {
        let pages = self.catalog.post_pages(post_id);
        if pages.is_empty() {
            return;
        }
        debug!("Showing work {} ({} pages)", post_id, pages.len());
        self.browse.set_work(post_id, pages.len());
        self.settings.last_post = Some(post_id.to_string());
        self.request_page_load(ctx);
    }

    pub fn next_work(&mut self, ctx: &egui::Context) {
        if let Some(post_id) = self.browse.step_work(true) {
            self.show_work(&post_id, ctx);
        }
    }

    pub fn previous_work(&mut self, ctx: &egui::Context) {
        if let Some(post_id) = self.browse.step_work(false) {
            self.show_work(&post_id, ctx);
        }
    }

    pub fn random_work(&mut self, ctx: &egui::Context) {
        if let Some(post_id) = self.catalog.random_post(false).map(str::to_string) {
            self.show_work(&post_id, ctx);
        }
    }

    pub fn next_page(&mut self, ctx: &egui::Context) {
        if self.browse.next_page() {
            self.request_page_load(ctx);
        }
    }

    pub fn previous_page(&mut self, ctx: &egui::Context) {
        if self.browse.prev_page() {
            self.request_page_load(ctx);
        }
    }

    pub fn select_page(&mut self, index: usize, ctx: &egui::Context) {
        if self.browse.select_page(index) {
            self.request_page_load(ctx);
        }
    }

    /// Browse the current work's artist.
    pub fn enter_artist_mode(&mut self) {
        let Some(artist_id) = self.current_page().map(|p| p.artist_id.clone()) else {
            return;
        };
        let works = self.catalog.artist_works(&artist_id).to_vec();
        if works.is_empty() {
            return;
        }
        self.set_status_message(format!("Browsing {} works by {}", works.len(), works[0].artist));
        self.browse.enter_artist(works);
    }

    pub fn exit_artist_mode(&mut self) {
        self.browse.exit_artist();
    }

    pub fn add_point_to_current(&mut self) {
        if let Some(post_id) = self.browse.current_post.clone() {
            let total = self.scores.add_point(&post_id);
            self.scores.save();
            self.set_status_message(format!("{} points", total));
        }
    }

    pub fn add_like_to_current(&mut self) {
        if let Some(post_id) = self.browse.current_post.clone() {
            let total = self.scores.add_like(&post_id);
            self.scores.save();
            self.set_status_message(format!("{} likes", total));
        }
    }
}
