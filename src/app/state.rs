use crate::catalog::{Catalog, PageInfo};
use crate::scores::ScoreStore;
use crate::settings::Settings;
use crate::viewport::ViewTransform;

use eframe::egui::{TextureHandle, Vec2};
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};

use super::navigation::Browse;

pub enum LoaderMessage {
    PageLoaded(PathBuf, DynamicImage),
    LoadError(PathBuf, String),
}

pub struct ViewerApp {
    // Settings
    pub settings: Settings,

    // Archive index and counters
    pub catalog: Catalog,
    pub scores: ScoreStore,

    // View state
    pub viewport: ViewTransform,
    pub available_view_size: Vec2, // Available space for media display
    /// Fit the freshly loaded page once the image area has been measured.
    pub pending_fit: bool,

    // Browse state
    pub browse: Browse,

    // Current page
    pub current_texture: Option<TextureHandle>,
    pub is_loading: bool,
    pub load_error: Option<String>,

    // Async loading
    pub loader_tx: Sender<LoaderMessage>,
    pub loader_rx: Receiver<LoaderMessage>,

    // Status message
    pub status_message: Option<(String, std::time::Instant)>,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let (tx, rx) = channel();

        let settings = Settings::load();
        let scores = ScoreStore::load();
        let viewport = ViewTransform::new(settings.view_config());

        let mut app = Self {
            settings,
            catalog: Catalog::default(),
            scores,
            viewport,
            available_view_size: Vec2::new(800.0, 600.0), // Default fallback
            pending_fit: false,
            browse: Browse::default(),
            current_texture: None,
            is_loading: false,
            load_error: None,
            loader_tx: tx,
            loader_rx: rx,
            status_message: None,
        };

        // Command line argument wins over the remembered archive
        let args: Vec<String> = std::env::args().collect();
        if args.len() > 1 {
            let path = PathBuf::from(&args[1]);
            if path.is_dir() {
                app.load_archive(path, &cc.egui_ctx);
                return app;
            }
        }

        if let Some(folder) = app.settings.archive_folder.clone() {
            if folder.exists() {
                app.load_archive(folder, &cc.egui_ctx);
            }
        }

        app
    }

    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, std::time::Instant::now()));
    }

    /// Page currently on screen, looked up fresh from the catalog.
    pub fn current_page(&self) -> Option<&PageInfo> {
        let post_id = self.browse.current_post.as_deref()?;
        self.catalog.post_pages(post_id).get(self.browse.page_index)
    }
}
