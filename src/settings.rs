use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::viewport::ViewConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // Archive
    pub archive_folder: Option<PathBuf>,
    pub include_subfolders: bool,
    /// Subfolders of the archive that the quick-move buttons target.
    pub quick_move_folders: Vec<String>,

    // Zoom behavior
    pub zoom_min: f32,
    pub zoom_max: f32,
    /// Multiplicative step for wheel/keyboard zoom.
    pub zoom_step: f32,
    pub animation_steps: u32,
    pub animation_delay_ms: u64,
    pub smooth_zoom: bool,

    // Panels
    pub show_sidebar: bool,
    pub show_statusbar: bool,
    pub show_page_strip: bool,

    // Browsing
    pub video_first: bool,
    pub confirm_delete: bool,

    // File management
    pub recent_folders: Vec<PathBuf>,
    pub max_recent_folders: usize,

    // Session
    pub restore_session: bool,
    pub last_post: Option<String>,

    // Window state
    pub window_size: (f32, f32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            archive_folder: None,
            include_subfolders: false,
            quick_move_folders: vec!["sfw".to_string(), "junk".to_string()],

            zoom_min: 0.1,
            zoom_max: 5.0,
            zoom_step: 1.1,
            animation_steps: 10,
            animation_delay_ms: 15,
            smooth_zoom: true,

            show_sidebar: true,
            show_statusbar: true,
            show_page_strip: true,

            video_first: true,
            confirm_delete: true,

            recent_folders: Vec::new(),
            max_recent_folders: 10,

            restore_session: true,
            last_post: None,

            window_size: (1400.0, 900.0),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "miru", "Miru") {
            let config_path = proj_dirs.config_dir().join("settings.json");
            if config_path.exists() {
                if let Ok(content) = std::fs::read_to_string(&config_path) {
                    if let Ok(settings) = serde_json::from_str(&content) {
                        return settings;
                    }
                }
            }
        }
        Self::default()
    }

    pub fn save(&self) {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "miru", "Miru") {
            let config_dir = proj_dirs.config_dir();
            let _ = std::fs::create_dir_all(config_dir);
            let config_path = config_dir.join("settings.json");
            if let Ok(content) = serde_json::to_string_pretty(self) {
                let _ = std::fs::write(config_path, content);
            }
        }
    }

    pub fn add_recent_folder(&mut self, path: PathBuf) {
        self.recent_folders.retain(|p| p != &path);
        self.recent_folders.insert(0, path);
        if self.recent_folders.len() > self.max_recent_folders {
            self.recent_folders.truncate(self.max_recent_folders);
        }
    }

    /// Viewport tuning derived from the persisted zoom options.
    pub fn view_config(&self) -> ViewConfig {
        ViewConfig {
            min_scale: self.zoom_min,
            max_scale: self.zoom_max,
            step_factor: self.zoom_step,
            animation_steps: self.animation_steps,
            animation_delay: Duration::from_millis(self.animation_delay_ms),
        }
    }
}
