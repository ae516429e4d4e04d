//! Persistent points/likes counters, keyed by post id.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use log::info;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

const SCORES_FILE: &str = "scores.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreStore {
    points: HashMap<String, u32>,
    likes: HashMap<String, u32>,
}

lazy_static! {
    static ref RE_PAGE_KEY: Regex = Regex::new(r"^(\d+)_p").unwrap();
    static ref RE_LEGACY_PREFIX: Regex = Regex::new(r"^user\}-(\d+)").unwrap();
    static ref RE_LEADING_DIGITS: Regex = Regex::new(r"^(\d+)").unwrap();
}

/// Pull a post id out of a counter key. Early versions keyed counters by
/// filename; current stores key by the bare post id.
fn extract_post_id(key: &str) -> Option<String> {
    if !key.is_empty() && key.chars().all(|c| c.is_ascii_digit()) {
        return Some(key.to_string());
    }

    let base = key.split('.').next().unwrap_or(key);

    if let Some(c) = RE_PAGE_KEY.captures(base) {
        return Some(c[1].to_string());
    }
    if let Some(c) = RE_LEGACY_PREFIX.captures(base) {
        return Some(c[1].to_string());
    }
    if let Some(c) = RE_LEADING_DIGITS.captures(base) {
        return Some(c[1].to_string());
    }

    None
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the platform data dir, migrating legacy keys if present.
    pub fn load() -> Self {
        let mut store = Self::default();
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "miru", "Miru") {
            let path = proj_dirs.data_dir().join(SCORES_FILE);
            if path.exists() {
                if let Ok(loaded) = Self::load_from(&path) {
                    store = loaded;
                }
            }
        }
        if store.migrate_legacy_keys() {
            store.save();
        }
        store
    }

    pub fn save(&self) {
        if let Some(proj_dirs) = directories::ProjectDirs::from("com", "miru", "Miru") {
            let data_dir = proj_dirs.data_dir();
            let _ = std::fs::create_dir_all(data_dir);
            let _ = self.save_to(&data_dir.join(SCORES_FILE));
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn points(&self, post_id: &str) -> u32 {
        self.points.get(post_id).copied().unwrap_or(0)
    }

    pub fn likes(&self, post_id: &str) -> u32 {
        self.likes.get(post_id).copied().unwrap_or(0)
    }

    pub fn add_point(&mut self, post_id: &str) -> u32 {
        let value = self.points.entry(post_id.to_string()).or_insert(0);
        *value += 1;
        *value
    }

    pub fn add_like(&mut self, post_id: &str) -> u32 {
        let value = self.likes.entry(post_id.to_string()).or_insert(0);
        *value += 1;
        *value
    }

    pub fn remove_post(&mut self, post_id: &str) {
        self.points.remove(post_id);
        self.likes.remove(post_id);
    }

    /// Collapse filename-keyed counters onto their post id: points are
    /// summed across pages, likes take the per-post maximum. Legacy keys
    /// are removed so the migration runs once. Returns whether anything
    /// changed.
    pub fn migrate_legacy_keys(&mut self) -> bool {
        let mut migrated_points: HashMap<String, u32> = HashMap::new();
        let mut migrated_likes: HashMap<String, u32> = HashMap::new();
        let mut legacy_point_keys = Vec::new();
        let mut legacy_like_keys = Vec::new();

        for (key, &value) in &self.points {
            if let Some(post_id) = extract_post_id(key) {
                if post_id != *key {
                    *migrated_points.entry(post_id).or_insert(0) += value;
                    legacy_point_keys.push(key.clone());
                }
            }
        }
        for (key, &value) in &self.likes {
            if let Some(post_id) = extract_post_id(key) {
                if post_id != *key {
                    let entry = migrated_likes.entry(post_id).or_insert(0);
                    *entry = (*entry).max(value);
                    legacy_like_keys.push(key.clone());
                }
            }
        }

        if migrated_points.is_empty() && migrated_likes.is_empty() {
            return false;
        }

        info!(
            "Migrating {} filename-keyed counters to post-based storage",
            legacy_point_keys.len() + legacy_like_keys.len()
        );

        for key in legacy_point_keys {
            self.points.remove(&key);
        }
        for key in legacy_like_keys {
            self.likes.remove(&key);
        }
        for (post_id, total) in migrated_points {
            *self.points.entry(post_id).or_insert(0) += total;
        }
        for (post_id, max_like) in migrated_likes {
            let entry = self.likes.entry(post_id).or_insert(0);
            *entry = (*entry).max(max_like);
        }
        true
    }
}
