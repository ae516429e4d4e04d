//! Archive catalog: filename parsing and post/artist grouping.
//!
//! Archive entries are named `{post_id}_p{page}-{title}-{artist}-{artist_id}`
//! with progressively degraded variants down to a bare leading id. Files are
//! grouped into works (posts) by id and into per-artist work lists.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use log::{info, warn};
use rand::seq::SliceRandom;
use regex::Regex;
use walkdir::WalkDir;

use crate::errors::{Result, ViewerError};

pub const SUPPORTED_IMAGE_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];
pub const SUPPORTED_VIDEO_EXTS: &[&str] =
    &["webm", "mp4", "mov", "avi", "mkv", "wmv", "flv", "m4v", "3gp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

/// One frame of a work, at a given page index.
#[derive(Debug, Clone, PartialEq)]
pub struct PageInfo {
    pub post_id: String,
    pub page: u32,
    pub title: String,
    pub artist: String,
    pub artist_id: String,
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl PageInfo {
    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Per-artist view of one work.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkSummary {
    pub post_id: String,
    pub artist: String,
    pub artist_id: String,
    pub page_count: usize,
    pub cover: PathBuf,
}

lazy_static! {
    // Most specific first, mirroring how the archive names degrade.
    static ref RE_FULL: Regex = Regex::new(r"^(\d+)_p(\d+)-(.+)-(.+)-(\d+)$").unwrap();
    static ref RE_NO_ARTIST_ID: Regex = Regex::new(r"^(\d+)_p(\d+)-(.+)-(.+)$").unwrap();
    static ref RE_TITLE_ONLY: Regex = Regex::new(r"^(\d+)_p(\d+)-(.+)$").unwrap();
    static ref RE_ID_PAGE: Regex = Regex::new(r"^(\d+)_p(\d+)$").unwrap();
    static ref RE_ID_PREFIX: Regex = Regex::new(r"^(\d+)_p").unwrap();
    static ref RE_LEADING_ID: Regex = Regex::new(r"^(\d+)").unwrap();
}

/// Classify a path by extension; `None` means not a supported media file.
pub fn media_kind(path: &Path) -> Option<MediaKind> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    if SUPPORTED_IMAGE_EXTS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if SUPPORTED_VIDEO_EXTS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}

/// Parse an archive entry. Never fails for a supported media file: names
/// that match no pattern produce a placeholder entry so the file still
/// shows up in the viewer.
pub fn parse_page(path: &Path) -> Option<PageInfo> {
    let kind = media_kind(path)?;
    let stem = path.file_stem()?.to_string_lossy();

    let page = |post_id: &str, page: u32, title: &str, artist: &str, artist_id: &str| PageInfo {
        post_id: post_id.to_string(),
        page,
        title: title.to_string(),
        artist: artist.to_string(),
        artist_id: artist_id.to_string(),
        path: path.to_path_buf(),
        kind,
    };

    if let Some(c) = RE_FULL.captures(&stem) {
        let page_no = c[2].parse().unwrap_or(0);
        return Some(page(&c[1], page_no, &c[3], &c[4], &c[5]));
    }
    if let Some(c) = RE_NO_ARTIST_ID.captures(&stem) {
        let page_no = c[2].parse().unwrap_or(0);
        // No separate artist id; the artist name doubles as one.
        let artist = c[4].to_string();
        return Some(page(&c[1], page_no, &c[3], &artist, &artist));
    }
    if let Some(c) = RE_TITLE_ONLY.captures(&stem) {
        let page_no = c[2].parse().unwrap_or(0);
        return Some(page(&c[1], page_no, &c[3], "Unknown", "unknown"));
    }
    if let Some(c) = RE_ID_PAGE.captures(&stem) {
        let page_no = c[2].parse().unwrap_or(0);
        return Some(page(&c[1], page_no, "Untitled", "Unknown", "unknown"));
    }
    if let Some(c) = RE_ID_PREFIX.captures(&stem) {
        return Some(page(&c[1], 0, "Untitled", "Unknown", "unknown"));
    }
    if let Some(c) = RE_LEADING_ID.captures(&stem) {
        return Some(page(&c[1], 0, "Untitled", "Unknown", "unknown"));
    }

    warn!("Could not parse archive entry name: {}", path.display());
    Some(page("unknown", 0, "Untitled", "Unknown", "unknown"))
}

/// In-memory index of the archive folder.
#[derive(Debug, Default)]
pub struct Catalog {
    root: PathBuf,
    pages: Vec<PageInfo>,
    posts: HashMap<String, Vec<PageInfo>>,
    artists: HashMap<String, Vec<WorkSummary>>,
    /// Post ids in natural order.
    post_ids: Vec<String>,
    /// Posts containing at least one video page, in `post_ids` order.
    video_posts: Vec<String>,
}

impl Catalog {
    /// Scan `root` for supported media and build the groupings.
    pub fn scan(root: &Path, include_subfolders: bool) -> Result<Self> {
        if !root.is_dir() {
            return Err(ViewerError::ArchiveNotFound {
                path: root.to_path_buf(),
            });
        }

        let max_depth = if include_subfolders { usize::MAX } else { 1 };
        let mut pages = Vec::new();
        for entry in WalkDir::new(root)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if let Some(page) = parse_page(entry.path()) {
                pages.push(page);
            }
        }

        let mut catalog = Self {
            root: root.to_path_buf(),
            pages,
            ..Self::default()
        };
        catalog.regroup();

        let videos = catalog
            .pages
            .iter()
            .filter(|p| p.is_video())
            .count();
        info!(
            "Scanned {}: {} files ({} videos), {} posts, {} artists",
            root.display(),
            catalog.pages.len(),
            videos,
            catalog.post_ids.len(),
            catalog.artists.len()
        );

        Ok(catalog)
    }

    fn regroup(&mut self) {
        self.posts.clear();
        self.artists.clear();
        self.post_ids.clear();
        self.video_posts.clear();

        for page in &self.pages {
            self.posts
                .entry(page.post_id.clone())
                .or_default()
                .push(page.clone());
        }

        for pages in self.posts.values_mut() {
            pages.sort_by(|a, b| {
                a.page
                    .cmp(&b.page)
                    .then_with(|| natord::compare(&a.file_name(), &b.file_name()))
            });
        }

        self.post_ids = self.posts.keys().cloned().collect();
        self.post_ids.sort_by(|a, b| natord::compare(a, b));

        for post_id in &self.post_ids {
            let pages = &self.posts[post_id];
            let first = &pages[0];
            self.artists
                .entry(first.artist_id.clone())
                .or_default()
                .push(WorkSummary {
                    post_id: post_id.clone(),
                    artist: first.artist.clone(),
                    artist_id: first.artist_id.clone(),
                    page_count: pages.len(),
                    cover: first.path.clone(),
                });
            if pages.iter().any(|p| p.is_video()) {
                self.video_posts.push(post_id.clone());
            }
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_empty(&self) -> bool {
        self.post_ids.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn post_count(&self) -> usize {
        self.post_ids.len()
    }

    pub fn artist_count(&self) -> usize {
        self.artists.len()
    }

    pub fn post_ids(&self) -> &[String] {
        &self.post_ids
    }

    pub fn contains_post(&self, post_id: &str) -> bool {
        self.posts.contains_key(post_id)
    }

    /// Pages of a post, sorted by page number. Empty for unknown ids.
    pub fn post_pages(&self, post_id: &str) -> &[PageInfo] {
        self.posts.get(post_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn artist_works(&self, artist_id: &str) -> &[WorkSummary] {
        self.artists.get(artist_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn video_posts(&self) -> &[String] {
        &self.video_posts
    }

    pub fn random_post(&self, prefer_video: bool) -> Option<&str> {
        let mut rng = rand::thread_rng();
        if prefer_video {
            if let Some(id) = self.video_posts.choose(&mut rng) {
                return Some(id);
            }
        }
        self.post_ids.choose(&mut rng).map(String::as_str)
    }

    /// Drop a page after it was deleted or moved on disk, and regroup.
    pub fn remove_page(&mut self, path: &Path) {
        let before = self.pages.len();
        self.pages.retain(|p| p.path != path);
        if self.pages.len() != before {
            self.regroup();
        }
    }
}
