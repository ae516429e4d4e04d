#[cfg(test)]
mod tests {
    use crate::app::navigation::Browse;
    use crate::catalog::{parse_page, Catalog, MediaKind, WorkSummary};
    use crate::scores::ScoreStore;
    use crate::viewport::{Tick, ViewConfig, ViewTransform};

    use eframe::egui::{Pos2, Vec2};
    use std::path::Path;
    use std::time::{Duration, Instant};

    const EPS: f32 = 1e-4;

    fn transform_with_media(w: f32, h: f32) -> ViewTransform {
        let mut vt = ViewTransform::new(ViewConfig::default());
        vt.set_media_size(Vec2::new(w, h));
        vt
    }

    /// Drive an animation to completion with generous tick spacing,
    /// following deferrals exactly as a host would. Returns the number of
    /// steps that actually advanced.
    fn run_animation(vt: &mut ViewTransform, start: Instant) -> u32 {
        let mut now = start;
        let mut steps = 0;
        for _ in 0..1000 {
            match vt.tick(now) {
                Tick::Idle => return steps,
                Tick::Deferred(delay) => now += delay,
                Tick::Advanced => {
                    steps += 1;
                    now += Duration::from_millis(20);
                }
                Tick::Finished => return steps + 1,
            }
        }
        panic!("animation did not terminate");
    }

    // Viewport transform

    #[test]
    fn test_zoom_clamp_saturates() {
        let mut vt = transform_with_media(1000.0, 1000.0);

        for _ in 0..50 {
            vt.zoom_to_point(1.5, Pos2::new(100.0, 100.0), false);
            assert!(vt.scale() <= 5.0 + EPS);
        }
        assert!((vt.scale() - 5.0).abs() < EPS);

        for _ in 0..50 {
            vt.zoom_to_point(0.5, Pos2::new(100.0, 100.0), false);
            assert!(vt.scale() >= 0.1 - EPS);
        }
        assert!((vt.scale() - 0.1).abs() < EPS);
    }

    #[test]
    fn test_zoom_is_anchored() {
        let mut vt = transform_with_media(1000.0, 1000.0);

        vt.zoom_to_point(2.0, Pos2::new(300.0, 300.0), false);

        let params = vt.view_params();
        assert!((params.scale - 2.0).abs() < EPS);
        assert!((params.offset.x - (-300.0)).abs() < EPS);
        assert!((params.offset.y - (-300.0)).abs() < EPS);

        // The image point that was under the anchor is still under it
        let img = (Vec2::new(300.0, 300.0) - params.offset) / params.scale;
        assert!((img.x - 300.0).abs() < EPS);
        assert!((img.y - 300.0).abs() < EPS);
    }

    #[test]
    fn test_instant_fit_centers() {
        let mut vt = transform_with_media(2000.0, 1000.0);

        vt.instant_fit(Vec2::new(800.0, 600.0));

        let params = vt.view_params();
        assert!((params.scale - 0.38).abs() < EPS);
        assert!((params.offset.x - 20.0).abs() < EPS);
        assert!((params.offset.y - 110.0).abs() < EPS);
        assert!(!vt.is_animating());
    }

    #[test]
    fn test_tiny_zoom_is_ignored() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        vt.pan(Vec2::new(12.0, 34.0), Instant::now());
        let before = vt.view_params();

        vt.zoom_to_point(1.005, Pos2::new(500.0, 500.0), true);

        assert_eq!(vt.view_params(), before);
        assert!(!vt.is_animating());
    }

    #[test]
    fn test_zoom_at_limit_starts_no_animation() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        vt.zoom_to_point(5.0, Pos2::ZERO, false);
        assert!((vt.scale() - 5.0).abs() < EPS);

        // Clamped change is below the epsilon: fully discarded
        vt.zoom_to_point(1.5, Pos2::new(100.0, 100.0), true);
        assert!(!vt.is_animating());
        assert!((vt.scale() - 5.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_sizes_are_noops() {
        let mut vt = ViewTransform::new(ViewConfig::default());
        let before = vt.view_params();

        // No media loaded
        vt.instant_fit(Vec2::new(800.0, 600.0));
        vt.reset_view(Vec2::new(800.0, 600.0));
        assert_eq!(vt.view_params(), before);
        assert!(!vt.is_animating());

        // Media loaded but degenerate canvas
        vt.set_media_size(Vec2::new(1000.0, 1000.0));
        vt.instant_fit(Vec2::new(0.0, 600.0));
        vt.instant_fit(Vec2::new(800.0, -1.0));
        assert_eq!(vt.view_params(), before);

        // Non-positive zoom factor
        vt.zoom_to_point(0.0, Pos2::new(10.0, 10.0), false);
        vt.zoom_to_point(-2.0, Pos2::new(10.0, 10.0), false);
        assert_eq!(vt.view_params(), before);
    }

    #[test]
    fn test_animation_runs_exact_step_count() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        let canvas = Vec2::new(800.0, 600.0);

        vt.reset_view(canvas);
        assert!(vt.is_animating());

        let steps = run_animation(&mut vt, Instant::now());
        assert_eq!(steps, ViewConfig::default().animation_steps);
        assert!(!vt.is_animating());

        // Landed exactly on the fitted target
        let expected_scale = (800.0f32 / 1000.0).min(600.0 / 1000.0) * 0.95;
        let params = vt.view_params();
        assert!((params.scale - expected_scale).abs() < EPS);
        assert!((params.offset.x - (800.0 - 1000.0 * expected_scale) / 2.0).abs() < EPS);
        assert!((params.offset.y - (600.0 - 1000.0 * expected_scale) / 2.0).abs() < EPS);
    }

    #[test]
    fn test_throttle_defers_steps_instead_of_dropping() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        let t0 = Instant::now();

        vt.zoom_to_point(2.0, Pos2::new(400.0, 300.0), true);

        // First step renders immediately
        assert_eq!(vt.tick(t0), Tick::Advanced);

        // 5 ms later is inside the ~60 Hz window: deferred, not advanced
        let early = t0 + Duration::from_millis(5);
        match vt.tick(early) {
            Tick::Deferred(delay) => assert_eq!(delay, Duration::from_millis(11)),
            other => panic!("expected deferral, got {:?}", other),
        }

        // Every remaining step still happens
        let steps = run_animation(&mut vt, t0 + Duration::from_millis(16));
        assert_eq!(steps + 1, ViewConfig::default().animation_steps);
        assert!((vt.scale() - 2.0).abs() < EPS);
    }

    #[test]
    fn test_pan_is_additive() {
        let mut a = transform_with_media(1000.0, 1000.0);
        let mut b = transform_with_media(1000.0, 1000.0);
        let t0 = Instant::now();

        a.pan(Vec2::new(10.0, 5.0), t0);
        a.pan(Vec2::new(-3.0, 7.0), t0 + Duration::from_millis(100));
        b.pan(Vec2::new(7.0, 12.0), t0);

        assert!((a.view_params().offset.x - b.view_params().offset.x).abs() < EPS);
        assert!((a.view_params().offset.y - b.view_params().offset.y).abs() < EPS);
    }

    #[test]
    fn test_pan_cancels_animation() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        vt.reset_view(Vec2::new(800.0, 600.0));
        assert!(vt.is_animating());

        vt.pan(Vec2::new(4.0, -2.0), Instant::now());

        assert!(!vt.is_animating());
        // Target snapped to current: finishing changes nothing further
        let frozen = vt.view_params();
        assert_eq!(vt.tick(Instant::now() + Duration::from_secs(1)), Tick::Idle);
        assert_eq!(vt.view_params(), frozen);
    }

    #[test]
    fn test_new_target_retargets_inflight_animation() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        let t0 = Instant::now();

        vt.zoom_to_point(2.0, Pos2::ZERO, true);
        let mut now = t0;
        for _ in 0..3 {
            assert_eq!(vt.tick(now), Tick::Advanced);
            now += Duration::from_millis(20);
        }

        // Mid-flight request redirects the animation from the current state
        let mid_scale = vt.scale();
        vt.zoom_to_point(0.5, Pos2::ZERO, true);
        assert!(vt.is_animating());

        let steps = run_animation(&mut vt, now);
        assert_eq!(steps, ViewConfig::default().animation_steps);
        assert!((vt.scale() - mid_scale * 0.5).abs() < EPS);
        assert!(!vt.is_animating());
    }

    #[test]
    fn test_instant_fit_cancels_animation() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        vt.zoom_to_point(3.0, Pos2::new(100.0, 100.0), true);
        assert!(vt.is_animating());

        vt.instant_fit(Vec2::new(800.0, 600.0));

        assert!(!vt.is_animating());
        assert_eq!(vt.tick(Instant::now()), Tick::Idle);
    }

    #[test]
    fn test_centered_zoom_keeps_canvas_center_fixed() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        let canvas = Vec2::new(800.0, 600.0);
        vt.instant_fit(canvas);

        let before = vt.view_params();
        let center = canvas * 0.5;
        let img_before = (center - before.offset) / before.scale;

        vt.zoom_in_centered(canvas);
        run_animation(&mut vt, Instant::now());

        let after = vt.view_params();
        assert!((after.scale - before.scale * 1.1).abs() < EPS);
        let img_after = (center - after.offset) / after.scale;
        assert!((img_after.x - img_before.x).abs() < 1e-2);
        assert!((img_after.y - img_before.y).abs() < 1e-2);
    }

    #[test]
    fn test_dirty_flag_is_consumed() {
        let mut vt = transform_with_media(1000.0, 1000.0);
        assert!(!vt.take_dirty());

        vt.instant_fit(Vec2::new(800.0, 600.0));
        assert!(vt.take_dirty());
        assert!(!vt.take_dirty());
    }

    // Catalog

    #[test]
    fn test_parse_full_pattern() {
        let page = parse_page(Path::new("12345_p0-Sunset-Rin-777.png")).unwrap();
        assert_eq!(page.post_id, "12345");
        assert_eq!(page.page, 0);
        assert_eq!(page.title, "Sunset");
        assert_eq!(page.artist, "Rin");
        assert_eq!(page.artist_id, "777");
        assert_eq!(page.kind, MediaKind::Image);
    }

    #[test]
    fn test_parse_hyphenated_title() {
        // Greedy title, but artist and id still split off the tail
        let page = parse_page(Path::new("123_p0-my-title-artist-42.png")).unwrap();
        assert_eq!(page.title, "my-title");
        assert_eq!(page.artist, "artist");
        assert_eq!(page.artist_id, "42");
    }

    #[test]
    fn test_parse_degraded_patterns() {
        let page = parse_page(Path::new("12345_p1-Sunset-Rin.png")).unwrap();
        assert_eq!(page.page, 1);
        // Artist name doubles as the id when none is present
        assert_eq!(page.artist, "Rin");
        assert_eq!(page.artist_id, "Rin");

        let page = parse_page(Path::new("12345_p2-Sunset.png")).unwrap();
        assert_eq!(page.title, "Sunset");
        assert_eq!(page.artist_id, "unknown");

        let page = parse_page(Path::new("999_p3.jpg")).unwrap();
        assert_eq!(page.post_id, "999");
        assert_eq!(page.page, 3);
        assert_eq!(page.title, "Untitled");

        let page = parse_page(Path::new("5555.gif")).unwrap();
        assert_eq!(page.post_id, "5555");
        assert_eq!(page.page, 0);
    }

    #[test]
    fn test_parse_fallback_and_rejects() {
        // Unparseable names still produce a placeholder entry
        let page = parse_page(Path::new("cover.png")).unwrap();
        assert_eq!(page.post_id, "unknown");

        // Unsupported extensions are not media
        assert!(parse_page(Path::new("notes.txt")).is_none());
        assert!(parse_page(Path::new("12345_p0")).is_none());
    }

    #[test]
    fn test_parse_video() {
        let page = parse_page(Path::new("321_p0-Clip-Vee-9.mp4")).unwrap();
        assert!(page.is_video());
    }

    #[test]
    fn test_catalog_scan_and_grouping() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for name in [
            "100_p1-A-Alice-1.png",
            "100_p0-A-Alice-1.png",
            "200_p0-B-Bob-2.mp4",
            "300_p0-C-Alice-1.png",
            "90_p0-D-Cara-3.png",
            "skip.txt",
        ] {
            std::fs::write(root.join(name), b"").unwrap();
        }
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("sub").join("400_p0-E-Eve-4.png"), b"").unwrap();

        let catalog = Catalog::scan(root, false).unwrap();

        // Subfolder and non-media entries are skipped
        assert_eq!(catalog.post_count(), 4);
        assert_eq!(catalog.page_count(), 5);

        // Natural id order, not lexicographic
        assert_eq!(catalog.post_ids(), &["90", "100", "200", "300"]);

        // Pages sorted by page number
        let pages = catalog.post_pages("100");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].page, 0);
        assert_eq!(pages[1].page, 1);

        // Artist grouping aggregates works with page counts
        let works = catalog.artist_works("1");
        assert_eq!(works.len(), 2);
        assert_eq!(works[0].post_id, "100");
        assert_eq!(works[0].page_count, 2);
        assert_eq!(works[1].post_id, "300");

        assert_eq!(catalog.video_posts(), &["200"]);
        assert!(catalog.artist_works("nobody").is_empty());
    }

    #[test]
    fn test_catalog_scan_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("1_p0.png"), b"").unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("sub").join("2_p0.png"), b"").unwrap();

        let catalog = Catalog::scan(root, true).unwrap();
        assert_eq!(catalog.post_count(), 2);
    }

    #[test]
    fn test_catalog_missing_root() {
        assert!(Catalog::scan(Path::new("/nonexistent/archive"), false).is_err());
    }

    #[test]
    fn test_catalog_remove_page() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("100_p0-A-Alice-1.png"), b"").unwrap();
        std::fs::write(root.join("100_p1-A-Alice-1.png"), b"").unwrap();

        let mut catalog = Catalog::scan(root, false).unwrap();
        catalog.remove_page(&root.join("100_p0-A-Alice-1.png"));
        assert_eq!(catalog.post_pages("100").len(), 1);
        assert!(catalog.contains_post("100"));

        catalog.remove_page(&root.join("100_p1-A-Alice-1.png"));
        assert!(!catalog.contains_post("100"));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_catalog_random_post_prefers_video() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::write(root.join("1_p0.png"), b"").unwrap();
        std::fs::write(root.join("2_p0.webm"), b"").unwrap();

        let catalog = Catalog::scan(root, false).unwrap();
        for _ in 0..10 {
            assert_eq!(catalog.random_post(true), Some("2"));
        }
        assert!(catalog.random_post(false).is_some());
    }

    // Score store

    #[test]
    fn test_scores_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.json");

        let mut store = ScoreStore::new();
        assert_eq!(store.points("123"), 0);
        assert_eq!(store.add_point("123"), 1);
        assert_eq!(store.add_point("123"), 2);
        assert_eq!(store.add_like("123"), 1);
        store.save_to(&path).unwrap();

        let loaded = ScoreStore::load_from(&path).unwrap();
        assert_eq!(loaded.points("123"), 2);
        assert_eq!(loaded.likes("123"), 1);
        assert_eq!(loaded.likes("999"), 0);
    }

    #[test]
    fn test_scores_remove_post() {
        let mut store = ScoreStore::new();
        store.add_point("123");
        store.add_like("123");
        store.remove_post("123");
        assert_eq!(store.points("123"), 0);
        assert_eq!(store.likes("123"), 0);
    }

    #[test]
    fn test_scores_legacy_migration() {
        let mut store: ScoreStore = serde_json::from_str(
            r#"{
                "points": {"123_p0.jpg": 2, "123_p1.jpg": 3, "999": 5},
                "likes": {"user}-777_3.jpg": 4, "777": 1}
            }"#,
        )
        .unwrap();

        assert!(store.migrate_legacy_keys());

        // Points sum across pages, likes take the per-post maximum
        assert_eq!(store.points("123"), 5);
        assert_eq!(store.points("999"), 5);
        assert_eq!(store.likes("777"), 4);
        assert_eq!(store.points("123_p0.jpg"), 0);

        // Idempotent after the legacy keys are gone
        assert!(!store.migrate_legacy_keys());
        assert_eq!(store.points("123"), 5);
    }

    // Browse state

    fn work(post_id: &str) -> WorkSummary {
        WorkSummary {
            post_id: post_id.to_string(),
            artist: "Alice".to_string(),
            artist_id: "1".to_string(),
            page_count: 1,
            cover: Path::new(post_id).to_path_buf(),
        }
    }

    #[test]
    fn test_browse_ring_wraps() {
        let mut browse = Browse::default();
        browse.ring = vec!["a".into(), "b".into(), "c".into()];

        assert_eq!(browse.step_work(true).as_deref(), Some("b"));
        assert_eq!(browse.step_work(true).as_deref(), Some("c"));
        assert_eq!(browse.step_work(true).as_deref(), Some("a"));
        assert_eq!(browse.step_work(false).as_deref(), Some("c"));
    }

    #[test]
    fn test_browse_artist_mode_cycles() {
        let mut browse = Browse::default();
        browse.ring = vec!["w1".into(), "w2".into(), "w3".into()];
        browse.set_work("w2", 1);

        browse.enter_artist(vec![work("w1"), work("w2"), work("w3")]);
        assert_eq!(browse.artist_index, 1);

        assert_eq!(browse.step_work(true).as_deref(), Some("w3"));
        assert_eq!(browse.step_work(true).as_deref(), Some("w1"));
        assert_eq!(browse.step_work(false).as_deref(), Some("w3"));

        browse.exit_artist();
        assert!(browse.artist_works.is_empty());
        // Back on the random ring
        assert_eq!(browse.step_work(true).as_deref(), Some("w3"));
    }

    #[test]
    fn test_browse_page_wraparound() {
        let mut browse = Browse::default();
        browse.set_work("w", 3);

        assert!(browse.next_page());
        assert_eq!(browse.page_index, 1);
        assert!(browse.next_page());
        assert!(browse.next_page());
        assert_eq!(browse.page_index, 0);
        assert!(browse.prev_page());
        assert_eq!(browse.page_index, 2);

        browse.set_work("single", 1);
        assert!(!browse.next_page());
        assert!(!browse.prev_page());
        assert_eq!(browse.page_index, 0);
    }

    #[test]
    fn test_browse_video_first() {
        let mut browse = Browse::default();
        browse.ring = vec!["a".into(), "v1".into(), "b".into()];

        let videos = vec!["v1".to_string()];
        assert_eq!(browse.first_post(&videos, true).as_deref(), Some("v1"));
        assert_eq!(browse.first_post(&videos, false).as_deref(), Some("a"));
        assert_eq!(browse.first_post(&[], true).as_deref(), Some("a"));
    }

    #[test]
    fn test_browse_remove_from_ring() {
        let mut browse = Browse::default();
        browse.ring = vec!["a".into(), "b".into(), "c".into()];
        browse.set_work("c", 1);
        assert_eq!(browse.ring_index, 2);

        // Removing an earlier entry keeps the index on the same post
        browse.remove_from_ring("a");
        assert_eq!(browse.current_ring_post(), Some("c"));

        // Removing the current tail wraps the index to the front
        browse.remove_from_ring("c");
        assert_eq!(browse.current_ring_post(), Some("b"));

        browse.remove_from_ring("b");
        assert_eq!(browse.current_ring_post(), None);
    }

    #[test]
    fn test_browse_history_dedup() {
        let mut browse = Browse::default();
        browse.set_work("a", 1);
        browse.set_work("b", 2);
        browse.set_work("a", 1);
        assert_eq!(browse.history, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(browse.page_count, 1);
        assert_eq!(browse.page_index, 0);
    }
}
