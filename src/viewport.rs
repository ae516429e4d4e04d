//! Viewport transform for the image area.
//!
//! Maps the natural pixel space of the current media onto the canvas as a
//! scale + offset pair, with point-anchored zoom, animated transitions and
//! fit-to-window. Pure geometry: pixels are read and drawn elsewhere.

use eframe::egui::{Pos2, Vec2};
use std::time::{Duration, Instant};

/// Scale changes smaller than this are imperceptible and ignored outright.
const SCALE_EPSILON: f32 = 0.01;

/// Fit leaves a 5% margin so the media never touches the viewport edge.
const FIT_MARGIN: f32 = 0.95;

/// Floor between two rendered animation steps (~60 Hz).
const MIN_RENDER_INTERVAL: Duration = Duration::from_millis(16);

/// Zoom and animation tuning, injected at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewConfig {
    pub min_scale: f32,
    pub max_scale: f32,
    /// Multiplicative step for wheel/keyboard zoom.
    pub step_factor: f32,
    /// Interpolation step count for animated transitions.
    pub animation_steps: u32,
    /// Nominal delay between animation steps; the 60 Hz floor still applies.
    pub animation_delay: Duration,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 5.0,
            step_factor: 1.1,
            animation_steps: 10,
            animation_delay: Duration::from_millis(15),
        }
    }
}

/// Snapshot handed to the renderer once per drawn frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewParams {
    /// Rendered scale factor, 1.0 = native resolution.
    pub scale: f32,
    /// Canvas position of the scaled media's top-left corner.
    pub offset: Vec2,
}

/// What the host should do after a [`ViewTransform::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No animation in progress.
    Idle,
    /// The step came in under the render-interval floor. Re-tick after the
    /// returned delay; the step is deferred, never dropped.
    Deferred(Duration),
    /// One step applied. Re-tick after the configured animation delay.
    Advanced,
    /// The final step applied; current state now equals the target.
    Finished,
}

#[derive(Debug, Clone, Copy)]
struct Animation {
    start_scale: f32,
    start_offset: Vec2,
    /// Steps already rendered, in `0..animation_steps`.
    step: u32,
}

/// Current/target view state plus the in-flight animation, if any.
///
/// All sizing operations are silent no-ops while no media is loaded
/// (media size `(0, 0)`) or when handed a degenerate canvas.
#[derive(Debug)]
pub struct ViewTransform {
    config: ViewConfig,
    media_size: Vec2,
    scale: f32,
    offset: Vec2,
    target_scale: f32,
    target_offset: Vec2,
    animation: Option<Animation>,
    last_render: Option<Instant>,
    dirty: bool,
}

impl ViewTransform {
    pub fn new(config: ViewConfig) -> Self {
        Self {
            config,
            media_size: Vec2::ZERO,
            scale: 1.0,
            offset: Vec2::ZERO,
            target_scale: 1.0,
            target_offset: Vec2::ZERO,
            animation: None,
            last_render: None,
            dirty: false,
        }
    }

    /// Natural pixel dimensions of the active media. `(0, 0)` means none.
    pub fn set_media_size(&mut self, size: Vec2) {
        self.media_size = size;
    }

    pub fn media_size(&self) -> Vec2 {
        self.media_size
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            scale: self.scale,
            offset: self.offset,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Consumes the "state changed since last asked" flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Zoom by `factor` keeping the image point under `anchor` fixed.
    ///
    /// The new scale is clamped to the configured range before anything else
    /// happens; if the clamped change is below the epsilon the whole call is
    /// discarded, so a scroll burst at either limit causes no churn.
    pub fn zoom_to_point(&mut self, factor: f32, anchor: Pos2, animate: bool) {
        if factor <= 0.0 {
            return;
        }

        let new_scale = (self.scale * factor).clamp(self.config.min_scale, self.config.max_scale);
        if (new_scale - self.scale).abs() < SCALE_EPSILON {
            return;
        }

        // Image-space point currently under the anchor must stay put.
        let image_pt = (anchor.to_vec2() - self.offset) / self.scale;
        self.target_offset = anchor.to_vec2() - image_pt * new_scale;
        self.target_scale = new_scale;

        if animate {
            self.restart_animation();
        } else {
            self.scale = self.target_scale;
            self.offset = self.target_offset;
            self.animation = None;
            self.dirty = true;
        }
    }

    /// Fit and center the media in `canvas` with no animation. This is the
    /// right call when a new media item loads; [`Self::reset_view`] is the
    /// animated variant for the item already on screen.
    pub fn instant_fit(&mut self, canvas: Vec2) {
        let Some((scale, offset)) = self.fit_params(canvas) else {
            return;
        };
        self.scale = scale;
        self.offset = offset;
        self.target_scale = scale;
        self.target_offset = offset;
        self.animation = None;
        self.dirty = true;
    }

    /// Animate from the current state back to the fitted, centered view.
    pub fn reset_view(&mut self, canvas: Vec2) {
        let Some((scale, offset)) = self.fit_params(canvas) else {
            return;
        };
        self.target_scale = scale;
        self.target_offset = offset;
        self.restart_animation();
    }

    /// Translate by a pixel delta. Cancels any in-flight animation by
    /// snapping the target to the current state.
    pub fn pan(&mut self, delta: Vec2, now: Instant) {
        self.offset += delta;
        self.target_offset = self.offset;
        self.target_scale = self.scale;
        self.animation = None;

        // Bound redraw frequency during fast drags.
        if self.render_due(now) {
            self.dirty = true;
            self.last_render = Some(now);
        }
    }

    pub fn zoom_in_centered(&mut self, canvas: Vec2) {
        self.zoom_to_point(self.config.step_factor, (canvas * 0.5).to_pos2(), true);
    }

    pub fn zoom_out_centered(&mut self, canvas: Vec2) {
        self.zoom_to_point(1.0 / self.config.step_factor, (canvas * 0.5).to_pos2(), true);
    }

    /// Advance the animation, if one is running.
    ///
    /// `now` must come from a monotonic clock. A step that arrives inside
    /// the render-interval floor is deferred with the remaining delay, so
    /// load stretches wall-clock time but never skips steps: the easing
    /// curve is traversed exactly once per start.
    pub fn tick(&mut self, now: Instant) -> Tick {
        let Some(anim) = self.animation else {
            return Tick::Idle;
        };

        if let Some(last) = self.last_render {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < MIN_RENDER_INTERVAL {
                return Tick::Deferred(MIN_RENDER_INTERVAL - elapsed);
            }
        }

        let total = self.config.animation_steps.max(1);
        let step = anim.step + 1;

        // Cubic ease-out; t runs over 1..=total so the last step lands
        // exactly on the target.
        let t = step as f32 / total as f32;
        let progress = 1.0 - (1.0 - t).powi(3);

        self.scale = anim.start_scale + (self.target_scale - anim.start_scale) * progress;
        self.offset = anim.start_offset + (self.target_offset - anim.start_offset) * progress;
        self.dirty = true;
        self.last_render = Some(now);

        if step >= total {
            self.animation = None;
            Tick::Finished
        } else {
            self.animation = Some(Animation { step, ..anim });
            Tick::Advanced
        }
    }

    /// Restart the interpolation from the current state toward the current
    /// target. Called mid-flight this retargets the animation rather than
    /// dropping the new request.
    fn restart_animation(&mut self) {
        self.animation = Some(Animation {
            start_scale: self.scale,
            start_offset: self.offset,
            step: 0,
        });
    }

    fn fit_params(&self, canvas: Vec2) -> Option<(f32, Vec2)> {
        if canvas.x <= 0.0 || canvas.y <= 0.0 {
            return None;
        }
        if self.media_size.x <= 0.0 || self.media_size.y <= 0.0 {
            return None;
        }

        let scale_w = canvas.x / self.media_size.x;
        let scale_h = canvas.y / self.media_size.y;
        let scale = scale_w.min(scale_h) * FIT_MARGIN;
        let offset = (canvas - self.media_size * scale) * 0.5;
        Some((scale, offset))
    }

    fn render_due(&self, now: Instant) -> bool {
        self.last_render
            .map_or(true, |last| now.saturating_duration_since(last) >= MIN_RENDER_INTERVAL)
    }
}
