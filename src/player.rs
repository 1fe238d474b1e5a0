use log::info;
use crate::canvas::{Canvas, FrameImage};
use crate::config::{FrameMapping, Settings};
use crate::error::FrameError;
use crate::fit::cover;
use crate::frames::{FrameSet, LoadSummary};
use crate::playback::Playback;
use crate::scroll::{ScrollTimeline, TriggerSpec};
use crate::state::PlayerState;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// Frame number one trigger's progress points at, before clamping.
pub fn mapped_frame(mapping: FrameMapping, frame_count: usize, trigger: usize, progress: f32) -> f32 {
    let n = frame_count as f32;
    match mapping {
        FrameMapping::Linear { .. } => progress * (n - 1.0),
        FrameMapping::TwoPhase { split, .. } => {
            if trigger == 0 {
                progress * (n * split)
            } else {
                n * split + progress * (n * (1.0 - split))
            }
        }
    }
}

/// Target frame for the current progress of every trigger. Once the second
/// phase has started it owns the target, so triggers with different scrub
/// times cannot leave a stale phase-one value behind.
pub fn target_frame(mapping: FrameMapping, frame_count: usize, progress: &[f32]) -> f32 {
    let active = progress.iter().rposition(|&p| p > 0.0).unwrap_or(0);
    let p = progress.get(active).copied().unwrap_or(0.0);
    mapped_frame(mapping, frame_count, active, p)
}

fn trigger_specs(mapping: FrameMapping) -> Vec<TriggerSpec> {
    match mapping {
        FrameMapping::Linear { scrub } => vec![TriggerSpec { start: 0.0, end: 1.0, scrub }],
        FrameMapping::TwoPhase { split, scrub } => vec![
            TriggerSpec { start: 0.0, end: split, scrub: scrub.0 },
            TriggerSpec { start: split, end: 1.0, scrub: scrub.1 },
        ],
    }
}

/// Scroll-scrubbed image sequence: loading, scroll binding, smoothing and
/// cover-fit drawing of the frame under the playhead.
pub struct FrameSequencePlayer<T> {
    frames: FrameSet<T>,
    playback: Playback,
    timeline: ScrollTimeline,
    mapping: FrameMapping,
    viewport: Viewport,
    state: PlayerState,
    progress: Vec<f32>,
}

impl<T: FrameImage> FrameSequencePlayer<T> {
    pub fn new(settings: &Settings, viewport: Viewport) -> Self {
        Self {
            frames: FrameSet::new(settings.frame_count),
            playback: Playback::new(
                settings.frame_count,
                settings.smoothing,
                settings.settle_epsilon,
                settings.selection,
            ),
            timeline: ScrollTimeline::new(viewport.height, settings.span_factor),
            mapping: settings.mapping,
            viewport,
            state: PlayerState::Loading,
            progress: Vec::new(),
        }
    }

    /// Feeds one load outcome in. When it is the last one, hides the
    /// indicator, binds scrolling and starts the smoothing loop.
    pub fn settle(&mut self, index: usize, result: Result<T, FrameError>) -> Option<LoadSummary> {
        let summary = self.frames.settle(index, result)?;
        info!("All {} frames settled ({} loaded, {} failed)", self.frames.len(), summary.loaded, summary.failed);

        self.state = PlayerState::Ready;
        self.bind_scroll();
        Some(summary)
    }

    fn bind_scroll(&mut self) {
        if self.timeline.has_triggers() {
            return;
        }
        for spec in trigger_specs(self.mapping) {
            self.timeline.add_trigger(spec);
            self.progress.push(0.0);
        }
        if self.playback.start() {
            self.state = PlayerState::Animating;
        }
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.timeline.scroll_by(delta);
    }

    /// Scrolls by whole viewport heights.
    pub fn page_by(&mut self, pages: f32) {
        self.timeline.scroll_by(pages * self.viewport.height);
    }

    pub fn scroll_to_start(&mut self) {
        self.timeline.scroll_to(0.0);
    }

    pub fn scroll_to_end(&mut self) {
        self.timeline.scroll_to(self.timeline.span());
    }

    /// Returns true if the size actually changed. A viewport with no area,
    /// as reported for a minimised window, is ignored.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport || !(viewport.width > 0.0 && viewport.height > 0.0) {
            return false;
        }
        info!("Viewport resized to {}x{}", viewport.width, viewport.height);
        self.viewport = viewport;
        self.timeline.resize(viewport.height);
        true
    }

    /// One display tick: settle trigger progress, retarget, ease the playhead.
    pub fn update(&mut self, dt: f32) {
        let mapping = self.mapping;
        let frame_count = self.frames.len();
        let progress = &mut self.progress;
        let mut moved = false;
        self.timeline.advance(dt, |trigger, p| {
            progress[trigger] = p;
            moved = true;
        });
        if moved {
            self.playback.set_target(target_frame(mapping, frame_count, &self.progress));
        }
        self.playback.tick();
    }

    pub fn render<C: Canvas<Frame = T>>(&self, canvas: &mut C) {
        canvas.clear();
        let Some(frame) = self.frames.get(self.playback.frame_index()) else {
            return;
        };
        let (cw, ch) = canvas.size();
        if let Some(dest) = cover(cw, ch, frame.width() as f32, frame.height() as f32) {
            canvas.draw_frame(frame, dest);
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// The loading indicator shows until every frame has settled.
    pub fn indicator_visible(&self) -> bool {
        !self.frames.is_complete()
    }

    /// `(settled, total)` frame counts.
    pub fn load_progress(&self) -> (usize, usize) {
        (self.frames.settled(), self.frames.len())
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    pub fn trigger_progress(&self) -> &[f32] {
        &self.progress
    }

    pub fn scroll_offset(&self) -> f32 {
        self.timeline.offset()
    }

    pub fn scroll_position(&self) -> f32 {
        self.timeline.position()
    }
}
