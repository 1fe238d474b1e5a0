//! Virtual scroll position and the triggers that turn it into progress.
//!
//! The window has no page to scroll, so the timeline keeps its own offset in
//! pixels, bounded by `viewport_height * span_factor`. Each trigger covers a
//! slice of that span (given as fractions so it survives resizes) and reports
//! progress in `[0, 1]`, optionally lagging behind the raw position by its
//! scrub time.

/// Where a trigger sits on the span, and how long it takes to catch up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerSpec {
    pub start: f32,
    pub end: f32,
    /// Seconds for progress to travel the full `[0, 1]` range. Zero follows
    /// the scroll position exactly.
    pub scrub: f32,
}

#[derive(Debug, Clone)]
struct ScrollTrigger {
    spec: TriggerSpec,
    start_px: f32,
    end_px: f32,
    progress: Option<f32>,
}

impl ScrollTrigger {
    fn new(spec: TriggerSpec, span: f32) -> Self {
        let mut trigger = Self { spec, start_px: 0.0, end_px: 0.0, progress: None };
        trigger.layout(span);
        trigger
    }

    fn layout(&mut self, span: f32) {
        self.start_px = self.spec.start * span;
        self.end_px = self.spec.end * span;
    }

    fn raw_progress(&self, offset: f32) -> f32 {
        let length = self.end_px - self.start_px;
        if length <= 0.0 {
            return if offset >= self.start_px { 1.0 } else { 0.0 };
        }
        ((offset - self.start_px) / length).clamp(0.0, 1.0)
    }

    /// Moves progress toward the raw position. Returns the new progress if it changed.
    fn advance(&mut self, offset: f32, dt: f32) -> Option<f32> {
        let raw = self.raw_progress(offset);
        let Some(previous) = self.progress else {
            // First evaluation reports wherever the scroll already is
            self.progress = Some(raw);
            return Some(raw);
        };

        let next = if self.spec.scrub <= 0.0 {
            raw
        } else {
            let max_step = dt.max(0.0) / self.spec.scrub;
            let gap = raw - previous;
            if gap.abs() <= max_step {
                raw
            } else {
                (previous + max_step * gap.signum()).clamp(0.0, 1.0)
            }
        };

        if next == previous {
            return None;
        }
        self.progress = Some(next);
        Some(next)
    }
}

#[derive(Debug, Clone)]
pub struct ScrollTimeline {
    offset: f32,
    span: f32,
    span_factor: f32,
    triggers: Vec<ScrollTrigger>,
}

impl ScrollTimeline {
    pub fn new(viewport_height: f32, span_factor: f32) -> Self {
        Self {
            offset: 0.0,
            span: (viewport_height * span_factor).max(0.0),
            span_factor,
            triggers: Vec::new(),
        }
    }

    /// Registers a trigger; its first progress report comes on the next `advance`.
    pub fn add_trigger(&mut self, spec: TriggerSpec) -> usize {
        self.triggers.push(ScrollTrigger::new(spec, self.span));
        self.triggers.len() - 1
    }

    pub fn has_triggers(&self) -> bool {
        !self.triggers.is_empty()
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.offset + delta);
    }

    pub fn scroll_to(&mut self, offset: f32) {
        self.offset = offset.clamp(0.0, self.span);
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn span(&self) -> f32 {
        self.span
    }

    /// Scroll position as a fraction of the span.
    pub fn position(&self) -> f32 {
        if self.span > 0.0 { self.offset / self.span } else { 0.0 }
    }

    /// Recomputes trigger bounds for a new viewport height, keeping the
    /// scroll position at the same fraction of the span. Heights with no
    /// area (a minimised window) leave the layout untouched.
    pub fn resize(&mut self, viewport_height: f32) {
        if !(viewport_height > 0.0) || !viewport_height.is_finite() {
            return;
        }
        let fraction = self.position();
        self.span = (viewport_height * self.span_factor).max(0.0);
        self.offset = fraction * self.span;
        for trigger in self.triggers.iter_mut() {
            trigger.layout(self.span);
        }
    }

    /// Steps every trigger by `dt` seconds, in registration order, calling
    /// `on_update(trigger_index, progress)` for each one whose progress moved.
    pub fn advance(&mut self, dt: f32, mut on_update: impl FnMut(usize, f32)) {
        for (i, trigger) in self.triggers.iter_mut().enumerate() {
            if let Some(progress) = trigger.advance(self.offset, dt) {
                on_update(i, progress);
            }
        }
    }
}
