use crate::config::Selection;

/// Continuous playhead that eases toward a scroll-driven target.
#[derive(Debug, Clone)]
pub struct Playback {
    frame_count: usize,
    current: f32,
    target: f32,
    smoothing: f32,
    settle_epsilon: f32,
    selection: Selection,
    is_animating: bool,
}

impl Playback {
    pub fn new(frame_count: usize, smoothing: f32, settle_epsilon: f32, selection: Selection) -> Self {
        Self {
            frame_count,
            current: 0.0,
            target: 0.0,
            smoothing,
            settle_epsilon,
            selection,
            is_animating: false,
        }
    }

    fn last_index(&self) -> f32 {
        self.frame_count.saturating_sub(1) as f32
    }

    pub fn set_target(&mut self, frame: f32) {
        let frame = match self.selection {
            Selection::Interpolated => frame,
            Selection::Snapped => frame.round(),
        };
        // NaN from a degenerate trigger collapses to the first frame
        self.target = if frame.is_nan() { 0.0 } else { frame.clamp(0.0, self.last_index()) };
    }

    /// Latches the smoothing loop on. Returns false if it was already running.
    pub fn start(&mut self) -> bool {
        if self.is_animating {
            return false;
        }
        self.is_animating = true;
        true
    }

    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// One display tick. Does nothing until started, or once settled.
    pub fn tick(&mut self) {
        if !self.is_animating || self.is_settled() {
            return;
        }
        self.current += (self.target - self.current) * self.smoothing;
        if (self.target - self.current).abs() <= self.settle_epsilon {
            self.current = self.target;
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Slot index to draw.
    pub fn frame_index(&self) -> usize {
        (self.current.round().max(0.0) as usize).min(self.frame_count.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing(n: usize, smoothing: f32) -> Playback {
        let mut p = Playback::new(n, smoothing, 0.05, Selection::Interpolated);
        p.start();
        p
    }

    #[test]
    fn target_is_clamped() {
        let mut p = playing(10, 0.3);
        p.set_target(-4.0);
        assert_eq!(p.target(), 0.0);
        p.set_target(42.0);
        assert_eq!(p.target(), 9.0);
        p.set_target(f32::NAN);
        assert_eq!(p.target(), 0.0);
    }

    #[test]
    fn snapped_selection_rounds_target() {
        let mut p = Playback::new(10, 0.3, 0.05, Selection::Snapped);
        p.set_target(3.4);
        assert_eq!(p.target(), 3.0);
        p.set_target(3.6);
        assert_eq!(p.target(), 4.0);
    }

    #[test]
    fn ticks_converge_without_overshoot() {
        for &smoothing in &[0.15, 0.3, 0.9, 1.0] {
            let mut p = playing(160, smoothing);
            p.set_target(143.7);
            let mut gap = (p.target() - p.current()).abs();
            for _ in 0..500 {
                p.tick();
                assert!(p.current() <= p.target());
                let next = (p.target() - p.current()).abs();
                assert!(next <= gap);
                gap = next;
            }
            assert!(p.is_settled());
            assert_eq!(p.frame_index(), 144);
        }
    }

    #[test]
    fn converges_downward_too() {
        let mut p = playing(50, 0.2);
        p.set_target(49.0);
        for _ in 0..200 {
            p.tick();
        }
        p.set_target(2.0);
        for _ in 0..200 {
            p.tick();
            assert!(p.current() >= p.target());
        }
        assert_eq!(p.current(), 2.0);
    }

    #[test]
    fn tick_is_inert_until_started() {
        let mut p = Playback::new(10, 0.5, 0.05, Selection::Interpolated);
        p.set_target(9.0);
        p.tick();
        assert_eq!(p.current(), 0.0);
        assert!(p.start());
        assert!(!p.start());
        p.tick();
        assert_eq!(p.current(), 4.5);
    }

    #[test]
    fn single_frame_sequence_stays_at_zero() {
        let mut p = playing(1, 0.3);
        p.set_target(0.7);
        p.tick();
        assert_eq!(p.frame_index(), 0);
    }
}
