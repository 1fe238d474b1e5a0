use std::path::{Path, PathBuf};
use log::{debug, warn};
use crate::error::FrameError;

/// `dir/frame007.webp` for the 1-based frame number 7.
pub fn frame_path(dir: &Path, number: usize, format: &str) -> PathBuf {
    dir.join(format!("frame{:03}.{}", number, format))
}

/// Paths for frames `1..=count`, in slot order.
pub fn frame_paths(dir: &Path, count: usize, format: &str) -> Vec<PathBuf> {
    (1..=count).map(|n| frame_path(dir, n, format)).collect()
}

#[derive(Debug)]
pub enum FrameSlot<T> {
    Pending,
    Loaded(T),
    Failed,
}

impl<T> FrameSlot<T> {
    pub fn is_settled(&self) -> bool {
        !matches!(self, FrameSlot::Pending)
    }
}

/// Counts returned once, when the last slot settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    pub loaded: usize,
    pub failed: usize,
}

/// Fixed-size set of frame slots filled in as loads resolve.
#[derive(Debug)]
pub struct FrameSet<T> {
    slots: Vec<FrameSlot<T>>,
    settled: usize,
    failed: usize,
    completed: bool,
}

impl<T> FrameSet<T> {
    pub fn new(count: usize) -> Self {
        Self {
            slots: (0..count).map(|_| FrameSlot::Pending).collect(),
            settled: 0,
            failed: 0,
            completed: false,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn settled(&self) -> usize {
        self.settled
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Records the outcome of one load attempt. Failures are logged and kept
    /// as gaps. Out-of-range and repeat settles are ignored. Returns the
    /// summary exactly once, on the settle that brings the count to `len()`.
    pub fn settle(&mut self, index: usize, result: Result<T, FrameError>) -> Option<LoadSummary> {
        let Some(slot) = self.slots.get_mut(index) else {
            warn!("Ignoring result for unknown frame slot {}", index);
            return None;
        };
        if slot.is_settled() {
            debug!("Frame slot {} already settled", index);
            return None;
        }

        match result {
            Ok(frame) => {
                *slot = FrameSlot::Loaded(frame);
                debug!("Frame {} loaded", index + 1);
            }
            Err(e) => {
                *slot = FrameSlot::Failed;
                self.failed += 1;
                warn!("Frame {} failed to load: {}", index + 1, e);
            }
        }
        self.settled += 1;

        if self.settled == self.slots.len() && !self.completed {
            self.completed = true;
            return Some(LoadSummary { loaded: self.settled - self.failed, failed: self.failed });
        }
        None
    }

    /// The loaded frame at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        match self.slots.get(index) {
            Some(FrameSlot::Loaded(frame)) => Some(frame),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn missing(n: usize) -> FrameError {
        FrameError::Io {
            path: PathBuf::from(format!("frame{:03}.webp", n)),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        }
    }

    #[test]
    fn paths_are_one_based_and_zero_padded() {
        let paths = frame_paths(Path::new("frames"), 3, "webp");
        assert_eq!(paths[0], Path::new("frames/frame001.webp"));
        assert_eq!(paths[2], Path::new("frames/frame003.webp"));
        assert_eq!(frame_path(Path::new("f"), 1234, "png"), Path::new("f/frame1234.png"));
    }

    #[test]
    fn completes_once_after_every_attempt() {
        let mut set = FrameSet::new(4);
        assert_eq!(set.settle(2, Ok("c")), None);
        assert_eq!(set.settle(0, Err(missing(1))), None);
        assert_eq!(set.settle(3, Ok("d")), None);
        assert!(!set.is_complete());

        let summary = set.settle(1, Ok("b"));
        assert_eq!(summary, Some(LoadSummary { loaded: 3, failed: 1 }));
        assert!(set.is_complete());
        assert_eq!(set.settled(), 4);
    }

    #[test]
    fn repeat_and_unknown_settles_are_ignored() {
        let mut set = FrameSet::new(2);
        set.settle(0, Ok(1));
        assert_eq!(set.settle(0, Ok(2)), None);
        assert_eq!(set.settle(7, Ok(3)), None);
        assert_eq!(set.settled(), 1);
        assert_eq!(set.get(0), Some(&1));

        assert!(set.settle(1, Err(missing(2))).is_some());
        assert_eq!(set.settle(1, Ok(4)), None);
    }

    #[test]
    fn gaps_read_as_absent() {
        let mut set: FrameSet<u8> = FrameSet::new(3);
        set.settle(1, Err(missing(2)));
        assert_eq!(set.get(0), None);
        assert_eq!(set.get(1), None);
        assert_eq!(set.get(99), None);
    }
}
