//src/focus.rs
use std::time::{Duration, Instant};

/// Index of the exercise that should be expanded for a scroll position.
///
/// The scroll range is split evenly between the exercises; the very end of
/// the range belongs to the last one.
pub fn focused_index(offset: usize, max_offset: usize, count: usize) -> usize {
    if count == 0 || max_offset == 0 {
        return 0;
    }
    let fraction = offset.min(max_offset) as f64 / max_offset as f64;
    ((fraction * count as f64).floor() as usize).min(count - 1)
}

/// Scroll offset that brings exercise `index` into focus.
pub fn offset_for_index(index: usize, count: usize, max_offset: usize) -> usize {
    if count <= 1 {
        return 0;
    }
    let fraction = index.min(count - 1) as f64 / (count - 1) as f64;
    (max_offset as f64 * fraction).round() as usize
}

/// Derives the focused exercise from raw scroll input.
///
/// Scroll events are ignored while an expand transition is running and
/// shortly after a programmatic jump, so the jump's own scrolling does not
/// fight the requested focus.
#[derive(Debug, Clone)]
pub struct FocusTracker {
    index: usize,
    offset: usize,
    last_jump: Option<Instant>,
    transition_until: Option<Instant>,
    scroll_settle: Duration,
    transition: Duration,
}

impl FocusTracker {
    pub fn new(scroll_settle: Duration, transition: Duration) -> Self {
        Self {
            index: 0,
            offset: 0,
            last_jump: None,
            transition_until: None,
            scroll_settle,
            transition,
        }
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_animating(&self, now: Instant) -> bool {
        self.transition_until.is_some_and(|until| now < until)
    }

    /// Feeds a new raw scroll offset. Returns the new index when focus moved.
    pub fn on_scroll(
        &mut self,
        offset: usize,
        max_offset: usize,
        count: usize,
        now: Instant,
    ) -> Option<usize> {
        self.offset = offset.min(max_offset);
        if self.is_animating(now) {
            return None;
        }
        if self
            .last_jump
            .is_some_and(|at| now.saturating_duration_since(at) < self.scroll_settle)
        {
            return None;
        }
        let next = focused_index(self.offset, max_offset, count);
        if next == self.index {
            return None;
        }
        self.index = next;
        self.transition_until = Some(now + self.transition);
        Some(next)
    }

    /// Focuses `index` directly and returns the offset to scroll to.
    /// Refused (returns `None`) while a transition is running.
    pub fn jump_to(
        &mut self,
        index: usize,
        count: usize,
        max_offset: usize,
        now: Instant,
    ) -> Option<usize> {
        if count == 0 || self.is_animating(now) {
            return None;
        }
        let index = index.min(count - 1);
        self.offset = offset_for_index(index, count, max_offset);
        self.last_jump = Some(now);
        if index != self.index {
            self.index = index;
            self.transition_until = Some(now + self.transition);
        }
        Some(self.offset)
    }

    /// Keeps the index valid after the list changed length.
    pub fn clamp(&mut self, count: usize) {
        self.index = self.index.min(count.saturating_sub(1));
    }

    pub fn reset(&mut self) {
        self.index = 0;
        self.offset = 0;
        self.last_jump = None;
        self.transition_until = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SETTLE: Duration = Duration::from_millis(50);
    const TRANSITION: Duration = Duration::from_millis(500);

    #[test]
    fn index_follows_scroll_fraction() {
        assert_eq!(focused_index(0, 100, 4), 0);
        assert_eq!(focused_index(24, 100, 4), 0);
        assert_eq!(focused_index(25, 100, 4), 1);
        assert_eq!(focused_index(99, 100, 4), 3);
        assert_eq!(focused_index(100, 100, 4), 3);
        assert_eq!(focused_index(10, 0, 4), 0);
        assert_eq!(focused_index(10, 100, 0), 0);
    }

    #[test]
    fn jump_offset_spreads_over_range() {
        assert_eq!(offset_for_index(0, 3, 90), 0);
        assert_eq!(offset_for_index(1, 3, 90), 45);
        assert_eq!(offset_for_index(2, 3, 90), 90);
        assert_eq!(offset_for_index(0, 1, 90), 0);
    }

    #[test]
    fn scroll_is_ignored_during_transition() {
        let start = Instant::now();
        let mut tracker = FocusTracker::new(SETTLE, TRANSITION);
        assert_eq!(tracker.on_scroll(50, 100, 4, start), Some(2));
        assert!(tracker.is_animating(start + Duration::from_millis(100)));
        assert_eq!(
            tracker.on_scroll(0, 100, 4, start + Duration::from_millis(100)),
            None
        );
        assert_eq!(tracker.index(), 2);
        assert_eq!(tracker.on_scroll(0, 100, 4, start + TRANSITION), Some(0));
    }

    #[test]
    fn scroll_right_after_jump_is_ignored() {
        let start = Instant::now();
        let mut tracker = FocusTracker::new(SETTLE, Duration::ZERO);
        assert_eq!(tracker.jump_to(3, 4, 90, start), Some(90));
        assert_eq!(tracker.index(), 3);
        assert_eq!(
            tracker.on_scroll(0, 90, 4, start + Duration::from_millis(10)),
            None
        );
        assert_eq!(tracker.index(), 3);
        assert_eq!(
            tracker.on_scroll(0, 90, 4, start + Duration::from_millis(60)),
            Some(0)
        );
    }

    #[test]
    fn jump_refused_while_animating() {
        let start = Instant::now();
        let mut tracker = FocusTracker::new(SETTLE, TRANSITION);
        tracker.jump_to(1, 3, 60, start);
        assert_eq!(tracker.jump_to(2, 3, 60, start + SETTLE), None);
        assert_eq!(tracker.index(), 1);
    }
}
