//! The attached window: which item indices must have a node.

use crate::anchor::Anchor;
use crate::config::ScrollerConfig;

/// Direction of the last scroll, used to bias the runway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Scrolling up only when the content moved back; a zero delta counts as
    /// down.
    pub fn of_delta(delta: f32) -> Self {
        if delta < 0.0 { Direction::Up } else { Direction::Down }
    }
}

/// Half-open range `[first, last)` of item indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Window {
    pub first: usize,
    pub last: usize,
}

impl Window {
    pub const fn new(first: usize, last: usize) -> Self {
        Self { first, last }
    }

    /// Window around the visible span `[top, bottom]`, padded with runway
    /// items (more of them ahead of the scroll direction) and clamped to the
    /// end of the data when it is known.
    pub fn around(
        top: Anchor,
        bottom: Anchor,
        direction: Direction,
        config: &ScrollerConfig,
        end: Option<usize>,
    ) -> Self {
        let (before, after) = match direction {
            Direction::Up => (config.runway_items, config.runway_items_opposite),
            Direction::Down => (config.runway_items_opposite, config.runway_items),
        };
        let first = top.index.saturating_sub(before);
        let last = bottom.index.saturating_add(after);
        let last = match end {
            Some(end) => last.min(end),
            None => last,
        };
        Self { first, last }
    }

    /// Nothing to attach. A window whose end precedes its start counts too.
    pub fn is_empty(&self) -> bool {
        self.first >= self.last
    }

    pub fn len(&self) -> usize {
        self.last.saturating_sub(self.first)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.first && index < self.last
    }

    pub fn indices(&self) -> std::ops::Range<usize> {
        self.first..self.last.max(self.first)
    }
}
