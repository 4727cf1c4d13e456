//! Anchor geometry.
//!
//! The scroll position is tracked as an [`Anchor`]: the index of the item at
//! the top of the viewport plus a pixel offset into it. Everything here is
//! pure math over cached item heights. Items whose height is `0.0` have not
//! been measured yet and count as exactly one placeholder height.

/// The item the viewport is scrolled to, and how far into it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub index: usize,
    pub offset: f32,
}

impl Anchor {
    /// The very top of the list.
    pub const TOP: Self = Self {
        index: 0,
        offset: 0.0,
    };

    #[inline]
    pub const fn new(index: usize, offset: f32) -> Self {
        Self { index, offset }
    }
}

/// Read access to cached item heights.
pub trait Heights {
    /// Number of known items.
    fn len(&self) -> usize;

    /// Cached height of item `index`, `0.0` when unmeasured.
    fn height(&self, index: usize) -> f32;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Height of `index`, falling back to `placeholder` when unmeasured or
    /// past the end.
    fn height_or(&self, index: usize, placeholder: f32) -> f32 {
        if index < self.len() {
            let h = self.height(index);
            if h > 0.0 {
                return h;
            }
        }
        placeholder
    }
}

impl Heights for [f32] {
    fn len(&self) -> usize {
        <[f32]>::len(self)
    }

    fn height(&self, index: usize) -> f32 {
        self[index]
    }
}

/// Resolve the anchor reached by scrolling `delta` pixels from `initial`.
///
/// Measured items are consumed whole; once the walk hits an unmeasured item
/// (or either end of the store) the remainder is converted into whole
/// placeholder-sized steps. The index never goes below zero.
pub fn resolve_anchor<H: Heights + ?Sized>(
    heights: &H,
    placeholder_height: f32,
    initial: Anchor,
    delta: f32,
) -> Anchor {
    if delta == 0.0 {
        return initial;
    }

    let mut delta = delta + initial.offset;
    let mut index = initial.index;
    let mut steps: isize = 0;

    if delta < 0.0 {
        while delta < 0.0 && index > 0 && index <= heights.len() && heights.height(index - 1) > 0.0 {
            delta += heights.height(index - 1);
            index -= 1;
        }
        if placeholder_height > 0.0 {
            let back = (delta.min(0.0) / placeholder_height).ceil() as isize;
            steps = back.max(-(index as isize));
        }
    } else {
        while delta > 0.0
            && index < heights.len()
            && heights.height(index) > 0.0
            && heights.height(index) < delta
        {
            delta -= heights.height(index);
            index += 1;
        }
        let unmeasured = index >= heights.len() || heights.height(index) <= 0.0;
        if unmeasured && placeholder_height > 0.0 {
            steps = (delta.max(0.0) / placeholder_height).floor() as isize;
        }
    }

    let index = (index as isize + steps).max(0) as usize;
    Anchor {
        index,
        offset: delta - steps as f32 * placeholder_height,
    }
}

/// Absolute pixel offset of `anchor` within the scrollable content.
pub fn offset_of<H: Heights + ?Sized>(heights: &H, placeholder_height: f32, anchor: Anchor) -> f32 {
    let above: f32 = (0..anchor.index)
        .map(|i| heights.height_or(i, placeholder_height))
        .sum();
    above + anchor.offset
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLACEHOLDER: f32 = 100.0;

    #[test]
    fn zero_delta_is_a_no_op() {
        let heights = [150.0f32; 4];
        let start = Anchor::new(2, 37.5);
        assert_eq!(resolve_anchor(&heights[..], PLACEHOLDER, start, 0.0), start);
    }

    #[test]
    fn unknown_content_scrolls_in_placeholder_steps() {
        let heights: [f32; 0] = [];
        let anchor = resolve_anchor(&heights[..], PLACEHOLDER, Anchor::TOP, 320.0);
        assert_eq!(anchor, Anchor::new(3, 20.0));
    }

    #[test]
    fn measured_rows_resnap_the_same_offset() {
        let heights = [150.0f32; 5];
        let anchor = resolve_anchor(&heights[..], PLACEHOLDER, Anchor::TOP, 320.0);
        assert_eq!(anchor, Anchor::new(2, 20.0));
        assert_eq!(offset_of(&heights[..], PLACEHOLDER, anchor), 320.0);
    }

    #[test]
    fn unmeasured_item_counts_one_placeholder() {
        // Item 1 is unmeasured: walking stops there and the rest is
        // converted into placeholder steps.
        let heights = [150.0f32, 0.0, 150.0];
        let anchor = resolve_anchor(&heights[..], PLACEHOLDER, Anchor::TOP, 260.0);
        assert_eq!(anchor, Anchor::new(2, 10.0));
        assert_eq!(offset_of(&heights[..], PLACEHOLDER, Anchor::new(2, 0.0)), 250.0);
    }

    #[test]
    fn walking_backwards_never_crosses_index_zero() {
        let heights = [0.0f32; 3];
        let anchor = resolve_anchor(&heights[..], PLACEHOLDER, Anchor::new(2, 10.0), -1_000.0);
        assert_eq!(anchor.index, 0);
    }

    #[test]
    fn backwards_through_measured_items() {
        let heights = [120.0f32, 80.0, 200.0];
        let anchor = resolve_anchor(&heights[..], PLACEHOLDER, Anchor::new(2, 30.0), -100.0);
        assert_eq!(anchor, Anchor::new(1, 10.0));
    }

    #[test]
    fn deltas_summing_to_zero_return_home() {
        let heights = [100.0f32, 140.0, 90.0, 210.0, 75.0, 160.0, 130.0];
        let start = Anchor::new(1, 25.0);
        let deltas = [250.0f32, -40.0, 130.0, -90.0, 60.0, -310.0];
        assert_eq!(deltas.iter().sum::<f32>(), 0.0);

        let end = deltas.iter().fold(start, |anchor, &d| {
            resolve_anchor(&heights[..], PLACEHOLDER, anchor, d)
        });
        assert_eq!(end, start);
    }

    #[test]
    fn zero_placeholder_height_takes_no_steps() {
        let heights: [f32; 0] = [];
        let anchor = resolve_anchor(&heights[..], 0.0, Anchor::TOP, 320.0);
        assert_eq!(anchor, Anchor::new(0, 320.0));
    }
}
