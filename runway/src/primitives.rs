//! Geometry primitives shared by the controller and surfaces.
//!
//! All values are in surface pixels, with `y` growing downwards from the top
//! of the scrollable content.

/// A 2D size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A rectangle in content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    /// A rectangle of `size` whose top-left corner sits at `(0, top)`.
    #[inline]
    pub fn at_top(top: f32, size: Size) -> Self {
        Self {
            x: 0.0,
            y: top,
            width: size.width,
            height: size.height,
        }
    }
}
