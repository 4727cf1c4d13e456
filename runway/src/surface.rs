//! The scroll container the controller renders into.

use std::time::Duration;

use crate::primitives::{Rect, Size};

/// A placeholder-to-content morph, described declaratively.
///
/// The content node starts at the placeholder's bounds and settles on its
/// own; the placeholder fades out over the same span. How that looks is up to
/// the surface.
#[derive(Debug)]
pub struct Transition<'a, N> {
    pub placeholder: &'a N,
    pub content: &'a N,
    /// Bounds of the placeholder when the swap happened.
    pub from: Rect,
    /// Final bounds of the content node.
    pub to: Rect,
    pub duration: Duration,
}

/// A scrollable viewport element.
///
/// Nodes stay owned by the controller; the surface only sees them by
/// reference. `attach` must tolerate nodes that are already attached.
pub trait Surface {
    type Node;

    /// Current scroll position of the container.
    fn scroll_top(&self) -> f32;

    /// Force the container's scroll position.
    fn set_scroll_top(&mut self, top: f32);

    /// Visible height of the container.
    fn viewport_height(&self) -> f32;

    fn attach(&mut self, node: &Self::Node);

    fn detach(&mut self, node: &Self::Node);

    /// Show or hide a node without detaching it. Showing a node also clears
    /// any transition state left on it.
    fn set_visible(&mut self, node: &Self::Node, visible: bool);

    /// Layout size of an attached node.
    fn measure(&mut self, node: &Self::Node) -> Size;

    /// Move a node to an absolute offset within the content.
    fn place(&mut self, node: &Self::Node, top: f32);

    /// Stack a node above its siblings.
    fn raise(&mut self, node: &Self::Node);

    fn play(&mut self, transition: Transition<'_, Self::Node>);

    /// Make the content scrollable down to at least `end`.
    fn set_runway_end(&mut self, end: f32);
}
