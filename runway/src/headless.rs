//! In-memory surface.
//!
//! Keeps the state a real scroll container would hold (scroll position,
//! attached nodes with their offset, visibility and stacking, the runway
//! extent) without drawing anything. Node sizes come from a caller-supplied
//! measure function. The driver binary and the tests run on it.

use std::collections::HashMap;
use std::time::Duration;

use crate::primitives::{Rect, Size};
use crate::surface::{Surface, Transition};

/// Height of the runway marker element past `runway_end`.
const RUNWAY_MARKER: f32 = 1.0;

/// Stable identity of a node, used to key per-node surface state.
pub trait NodeKey {
    fn node_key(&self) -> u64;
}

impl NodeKey for u64 {
    fn node_key(&self) -> u64 {
        *self
    }
}

/// What the surface knows about one attached node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeState {
    pub top: Option<f32>,
    pub visible: bool,
    pub z: u32,
}

/// A transition the controller asked the surface to play.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedTransition {
    pub placeholder: u64,
    pub content: u64,
    pub from: Rect,
    pub to: Rect,
    pub duration: Duration,
}

pub struct HeadlessSurface<N> {
    scroll_top: f32,
    viewport_height: f32,
    runway_end: f32,
    nodes: HashMap<u64, NodeState>,
    next_z: u32,
    place_writes: usize,
    transitions: Vec<PlayedTransition>,
    measure: Box<dyn Fn(&N) -> Size + Send>,
}

impl<N: NodeKey> HeadlessSurface<N> {
    pub fn new(viewport_height: f32, measure: impl Fn(&N) -> Size + Send + 'static) -> Self {
        Self {
            scroll_top: 0.0,
            viewport_height,
            runway_end: 0.0,
            nodes: HashMap::new(),
            next_z: 0,
            place_writes: 0,
            transitions: Vec::new(),
            measure: Box::new(measure),
        }
    }

    /// Largest reachable scroll position.
    pub fn max_scroll(&self) -> f32 {
        (self.runway_end + RUNWAY_MARKER - self.viewport_height).max(0.0)
    }

    /// Scroll to `top`, clamped to the scrollable range like a real container.
    pub fn scroll_to(&mut self, top: f32) {
        self.scroll_top = top.clamp(0.0, self.max_scroll());
    }

    /// Scroll by `delta` pixels (positive = further down the list).
    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll_to(self.scroll_top + delta);
    }

    /// Change the visible height, as a window resize would.
    pub fn resize(&mut self, viewport_height: f32) {
        self.viewport_height = viewport_height;
        self.scroll_to(self.scroll_top);
    }

    pub fn runway_end(&self) -> f32 {
        self.runway_end
    }

    pub fn state(&self, node: &N) -> Option<NodeState> {
        self.nodes.get(&node.node_key()).copied()
    }

    pub fn is_attached(&self, node: &N) -> bool {
        self.nodes.contains_key(&node.node_key())
    }

    pub fn is_visible(&self, node: &N) -> bool {
        self.state(node).is_some_and(|s| s.visible)
    }

    pub fn top_of(&self, node: &N) -> Option<f32> {
        self.state(node).and_then(|s| s.top)
    }

    pub fn attached_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn visible_count(&self) -> usize {
        self.nodes.values().filter(|s| s.visible).count()
    }

    /// Number of position writes received so far.
    pub fn place_writes(&self) -> usize {
        self.place_writes
    }

    pub fn transitions(&self) -> &[PlayedTransition] {
        &self.transitions
    }
}

impl<N: NodeKey> Surface for HeadlessSurface<N> {
    type Node = N;

    fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    fn set_scroll_top(&mut self, top: f32) {
        self.scroll_to(top);
    }

    fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    fn attach(&mut self, node: &N) {
        self.nodes.entry(node.node_key()).or_insert(NodeState {
            top: None,
            visible: true,
            z: 0,
        });
    }

    fn detach(&mut self, node: &N) {
        self.nodes.remove(&node.node_key());
    }

    fn set_visible(&mut self, node: &N, visible: bool) {
        if let Some(state) = self.nodes.get_mut(&node.node_key()) {
            state.visible = visible;
            if visible {
                state.z = 0;
            }
        }
    }

    fn measure(&mut self, node: &N) -> Size {
        (self.measure)(node)
    }

    fn place(&mut self, node: &N, top: f32) {
        if let Some(state) = self.nodes.get_mut(&node.node_key()) {
            state.top = Some(top);
            self.place_writes += 1;
        }
    }

    fn raise(&mut self, node: &N) {
        self.next_z += 1;
        if let Some(state) = self.nodes.get_mut(&node.node_key()) {
            state.z = self.next_z;
        }
    }

    fn play(&mut self, transition: Transition<'_, N>) {
        self.transitions.push(PlayedTransition {
            placeholder: transition.placeholder.node_key(),
            content: transition.content.node_key(),
            from: transition.from,
            to: transition.to,
            duration: transition.duration,
        });
    }

    fn set_runway_end(&mut self, end: f32) {
        self.runway_end = end;
    }
}
