//! Node recycling.
//!
//! Placeholders leaving the window are hidden and parked in a bounded
//! free-list instead of being destroyed. Content nodes leaving the window are
//! handed back to the source for in-place re-rendering during the same pass;
//! whatever is left unclaimed at the end of the pass is detached.

use crate::source::ContentSource;
use crate::surface::Surface;

pub struct Recycler<N> {
    placeholders: Vec<N>,
    capacity: usize,
    reusable: Vec<N>,
}

impl<N> Recycler<N> {
    pub fn new(capacity: usize) -> Self {
        Self {
            placeholders: Vec::new(),
            capacity,
            reusable: Vec::new(),
        }
    }

    /// Number of hidden placeholders waiting for reuse.
    pub fn pooled(&self) -> usize {
        self.placeholders.len()
    }

    /// Park a placeholder, or detach it once the pool is full.
    pub fn release_placeholder<S>(&mut self, node: N, surface: &mut S)
    where
        S: Surface<Node = N>,
    {
        if self.placeholders.len() < self.capacity {
            surface.set_visible(&node, false);
            self.placeholders.push(node);
        } else {
            tracing::trace!("placeholder pool full, detaching");
            surface.detach(&node);
        }
    }

    /// Reuse a pooled placeholder or ask the source for a new one.
    pub fn acquire_placeholder<S, C>(&mut self, source: &mut C, surface: &mut S) -> N
    where
        S: Surface<Node = N>,
        C: ContentSource<Node = N>,
    {
        match self.placeholders.pop() {
            Some(node) => {
                surface.set_visible(&node, true);
                node
            }
            None => source.create_placeholder(),
        }
    }

    pub fn release_content(&mut self, node: N) {
        self.reusable.push(node);
    }

    pub fn take_content(&mut self) -> Option<N> {
        self.reusable.pop()
    }

    /// Detach content nodes nobody claimed this pass.
    pub fn flush_content<S>(&mut self, surface: &mut S)
    where
        S: Surface<Node = N>,
    {
        for node in self.reusable.drain(..) {
            surface.detach(&node);
        }
    }

    /// Take every node the recycler holds.
    pub fn drain(&mut self) -> Vec<N> {
        let mut nodes: Vec<N> = self.placeholders.drain(..).collect();
        nodes.append(&mut self.reusable);
        nodes
    }
}
