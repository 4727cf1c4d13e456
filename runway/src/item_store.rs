//! Item store: one record per logical row slot.
//!
//! Records are created lazily as the window grows past the end of the store
//! and are never removed individually. Rows are filled in order: the first
//! `loaded()` records hold data, the rest are pending.

use std::ops::{Index, IndexMut};

use crate::anchor::Heights;

/// A node attached to a slot, tagged with what it currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum Attached<N> {
    /// A skeleton node standing in for pending data.
    Placeholder(N),
    /// A node rendered from the slot's row data.
    Content(N),
}

impl<N> Attached<N> {
    /// The underlying node handle.
    pub fn node(&self) -> &N {
        match self {
            Attached::Placeholder(node) | Attached::Content(node) => node,
        }
    }

    pub fn into_node(self) -> N {
        match self {
            Attached::Placeholder(node) | Attached::Content(node) => node,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Attached::Placeholder(_))
    }
}

/// Per-slot state.
#[derive(Debug)]
pub struct ItemRecord<R, N> {
    /// Row payload, `None` while pending.
    pub data: Option<R>,
    /// Currently attached node, `None` when detached.
    pub node: Option<Attached<N>>,
    /// Measured height, `0.0` until measured.
    pub height: f32,
    /// Measured width, `0.0` until measured.
    pub width: f32,
    /// Last position written to the node; `None` forces a write.
    pub top: Option<f32>,
}

impl<R, N> ItemRecord<R, N> {
    fn pending() -> Self {
        Self {
            data: None,
            node: None,
            height: 0.0,
            width: 0.0,
            top: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.data.is_none()
    }

    pub fn is_measured(&self) -> bool {
        self.height > 0.0
    }
}

/// Ordered, monotonically growing list of item records.
#[derive(Debug)]
pub struct ItemStore<R, N> {
    records: Vec<ItemRecord<R, N>>,
    loaded: usize,
}

impl<R, N> ItemStore<R, N> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            loaded: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records that hold row data.
    pub fn loaded(&self) -> usize {
        self.loaded
    }

    /// Grow the store with pending records until it holds at least `len`.
    pub fn ensure_len(&mut self, len: usize) {
        while self.records.len() < len {
            self.records.push(ItemRecord::pending());
        }
    }

    /// Fill the next pending slot with `row`, appending a slot if needed.
    ///
    /// Returns the index the row landed on.
    pub fn push_row(&mut self, row: R) -> usize {
        let index = self.loaded;
        self.ensure_len(index + 1);
        self.records[index].data = Some(row);
        self.loaded += 1;
        index
    }

    /// Forget every cached size so the next pass measures again.
    pub fn invalidate_sizes(&mut self) {
        for record in &mut self.records {
            record.height = 0.0;
            record.width = 0.0;
        }
    }

    pub fn get(&self, index: usize) -> Option<&ItemRecord<R, N>> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ItemRecord<R, N>> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ItemRecord<R, N>> {
        self.records.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ItemRecord<R, N>> {
        self.records.iter_mut()
    }

    /// Drop every record, yielding the nodes that were still attached.
    pub fn drain_nodes(&mut self) -> Vec<N> {
        let nodes = self
            .records
            .drain(..)
            .filter_map(|record| record.node.map(Attached::into_node))
            .collect();
        self.loaded = 0;
        nodes
    }
}

impl<R, N> Default for ItemStore<R, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R, N> Index<usize> for ItemStore<R, N> {
    type Output = ItemRecord<R, N>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<R, N> IndexMut<usize> for ItemStore<R, N> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.records[index]
    }
}

impl<R, N> Heights for ItemStore<R, N> {
    fn len(&self) -> usize {
        self.records.len()
    }

    fn height(&self, index: usize) -> f32 {
        self.records[index].height
    }
}
