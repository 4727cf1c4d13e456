//! Viewport controller.
//!
//! Owns the surface, the item store and the placeholder pool, and turns
//! scroll/resize notifications and fetched rows into attach, measure and
//! reposition passes. All state changes happen inside [`Viewport::update`];
//! anything that has to wait (the next frame, a fetch, the end of a
//! transition) comes back as a [`Command`] whose message carries the
//! [`Generation`] it was issued under. Messages from an older generation are
//! dropped, which is how `reset` cancels outstanding work.

use crate::anchor::{Anchor, Heights, offset_of, resolve_anchor};
use crate::command::Command;
use crate::config::ScrollerConfig;
use crate::error::ViewportError;
use crate::item_store::{Attached, ItemRecord, ItemStore};
use crate::primitives::{Rect, Size};
use crate::recycler::Recycler;
use crate::scheduler::Scheduler;
use crate::source::ContentSource;
use crate::surface::{Surface, Transition};
use crate::window::{Direction, Window};

/// Reset epoch. Deferred messages tagged with an older one are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Generation(u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Inputs to [`Viewport::update`].
#[derive(Debug)]
pub enum ViewportMessage<R> {
    /// The container's scroll position changed.
    Scrolled,
    /// The container or window changed size.
    Resized,
    /// A coalesced scroll pass is due.
    FrameReady(Generation),
    /// A fetch resolved.
    RowsFetched { generation: Generation, rows: Vec<R> },
    /// Placeholders of a finished transition can be recycled.
    TransitionDone { generation: Generation, batch: u64 },
}

/// A placeholder being replaced by content during the current pass.
struct Swap<N> {
    index: usize,
    placeholder: N,
    /// Placeholder top relative to the scroll position before the pass.
    relative_top: f32,
}

/// Virtualized, infinitely scrolling list bound to one surface.
pub struct Viewport<S, C>
where
    S: Surface,
    C: ContentSource<Node = S::Node>,
{
    config: ScrollerConfig,
    source: C,
    scheduler: Box<dyn Scheduler>,
    surface: Option<S>,
    items: ItemStore<C::Row, S::Node>,
    recycler: Recycler<S::Node>,
    /// Placeholders fading out, keyed by transition batch.
    fading: Vec<(u64, Vec<S::Node>)>,
    next_batch: u64,
    anchor: Anchor,
    /// Scroll position the anchor was last synchronized with.
    anchor_scroll_top: f32,
    last_screen: Anchor,
    window: Window,
    placeholder: Size,
    runway_end: f32,
    end: Option<usize>,
    fetching: bool,
    frame_pending: bool,
    generation: Generation,
}

impl<S, C> Viewport<S, C>
where
    S: Surface,
    C: ContentSource<Node = S::Node>,
{
    pub fn new(source: C, scheduler: impl Scheduler + 'static, config: ScrollerConfig) -> Self {
        let recycler = Recycler::new(config.placeholder_pool_capacity);
        Self {
            config,
            source,
            scheduler: Box::new(scheduler),
            surface: None,
            items: ItemStore::new(),
            recycler,
            fading: Vec::new(),
            next_batch: 0,
            anchor: Anchor::TOP,
            anchor_scroll_top: 0.0,
            last_screen: Anchor::TOP,
            window: Window::default(),
            placeholder: Size::ZERO,
            runway_end: 0.0,
            end: None,
            fetching: false,
            frame_pending: false,
            generation: Generation::default(),
        }
    }

    // =====================================================================
    // Lifecycle
    // =====================================================================

    /// Bind to `surface` and run the first layout pass.
    pub fn start(&mut self, surface: S) -> Result<Command<ViewportMessage<C::Row>>, ViewportError> {
        if self.surface.is_some() {
            return Err(ViewportError::AlreadyStarted);
        }
        tracing::info!(generation = self.generation.0, "starting viewport");
        self.surface = Some(surface);
        Ok(self.on_resize())
    }

    /// Tear everything down and hand the surface back.
    ///
    /// Every node is detached, the store and pool are emptied, and pending
    /// frames, fetches and transitions become stale. `source` replaces the
    /// current content source when given. Call [`start`](Self::start) again
    /// to resume.
    pub fn reset(&mut self, source: Option<C>) -> Result<S, ViewportError> {
        let Some(mut surface) = self.surface.take() else {
            return Err(ViewportError::NotStarted);
        };

        let nodes = self
            .items
            .drain_nodes()
            .into_iter()
            .chain(self.recycler.drain())
            .chain(self.fading.drain(..).flat_map(|(_, nodes)| nodes));
        for node in nodes {
            surface.detach(&node);
        }
        surface.set_runway_end(0.0);
        surface.set_scroll_top(0.0);

        self.items = ItemStore::new();
        self.recycler = Recycler::new(self.config.placeholder_pool_capacity);
        self.anchor = Anchor::TOP;
        self.anchor_scroll_top = 0.0;
        self.last_screen = Anchor::TOP;
        self.window = Window::default();
        self.placeholder = Size::ZERO;
        self.runway_end = 0.0;
        self.end = None;
        self.fetching = false;
        self.frame_pending = false;
        self.generation = self.generation.next();

        if let Some(source) = source {
            self.source = source;
        }

        tracing::info!(generation = self.generation.0, "viewport reset");
        Ok(surface)
    }

    /// Apply one message and return the follow-up work.
    pub fn update(&mut self, message: ViewportMessage<C::Row>) -> Command<ViewportMessage<C::Row>> {
        match message {
            ViewportMessage::Scrolled => self.on_scrolled(),
            ViewportMessage::Resized => self.on_resize(),
            ViewportMessage::FrameReady(generation) => {
                if generation != self.generation {
                    tracing::debug!("dropping frame from a previous generation");
                    return Command::none();
                }
                self.frame_pending = false;
                self.on_scroll()
            }
            ViewportMessage::RowsFetched { generation, rows } => self.add_content(generation, rows),
            ViewportMessage::TransitionDone { generation, batch } => {
                self.finish_transition(generation, batch);
                Command::none()
            }
        }
    }

    // =====================================================================
    // Event handling
    // =====================================================================

    /// Coalesce scroll notifications into one pass per frame.
    fn on_scrolled(&mut self) -> Command<ViewportMessage<C::Row>> {
        if self.surface.is_none() || self.frame_pending {
            return Command::none();
        }
        self.frame_pending = true;
        let generation = self.generation;
        let frame = self.scheduler.next_frame();
        Command::perform(async move {
            frame.await;
            ViewportMessage::FrameReady(generation)
        })
    }

    /// Re-measure the placeholder baseline and drop every cached size.
    fn on_resize(&mut self) -> Command<ViewportMessage<C::Row>> {
        let Some(surface) = self.surface.as_mut() else {
            return Command::none();
        };

        let probe = self.source.create_placeholder();
        surface.attach(&probe);
        surface.set_visible(&probe, true);
        self.placeholder = surface.measure(&probe);
        surface.detach(&probe);

        self.items.invalidate_sizes();
        tracing::debug!(
            width = self.placeholder.width,
            height = self.placeholder.height,
            "measured placeholder"
        );
        self.on_scroll()
    }

    /// Move the anchor to the current scroll position and refill the window.
    fn on_scroll(&mut self) -> Command<ViewportMessage<C::Row>> {
        let Some(surface) = self.surface.as_ref() else {
            return Command::none();
        };
        let scroll_top = surface.scroll_top();
        let viewport_height = surface.viewport_height();
        let delta = scroll_top - self.anchor_scroll_top;

        // At the very top, snap back exactly rather than trust accumulated
        // float error.
        self.anchor = if scroll_top <= 0.0 {
            Anchor::TOP
        } else {
            resolve_anchor(&self.items, self.placeholder.height, self.anchor, delta)
        };
        self.anchor_scroll_top = scroll_top;
        self.last_screen =
            resolve_anchor(&self.items, self.placeholder.height, self.anchor, viewport_height);

        self.window = Window::around(
            self.anchor,
            self.last_screen,
            Direction::of_delta(delta),
            &self.config,
            self.end,
        );
        tracing::trace!(
            delta,
            anchor = self.anchor.index,
            offset = self.anchor.offset,
            last = self.last_screen.index,
            "scroll pass"
        );
        self.attach_content()
    }

    /// Append a fetched batch, or record the end of the data.
    fn add_content(
        &mut self,
        generation: Generation,
        rows: Vec<C::Row>,
    ) -> Command<ViewportMessage<C::Row>> {
        if generation != self.generation {
            tracing::debug!(rows = rows.len(), "dropping rows fetched before a reset");
            return Command::none();
        }
        self.fetching = false;

        if rows.is_empty() {
            let end = self.last_screen.index;
            tracing::info!(end, "content source exhausted");
            self.end = Some(end);
            return Command::none();
        }

        let count = rows.len();
        for row in rows {
            self.items.push_row(row);
        }
        tracing::debug!(count, loaded = self.items.loaded(), "rows arrived");
        self.attach_content()
    }

    fn finish_transition(&mut self, generation: Generation, batch: u64) {
        if generation != self.generation {
            return;
        }
        let Some(pos) = self.fading.iter().position(|(id, _)| *id == batch) else {
            return;
        };
        let (_, nodes) = self.fading.swap_remove(pos);
        if let Some(surface) = self.surface.as_mut() {
            for node in nodes {
                self.recycler.release_placeholder(node, surface);
            }
        }
    }

    // =====================================================================
    // Passes
    // =====================================================================

    /// Attach, measure and position everything in the current window.
    fn attach_content(&mut self) -> Command<ViewportMessage<C::Row>> {
        let window = self.window;
        if window.is_empty() {
            tracing::debug!(first = window.first, last = window.last, "empty window, skipping pass");
            return Command::none();
        }
        let Some(surface) = self.surface.as_mut() else {
            return Command::none();
        };
        let placeholder = self.placeholder;

        // Reclaim nodes that left the window.
        for (index, record) in self.items.iter_mut().enumerate() {
            if window.contains(index) {
                continue;
            }
            match record.node.take() {
                Some(Attached::Placeholder(node)) => self.recycler.release_placeholder(node, surface),
                Some(Attached::Content(node)) => self.recycler.release_content(node),
                None => {}
            }
        }

        // Give every slot in the window a node.
        self.items.ensure_len(window.last);
        let mut swaps: Vec<Swap<S::Node>> = Vec::new();
        for index in window.indices() {
            let record = &mut self.items[index];
            let mut swapped = false;
            match record.node.take() {
                Some(Attached::Placeholder(node)) if record.data.is_some() => {
                    if self.config.animates() {
                        let top = record.top.unwrap_or(self.anchor_scroll_top);
                        swaps.push(Swap {
                            index,
                            placeholder: node,
                            relative_top: top - self.anchor_scroll_top,
                        });
                        swapped = true;
                    } else {
                        self.recycler.release_placeholder(node, surface);
                    }
                }
                Some(attached) => {
                    record.node = Some(attached);
                    continue;
                }
                None => {}
            }

            let attached = match &record.data {
                Some(row) => Attached::Content(self.source.render(row, self.recycler.take_content())),
                None => Attached::Placeholder(self.recycler.acquire_placeholder(&mut self.source, surface)),
            };
            surface.attach(attached.node());
            if swapped {
                surface.raise(attached.node());
            }
            record.top = None;
            record.node = Some(attached);
        }
        self.recycler.flush_content(surface);

        // Cache sizes of real content we have not measured yet.
        for index in window.indices() {
            let record = &mut self.items[index];
            if record.is_pending() || record.is_measured() {
                continue;
            }
            if let Some(attached) = &record.node {
                let size = surface.measure(attached.node());
                record.height = size.height;
                record.width = size.width;
            }
        }

        // Heights may have just become known: re-derive the anchor's
        // absolute offset and walk to the first attached item from there.
        self.anchor_scroll_top = offset_of(&self.items, placeholder.height, self.anchor);
        let mut cursor = self.anchor_scroll_top - self.anchor.offset;
        let mut j = self.anchor.index;
        while j > window.first {
            cursor -= self.items.height_or(j - 1, placeholder.height);
            j -= 1;
        }
        while j < window.first {
            cursor += self.items.height_or(j, placeholder.height);
            j += 1;
        }

        let duration = self.config.animation_duration();
        let mut swaps = swaps.into_iter().peekable();
        let mut fading = Vec::new();
        for index in window.indices() {
            let record: &mut ItemRecord<C::Row, S::Node> = &mut self.items[index];
            if let Some(attached) = &record.node {
                if let Some(swap) = swaps.next_if(|swap| swap.index == index) {
                    surface.play(Transition {
                        placeholder: &swap.placeholder,
                        content: attached.node(),
                        from: Rect::at_top(self.anchor_scroll_top + swap.relative_top, placeholder),
                        to: Rect::at_top(cursor, Size::new(record.width, record.height)),
                        duration,
                    });
                    fading.push(swap.placeholder);
                }
                if record.top != Some(cursor) {
                    surface.place(attached.node(), cursor);
                }
            }
            record.top = Some(cursor);
            cursor += if record.is_measured() { record.height } else { placeholder.height };
        }

        self.runway_end = self.runway_end.max(cursor + self.config.scroll_runway);
        surface.set_runway_end(self.runway_end);
        surface.set_scroll_top(self.anchor_scroll_top);

        tracing::debug!(
            first = window.first,
            last = window.last,
            anchor = self.anchor.index,
            scroll_top = self.anchor_scroll_top,
            runway = self.runway_end,
            "attach pass"
        );

        let mut commands = Vec::new();
        if !fading.is_empty() {
            let batch = self.next_batch;
            self.next_batch += 1;
            self.fading.push((batch, fading));
            let generation = self.generation;
            let delay = self.scheduler.delay(duration);
            commands.push(Command::perform(async move {
                delay.await;
                ViewportMessage::TransitionDone { generation, batch }
            }));
        }
        commands.push(self.maybe_request_content());
        Command::batch(commands)
    }

    /// Issue one fetch for the rows the window is missing, unless one is
    /// already in flight or the source is exhausted.
    fn maybe_request_content(&mut self) -> Command<ViewportMessage<C::Row>> {
        if self.fetching || self.end.is_some() {
            return Command::none();
        }
        let needed = self.window.last.saturating_sub(self.items.loaded());
        if needed == 0 {
            return Command::none();
        }

        self.fetching = true;
        tracing::debug!(needed, loaded = self.items.loaded(), "requesting rows");
        let generation = self.generation;
        let fetch = self.source.fetch(needed);
        Command::perform(async move {
            ViewportMessage::RowsFetched {
                generation,
                rows: fetch.await,
            }
        })
    }

    // =====================================================================
    // Accessors
    // =====================================================================

    pub fn config(&self) -> &ScrollerConfig {
        &self.config
    }

    pub fn is_started(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&S> {
        self.surface.as_ref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut S> {
        self.surface.as_mut()
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    /// Item at the top of the viewport.
    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Item at the bottom of the viewport.
    pub fn last_visible(&self) -> Anchor {
        self.last_screen
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn item(&self, index: usize) -> Option<&ItemRecord<C::Row, S::Node>> {
        self.items.get(index)
    }

    /// Number of slots in the store, pending ones included.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Number of slots holding row data.
    pub fn loaded_count(&self) -> usize {
        self.items.loaded()
    }

    /// Index past which no content exists, once known.
    pub fn end_index(&self) -> Option<usize> {
        self.end
    }

    pub fn is_fetching(&self) -> bool {
        self.fetching
    }

    pub fn placeholder_size(&self) -> Size {
        self.placeholder
    }

    pub fn runway_end(&self) -> f32 {
        self.runway_end
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn pooled_placeholders(&self) -> usize {
        self.recycler.pooled()
    }

    /// Placeholders still fading out behind freshly rendered content.
    pub fn fading_placeholders(&self) -> usize {
        self.fading.iter().map(|(_, nodes)| nodes.len()).sum()
    }
}
