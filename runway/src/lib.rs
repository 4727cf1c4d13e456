//! Runway: an anchor-based virtualized list engine.
//!
//! Only the rows around the viewport are attached to the surface. The
//! scroll position is tracked as an [`Anchor`] (item index plus pixel offset)
//! so rows can change height after they are measured without the view
//! jumping. Rows that have not arrived yet are shown as placeholders, which
//! are recycled through a bounded pool and cross-faded into content once the
//! data lands.
//!
//! The engine is platform-neutral: a [`Surface`] does the drawing, a
//! [`ContentSource`] supplies rows and nodes, and a [`Scheduler`] provides
//! frame and delay timing. [`HeadlessSurface`] is an in-memory surface for
//! drivers and tests.

pub mod anchor;
pub mod command;
pub mod config;
pub mod error;
pub mod headless;
pub mod item_store;
pub mod primitives;
pub mod recycler;
pub mod scheduler;
pub mod source;
pub mod surface;
pub mod viewport;
pub mod window;

pub use anchor::{Anchor, Heights, offset_of, resolve_anchor};
pub use command::Command;
pub use config::ScrollerConfig;
pub use error::ViewportError;
pub use headless::{HeadlessSurface, NodeKey, NodeState, PlayedTransition};
pub use item_store::{Attached, ItemRecord, ItemStore};
pub use primitives::{Rect, Size};
pub use recycler::Recycler;
pub use scheduler::{FRAME_INTERVAL, ImmediateScheduler, Scheduler, TokioScheduler};
pub use source::ContentSource;
pub use surface::{Surface, Transition};
pub use viewport::{Generation, Viewport, ViewportMessage};
pub use window::{Direction, Window};
