//! Listing source for `runway`.
//!
//! Pages through a category or search listing of a blog-style site, scrapes
//! article cards out of the HTML and groups them into rows of cards that the
//! viewport renders as [`RowNode`]s. Pages are fetched concurrently and fail
//! soft: a page that cannot be loaded contributes nothing.

pub mod config;
pub mod error;
pub mod extract;
pub mod node;
pub mod rows;
pub mod source;

pub use config::{ITEMS_PER_PAGE, ITEMS_PER_ROW, ListingConfig, Section};
pub use error::{Result, SourceError};
pub use extract::CardSelectors;
pub use node::{CardView, RESULT_FRAGMENT, RowNode, RowView};
pub use rows::{Article, Card, ListingRow, chunk_rows};
pub use source::ListingSource;
