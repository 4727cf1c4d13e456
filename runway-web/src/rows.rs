//! Row model: scraped articles grouped into fixed-width rows.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// One article card scraped from a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub title: String,
    /// Absolute link to the article page.
    pub link: String,
    pub caption: String,
    pub date: String,
    /// Absolute image URL, if the card has one.
    pub image: Option<String>,
}

/// A slot in a row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Card {
    Article(Article),
    /// Pads out a short final row.
    Filler,
}

impl Card {
    pub fn article(&self) -> Option<&Article> {
        match self {
            Card::Article(article) => Some(article),
            Card::Filler => None,
        }
    }
}

/// One row of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingRow {
    pub id: u64,
    pub cards: Vec<Card>,
}

impl ListingRow {
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.cards.iter().filter_map(Card::article)
    }
}

/// Group `articles` into rows of `per_row` cards, taking row ids from `ids`.
///
/// Every article lands in exactly one row, in order. A short last row is
/// padded with [`Card::Filler`].
pub fn chunk_rows(articles: Vec<Article>, per_row: usize, ids: &AtomicU64) -> Vec<ListingRow> {
    if per_row == 0 {
        return Vec::new();
    }

    let mut rows = Vec::with_capacity(articles.len().div_ceil(per_row));
    let mut cards = Vec::with_capacity(per_row);
    for article in articles {
        cards.push(Card::Article(article));
        if cards.len() == per_row {
            rows.push(ListingRow {
                id: ids.fetch_add(1, Ordering::Relaxed),
                cards: std::mem::replace(&mut cards, Vec::with_capacity(per_row)),
            });
        }
    }

    if !cards.is_empty() {
        tracing::trace!(missing = per_row - cards.len(), "padding last row");
        cards.resize(per_row, Card::Filler);
        rows.push(ListingRow {
            id: ids.fetch_add(1, Ordering::Relaxed),
            cards,
        });
    }
    rows
}
