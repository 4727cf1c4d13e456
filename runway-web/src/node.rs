//! Row nodes: what the surface shows for one row.

use runway::NodeKey;
use serde::Serialize;

use crate::rows::{Card, ListingRow};

/// Fragment appended to card links so the target page opens on its result
/// view.
pub const RESULT_FRAGMENT: &str = "result";

/// Text shown in filler cards.
const FILLER_TITLE: &str = "PLATZHALTER";

/// Display state of one card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub title: String,
    pub href: Option<String>,
    pub caption: String,
    pub date: String,
    pub image: Option<String>,
}

impl CardView {
    fn from_card(card: &Card) -> Self {
        match card {
            Card::Article(article) => Self {
                title: article.title.clone(),
                href: Some(format!("{}#{RESULT_FRAGMENT}", article.link)),
                caption: article.caption.clone(),
                date: article.date.clone(),
                image: article.image.clone(),
            },
            Card::Filler => Self {
                title: FILLER_TITLE.to_string(),
                href: None,
                caption: String::new(),
                date: String::new(),
                image: None,
            },
        }
    }

    /// Whether the image slot is hidden.
    pub fn image_hidden(&self) -> bool {
        self.image.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "cards", rename_all = "snake_case")]
pub enum RowView {
    /// Skeleton with `n` empty card slots.
    Placeholder(usize),
    Populated(Vec<CardView>),
}

/// A row element. `key` is its identity on the surface and survives
/// re-rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowNode {
    pub key: u64,
    /// Id of the row currently rendered into this node.
    pub row_id: Option<u64>,
    pub view: RowView,
}

impl RowNode {
    pub fn placeholder(key: u64, cards: usize) -> Self {
        Self {
            key,
            row_id: None,
            view: RowView::Placeholder(cards),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.view, RowView::Placeholder(_))
    }

    /// Overwrite this node with `row`, keeping its key.
    pub fn fill(&mut self, row: &ListingRow) {
        self.row_id = Some(row.id);
        self.view = RowView::Populated(row.cards.iter().map(CardView::from_card).collect());
    }

    pub fn cards(&self) -> &[CardView] {
        match &self.view {
            RowView::Populated(cards) => cards,
            RowView::Placeholder(_) => &[],
        }
    }
}

impl NodeKey for RowNode {
    fn node_key(&self) -> u64 {
        self.key
    }
}
