//! Headless scroll run.
//!
//! Commands are spawned on the runtime and their messages come back through
//! one unbounded channel; only this task touches the viewport.

use anyhow::{Result, bail};
use runway::{Command, HeadlessSurface, ScrollerConfig, Size, Surface, TokioScheduler, Viewport, ViewportMessage};
use runway_web::{ListingRow, ListingSource, RowNode, RowView};
use tokio::sync::mpsc;

/// Width every row is laid out at.
const ROW_WIDTH: f32 = 960.0;
/// Height of a skeleton row.
const PLACEHOLDER_HEIGHT: f32 = 240.0;
/// Title and date lines of a card.
const HEADER_HEIGHT: f32 = 72.0;
const IMAGE_HEIGHT: f32 = 160.0;
const LINE_HEIGHT: f32 = 18.0;
/// Caption characters that fit on one line of a card.
const CHARS_PER_LINE: usize = 36;

type Message = ViewportMessage<ListingRow>;
type ListViewport = Viewport<HeadlessSurface<RowNode>, ListingSource>;

/// Parameters of one run.
#[derive(Debug, Clone, Copy)]
pub struct Drive {
    pub viewport_height: f32,
    pub scroll_step: f32,
    pub steps: usize,
    pub json: bool,
}

/// Layout height of a row: the tallest card decides.
pub fn measure(node: &RowNode) -> Size {
    let height = match &node.view {
        RowView::Placeholder(_) => PLACEHOLDER_HEIGHT,
        RowView::Populated(cards) => {
            let caption_lines = cards
                .iter()
                .map(|card| card.caption.chars().count().div_ceil(CHARS_PER_LINE))
                .max()
                .unwrap_or(0);
            let image = if cards.iter().any(|card| !card.image_hidden()) {
                IMAGE_HEIGHT
            } else {
                0.0
            };
            HEADER_HEIGHT + image + caption_lines as f32 * LINE_HEIGHT
        }
    };
    Size::new(ROW_WIDTH, height)
}

/// Routes command results back into the viewport.
struct Pump {
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    in_flight: usize,
}

impl Pump {
    fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx, in_flight: 0 }
    }

    fn dispatch(&mut self, command: Command<Message>) {
        self.in_flight += command.len();
        command.spawn(&self.tx);
    }

    /// Apply messages until no command is outstanding.
    async fn settle(&mut self, viewport: &mut ListViewport) -> Result<()> {
        while self.in_flight > 0 {
            let Some(message) = self.rx.recv().await else {
                bail!("command channel closed with {} commands outstanding", self.in_flight);
            };
            self.in_flight -= 1;
            let command = viewport.update(message);
            self.dispatch(command);
        }
        Ok(())
    }
}

pub async fn run(source: ListingSource, config: ScrollerConfig, drive: Drive) -> Result<()> {
    let scheduler = TokioScheduler::new(config.frame_interval());
    let mut viewport = Viewport::new(source, scheduler, config);
    let mut pump = Pump::new();

    let surface = HeadlessSurface::new(drive.viewport_height, measure);
    pump.dispatch(viewport.start(surface)?);
    pump.settle(&mut viewport).await?;
    report(&viewport, 0);

    for step in 1..=drive.steps {
        if let Some(surface) = viewport.surface_mut() {
            surface.scroll_by(drive.scroll_step);
        }
        pump.dispatch(viewport.update(ViewportMessage::Scrolled));
        pump.settle(&mut viewport).await?;
        report(&viewport, step);
    }

    if drive.json {
        for index in viewport.window().indices() {
            if let Some(row) = viewport.item(index).and_then(|record| record.data.as_ref()) {
                println!("{}", serde_json::to_string(row)?);
            }
        }
    }

    tracing::info!(
        loaded = viewport.loaded_count(),
        pages = viewport.source().last_page(),
        "run finished"
    );
    Ok(())
}

fn report(viewport: &ListViewport, step: usize) {
    let anchor = viewport.anchor();
    let window = viewport.window();
    let scroll_top = viewport.surface().map_or(0.0, |surface| surface.scroll_top());
    let end = viewport
        .end_index()
        .map_or_else(|| "-".to_string(), |end| end.to_string());
    println!(
        "step {step:>3}  scroll {scroll_top:>9.1}  anchor {:>4}+{:<6.1}  window {:>4}..{:<4}  loaded {:>5}  end {end}",
        anchor.index,
        anchor.offset,
        window.first,
        window.last,
        viewport.loaded_count(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use runway_web::{Article, Card, ListingRow};

    fn row(caption: &str, image: Option<&str>) -> ListingRow {
        ListingRow {
            id: 0,
            cards: vec![
                Card::Article(Article {
                    title: "Heat".into(),
                    link: "http://movie-blog.sx/heat/".into(),
                    caption: caption.into(),
                    date: "15.12.1995".into(),
                    image: image.map(String::from),
                }),
                Card::Filler,
            ],
        }
    }

    #[test]
    fn placeholder_rows_have_fixed_height() {
        assert_eq!(measure(&RowNode::placeholder(1, 4)), Size::new(ROW_WIDTH, PLACEHOLDER_HEIGHT));
    }

    #[test]
    fn rows_grow_with_caption_and_image() {
        let mut node = RowNode::placeholder(1, 4);

        node.fill(&row("", None));
        assert_eq!(measure(&node).height, HEADER_HEIGHT);

        node.fill(&row(&"x".repeat(CHARS_PER_LINE + 1), Some("http://movie-blog.sx/heat.jpg")));
        assert_eq!(measure(&node).height, HEADER_HEIGHT + IMAGE_HEIGHT + 2.0 * LINE_HEIGHT);
    }
}
