//! Article extraction from listing HTML.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::error::{Result, SourceError};
use crate::rows::Article;

/// Length of the clock suffix trailing every card date (" Uhr").
const DATE_SUFFIX_CHARS: usize = 3;

/// Compiled selectors for one card layout.
#[derive(Debug, Clone)]
pub struct CardSelectors {
    card: Selector,
    title: Selector,
    link: Selector,
    caption: Selector,
    date: Selector,
    image: Selector,
    image_fallback: Selector,
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| SourceError::selector(selector, e))
}

impl CardSelectors {
    /// Selectors for cards rooted at `card`.
    pub fn new(card: &str) -> Result<Self> {
        Ok(Self {
            card: compile(card)?,
            title: compile("h1")?,
            link: compile("h1 > a")?,
            caption: compile(".eintrag_x > p")?,
            date: compile("p.date_x")?,
            image: compile(".eintrag_x p > img")?,
            image_fallback: compile(".eintrag_x > img")?,
        })
    }

    /// Pull every well-formed card out of `html`. Relative links and image
    /// sources are resolved against `page_url`.
    pub fn extract(&self, html: &str, page_url: &Url) -> Vec<Article> {
        let document = Html::parse_document(html);
        document
            .select(&self.card)
            .filter_map(|card| self.article(card, page_url))
            .collect()
    }

    fn article(&self, card: ElementRef<'_>, page_url: &Url) -> Option<Article> {
        let title = text_of(card.select(&self.title).next()?);
        let href = card.select(&self.link).next()?.value().attr("href")?;
        let Some(link) = resolve(page_url, href) else {
            tracing::trace!(href, "skipping card with unresolvable link");
            return None;
        };

        let caption = card.select(&self.caption).next().map(text_of).unwrap_or_default();
        let date = card
            .select(&self.date)
            .next()
            .map(|date| strip_clock(&text_of(date)))
            .unwrap_or_default();
        let image = card
            .select(&self.image)
            .next()
            .or_else(|| card.select(&self.image_fallback).next())
            .and_then(|img| img.value().attr("src"))
            .and_then(|src| resolve(page_url, src));

        Some(Article {
            title,
            link,
            caption,
            date,
            image,
        })
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn resolve(base: &Url, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    base.join(reference).ok().map(String::from)
}

fn strip_clock(date: &str) -> String {
    let keep = date.chars().count().saturating_sub(DATE_SUFFIX_CHARS);
    date.chars().take(keep).collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
          <div class="beitrag2">
            <h1><a href="/dune-part-two/">Dune: Part Two</a></h1>
            <div class="eintrag_x">
              <p><img src="/img/dune.jpg"> Paul Atreides unites with the Fremen.</p>
            </div>
            <p class="date_x">01.03.2024 Uhr</p>
          </div>
          <div class="beitrag2">
            <h1><a href="http://cdn.example.com/oppenheimer/">Oppenheimer</a></h1>
            <div class="eintrag_x">
              <img src="http://cdn.example.com/o.png">
              <p>The story of J. Robert Oppenheimer.</p>
            </div>
            <p class="date_x">20.07.2023 Uhr</p>
          </div>
          <div class="beitrag2">
            <h1>No link here</h1>
          </div>
          <div class="beitrag2">
            <h1><a href="/plain/">Plain</a></h1>
          </div>
        </body></html>
    "#;

    fn page_url() -> Url {
        Url::parse("http://movie-blog.sx/category/hd/page/1/").expect("url")
    }

    #[test]
    fn extracts_cards_in_document_order() {
        let selectors = CardSelectors::new("div.beitrag2").expect("selectors");
        let articles = selectors.extract(PAGE, &page_url());

        assert_eq!(articles.len(), 3);
        let dune = &articles[0];
        assert_eq!(dune.title, "Dune: Part Two");
        assert_eq!(dune.link, "http://movie-blog.sx/dune-part-two/");
        assert_eq!(dune.caption, "Paul Atreides unites with the Fremen.");
        assert_eq!(dune.date, "01.03.2024");
        assert_eq!(dune.image.as_deref(), Some("http://movie-blog.sx/img/dune.jpg"));
    }

    #[test]
    fn falls_back_to_direct_image() {
        let selectors = CardSelectors::new("div.beitrag2").expect("selectors");
        let articles = selectors.extract(PAGE, &page_url());
        assert_eq!(articles[1].image.as_deref(), Some("http://cdn.example.com/o.png"));
    }

    #[test]
    fn missing_optional_parts_are_empty() {
        let selectors = CardSelectors::new("div.beitrag2").expect("selectors");
        let plain = &selectors.extract(PAGE, &page_url())[2];
        assert_eq!(plain.title, "Plain");
        assert!(plain.caption.is_empty());
        assert!(plain.date.is_empty());
        assert_eq!(plain.image, None);
    }

    #[test]
    fn other_layouts_match_nothing() {
        let selectors = CardSelectors::new("div.post").expect("selectors");
        assert!(selectors.extract(PAGE, &page_url()).is_empty());
    }

    #[test]
    fn invalid_card_selector_is_reported() {
        assert!(matches!(
            CardSelectors::new("div[["),
            Err(SourceError::InvalidSelector { selector, .. }) if selector == "div[["
        ));
    }

    #[test]
    fn strip_clock_handles_short_input() {
        assert_eq!(strip_clock("12.12.2012 Uhr"), "12.12.2012");
        assert_eq!(strip_clock("ab"), "");
    }
}
