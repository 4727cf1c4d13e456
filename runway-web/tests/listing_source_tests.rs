//! Listing source against a local HTTP server.
//!
//! The server mimics the site's layout: category listings under
//! `/category/{cat}/page/{n}/` and search results under `/page/{n}/?s=...`.
//! Pages past the configured count answer 404, and selected pages can be made
//! to fail with a 500.

use std::collections::HashMap;
use std::sync::Arc;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use futures::future::join_all;
use runway::{Command, ContentSource, HeadlessSurface, ImmediateScheduler, ScrollerConfig, Size, Viewport, ViewportMessage};
use runway_web::{Card, ListingConfig, ListingRow, ListingSource, RowNode, Section};

const CARDS_PER_PAGE: usize = 10;

#[derive(Clone)]
struct Site {
    pages: usize,
    broken: Arc<Vec<usize>>,
}

fn card(class: &str, title: &str, slug: &str) -> String {
    format!(
        r#"<div class="{class}">
             <h1><a href="/{slug}/">{title}</a></h1>
             <div class="eintrag_x"><p><img src="/img/{slug}.jpg">About {title}</p></div>
             <p class="date_x">01.01.2024 Uhr</p>
           </div>"#
    )
}

fn page(class: &str, prefix: &str, n: usize) -> String {
    let cards: String = (0..CARDS_PER_PAGE)
        .map(|i| card(class, &format!("{prefix} {n}-{i}"), &format!("{prefix}-{n}-{i}")))
        .collect();
    format!("<html><body><div id=\"content\">{cards}</div></body></html>")
}

async fn category_page(
    State(site): State<Site>,
    Path((category, n)): Path<(String, usize)>,
) -> (StatusCode, Html<String>) {
    if site.broken.contains(&n) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Html(String::new()));
    }
    if n == 0 || n > site.pages {
        return (StatusCode::NOT_FOUND, Html(String::new()));
    }
    (StatusCode::OK, Html(page("beitrag2", &category, n)))
}

async fn search_page(
    State(site): State<Site>,
    Path(n): Path<usize>,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, Html<String>) {
    let (Some(query), Some("0")) = (params.get("s"), params.get("cat").map(String::as_str)) else {
        return (StatusCode::BAD_REQUEST, Html(String::new()));
    };
    if n > site.pages {
        return (StatusCode::NOT_FOUND, Html(String::new()));
    }
    (StatusCode::OK, Html(page("post", query, n)))
}

/// Start a server with `pages` pages per listing and return its base URL.
async fn serve(pages: usize, broken: Vec<usize>) -> String {
    let site = Site {
        pages,
        broken: Arc::new(broken),
    };
    let router = Router::new()
        .route("/category/:category/page/:n/", get(category_page))
        .route("/page/:n/", get(search_page))
        .with_state(site);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind test server");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

fn source(base: &str, section: Section) -> ListingSource {
    let config = ListingConfig::new(base, section).expect("config");
    let client = reqwest::Client::builder().no_proxy().build().expect("client");
    ListingSource::with_client(config, client).expect("source")
}

fn titles(rows: &[ListingRow]) -> Vec<String> {
    rows.iter().flat_map(|row| row.articles().map(|a| a.title.clone())).collect()
}

#[tokio::test]
async fn fetches_whole_rows_from_consecutive_pages() {
    let base = serve(10, Vec::new()).await;
    let mut source = source(&base, Section::Movies);

    let rows = source.fetch(5).await;

    assert_eq!(rows.len(), 5);
    assert!(rows.iter().all(|row| row.cards.len() == 4));
    assert_eq!(rows.iter().map(|row| row.id).collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);

    let titles = titles(&rows);
    assert_eq!(titles.len(), 20);
    assert_eq!(titles[0], "hd 1-0");
    assert_eq!(titles[19], "hd 2-9");

    let first = rows[0].articles().next().expect("article");
    assert_eq!(first.link, format!("{base}/hd-1-0/"));
    assert_eq!(first.image.as_deref(), Some(format!("{base}/img/hd-1-0.jpg").as_str()));
    assert_eq!(first.date, "01.01.2024");

    // The next fetch continues after page 2.
    let more = source.fetch(1).await;
    assert_eq!(titles_of_first(&more), "hd 3-0");
    assert_eq!(more[0].id, 5);
}

fn titles_of_first(rows: &[ListingRow]) -> String {
    rows.first()
        .and_then(|row| row.articles().next())
        .map(|article| article.title.clone())
        .unwrap_or_default()
}

#[tokio::test]
async fn failing_pages_contribute_nothing() {
    let base = serve(10, vec![2]).await;
    let mut source = source(&base, Section::Series);

    let rows = source.fetch(5).await;

    // Page 1 only: 10 articles in 3 rows, the last one padded.
    assert_eq!(rows.len(), 3);
    assert_eq!(titles(&rows).len(), 10);
    assert_eq!(rows[2].cards[2], Card::Filler);
    assert!(titles(&rows).iter().all(|title| title.starts_with("hd-serien 1-")));
}

#[tokio::test]
async fn pages_past_the_end_yield_no_rows() {
    let base = serve(2, Vec::new()).await;
    let mut source = source(&base, Section::Documentaries);

    assert_eq!(source.fetch(5).await.len(), 5);
    assert!(source.fetch(5).await.is_empty());
}

#[tokio::test]
async fn search_sends_the_query() {
    let base = serve(3, Vec::new()).await;
    let mut source = source(&base, Section::search("  blade runner ").expect("query"));

    let rows = source.fetch(1).await;

    assert_eq!(titles_of_first(&rows), "blade runner 1-0");
    assert_eq!(titles(&rows).len(), 20);
}

#[tokio::test]
async fn unreachable_host_fails_soft() {
    // Nothing listens on the discard port.
    let mut source = source("http://127.0.0.1:9", Section::Sports);
    assert!(source.fetch(3).await.is_empty());
}

// =========================================================================
// End to end through the viewport
// =========================================================================

type Msg = ViewportMessage<ListingRow>;

async fn pump(viewport: &mut Viewport<HeadlessSurface<RowNode>, ListingSource>, command: Command<Msg>) {
    let mut pending = command.into_futures();
    while !pending.is_empty() {
        let messages = join_all(pending).await;
        pending = messages
            .into_iter()
            .flat_map(|message| viewport.update(message).into_futures())
            .collect();
    }
}

#[tokio::test]
async fn viewport_fills_from_the_listing_and_stops_at_the_end() {
    let base = serve(2, Vec::new()).await;
    let mut viewport = Viewport::new(source(&base, Section::Movies), ImmediateScheduler, ScrollerConfig::default());
    let surface = HeadlessSurface::new(400.0, |node: &RowNode| {
        if node.is_placeholder() {
            Size::new(960.0, 100.0)
        } else {
            Size::new(960.0, 150.0)
        }
    });

    let command = viewport.start(surface).expect("start");
    pump(&mut viewport, command).await;

    // Two pages hold 20 articles, i.e. 5 rows; the follow-up fetch for the
    // rest of the window came back empty.
    assert_eq!(viewport.loaded_count(), 5);
    assert_eq!(viewport.end_index(), Some(4));
    assert_eq!(viewport.source().last_page(), 6);

    let row = viewport.item(0).and_then(|record| record.node.as_ref()).expect("row 0 attached");
    let cards = row.node().cards();
    assert_eq!(cards.len(), 4);
    assert_eq!(cards[0].href.as_deref(), Some(format!("{base}/hd-1-0/#result").as_str()));
}
