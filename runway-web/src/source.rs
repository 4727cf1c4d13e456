//! The listing content source.

use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt, join_all};
use reqwest::Client;
use runway::ContentSource;
use url::Url;

use crate::config::ListingConfig;
use crate::error::Result;
use crate::extract::CardSelectors;
use crate::node::RowNode;
use crate::rows::{Article, ListingRow, chunk_rows};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Pages through a listing site and renders its articles as rows of cards.
///
/// Paging state belongs to the instance: the page cursor advances as soon as
/// a fetch is issued, and row ids come from a counter shared with in-flight
/// fetches.
pub struct ListingSource {
    config: ListingConfig,
    client: Client,
    selectors: Arc<CardSelectors>,
    last_page: usize,
    row_ids: Arc<AtomicU64>,
    next_key: u64,
}

impl ListingSource {
    pub fn new(config: ListingConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(config, client)
    }

    pub fn with_client(config: ListingConfig, client: Client) -> Result<Self> {
        config.validate()?;
        let selectors = CardSelectors::new(config.section.card_selector())?;
        tracing::debug!(
            base = %config.base_url,
            category = config.section.category(),
            "listing source ready"
        );
        Ok(Self {
            config,
            client,
            selectors: Arc::new(selectors),
            last_page: 0,
            row_ids: Arc::new(AtomicU64::new(0)),
            next_key: 0,
        })
    }

    pub fn config(&self) -> &ListingConfig {
        &self.config
    }

    /// Last page number requested so far.
    pub fn last_page(&self) -> usize {
        self.last_page
    }

    fn next_key(&mut self) -> u64 {
        self.next_key += 1;
        self.next_key
    }
}

impl ContentSource for ListingSource {
    type Row = ListingRow;
    type Node = RowNode;

    fn fetch(&mut self, count: usize) -> BoxFuture<'static, Vec<ListingRow>> {
        let pages = self.config.pages_needed(count);
        let first = self.last_page + 1;
        self.last_page += pages;
        tracing::debug!(rows = count, pages, first, "fetching listing pages");

        let urls: Vec<Url> = (first..first + pages)
            .filter_map(|page| match self.config.page_url(page) {
                Ok(url) => Some(url),
                Err(error) => {
                    tracing::warn!(page, %error, "cannot build page URL");
                    None
                }
            })
            .collect();

        let client = self.client.clone();
        let selectors = Arc::clone(&self.selectors);
        let row_ids = Arc::clone(&self.row_ids);
        let per_row = self.config.items_per_row;

        async move {
            let pages = join_all(urls.into_iter().map(|url| fetch_page(&client, &selectors, url))).await;
            let articles: Vec<Article> = pages.into_iter().flatten().collect();
            let rows = chunk_rows(articles, per_row, &row_ids);
            tracing::debug!(rows = rows.len(), "listing pages parsed");
            rows
        }
        .boxed()
    }

    fn create_placeholder(&mut self) -> RowNode {
        let key = self.next_key();
        RowNode::placeholder(key, self.config.items_per_row)
    }

    fn render(&mut self, row: &ListingRow, reuse: Option<RowNode>) -> RowNode {
        let mut node = match reuse {
            Some(node) => node,
            None => {
                let key = self.next_key();
                RowNode::placeholder(key, self.config.items_per_row)
            }
        };
        node.fill(row);
        node
    }
}

/// Load and parse one listing page. Any failure yields no articles.
async fn fetch_page(client: &Client, selectors: &CardSelectors, url: Url) -> Vec<Article> {
    let response = match client.get(url.clone()).send().await {
        Ok(response) => response,
        Err(error) => {
            tracing::warn!(%url, %error, "listing page request failed");
            return Vec::new();
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%url, %status, "listing page returned an error status");
        return Vec::new();
    }

    match response.text().await {
        Ok(body) => {
            let articles = selectors.extract(&body, &url);
            tracing::trace!(%url, articles = articles.len(), "parsed listing page");
            articles
        }
        Err(error) => {
            tracing::warn!(%url, %error, "failed to read listing page");
            Vec::new()
        }
    }
}
