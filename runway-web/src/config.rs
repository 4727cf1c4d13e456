//! Listing configuration: which section to page through and how pages map
//! onto rows.

use url::Url;

use crate::error::{Result, SourceError};

/// Articles listed on one page of the site.
pub const ITEMS_PER_PAGE: usize = 10;

/// Cards shown side by side in one row.
pub const ITEMS_PER_ROW: usize = 4;

/// Card root used by the category listings.
const CATEGORY_CARD: &str = "div.beitrag2";

/// Card root used by search results.
const SEARCH_CARD: &str = "div.post";

/// A browsable part of the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Section {
    Movies,
    Series,
    Documentaries,
    Sports,
    Search { query: String },
}

impl Section {
    /// Map a navigation key (`movies`, `series`, `docus`, `sports`,
    /// `search`) to a section. Search requires a non-blank query.
    pub fn from_site_type(site_type: &str, query: Option<&str>) -> Result<Self> {
        match site_type.trim() {
            "movies" => Ok(Section::Movies),
            "series" => Ok(Section::Series),
            "docus" => Ok(Section::Documentaries),
            "sports" => Ok(Section::Sports),
            "search" => Section::search(query.unwrap_or_default()),
            other => Err(SourceError::UnknownSection(other.to_string())),
        }
    }

    pub fn search(query: &str) -> Result<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SourceError::MissingQuery);
        }
        Ok(Section::Search {
            query: query.to_string(),
        })
    }

    /// Category slug in listing URLs.
    pub fn category(&self) -> &str {
        match self {
            Section::Movies => "hd",
            Section::Series => "hd-serien",
            Section::Documentaries => "hd-doku",
            Section::Sports => "hd-sport",
            Section::Search { .. } => "search",
        }
    }

    /// CSS selector matching one article card on a listing page.
    pub fn card_selector(&self) -> &'static str {
        match self {
            Section::Search { .. } => SEARCH_CARD,
            _ => CATEGORY_CARD,
        }
    }
}

/// Where and how to page through a listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingConfig {
    pub base_url: Url,
    pub section: Section,
    pub items_per_page: usize,
    pub items_per_row: usize,
}

impl ListingConfig {
    pub fn new(base_url: &str, section: Section) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|source| SourceError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        Ok(Self {
            base_url: parsed,
            section,
            items_per_page: ITEMS_PER_PAGE,
            items_per_row: ITEMS_PER_ROW,
        })
    }

    pub fn with_items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn with_items_per_row(mut self, items_per_row: usize) -> Self {
        self.items_per_row = items_per_row;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.items_per_page == 0 {
            return Err(SourceError::ZeroPageSize);
        }
        if self.items_per_row == 0 {
            return Err(SourceError::ZeroRowWidth);
        }
        if matches!(&self.section, Section::Search { query } if query.trim().is_empty()) {
            return Err(SourceError::MissingQuery);
        }
        Ok(())
    }

    /// Pages to request for `rows` more rows.
    ///
    /// Rounded up so the fetched articles split into whole rows.
    pub fn pages_needed(&self, rows: usize) -> usize {
        let items = rows * self.items_per_row;
        let mut pages = items.div_ceil(self.items_per_page);
        while (pages * self.items_per_page) % self.items_per_row != 0 {
            pages += 1;
        }
        pages
    }

    /// URL of listing page `page` (1-based).
    pub fn page_url(&self, page: usize) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let raw = match &self.section {
            Section::Search { .. } => format!("{base}/page/{page}/"),
            section => format!("{base}/category/{}/page/{page}/", section.category()),
        };
        let mut url = Url::parse(&raw).map_err(|source| SourceError::InvalidBaseUrl {
            url: self.base_url.to_string(),
            source,
        })?;
        if let Section::Search { query } = &self.section {
            url.query_pairs_mut()
                .append_pair("s", query.trim())
                .append_pair("cat", "0");
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(section: Section) -> ListingConfig {
        ListingConfig::new("http://movie-blog.sx", section).expect("valid base URL")
    }

    #[test]
    fn site_types_map_to_categories() {
        let cases = [
            ("movies", "hd"),
            ("series", "hd-serien"),
            ("docus", "hd-doku"),
            ("sports", "hd-sport"),
        ];
        for (key, category) in cases {
            let section = Section::from_site_type(key, None).expect(key);
            assert_eq!(section.category(), category);
            assert_eq!(section.card_selector(), "div.beitrag2");
        }
    }

    #[test]
    fn search_needs_a_query() {
        assert!(matches!(
            Section::from_site_type("search", None),
            Err(SourceError::MissingQuery)
        ));
        assert!(matches!(
            Section::from_site_type("search", Some("   ")),
            Err(SourceError::MissingQuery)
        ));

        let section = Section::from_site_type("search", Some("  dune ")).expect("query given");
        assert_eq!(section, Section::Search { query: "dune".into() });
        assert_eq!(section.card_selector(), "div.post");
    }

    #[test]
    fn unknown_site_type_is_rejected() {
        assert!(matches!(
            Section::from_site_type("home", None),
            Err(SourceError::UnknownSection(key)) if key == "home"
        ));
    }

    #[test]
    fn category_page_urls() {
        let url = config(Section::Series).page_url(3).expect("url");
        assert_eq!(url.as_str(), "http://movie-blog.sx/category/hd-serien/page/3/");
    }

    #[test]
    fn search_page_urls_encode_the_query() {
        let section = Section::search("the matrix").expect("query");
        let url = config(section).page_url(1).expect("url");
        assert_eq!(url.as_str(), "http://movie-blog.sx/page/1/?s=the+matrix&cat=0");
    }

    #[test]
    fn pages_round_up_to_whole_rows() {
        let config = config(Section::Movies);
        // 9 rows = 36 items = 4 pages = 40 items = 10 rows
        assert_eq!(config.pages_needed(9), 4);
        // 1 row = 4 items = 1 page, which would leave half a row
        assert_eq!(config.pages_needed(1), 2);
        assert_eq!(config.pages_needed(5), 2);
        assert_eq!(config.pages_needed(0), 0);

        let odd = config.clone().with_items_per_page(3).with_items_per_row(5);
        assert_eq!((odd.pages_needed(1) * 3) % 5, 0);
    }

    #[test]
    fn zero_sizes_fail_validation() {
        let config = config(Section::Movies);
        assert!(matches!(
            config.clone().with_items_per_page(0).validate(),
            Err(SourceError::ZeroPageSize)
        ));
        assert!(matches!(
            config.with_items_per_row(0).validate(),
            Err(SourceError::ZeroRowWidth)
        ));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(matches!(
            ListingConfig::new("movie-blog", Section::Movies),
            Err(SourceError::InvalidBaseUrl { .. })
        ));
    }
}
