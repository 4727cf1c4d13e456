use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use runway::ScrollerConfig;
use runway_web::Section;

/// Scroll through a listing site without a screen, printing what the
/// viewport holds after every step.
#[derive(Parser, Debug)]
#[command(name = "runway", version)]
pub struct Args {
    /// Base URL of the listing site.
    #[arg(long, default_value = "http://movie-blog.sx")]
    pub base_url: String,

    /// Section to browse.
    #[arg(short, long, value_enum, default_value_t = SectionArg::Movies)]
    pub section: SectionArg,

    /// Search query, required with `--section search`.
    #[arg(short, long)]
    pub query: Option<String>,

    /// Visible height of the simulated scroll container, in pixels.
    #[arg(long, default_value_t = 800.0)]
    pub viewport_height: f32,

    /// Pixels scrolled per step.
    #[arg(long, default_value_t = 600.0, allow_negative_numbers = true)]
    pub scroll_step: f32,

    /// Number of scroll steps.
    #[arg(long, default_value_t = 10)]
    pub steps: usize,

    /// JSON file with scroller tuning; missing fields keep their defaults.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the rows inside the final window as JSON lines.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` wins.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionArg {
    Movies,
    Series,
    Docus,
    Sports,
    Search,
}

impl SectionArg {
    fn site_type(self) -> &'static str {
        match self {
            SectionArg::Movies => "movies",
            SectionArg::Series => "series",
            SectionArg::Docus => "docus",
            SectionArg::Sports => "sports",
            SectionArg::Search => "search",
        }
    }
}

impl Args {
    pub fn section(&self) -> Result<Section> {
        Section::from_site_type(self.section.site_type(), self.query.as_deref())
            .with_context(|| format!("cannot browse section {:?}", self.section))
    }

    pub fn scroller_config(&self) -> Result<ScrollerConfig> {
        let Some(path) = &self.config else {
            return Ok(ScrollerConfig::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid config {}", path.display()))
    }
}
