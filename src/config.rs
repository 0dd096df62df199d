//! Run configuration.
//!
//! A [`Config`] is built in three layers: the built-in defaults (the People's
//! Daily digital edition for 2023-01-01), an optional YAML file, and the
//! command-line flags. The result is passed explicitly to the fetcher, the
//! discoverer and the record store, so tests can point a run at in-memory
//! pages and a temporary CSV file.

use crate::cli::Cli;
use crate::error::{Error, Result};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, instrument};

/// Everything one harvest run needs to know.
///
/// Every key is optional in the YAML file; missing keys keep their defaults.
///
/// ```yaml
/// date: 2023-03-05
/// target_count: 10
/// request_delay_ms: 500
/// selectors:
///   content: ["div#ozoom", "article"]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Root of the dated page hierarchy, without trailing slash.
    pub base_url: String,
    /// Location of the site's crawl policy.
    pub robots_url: String,
    /// User agent the crawl policy is evaluated for.
    pub robots_agent: String,
    /// File name of the front page inside a dated directory.
    pub front_page: String,
    /// chrono format string turning the issue date into a directory path.
    pub date_path_format: String,
    /// Issue date to harvest.
    pub date: NaiveDate,
    /// CSV file the records are appended to.
    pub output_file: PathBuf,
    /// User-Agent header sent with every request.
    pub user_agent: String,
    /// Maximum number of article URLs to collect.
    pub target_count: usize,
    pub request_timeout_secs: u64,
    /// Pause after every article, successful or not.
    pub request_delay_ms: u64,
    /// Optional JSON benchmark report.
    pub report_file: Option<PathBuf>,
    pub selectors: SelectorConfig,
}

/// Ordered selector lists, first match wins.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct SelectorConfig {
    /// Front-page element holding the links to section pages.
    pub section_list: Vec<String>,
    /// Section-page element holding the links to articles.
    pub article_list: Vec<String>,
    pub title: Vec<String>,
    pub date: Vec<String>,
    /// Element whose `<p>` descendants make up the article body.
    pub content: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            section_list: strings(&["div#pageList", "div.swiper-container"]),
            article_list: strings(&["div#titleList", "ul.news-list"]),
            title: strings(&["h1", "div.article-title"]),
            date: strings(&["time", "div.date"]),
            content: strings(&["div#ozoom", "div.article-content"]),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://paper.people.com.cn/rmrb/html".to_string(),
            robots_url: "http://paper.people.com.cn/robots.txt".to_string(),
            robots_agent: "*".to_string(),
            front_page: "nbs.D110000renmrb_01.htm".to_string(),
            date_path_format: "%Y-%m/%d".to_string(),
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default(),
            output_file: PathBuf::from("rmrb_data.csv"),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string(),
            target_count: 20,
            request_timeout_secs: 10,
            request_delay_ms: 1000,
            report_file: None,
            selectors: SelectorConfig::default(),
        }
    }
}

impl Config {
    /// Build the configuration for a run from parsed command-line arguments.
    #[instrument(level = "info", skip_all)]
    pub fn load(args: &Cli) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_cli(args);
        config.validate()?;
        info!(
            date = %config.date,
            target_count = config.target_count,
            output = %config.output_file.display(),
            "Configuration loaded"
        );
        Ok(config)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail once the run is under way.
    ///
    /// # Errors
    ///
    /// [`Error::DateFormat`] if `date_path_format` has a specifier chrono does
    /// not know, such as `%Q`.
    pub fn validate(&self) -> Result<()> {
        if StrftimeItems::new(&self.date_path_format).any(|item| matches!(item, Item::Error)) {
            return Err(Error::DateFormat(self.date_path_format.clone()));
        }
        Ok(())
    }

    /// Flags given on the command line win over the file and the defaults.
    pub fn apply_cli(&mut self, args: &Cli) {
        if let Some(date) = args.date {
            self.date = date;
        }
        if let Some(output) = &args.output {
            self.output_file = output.clone();
        }
        if let Some(n) = args.target_count {
            self.target_count = n;
        }
        if let Some(ms) = args.delay_ms {
            self.request_delay_ms = ms;
        }
        if let Some(secs) = args.timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(base) = &args.base_url {
            self.base_url = base.clone();
        }
        if let Some(robots) = &args.robots_url {
            self.robots_url = robots.clone();
        }
        if let Some(report) = &args.report {
            self.report_file = Some(report.clone());
        }
    }

    /// Issue date rendered with `date_path_format`, e.g. `2023-01/01`.
    ///
    /// Rendering goes through `write!` so a bad format comes back as
    /// [`Error::DateFormat`] even for a `Config` that skipped [`Config::validate`].
    pub fn date_path(&self) -> Result<String> {
        let mut path = String::new();
        write!(path, "{}", self.date.format(&self.date_path_format))
            .map_err(|_| Error::DateFormat(self.date_path_format.clone()))?;
        Ok(path)
    }

    /// Directory URL of the issue, with trailing slash so relative links join onto it.
    pub fn dated_base(&self) -> Result<String> {
        Ok(format!("{}/{}/", self.base_url.trim_end_matches('/'), self.date_path()?))
    }

    pub fn front_page_url(&self) -> Result<String> {
        Ok(format!("{}{}", self.dated_base()?, self.front_page))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}
