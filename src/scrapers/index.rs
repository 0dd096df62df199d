//! Article URL discovery.
//!
//! An issue of the paper is a two-level hierarchy under a dated directory:
//!
//! ```text
//! {base_url}/2023-01/01/nbs.D110000renmrb_01.htm     front page, links to sections
//! {base_url}/2023-01/01/nbs.D110000renmrb_02.htm     section page, links to articles
//! {base_url}/2023-01/01/nw.D110000renmrb_20230101_1-02.htm   article
//! ```
//!
//! Links on both levels are relative to the dated directory.

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::PageFetcher;
use crate::scrapers::selectors::{hrefs, SelectorChain};
use scraper::Html;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Walks front page → section pages → article links for one issue.
#[derive(Debug)]
pub struct Indexer {
    dated_base: Url,
    front_page_url: String,
    target_count: usize,
    section_list: SelectorChain,
    article_list: SelectorChain,
}

impl Indexer {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            dated_base: Url::parse(&config.dated_base()?)?,
            front_page_url: config.front_page_url()?,
            target_count: config.target_count,
            section_list: SelectorChain::parse(&config.selectors.section_list)?,
            article_list: SelectorChain::parse(&config.selectors.article_list)?,
        })
    }

    pub fn front_page_url(&self) -> &str {
        &self.front_page_url
    }

    /// Collect up to `target_count` article URLs in page order.
    ///
    /// An unreachable front page yields an empty list. An unreachable or
    /// unrecognised section page contributes nothing and the walk moves on.
    #[instrument(level = "info", skip_all, fields(front_page = %self.front_page_url))]
    pub async fn index_articles(&self, fetcher: &dyn PageFetcher) -> Vec<String> {
        let Some(front_html) = fetcher.fetch(&self.front_page_url).await else {
            warn!("Front page unavailable; nothing to index");
            return Vec::new();
        };

        let section_links = links_in(&front_html, &self.section_list);
        info!(count = section_links.len(), "Found section pages");

        let mut article_urls = Vec::new();
        for (i, href) in section_links.iter().enumerate() {
            if article_urls.len() >= self.target_count {
                break;
            }
            let Some(section_url) = self.resolve(href) else {
                continue;
            };
            info!(section = i + 1, url = %section_url, "Indexing section");

            let Some(section_html) = fetcher.fetch(&section_url).await else {
                continue;
            };
            let found = links_in(&section_html, &self.article_list);
            if found.is_empty() {
                debug!(url = %section_url, "Section has no recognisable article list");
                continue;
            }
            article_urls.extend(found.iter().filter_map(|href| self.resolve(href)));
            info!(
                collected = article_urls.len(),
                target = self.target_count,
                "Collected article URLs"
            );
        }

        article_urls.truncate(self.target_count);
        article_urls
    }

    /// Absolute URL for a link found on a page of this issue.
    fn resolve(&self, href: &str) -> Option<String> {
        match self.dated_base.join(href) {
            Ok(url) => Some(url.to_string()),
            Err(e) => {
                warn!(%href, error = %e, "Skipping unresolvable link");
                None
            }
        }
    }
}

/// Hrefs inside the first container matched by `chain`; empty when none matches.
fn links_in(html: &str, chain: &SelectorChain) -> Vec<String> {
    let document = Html::parse_document(html);
    chain.first_match(&document).map(hrefs).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::test_support::MapFetcher;

    const BASE: &str = "http://paper.test/rmrb/html";

    fn config(target_count: usize) -> Config {
        Config {
            base_url: BASE.to_string(),
            target_count,
            ..Config::default()
        }
    }

    fn dated(path: &str) -> String {
        format!("{BASE}/2023-01/01/{path}")
    }

    fn front_page(sections: &[&str]) -> String {
        let links: String = sections
            .iter()
            .map(|s| format!(r#"<a href="{s}">{s}</a>"#))
            .collect();
        format!(r#"<html><body><div id="pageList">{links}</div></body></html>"#)
    }

    fn section_page(articles: &[&str]) -> String {
        let links: String = articles
            .iter()
            .map(|a| format!(r#"<li><a href="{a}">{a}</a></li>"#))
            .collect();
        format!(r#"<html><body><div id="titleList"><ul>{links}</ul></div></body></html>"#)
    }

    #[tokio::test]
    async fn test_collects_in_document_order() {
        let fetcher = MapFetcher::new()
            .page(&dated("nbs.D110000renmrb_01.htm"), &front_page(&["s1.htm", "s2.htm"]))
            .page(&dated("s1.htm"), &section_page(&["a1.htm", "a2.htm"]))
            .page(&dated("s2.htm"), &section_page(&["a3.htm"]));
        let indexer = Indexer::new(&config(20)).unwrap();

        let urls = indexer.index_articles(&fetcher).await;

        assert_eq!(urls, vec![dated("a1.htm"), dated("a2.htm"), dated("a3.htm")]);
    }

    #[tokio::test]
    async fn test_truncates_to_target_and_stops_early() {
        let fetcher = MapFetcher::new()
            .page(&dated("nbs.D110000renmrb_01.htm"), &front_page(&["s1.htm", "s2.htm"]))
            .page(&dated("s1.htm"), &section_page(&["a1.htm", "a2.htm", "a3.htm"]))
            .page(&dated("s2.htm"), &section_page(&["a4.htm"]));
        let indexer = Indexer::new(&config(2)).unwrap();

        let urls = indexer.index_articles(&fetcher).await;

        assert_eq!(urls, vec![dated("a1.htm"), dated("a2.htm")]);
        assert!(!fetcher.requested().contains(&dated("s2.htm")));
    }

    #[tokio::test]
    async fn test_front_page_failure_is_empty() {
        let fetcher = MapFetcher::new();
        let indexer = Indexer::new(&config(20)).unwrap();
        assert!(indexer.index_articles(&fetcher).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_and_malformed_sections_are_skipped() {
        let fetcher = MapFetcher::new()
            .page(
                &dated("nbs.D110000renmrb_01.htm"),
                &front_page(&["gone.htm", "junk.htm", "empty.htm", "s4.htm"]),
            )
            .page(&dated("junk.htm"), "<<<not really html")
            .page(&dated("empty.htm"), &section_page(&[]))
            .page(&dated("s4.htm"), &section_page(&["a1.htm"]));
        let indexer = Indexer::new(&config(20)).unwrap();

        let urls = indexer.index_articles(&fetcher).await;

        assert_eq!(urls, vec![dated("a1.htm")]);
    }

    #[tokio::test]
    async fn test_fallback_containers() {
        let front = r#"<div class="swiper-container"><a href="s1.htm">1</a></div>"#;
        let section = r#"<ul class="news-list"><li><a href="a1.htm">x</a></li></ul>"#;
        let fetcher = MapFetcher::new()
            .page(&dated("nbs.D110000renmrb_01.htm"), front)
            .page(&dated("s1.htm"), section);
        let indexer = Indexer::new(&config(20)).unwrap();

        assert_eq!(indexer.index_articles(&fetcher).await, vec![dated("a1.htm")]);
    }

    #[tokio::test]
    async fn test_exhausted_sections_return_what_was_found() {
        let fetcher = MapFetcher::new()
            .page(&dated("nbs.D110000renmrb_01.htm"), &front_page(&["s1.htm"]))
            .page(&dated("s1.htm"), &section_page(&["a1.htm", "a2.htm"]));
        let indexer = Indexer::new(&config(20)).unwrap();

        let urls = indexer.index_articles(&fetcher).await;
        assert_eq!(urls.len(), 2);
    }

    #[tokio::test]
    async fn test_front_page_without_section_list() {
        let fetcher = MapFetcher::new().page(&dated("nbs.D110000renmrb_01.htm"), "<p>maintenance</p>");
        let indexer = Indexer::new(&config(20)).unwrap();
        assert!(indexer.index_articles(&fetcher).await.is_empty());
    }

    #[test]
    fn test_invalid_base_url_is_error() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(Indexer::new(&config).is_err());
    }

    #[test]
    fn test_unknown_date_specifier_is_error() {
        let config = Config {
            date_path_format: "%Y-%Q".to_string(),
            ..Config::default()
        };
        assert!(matches!(Indexer::new(&config), Err(Error::DateFormat(_))));
    }
}
