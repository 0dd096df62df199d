//! Article page extraction.
//!
//! Turns one article page into an [`ArticleRecord`]. Each field is looked up
//! independently through its own [`SelectorChain`]; a field whose selectors
//! all miss is left empty, so a half-recognised page still produces a row.

use crate::config::SelectorConfig;
use crate::error::Result;
use crate::models::ArticleRecord;
use crate::scrapers::selectors::{paragraphs, stripped_text, SelectorChain};
use crate::utils::truncate_for_log;
use itertools::Itertools;
use scraper::Html;
use tracing::debug;

/// Compiled selector chains for the fields of an article page.
#[derive(Debug, Clone)]
pub struct ArticleSelectors {
    title: SelectorChain,
    date: SelectorChain,
    content: SelectorChain,
}

impl ArticleSelectors {
    pub fn new(config: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            title: SelectorChain::parse(&config.title)?,
            date: SelectorChain::parse(&config.date)?,
            content: SelectorChain::parse(&config.content)?,
        })
    }

    /// Extract a record from the markup of `url`. Never fails.
    pub fn extract_article(&self, url: &str, html: &str) -> ArticleRecord {
        let document = Html::parse_document(html);

        let title = self
            .title
            .first_match(&document)
            .map(stripped_text)
            .unwrap_or_default();
        let date = self
            .date
            .first_match(&document)
            .map(stripped_text)
            .unwrap_or_default();
        let content = self
            .content
            .first_match(&document)
            .map(|body| paragraphs(body).map(stripped_text).join("\n"))
            .unwrap_or_default();

        let record = ArticleRecord::new(url, title, date, content);
        debug!(
            %url,
            title = %record.title,
            content_length = record.content_length,
            preview = %truncate_for_log(&record.content, 40),
            "Extracted article"
        );
        record
    }
}
