//! Scraping for the People's Daily digital edition.
//!
//! The work splits into the same two phases regardless of how the URL list
//! is later worked through:
//!
//! 1. **Indexing** ([`index`]): follow front page → section pages to collect
//!    a bounded list of article URLs for one issue date
//! 2. **Extraction** ([`article`]): reduce one article page to an
//!    [`ArticleRecord`](crate::models::ArticleRecord)
//!
//! Both phases locate page elements through [`selectors::SelectorChain`],
//! an ordered list of CSS selectors where the first match wins.

pub mod article;
pub mod index;
pub mod selectors;
