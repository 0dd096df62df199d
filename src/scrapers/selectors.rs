//! Ordered CSS selector chains and text helpers.
//!
//! The newspaper has gone through more than one page layout, so every lookup
//! is a list of selectors tried in order. Nothing here touches the network.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::fmt;

static ANCHOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());
static PARAGRAPH: Lazy<Selector> = Lazy::new(|| Selector::parse("p").unwrap());

/// Selectors tried in order; the first one that matches anything wins.
#[derive(Clone)]
pub struct SelectorChain {
    patterns: Vec<String>,
    selectors: Vec<Selector>,
}

impl SelectorChain {
    /// Compile `patterns`, failing on the first invalid selector.
    pub fn parse<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut selectors = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let selector = Selector::parse(pattern).map_err(|e| Error::Selector {
                selector: pattern.to_string(),
                reason: e.to_string(),
            })?;
            selectors.push(selector);
        }
        Ok(Self {
            patterns: patterns.iter().map(|p| p.as_ref().to_string()).collect(),
            selectors,
        })
    }

    /// First element, in document order, of the first selector that matches.
    pub fn first_match<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.selectors
            .iter()
            .find_map(|selector| document.select(selector).next())
    }
}

impl fmt::Debug for SelectorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SelectorChain").field(&self.patterns).finish()
    }
}

/// Visible text of `element` with every text node trimmed and empty nodes dropped.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// `href` values of all links inside `element`, in document order.
pub fn hrefs(element: ElementRef<'_>) -> Vec<String> {
    element
        .select(&ANCHOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}

/// Every `<p>` inside `element`, nested ones included.
pub fn paragraphs<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    element.select(&PARAGRAPH)
}
