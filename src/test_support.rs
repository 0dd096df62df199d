//! In-memory doubles shared by the unit tests.

use crate::error::{Error, Result};
use crate::fetcher::PageFetcher;
use crate::models::ArticleRecord;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;

enum Canned {
    Page(String),
    Status(u16),
}

/// [`PageFetcher`] answering from a fixed URL → response table.
///
/// Unknown URLs fail like a refused connection.
#[derive(Default)]
pub struct MapFetcher {
    responses: HashMap<String, Canned>,
    requested: Mutex<Vec<String>>,
}

impl MapFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.responses.insert(url.to_string(), Canned::Page(body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.responses.insert(url.to_string(), Canned::Status(status));
        self
    }

    /// Every URL asked for so far, in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MapFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Canned::Page(body)) => Ok(body.clone()),
            Some(Canned::Status(status)) => Err(Error::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                format!("no route to {url}"),
            ))),
        }
    }
}

/// A minimal article page in the current site layout.
pub fn article_page(title: &str, body: &str) -> String {
    let paragraphs: String = body.lines().map(|line| format!("<p>{line}</p>")).collect();
    format!(
        r#"<html><body><h1>{title}</h1><time>2023年01月01日</time><div id="ozoom">{paragraphs}</div></body></html>"#
    )
}

pub fn read_records(path: &Path) -> Result<Vec<ArticleRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ArticleRecord>, _>>()?;
    Ok(records)
}
