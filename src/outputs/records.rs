//! CSV record store.
//!
//! Every [`RecordStore::append`] is an independent open/write/close of the
//! output file in append mode. The header row is written only when the file
//! did not exist at the moment of the call.
//!
//! A `csv` writer may split one row over several `write` calls, and two
//! workers append to the same file concurrently, so appends are serialized
//! by an in-process lock. The store is blocking; async callers go through
//! `tokio::task::spawn_blocking`.

use crate::error::{Error, Result};
use crate::models::ArticleRecord;
use crate::utils::remove_if_exists;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, preceded by the header row if the file is new.
    pub fn append(&self, record: &ArticleRecord) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| Error::StorePoisoned)?;

        let new_file = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(new_file)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        debug!(path = %self.path.display(), url = %record.url, header = new_file, "Appended record");
        Ok(())
    }

    /// Remove the output file so the next append starts a fresh one.
    pub fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| Error::StorePoisoned)?;
        remove_if_exists(&self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::read_records;
    use std::sync::Arc;

    fn record(url: &str, content: &str) -> ArticleRecord {
        ArticleRecord::new(url, format!("title of {url}"), "2023年01月01日".to_string(), content.to_string())
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("out.csv"));

        store.append(&record("u1", "a")).unwrap();
        store.append(&record("u2", "b")).unwrap();
        store.append(&record("u3", "c")).unwrap();

        let text = std::fs::read_to_string(store.path()).unwrap();
        let header = "url,title,date,content,content_length";
        assert_eq!(text.matches(header).count(), 1);
        assert!(text.starts_with(header));
        assert_eq!(read_records(store.path()).unwrap().len(), 3);
    }

    #[test]
    fn test_existing_file_gets_no_second_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        RecordStore::new(&path).append(&record("u1", "a")).unwrap();

        // A fresh store over the same file must not repeat the header.
        RecordStore::new(&path).append(&record("u2", "b")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.matches("url,title,date,content,content_length").count(), 1);
    }

    #[test]
    fn test_quotes_delimiters_and_newlines() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("out.csv"));
        let original = record("u1", "first, with comma\nsecond \"quoted\"");

        store.append(&original).unwrap();

        let back = read_records(store.path()).unwrap();
        assert_eq!(back, vec![original]);
    }

    #[test]
    fn test_clear_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("out.csv"));

        store.clear().unwrap();
        store.append(&record("u1", "a")).unwrap();
        store.clear().unwrap();

        assert!(!store.path().exists());
    }

    #[test]
    fn test_concurrent_appends_stay_well_formed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(RecordStore::new(dir.path().join("out.csv")));
        let long_body = "段落内容，".repeat(2000);

        let handles: Vec<_> = (0..2)
            .map(|worker| {
                let store = Arc::clone(&store);
                let body = long_body.clone();
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store.append(&record(&format!("w{worker}-{i}"), &body)).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let records = read_records(store.path()).unwrap();
        assert_eq!(records.len(), 50);
        assert!(records.iter().all(|r| r.content == long_body));
        let text = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(text.matches("url,title,date,content,content_length").count(), 1);
    }
}
