//! Small helpers shared by the scrapers and the orchestrator.

use std::path::Path;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Counts characters rather than bytes, so CJK text is cut on a character
/// boundary. Anything past `max` characters is replaced by an ellipsis and
/// the number of characters dropped.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("新年贺词", 2), "新年…(+2 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let dropped = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], dropped)
        }
    }
}

/// Delete `path` if it exists. Returns whether a file was removed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub fn remove_if_exists(path: &Path) -> std::io::Result<bool> {
    match std::fs::remove_file(path) {
        Ok(()) => {
            info!("Removed previous output file");
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
        assert_eq!(truncate_for_log("exact", 5), "exact");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.ends_with("…(+400 chars)"));
    }

    #[test]
    fn test_truncate_for_log_multibyte() {
        assert_eq!(truncate_for_log("新年贺词", 2), "新年…(+2 chars)");
    }

    #[test]
    fn test_remove_if_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        assert!(!remove_if_exists(&path).unwrap());
        std::fs::write(&path, "x").unwrap();
        assert!(remove_if_exists(&path).unwrap());
        assert!(!path.exists());
    }
}
