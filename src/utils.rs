//! Shared utility functions used across modules.

use std::path::Path;

use crate::constants::{ALLOWED_EXTENSIONS, ALLOWED_MIME_TYPES, SPINNER_CHARS};
use crate::error::ValidationError;

/// Truncate a string to `max_len` characters, appending "..." if truncated.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let cut: String = s.chars().take(max_len - 3).collect();
        format!("{cut}...")
    } else {
        s.chars().take(max_len).collect()
    }
}

/// Get the spinner character for the current tick.
pub fn spinner_char(tick: u64) -> &'static str {
    SPINNER_CHARS[(tick % SPINNER_CHARS.len() as u64) as usize]
}

/// Get animated loading dots for the current tick.
pub fn loading_dots(tick: u64) -> &'static str {
    match tick % 4 {
        0 => "",
        1 => ".",
        2 => "..",
        _ => "...",
    }
}

/// Check an upload path against the extension allow-list.
///
/// Returns the lowercase extension on success.
pub fn check_upload_extension(path: &Path) -> Result<String, ValidationError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| ValidationError::MissingExtension(path.display().to_string()))?;
    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(ValidationError::UnsupportedExtension(ext))
    }
}

/// MIME type matching an allowed extension.
///
/// The MIME list is cross-checked against the extension list; a mismatch is
/// not enforced here -- callers decide what to do with it.
pub fn mime_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "xls" => Some(ALLOWED_MIME_TYPES[0]),
        "xlsx" => Some(ALLOWED_MIME_TYPES[1]),
        "csv" => Some(ALLOWED_MIME_TYPES[2]),
        _ => None,
    }
}

/// Sanitize a chart title into a filename stem.
///
/// Keeps alphanumerics, dashes, underscores and spaces (spaces become
/// underscores); everything else is dropped. Returns `None` when nothing
/// printable survives.
pub fn sanitize_filename(title: &str) -> Option<String> {
    let cleaned: String = title
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c)
            } else if c == ' ' {
                Some('_')
            } else {
                None
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('_').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    // ── truncate_str ──────────────────────────────────────────────

    #[test]
    fn truncate_str_short_string_unchanged() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn truncate_str_needs_truncation() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn truncate_str_max_len_3_or_less() {
        // When max_len <= 3, no room for "...", just hard-cut
        assert_eq!(truncate_str("abcdef", 3), "abc");
        assert_eq!(truncate_str("abcdef", 0), "");
    }

    #[test]
    fn truncate_str_counts_chars_not_bytes() {
        assert_eq!(truncate_str("매출액", 5), "매출액");
        assert_eq!(truncate_str("매출액 데이터", 6), "매출액...");
    }

    // ── spinner_char ──────────────────────────────────────────────

    #[test]
    fn spinner_char_cycles() {
        assert_eq!(spinner_char(0), "◐");
        assert_eq!(spinner_char(3), "◒");
        assert_eq!(spinner_char(4), "◐");
    }

    // ── check_upload_extension ────────────────────────────────────

    #[test]
    fn accepts_allowed_extensions() {
        for name in ["a.xls", "b.xlsx", "c.csv", "d.CSV", "e.XLSX"] {
            let ext = check_upload_extension(&PathBuf::from(name)).unwrap();
            assert!(ALLOWED_EXTENSIONS.contains(&ext.as_str()));
        }
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = check_upload_extension(&PathBuf::from("report.pdf")).unwrap_err();
        assert_eq!(err, ValidationError::UnsupportedExtension("pdf".to_string()));
    }

    #[test]
    fn rejects_missing_extension() {
        let err = check_upload_extension(&PathBuf::from("report")).unwrap_err();
        assert!(matches!(err, ValidationError::MissingExtension(_)));
    }

    #[test]
    fn mime_covers_every_allowed_extension() {
        for ext in ALLOWED_EXTENSIONS {
            assert!(mime_for_extension(ext).is_some(), "no MIME for {ext}");
        }
        assert!(mime_for_extension("pdf").is_none());
    }

    // ── sanitize_filename ─────────────────────────────────────────

    #[test]
    fn sanitize_keeps_word_characters() {
        assert_eq!(
            sanitize_filename("Yearly Revenue 2020-2023").unwrap(),
            "Yearly_Revenue_2020-2023"
        );
    }

    #[test]
    fn sanitize_drops_path_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "etcpasswd");
    }

    #[test]
    fn sanitize_empty_title_yields_none() {
        assert_eq!(sanitize_filename(""), None);
        assert_eq!(sanitize_filename("///"), None);
        assert_eq!(sanitize_filename("___"), None);
    }
}
