use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Error, Result};

// Maximum transcript size: 100MB. Long-running sessions produce large files,
// but anything past this is not a transcript we can sensibly hold in memory.
const MAX_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;

/// Validates that a file's size is within acceptable limits (100MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
///
/// # Errors
///
/// Returns [`Error::FileUnreadable`] if the metadata cannot be read or the
/// file exceeds the limit.
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file.metadata().map_err(|source| Error::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        return Err(Error::FileUnreadable {
            path: path.to_path_buf(),
            source: io::Error::other(format!(
                "file too large: {file_size} bytes, max {MAX_FILE_SIZE_BYTES} bytes"
            )),
        });
    }

    Ok(())
}

/// Read a transcript file fully into memory as UTF-8 text.
///
/// # Errors
///
/// Returns [`Error::FileUnreadable`] when the file cannot be opened, is too
/// large, or is not valid UTF-8.
pub fn read_transcript_text(path: &Path) -> Result<String> {
    let mut file = File::open(path).map_err(|source| Error::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    validate_file_size(&file, path)?;

    let mut text = String::new();
    file.read_to_string(&mut text).map_err(|source| Error::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(text)
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    // Avoid double allocation when converting Cow to String
    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_read_transcript_text() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"a\":1}\n").unwrap();
        file.flush().unwrap();

        let text = read_transcript_text(file.path()).unwrap();
        assert_eq!(text, "{\"a\":1}\n");
    }

    #[test]
    fn test_read_missing_file_is_unreadable() {
        let result = read_transcript_text(Path::new("/nonexistent/transcript.jsonl"));
        match result {
            Err(Error::FileUnreadable { path, .. }) => {
                assert_eq!(path, PathBuf::from("/nonexistent/transcript.jsonl"));
            }
            other => panic!("expected FileUnreadable, got {other:?}"),
        }
    }

    #[test]
    fn test_read_non_utf8_is_unreadable() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0x00, 0x80]).unwrap();
        file.flush().unwrap();

        assert!(matches!(
            read_transcript_text(file.path()),
            Err(Error::FileUnreadable { .. })
        ));
    }

    #[test]
    fn test_format_path_with_tilde() {
        let path = PathBuf::from("/Users/testuser/Documents/project");
        let formatted = format_path_with_tilde_internal(&path, Some("/Users/testuser"));
        assert_eq!(formatted, "~/Documents/project");

        // Path not under home
        let path2 = PathBuf::from("/opt/local/bin");
        let formatted2 = format_path_with_tilde_internal(&path2, Some("/Users/testuser"));
        assert_eq!(formatted2, "/opt/local/bin");
    }
}
