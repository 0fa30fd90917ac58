//! JSON rendering for reports and extraction results.

use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a value to JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Serialize a value and write it to `path`, creating parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T, format: JsonFormat) -> Result<()> {
    let json = to_json(value, format)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PageRecord, Paragraph};

    fn record() -> PageRecord {
        let mut record = PageRecord::new("a.pdf", 2);
        record.titles.push("Local Markets".to_string());
        record
            .paragraphs
            .push(Paragraph::new("Stalls open at dawn.", "a.pdf", 2));
        record
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&record(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"titles\""));
        assert!(json.contains("Local Markets"));
        assert!(json.contains('\n'));
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&[record()], JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.starts_with('['));
    }

    #[test]
    fn test_write_json_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_json(&path, &record(), JsonFormat::Compact).unwrap();

        let data = std::fs::read_to_string(&path).unwrap();
        let back: PageRecord = serde_json::from_str(&data).unwrap();
        assert_eq!(back, record());
    }
}
