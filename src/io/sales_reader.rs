//! Sales file reader
//!
//! Loads the whole input file into memory and returns its data lines: the
//! header line is dropped, as are lines containing only whitespace. Files
//! that are not valid UTF-8 are decoded as Latin-1, where every byte maps to
//! the code point of the same value, so reading never fails on encoding.

use crate::types::AnalyticsError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, info, warn};

/// Text encoding a sales file was decoded with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Latin1,
}

/// Decode raw file bytes, falling back to Latin-1
pub fn decode_sales_bytes(bytes: Vec<u8>) -> (String, Encoding) {
    match String::from_utf8(bytes) {
        Ok(text) => (text, Encoding::Utf8),
        Err(e) => {
            let text = e.into_bytes().into_iter().map(char::from).collect();
            (text, Encoding::Latin1)
        }
    }
}

/// Data lines of a decoded file: header and blank lines removed
pub fn split_data_lines(text: &str) -> Vec<String> {
    text.lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Read every data line of a sales file
///
/// # Errors
///
/// * `FileNotFound` if nothing exists at `path`
/// * `IoError` for any other read failure
pub fn read_sales_lines(path: &Path) -> Result<Vec<String>, AnalyticsError> {
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AnalyticsError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => AnalyticsError::from(e),
    })?;

    let (text, encoding) = decode_sales_bytes(bytes);
    if encoding == Encoding::Latin1 {
        warn!("{} is not valid UTF-8, decoded as Latin-1", path.display());
    } else {
        debug!("{} decoded as UTF-8", path.display());
    }

    let lines = split_data_lines(&text);
    info!("Read {} data lines from {}", lines.len(), path.display());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    const HEADER: &str = "TransactionID|Date|ProductID|ProductName|Quantity|UnitPrice|CustomerID|Region";

    #[test]
    fn test_reads_data_lines_without_header() {
        let content = format!(
            "{}\nT001|2024-01-05|P101|Widget|10|25.50|C001|North\nT002|2024-01-05|P102|Gadget|2|10.00|C002|South\n",
            HEADER
        );
        let file = create_temp_file(content.as_bytes());

        let lines = read_sales_lines(file.path()).unwrap();
        assert_eq!(
            lines,
            vec![
                "T001|2024-01-05|P101|Widget|10|25.50|C001|North",
                "T002|2024-01-05|P102|Gadget|2|10.00|C002|South",
            ]
        );
    }

    #[rstest]
    #[case::blank_lines("H\n\nA\n   \nB\n", vec!["A", "B"])]
    #[case::crlf("H\r\nA\r\nB\r\n", vec!["A", "B"])]
    #[case::header_only("H\n", vec![])]
    #[case::empty("", vec![])]
    #[case::no_trailing_newline("H\nA", vec!["A"])]
    fn test_split_data_lines(#[case] text: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split_data_lines(text), expected);
    }

    #[test]
    fn test_latin1_fallback() {
        let mut content = format!("{}\n", HEADER).into_bytes();
        content.extend_from_slice(b"T001|2024-01-05|P101|Caf\xe9 Mug|1|5.00|C001|North\n");
        let file = create_temp_file(&content);

        let lines = read_sales_lines(file.path()).unwrap();
        assert_eq!(lines, vec!["T001|2024-01-05|P101|Café Mug|1|5.00|C001|North"]);
    }

    #[test]
    fn test_decode_reports_encoding() {
        assert_eq!(decode_sales_bytes(b"abc".to_vec()).1, Encoding::Utf8);
        assert_eq!(decode_sales_bytes(vec![0x41, 0xff]), ("A\u{ff}".to_string(), Encoding::Latin1));
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let result = read_sales_lines(&path);
        assert_eq!(
            result,
            Err(AnalyticsError::FileNotFound {
                path: path.display().to_string()
            })
        );
    }
}
