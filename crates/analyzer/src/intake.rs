use crate::error::AnalyzerError;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Reads a newline-delimited address list.
///
/// Lines are trimmed, blanks dropped and duplicates removed. First-seen order
/// is kept, though nothing downstream depends on it.
pub fn load_wallet_addresses(path: &Path) -> Result<Vec<String>, AnalyzerError> {
    let contents = fs::read_to_string(path).map_err(|source| AnalyzerError::AddressFile {
        path: path.to_path_buf(),
        source,
    })?;

    let mut seen = HashSet::new();
    let addresses = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| seen.insert(*line))
        .map(str::to_string)
        .collect();

    Ok(addresses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_dedup_and_blank_lines() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "0xabc\n\n  0xdef  \n0xabc\n   \n0xdef\n0x123"
        )
        .unwrap();

        let addresses = load_wallet_addresses(file.path()).unwrap();

        assert_eq!(addresses, vec!["0xabc", "0xdef", "0x123"]);
        assert!(addresses.iter().all(|a| !a.is_empty()));
    }

    #[test]
    fn test_empty_file() {
        let file = NamedTempFile::new().unwrap();
        assert!(load_wallet_addresses(file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_wallet_addresses(&dir.path().join("missing.txt")).unwrap_err();
        assert!(matches!(err, AnalyzerError::AddressFile { .. }));
    }
}
