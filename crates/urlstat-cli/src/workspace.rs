//! Input and output directory handling
//!
//! The pipeline only opens files; this module makes sure the directories
//! exist and resolves table names inside them.

use crate::error::{CliError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use urlstat_core::pipeline::TABLE_EXTENSION;

/// Create the input and output directories if missing
pub fn prepare_dirs(input_dir: &Path, output_dir: &Path) -> Result<()> {
    for dir in [input_dir, output_dir] {
        fs::create_dir_all(dir)?;
        debug!(dir = %dir.display(), "Directory ready");
    }
    Ok(())
}

/// Remove everything inside `dir`, returning the removed names
pub fn clean_directory(dir: &Path) -> Result<Vec<String>> {
    let mut removed = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else {
            fs::remove_file(&path)?;
        }
        removed.push(entry.file_name().to_string_lossy().into_owned());
    }

    removed.sort();
    Ok(removed)
}

/// Path of the named input table; the `.csv` suffix is optional
pub fn input_table_path(input_dir: &Path, name: &str) -> Result<PathBuf> {
    let file_name = if Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(TABLE_EXTENSION))
    {
        name.to_string()
    } else {
        format!("{}.{}", name, TABLE_EXTENSION)
    };

    let path = input_dir.join(file_name);
    if !path.is_file() {
        return Err(CliError::InputNotFound(path.display().to_string()));
    }
    Ok(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_prepare_dirs_is_idempotent() {
        let root = TempDir::new().unwrap();
        let input = root.path().join("input");
        let output = root.path().join("nested/output");

        prepare_dirs(&input, &output).unwrap();
        prepare_dirs(&input, &output).unwrap();
        assert!(input.is_dir());
        assert!(output.is_dir());
    }

    #[test]
    fn test_clean_directory() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("b_results.csv"), "x").unwrap();
        fs::write(root.path().join("a_results.csv"), "x").unwrap();
        fs::create_dir(root.path().join("old")).unwrap();

        let removed = clean_directory(root.path()).unwrap();
        assert_eq!(removed, vec!["a_results.csv", "b_results.csv", "old"]);
        assert_eq!(fs::read_dir(root.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_input_table_path() {
        let root = TempDir::new().unwrap();
        fs::write(root.path().join("links.csv"), "").unwrap();

        let expected = root.path().join("links.csv");
        assert_eq!(input_table_path(root.path(), "links").unwrap(), expected);
        assert_eq!(input_table_path(root.path(), "links.csv").unwrap(), expected);
        assert!(matches!(
            input_table_path(root.path(), "missing"),
            Err(CliError::InputNotFound(_))
        ));
    }
}
