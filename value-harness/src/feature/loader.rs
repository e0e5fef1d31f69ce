//! Feature file loader

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use super::parser::parse_feature;
use super::types::Feature;

const FEATURE_EXTENSION: &str = "feature";

/// Read and parse a single feature file
pub fn load_feature(path: &Path) -> Result<Feature> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read feature file at {}", path.display()))?;
    parse_feature(&source, path)
        .with_context(|| format!("Failed to parse feature file at {}", path.display()))
}

/// Find all `.feature` files under a directory, recursively, sorted by path
pub fn discover_features(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    visit(dir, &mut found)?;
    found.sort();
    Ok(found)
}

fn visit(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
    {
        let entry = entry.context("Failed to read directory entry")?;
        let path = entry.path();
        if path.is_dir() {
            visit(&path, found)?;
        } else if path.extension().and_then(|s| s.to_str()) == Some(FEATURE_EXTENSION) {
            found.push(path);
        }
    }
    Ok(())
}

/// Resolve CLI paths: directories are searched, files are taken as given
pub fn collect_feature_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut collected = Vec::new();
    for path in paths {
        if !path.exists() {
            bail!("Path does not exist: {}", path.display());
        }
        if path.is_dir() {
            collected.extend(discover_features(path)?);
        } else {
            collected.push(path.clone());
        }
    }
    Ok(collected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = "Feature: Minimal\n  Scenario: S\n    When I process the input\n";

    #[test]
    fn test_load_feature() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("minimal.feature");
        fs::write(&path, MINIMAL).unwrap();

        let feature = load_feature(&path).unwrap();
        assert_eq!(feature.name, "Minimal");
        assert_eq!(feature.path, path);
    }

    #[test]
    fn test_load_feature_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = load_feature(&temp.path().join("absent.feature")).unwrap_err();
        assert!(err.to_string().contains("Failed to read feature file"));
    }

    #[test]
    fn test_load_feature_parse_error_has_context() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.feature");
        fs::write(&path, "Scenario: no header\n").unwrap();

        let err = load_feature(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse feature file"));
        assert!(format!("{:#}", err).contains("expected 'Feature:' header"));
    }

    #[test]
    fn test_discover_features_recursive_and_sorted() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("nested")).unwrap();
        fs::write(temp.path().join("b.feature"), MINIMAL).unwrap();
        fs::write(temp.path().join("a.feature"), MINIMAL).unwrap();
        fs::write(temp.path().join("notes.md"), "ignored").unwrap();
        fs::write(temp.path().join("nested/c.feature"), MINIMAL).unwrap();

        let found = discover_features(temp.path()).unwrap();
        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(temp.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![
                PathBuf::from("a.feature"),
                PathBuf::from("b.feature"),
                PathBuf::from("nested/c.feature"),
            ]
        );
    }

    #[test]
    fn test_collect_feature_paths() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("one.feature");
        fs::write(&file, MINIMAL).unwrap();

        let collected = collect_feature_paths(&[file.clone()]).unwrap();
        assert_eq!(collected, vec![file]);

        let err = collect_feature_paths(&[temp.path().join("missing")]).unwrap_err();
        assert!(err.to_string().contains("Path does not exist"));
    }
}
