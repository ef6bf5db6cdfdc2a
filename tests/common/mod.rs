/*!
 * Common test utilities for the doctrans test suite
 */

use std::path::PathBuf;
use std::fs;
use anyhow::Result;
use tempfile::TempDir;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &PathBuf, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a realistic multi-paragraph article for segmentation tests
pub fn sample_article() -> String {
    r#"The lighthouse at Cape Meares was first lit in January 1890. Its lens was shipped around Cape Horn from Paris, packed in straw and sawdust. Keepers climbed the tower twice a night to trim the wicks.

Life at the station was isolating. Supplies arrived by boat four times a year, weather permitting! The keepers' children rowed across the bay to attend school, and in winter they boarded in town.

Electrification arrived in 1934 and changed everything. The oil room became a storage shed, and the second keeper position was eliminated. Automation followed three decades later.

Today the tower is a museum. Volunteers lead tours from May to September, and the original lens still turns on calm evenings. Visitors ask the same question every day: what was it like to live here?

Preservation is constant work. Salt air corrodes the ironwork, and winter storms strip paint from the seaward wall. Each spring a crew spends two weeks repainting and reglazing.

The foghorn was retired in 1963, but recordings of it play in the exhibit hall. Some former keepers say they still wake at night expecting to hear it."#
        .to_string()
}

/// Strips all whitespace, for whitespace-insensitive content comparison
pub fn squash_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}
