/*!
 * Tests for file system utilities
 */

use anyhow::Result;
use doctrans::file_utils::FileManager;
use std::fs;
use crate::common;

/// Test file and directory existence checks
#[test]
fn test_existenceChecks_withFilesAndDirs_shouldDistinguishThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = common::create_test_file(&temp_dir.path().to_path_buf(), "note.txt", "content")?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    assert!(FileManager::dir_exists(temp_dir.path()));
    assert!(!FileManager::dir_exists(&file));
    assert!(!FileManager::file_exists(temp_dir.path().join("missing.txt")));

    Ok(())
}

/// Test directory creation with missing parents
#[test]
fn test_ensureDir_withNestedPath_shouldCreateAllLevels() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("c");

    FileManager::ensure_dir(&nested)?;
    assert!(FileManager::dir_exists(&nested));

    // Second call on an existing directory is a no-op
    FileManager::ensure_dir(&nested)?;

    Ok(())
}

/// Test document extension recognition
#[test]
fn test_isDocument_withVariousExtensions_shouldMatchSupportedOnes() {
    assert!(FileManager::is_document("notes.txt"));
    assert!(FileManager::is_document("README.md"));
    assert!(FileManager::is_document("page.HTML"));
    assert!(FileManager::is_document("data.json"));
    assert!(!FileManager::is_document("movie.srt"));
    assert!(!FileManager::is_document("archive.tar.gz"));
    assert!(!FileManager::is_document("no_extension"));
}

/// Test recursive document discovery with stable ordering
#[test]
fn test_findDocuments_withMixedTree_shouldReturnSortedDocumentsOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let sub = root.join("sub");
    fs::create_dir(&sub)?;

    common::create_test_file(&root, "b.md", "two")?;
    common::create_test_file(&root, "a.txt", "one")?;
    common::create_test_file(&root, "skip.bin", "binary")?;
    common::create_test_file(&sub, "c.rst", "three")?;

    let found = FileManager::find_documents(&root)?;
    let names: Vec<String> = found
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .collect();
    assert_eq!(names, vec!["a.txt", "b.md", "c.rst"]);

    Ok(())
}

/// Test reading documents in UTF-8 and legacy encodings
#[test]
fn test_readDocument_withUtf8AndGbkBytes_shouldDecodeBoth() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();

    let utf8 = common::create_test_file(&root, "utf8.txt", "Hello, 世界")?;
    assert_eq!(FileManager::read_document(&utf8)?, "Hello, 世界");

    // "你好" in GBK
    let gbk = root.join("gbk.txt");
    fs::write(&gbk, [0xC4, 0xE3, 0xBA, 0xC3])?;
    assert_eq!(FileManager::read_document(&gbk)?, "你好");

    Ok(())
}

/// Test writing a document into a directory that does not exist yet
#[test]
fn test_writeDocument_withMissingParent_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("out").join("deep").join("result.txt");

    FileManager::write_document(&target, "translated body")?;
    assert_eq!(fs::read_to_string(&target)?, "translated body");

    Ok(())
}

/// Test translated output naming next to the input and under an output dir
#[test]
fn test_translatedOutputPath_withFreeName_shouldUseTranslatedSuffix() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&root, "report.md", "body")?;

    let output = FileManager::translated_output_path(&input, None);
    assert_eq!(output, root.join("report_translated.md"));

    let elsewhere = root.join("out");
    let redirected = FileManager::translated_output_path(&input, Some(&elsewhere));
    assert_eq!(redirected, elsewhere.join("report_translated.md"));

    Ok(())
}

/// Test that existing outputs are never overwritten
#[test]
fn test_translatedOutputPath_withExistingOutputs_shouldProbeNumericSuffixes() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&root, "report.md", "body")?;

    common::create_test_file(&root, "report_translated.md", "first run")?;
    let second = FileManager::translated_output_path(&input, None);
    assert_eq!(second, root.join("report_translated_1.md"));

    common::create_test_file(&root, "report_translated_1.md", "second run")?;
    let third = FileManager::translated_output_path(&input, None);
    assert_eq!(third, root.join("report_translated_2.md"));

    Ok(())
}
