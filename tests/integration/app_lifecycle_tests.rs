/*!
 * Integration tests for application lifecycle
 */

use anyhow::Result;
use tokio_test;

use doctrans::app_config::Config;
use doctrans::app_controller::Controller;
use doctrans::translation::CancellationToken;

use crate::common;

/// Test the controller initialization with default config
#[test]
fn test_controller_initialization_withDefaultConfig_shouldSucceed() -> Result<()> {
    let controller = Controller::new_for_test()?;

    assert_eq!(controller.config().source_language, "en");
    assert_eq!(controller.config().target_language, "zh");

    Ok(())
}

/// Test the controller with custom configuration
#[test]
fn test_controller_withCustomConfig_shouldKeepLanguages() -> Result<()> {
    let mut config = Config::default();
    config.source_language = "es".to_string();
    config.target_language = "de".to_string();

    let controller = Controller::with_config(config)?;

    assert_eq!(controller.config().source_language, "es");
    assert_eq!(controller.config().target_language, "de");

    Ok(())
}

/// Test that an invalid configuration never produces a controller
#[test]
fn test_controller_withBlankTargetLanguage_shouldRejectConstruction() {
    let mut config = Config::default();
    config.target_language = String::new();

    assert!(Controller::with_config(config).is_err());
}

/// Test segment estimation over a directory, which needs no backend
#[test]
fn test_estimate_withSampleDocuments_shouldSucceedOffline() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    common::create_test_file(&root, "article.md", &common::sample_article())?;
    common::create_test_file(&root, "note.txt", "A single line of text.")?;

    controller.estimate(root)?;

    Ok(())
}

/// Test that a missing input path is rejected before any work starts
#[test]
fn test_run_withMissingInput_shouldFail() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let missing = std::path::PathBuf::from("/nonexistent/path/to/input.txt");

    let result = tokio_test::block_on(async {
        controller.run(missing, None, &CancellationToken::new()).await
    });

    let err = result.expect_err("missing input should fail");
    assert!(err.to_string().contains("does not exist"));

    Ok(())
}

/// Test that a directory without documents is reported as such
#[test]
fn test_run_withEmptyDirectory_shouldReportNoDocuments() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;

    let result = tokio_test::block_on(async {
        controller
            .run(temp_dir.path().to_path_buf(), None, &CancellationToken::new())
            .await
    });

    let err = result.expect_err("empty directory should fail");
    assert!(err.to_string().contains("No translatable documents"));

    Ok(())
}

/// Test that a run cancelled up front writes no translated file
#[test]
fn test_run_withPreCancelledToken_shouldNotWriteOutput() -> Result<()> {
    let controller = Controller::new_for_test()?;
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path().to_path_buf();
    let input = common::create_test_file(&root, "note.txt", "Some text to translate.")?;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = tokio_test::block_on(async {
        controller.run(input, None, &cancel).await
    });

    let err = result.expect_err("cancelled run should fail");
    assert!(err.to_string().contains("cancelled"));

    // No translation output, only the issues log
    assert!(!root.join("note_translated.txt").exists());
    assert!(root.join("doctrans.issues.log").exists());

    Ok(())
}
