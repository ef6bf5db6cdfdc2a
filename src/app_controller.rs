use anyhow::{Context, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::app_config::Config;
use crate::chunking::Segmenter;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::translation::{
    BatchRunner, CancellationToken, DocumentJob, DocumentOutcome, DocumentStatus, Orchestrator,
    ProgressEvent, ProgressSink,
};

// @module: Application controller for document translation

/// One captured log line, replayed after the progress bars are cleared
pub struct LogEntry {
    pub level: String,
    pub message: String,
}

/// Main application controller for document translation
pub struct Controller {
    // @field: App configuration
    config: Config,
}

/// Progress sink that renders one segment bar per in-flight document.
/// The batch is sequential, so at most one bar is active at a time.
struct ProgressBarSink {
    multi: MultiProgress,
    segment_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressBarSink {
    fn new(multi: MultiProgress) -> Self {
        Self {
            multi,
            segment_bar: Mutex::new(None),
        }
    }
}

impl ProgressSink for ProgressBarSink {
    fn on_event(&self, job_id: &str, event: &ProgressEvent) {
        match event {
            ProgressEvent::Segmented { segments } => {
                let bar = self.multi.add(ProgressBar::new(*segments as u64));
                bar.set_style(bar_style("segments"));
                bar.set_message(display_name_of(job_id));
                *self.segment_bar.lock() = Some(bar);
            }
            ProgressEvent::SegmentCompleted { completed, .. } => {
                if let Some(bar) = &*self.segment_bar.lock() {
                    bar.set_position(*completed as u64);
                }
            }
            ProgressEvent::StatusChanged { status }
                if matches!(
                    status,
                    DocumentStatus::Completed | DocumentStatus::Failed | DocumentStatus::Cancelled
                ) =>
            {
                if let Some(bar) = self.segment_bar.lock().take() {
                    bar.finish_and_clear();
                }
            }
            _ => {}
        }
    }
}

/// Progress bar style with graceful fallbacks for limited terminals
fn bar_style(units: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {units} ({{percent}}%) {{msg}} {{eta}}"
        ))
        .or_else(|_| {
            ProgressStyle::default_bar()
                .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
        })
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▓▒░")
}

/// Short display form of a job identifier (the file name when it is a path)
fn display_name_of(job_id: &str) -> String {
    Path::new(job_id)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| job_id.to_string())
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Invalid configuration")?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Translate a file, or every supported document under a directory.
    ///
    /// With a directory input, `output` names the directory that receives
    /// the translated files. With a file input, an `output` that is an
    /// existing directory receives the file under a derived name; any other
    /// `output` is used as the exact output path.
    pub async fn run(
        &self,
        input: PathBuf,
        output: Option<PathBuf>,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let start_time = Instant::now();

        if !input.exists() {
            return Err(anyhow::anyhow!("Input path does not exist: {:?}", input));
        }

        let files = self.collect_input_files(&input)?;
        let single_file = !input.is_dir();
        let output_paths = self.plan_output_paths(&files, single_file, output.as_deref());

        let mut jobs = Vec::with_capacity(files.len());
        for file in &files {
            let text = FileManager::read_document(file)?;
            jobs.push(DocumentJob::new(file.to_string_lossy(), text));
        }

        self.warn_on_unrecognized_languages();
        info!(
            "Translating with {} ({}): {} -> {}",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model(),
            self.config.source_language,
            self.config.target_language
        );

        let orchestrator = Orchestrator::from_config(&self.config)?;
        let runner = BatchRunner::new(orchestrator);

        let multi_progress = MultiProgress::new();
        let batch_bar = multi_progress.add(ProgressBar::new(jobs.len() as u64));
        batch_bar.set_style(bar_style("documents"));
        batch_bar.set_message("Translating");
        let sink = ProgressBarSink::new(multi_progress);

        let pb = batch_bar.clone();
        let outcome = runner
            .run(&jobs, cancel, &sink, move |completed, _total, id, _outcome| {
                pb.set_message(display_name_of(id));
                pb.set_position(completed as u64);
            })
            .await;
        batch_bar.finish_and_clear();

        let mut logs: Vec<LogEntry> = Vec::new();
        let mut written = 0usize;
        for (report, output_path) in outcome.reports().iter().zip(&output_paths) {
            match &report.outcome {
                DocumentOutcome::Completed { translated } => {
                    FileManager::write_document(output_path, translated)?;
                    info!("Success: {}", output_path.display());
                    written += 1;
                }
                DocumentOutcome::Failed(reason) => {
                    logs.push(LogEntry {
                        level: "ERROR".to_string(),
                        message: format!("{}: {}", report.id, reason),
                    });
                }
                DocumentOutcome::Cancelled => {
                    logs.push(LogEntry {
                        level: "WARN".to_string(),
                        message: format!("{}: cancelled before completion", report.id),
                    });
                }
            }
        }

        self.replay_logs(&logs, &input, output.as_deref())?;

        info!(
            "Batch complete in {}: {} ({} files written)",
            Self::format_duration(start_time.elapsed()),
            outcome.summary(),
            written
        );

        if single_file {
            match outcome.reports().first().map(|report| &report.outcome) {
                Some(DocumentOutcome::Failed(reason)) => {
                    return Err(anyhow::anyhow!("Translation failed: {}", reason));
                }
                Some(DocumentOutcome::Cancelled) => {
                    return Err(anyhow::anyhow!("Translation cancelled"));
                }
                _ => {}
            }
        }

        Ok(())
    }

    /// Report segment counts and token estimates without calling any backend
    pub fn estimate(&self, input: PathBuf) -> Result<()> {
        if !input.exists() {
            return Err(anyhow::anyhow!("Input path does not exist: {:?}", input));
        }

        let files = self.collect_input_files(&input)?;
        let segmenter = Segmenter::new(
            self.config.chunking.token_budget,
            &self.config.chunking.boundaries,
        );

        let mut total_segments = 0usize;
        let mut total_tokens = 0usize;
        for file in &files {
            let text = FileManager::read_document(file)?;
            let segments = segmenter.segment(&text);
            let tokens: usize = segments.iter().map(|s| s.estimated_tokens).sum();
            info!(
                "{}: {} segments, ~{} tokens",
                file.display(),
                segments.len(),
                tokens
            );
            total_segments += segments.len();
            total_tokens += tokens;
        }

        if files.len() > 1 {
            info!(
                "Total: {} files, {} segments, ~{} tokens",
                files.len(),
                total_segments,
                total_tokens
            );
        }

        Ok(())
    }

    /// Probe the configured backend and report whether it answers
    pub async fn test_connection(&self) -> Result<()> {
        let orchestrator = Orchestrator::from_config(&self.config)?;
        let backend = orchestrator.backend();

        info!(
            "Testing connection to {} at {}",
            backend.describe(),
            self.config.translation.get_endpoint()
        );

        if backend.check_reachable().await {
            info!("Connection OK");
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "Backend {} is not reachable at {}",
                backend.describe(),
                self.config.translation.get_endpoint()
            ))
        }
    }

    fn collect_input_files(&self, input: &Path) -> Result<Vec<PathBuf>> {
        if input.is_dir() {
            let files = FileManager::find_documents(input)?;
            if files.is_empty() {
                return Err(anyhow::anyhow!(
                    "No translatable documents found in {:?}",
                    input
                ));
            }
            Ok(files)
        } else {
            Ok(vec![input.to_path_buf()])
        }
    }

    fn plan_output_paths(
        &self,
        files: &[PathBuf],
        single_file: bool,
        output: Option<&Path>,
    ) -> Vec<PathBuf> {
        if single_file {
            let file = &files[0];
            let path = match output {
                Some(out) if !out.is_dir() => out.to_path_buf(),
                other => FileManager::translated_output_path(file, other),
            };
            return vec![path];
        }

        files
            .iter()
            .map(|file| FileManager::translated_output_path(file, output))
            .collect()
    }

    fn warn_on_unrecognized_languages(&self) {
        for tag in [
            &self.config.source_language,
            &self.config.target_language,
        ] {
            if !language_utils::is_recognized(tag) {
                warn!("Language tag {:?} is not recognized, passing it to prompts verbatim", tag);
            }
        }
    }

    /// Surface per-document problems after the progress bars are gone and
    /// keep a copy next to the outputs
    fn replay_logs(&self, logs: &[LogEntry], input: &Path, output: Option<&Path>) -> Result<()> {
        if logs.is_empty() {
            return Ok(());
        }

        let error_count = logs.iter().filter(|log| log.level == "ERROR").count();
        let warning_count = logs.iter().filter(|log| log.level == "WARN").count();
        info!(
            "Translation completed with {} errors and {} warnings.",
            error_count, warning_count
        );

        for log in logs {
            match log.level.as_str() {
                "ERROR" => error!("{}", log.message),
                "WARN" => warn!("{}", log.message),
                _ => debug!("{}", log.message),
            }
        }

        let log_dir = output
            .filter(|path| path.is_dir())
            .map(Path::to_path_buf)
            .or_else(|| {
                if input.is_dir() {
                    Some(input.to_path_buf())
                } else {
                    input.parent().map(Path::to_path_buf)
                }
            })
            .unwrap_or_default();
        let log_file_path = log_dir.join("doctrans.issues.log");
        let context = format!(
            "{} - {} ({})",
            self.config.translation.provider.display_name(),
            self.config.translation.get_model(),
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );

        if let Err(e) = self.write_logs_to_file(logs, &log_file_path, &context) {
            warn!("Failed to write logs to file: {}", e);
        } else {
            info!("Logs written to {}", log_file_path.display());
        }

        Ok(())
    }

    /// Write captured log entries to a log file
    fn write_logs_to_file(
        &self,
        logs: &[LogEntry],
        file_path: &Path,
        translation_context: &str,
    ) -> Result<()> {
        let mut log_content = String::new();

        log_content.push_str(&format!(
            "Translation Log - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        log_content.push_str(&format!("Context: {}\n\n", translation_context));

        for entry in logs {
            log_content.push_str(&format!("[{}] {}\n", entry.level, entry.message));
        }

        FileManager::write_document(file_path, &log_content)?;

        Ok(())
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
