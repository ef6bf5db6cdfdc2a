use anyhow::{Context, Result};
use encoding_rs::{Encoding, GB18030, GBK, WINDOWS_1252};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

/// Extensions treated as translatable documents
pub const DOCUMENT_EXTENSIONS: [&str; 8] =
    ["txt", "md", "rst", "py", "js", "html", "xml", "json"];

/// Non-UTF-8 encodings tried in order when reading documents.
/// windows-1252 accepts every byte sequence and acts as the last resort.
const FALLBACK_ENCODINGS: [&Encoding; 3] = [GBK, GB18030, WINDOWS_1252];

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)?;
        }
        Ok(())
    }

    /// Whether a path carries one of the supported document extensions
    pub fn is_document<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .map(|ext| {
                let ext = ext.to_string_lossy();
                DOCUMENT_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            })
            .unwrap_or(false)
    }

    /// Find all translatable documents under a directory, sorted by path
    /// so batch runs process them in a stable order
    pub fn find_documents<P: AsRef<Path>>(dir: P) -> Result<Vec<PathBuf>> {
        let mut result = Vec::new();

        for entry in WalkDir::new(dir.as_ref()).follow_links(true) {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if path.is_file() && Self::is_document(path) {
                result.push(path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a document, trying UTF-8 first and falling back to the legacy
    /// encodings in [`FALLBACK_ENCODINGS`]. A fallback wins only when it
    /// decodes the whole file without substitutions.
    pub fn read_document<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {:?}", path))?;

        if let Ok(text) = std::str::from_utf8(&bytes) {
            return Ok(text.to_string());
        }

        for encoding in FALLBACK_ENCODINGS {
            let (text, had_errors) = encoding.decode_without_bom_handling(&bytes);
            if !had_errors {
                debug!("Decoded {:?} as {}", path, encoding.name());
                return Ok(text.into_owned());
            }
        }

        // Unreachable while windows-1252 is the last fallback, kept so the
        // chain stays correct if that changes
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Write a document, creating parent directories as needed
    pub fn write_document<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            Self::ensure_dir(parent)?;
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))?;

        Ok(())
    }

    // @generates: Output path for a translated document
    // @params: input file, optional output directory
    /// The name is `{stem}_translated{ext}` next to the input unless an
    /// output directory is given; existing files are never overwritten,
    /// a numeric suffix probes for a free name instead.
    pub fn translated_output_path<P: AsRef<Path>>(input: P, output_dir: Option<&Path>) -> PathBuf {
        let input = input.as_ref();
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let extension = input
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        let dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();

        let candidate = dir.join(format!("{stem}_translated{extension}"));
        if !candidate.exists() {
            return candidate;
        }

        let mut counter = 1u32;
        loop {
            let candidate = dir.join(format!("{stem}_translated_{counter}{extension}"));
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}
