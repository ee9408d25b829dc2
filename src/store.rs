//! Flat-directory file store for recordings and their result documents.
//!
//! Filenames are the only index: a recording is `<stamp>.wav` (or
//! `tr_<stamp>.wav` for synthesized speech) and its result document is the
//! same name with `.txt` appended. Listing the directory is the only way
//! entries are discovered.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Extensions visible in listings and accepted for upload.
pub const ALLOWED_EXTENSIONS: &[&str] = &["wav", "txt"];

/// Placeholder shown when a result document cannot be read.
pub const READ_ERROR_PLACEHOLDER: &str = "Error reading file";

/// Returns true if the filename carries an allowed extension.
pub fn allowed_file(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => {
            ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
        }
        _ => false,
    }
}

/// A listed file, with contents loaded for result documents.
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub name: String,
    /// Text contents, present only for `.txt` entries.
    pub contents: Option<String>,
}

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create upload directory: {}", root.display()))?;

        info!("File store ready at {}", root.display());

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Generate a filename stamp: second-precision local timestamp plus a
    /// random suffix so two submissions in the same second cannot collide.
    /// Zero-padded 24-hour time keeps descending name order most-recent-first.
    pub fn generate_stamp() -> String {
        Self::stamp_at(Local::now())
    }

    fn stamp_at(now: DateTime<Local>) -> String {
        // 8 hex chars of randomness: a same-second burst of hundreds of
        // submissions has a negligible birthday-collision probability.
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!("{}-{}", now.format("%Y%m%d-%H%M%S"), &suffix[..8])
    }

    /// Write a recording's raw bytes. The name must already be a generated
    /// stamp name; caller input never reaches the filesystem directly.
    pub fn save_recording(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.root.join(filename);
        fs::write(&path, bytes)
            .with_context(|| format!("Failed to write recording: {}", path.display()))?;

        info!("Stored recording {} ({} bytes)", filename, bytes.len());

        Ok(path)
    }

    /// Read a recording back in full.
    pub fn read_recording(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.root.join(filename);
        fs::read(&path).with_context(|| format!("Failed to read recording: {}", path.display()))
    }

    /// Write the result document paired with a recording. Returns the
    /// document's filename (`<recording>.txt`).
    pub fn save_result(&self, recording_filename: &str, text: &str) -> Result<String> {
        let result_filename = format!("{}.txt", recording_filename);
        let path = self.root.join(&result_filename);
        fs::write(&path, text)
            .with_context(|| format!("Failed to write result document: {}", path.display()))?;

        info!("Stored result document {}", result_filename);

        Ok(result_filename)
    }

    /// List allowed filenames, sorted descending (most recent first given
    /// the stamp naming scheme).
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.root)
            .with_context(|| format!("Failed to list upload directory: {}", self.root.display()))?;

        let mut files: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| allowed_file(name))
            .collect();

        files.sort_by(|a, b| b.cmp(a));

        Ok(files)
    }

    /// Full listing for the index page: every allowed file, with `.txt`
    /// contents loaded. A single unreadable document degrades to a
    /// placeholder instead of failing the whole listing.
    pub fn listing(&self) -> Result<Vec<StoredFile>> {
        let files = self.list()?;

        Ok(files
            .into_iter()
            .map(|name| {
                let contents = if name.ends_with(".txt") {
                    Some(match fs::read_to_string(self.root.join(&name)) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!("Error reading file {}: {}", name, e);
                            READ_ERROR_PLACEHOLDER.to_string()
                        }
                    })
                } else {
                    None
                };
                StoredFile { name, contents }
            })
            .collect())
    }

    /// Read a stored file by name. Returns `None` when the file does not
    /// exist or the name is not a plain filename (no separators, no `..`).
    pub fn read(&self, filename: &str) -> Result<Option<Vec<u8>>> {
        let Some(name) = sanitize_filename(filename) else {
            warn!("Rejected unsafe filename: {:?}", filename);
            return Ok(None);
        };

        let path = self.root.join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read stored file: {}", path.display()))
            }
        }
    }
}

/// Accept only plain filenames: no path separators, no parent traversal.
pub fn sanitize_filename(name: &str) -> Option<&str> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
        || name == "."
        || name == ".."
    {
        None
    } else {
        Some(name)
    }
}
