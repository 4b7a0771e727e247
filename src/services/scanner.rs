use crate::models::CropperSettings;
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;
use thiserror::Error;

/// Errors raised while opening a directory for cropping
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{0} is not a directory")]
    NotADirectory(Utf8PathBuf),

    #[error("Cannot read directory {path}: {source}")]
    Unreadable {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cannot create output folder {path}: {source}")]
    OutputFolder {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Images found in a directory plus the folder their crops go to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub filenames: Vec<String>,
    pub output_dir: Utf8PathBuf,
}

/// Lists recognized image files and prepares the output folder.
///
/// Recognition is a case-sensitive suffix match against the configured
/// extensions, so `photo.JPG` is not picked up by the default `.jpg` entry.
/// Filenames keep the order the platform's directory listing returns.
#[derive(Debug, Clone)]
pub struct DirectoryScanner {
    extensions: Vec<String>,
    output_folder: String,
}

impl DirectoryScanner {
    pub fn new(extensions: Vec<String>, output_folder: impl Into<String>) -> Self {
        Self {
            extensions,
            output_folder: output_folder.into(),
        }
    }

    pub fn from_settings(settings: &CropperSettings) -> Self {
        Self::new(
            settings.image_extensions.clone(),
            settings.output_folder.clone(),
        )
    }

    pub fn output_folder(&self) -> &str {
        &self.output_folder
    }

    /// Check a filename against the extension allow-list.
    pub fn is_recognized(&self, filename: &str) -> bool {
        self.extensions.iter().any(|ext| filename.ends_with(ext.as_str()))
    }

    /// List recognized image filenames in `directory`.
    ///
    /// Subdirectories are skipped, as are names that are not valid UTF-8.
    pub fn list_images(&self, directory: &Utf8Path) -> Result<Vec<String>, ScanError> {
        if !directory.is_dir() {
            return Err(ScanError::NotADirectory(directory.to_path_buf()));
        }

        let unreadable = |source| ScanError::Unreadable {
            path: directory.to_path_buf(),
            source,
        };

        let mut filenames = Vec::new();
        for entry in fs::read_dir(directory).map_err(unreadable)? {
            let entry = entry.map_err(unreadable)?;

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(raw) => {
                    tracing::warn!("Skipping non UTF-8 filename {:?} in {}", raw, directory);
                    continue;
                }
            };

            if !self.is_recognized(&name) {
                tracing::trace!("Ignoring {}", name);
                continue;
            }

            if entry.path().is_dir() {
                tracing::debug!("Ignoring directory {} with an image extension", name);
                continue;
            }

            filenames.push(name);
        }

        Ok(filenames)
    }

    /// Create `<directory>/<output_folder>` if it does not exist yet.
    pub fn ensure_output_dir(&self, directory: &Utf8Path) -> Result<Utf8PathBuf, ScanError> {
        let output_dir = directory.join(&self.output_folder);
        if !output_dir.is_dir() {
            fs::create_dir_all(&output_dir).map_err(|source| ScanError::OutputFolder {
                path: output_dir.clone(),
                source,
            })?;
            tracing::info!("Created output folder {}", output_dir);
        }
        Ok(output_dir)
    }

    /// List the images of `directory` and make sure the output folder exists.
    pub fn scan(&self, directory: &Utf8Path) -> Result<ScanResult, ScanError> {
        let filenames = self.list_images(directory)?;
        let output_dir = self.ensure_output_dir(directory)?;

        tracing::info!(
            "Scanned {}: {} image(s), output folder {}",
            directory,
            filenames.len(),
            output_dir
        );

        Ok(ScanResult {
            filenames,
            output_dir,
        })
    }
}

impl Default for DirectoryScanner {
    fn default() -> Self {
        Self::from_settings(&CropperSettings::default())
    }
}
