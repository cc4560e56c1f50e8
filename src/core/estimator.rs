use crate::core::{ConfigProvider, Storage, TokenCounter};
use crate::domain::model::{Report, ReportEntry, ReportRow, ARTIFACT_EXTENSION};
use crate::utils::error::{PromptError, Result};
use crate::utils::validation::ensure_extension;
use std::path::{Path, PathBuf};

/// Counts tokens and characters for generated artifacts.
pub struct Estimator<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    counter: Box<dyn TokenCounter>,
}

impl<S: Storage, C: ConfigProvider> Estimator<S, C> {
    pub fn new(storage: S, config: C, counter: Box<dyn TokenCounter>) -> Self {
        Self {
            storage,
            config,
            counter,
        }
    }

    pub fn model(&self) -> &str {
        self.config.model()
    }

    pub fn dist_dir(&self) -> &Path {
        self.config.dist_dir()
    }

    pub fn check_dist_dir(&self) -> Result<()> {
        let dir = self.config.dist_dir();
        if self.storage.is_dir(dir) {
            Ok(())
        } else {
            Err(PromptError::MissingDirectoryError {
                kind: "Dist",
                path: dir.to_path_buf(),
            })
        }
    }

    pub fn locate_artifact(&self, name: &str) -> Result<PathBuf> {
        let path = self
            .config
            .dist_dir()
            .join(ensure_extension(name, ARTIFACT_EXTENSION));
        if self.storage.exists(&path) {
            Ok(path)
        } else {
            Err(PromptError::NotFoundError {
                kind: "Artifact",
                path,
            })
        }
    }

    pub fn analyze_file(&self, path: &Path) -> Result<ReportRow> {
        let content = self.storage.read_to_string(path)?;
        let counted = self.counter.count(&content);

        Ok(ReportRow {
            file_name: display_name(path),
            tokens: counted.count,
            chars: content.chars().count(),
            method: counted.method,
        })
    }

    /// Analyzes each path in order. Unreadable files become failed entries.
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> Report {
        let mut report = Report::new(self.model());

        for path in paths {
            let entry = match self.analyze_file(path) {
                Ok(row) => {
                    tracing::debug!(
                        "{}: {} tokens ({}), {} chars",
                        row.file_name,
                        row.tokens,
                        row.method,
                        row.chars
                    );
                    ReportEntry::Counted(row)
                }
                Err(e) => {
                    tracing::error!("Error reading {}: {}", path.display(), e);
                    ReportEntry::Failed {
                        file_name: display_name(path),
                        error: e.to_string(),
                    }
                }
            };
            report.entries.push(entry);
        }

        report
    }

    /// Every artifact in the dist directory, sorted by file name.
    pub fn analyze_all(&self) -> Result<Report> {
        let files = self
            .storage
            .list_files(self.config.dist_dir(), ARTIFACT_EXTENSION)?;
        Ok(self.analyze_paths(&files))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
