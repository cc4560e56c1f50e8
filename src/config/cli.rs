use crate::core::Storage;
use crate::utils::error::{PromptError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Storage on the local filesystem. Relative paths resolve against `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.base_path.join(path)
    }
}

/// `\r\n` and lone `\r` become `\n`.
pub fn normalize_newlines(text: String) -> String {
    if text.contains('\r') {
        text.replace("\r\n", "\n").replace('\r', "\n")
    } else {
        text
    }
}

impl Storage for LocalStorage {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(self.resolve(path))
            .map(normalize_newlines)
            .map_err(|source| PromptError::ReadError {
                path: path.to_path_buf(),
                source,
            })
    }

    fn write_string(&self, path: &Path, content: &str) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).map_err(|source| PromptError::WriteError {
                path: path.to_path_buf(),
                source,
            })?;
        }

        fs::write(full_path, content).map_err(|source| PromptError::WriteError {
            path: path.to_path_buf(),
            source,
        })
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.resolve(path).is_dir()
    }

    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        for entry in fs::read_dir(self.resolve(dir))? {
            let entry = entry?;
            // Follows symlinks, so linked recipes and artifacts are listed too.
            if !entry.path().is_file() {
                continue;
            }
            let name = PathBuf::from(entry.file_name());
            if name.extension().and_then(|ext| ext.to_str()) == Some(extension) {
                files.push(dir.join(name));
            }
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}
