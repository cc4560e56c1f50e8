use crate::domain::model::{CountMethod, TokenCount};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

/// Filesystem seam. Relative paths are resolved by the implementation.
pub trait Storage {
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replaces the file's content, creating parent directories as needed.
    fn write_string(&self, path: &Path, content: &str) -> Result<()>;

    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Files directly inside `dir` whose extension equals `extension`,
    /// sorted by file name. Subdirectories are not searched.
    fn list_files(&self, dir: &Path, extension: &str) -> Result<Vec<PathBuf>>;
}

/// One precision tier of unit counting.
pub trait TokenCounter {
    fn method(&self) -> CountMethod;

    fn count_tokens(&self, text: &str) -> usize;

    fn count(&self, text: &str) -> TokenCount {
        TokenCount {
            count: self.count_tokens(text),
            method: self.method(),
        }
    }
}

pub trait ConfigProvider {
    fn recipe_dir(&self) -> &Path;
    fn dist_dir(&self) -> &Path;
    fn model(&self) -> &str;
}
