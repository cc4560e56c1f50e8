use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PromptError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error loading YAML from {}: {source}", .path.display())]
    RecipeParseError {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Configuration error in {}: {message}", .path.display())]
    ConfigParseError { path: PathBuf, message: String },

    #[error("{kind} directory not found: {}", .path.display())]
    MissingDirectoryError { kind: &'static str, path: PathBuf },

    #[error("{kind} file not found: {}", .path.display())]
    NotFoundError { kind: &'static str, path: PathBuf },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Tokenizer unavailable: {message}")]
    TokenizerError { message: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Where an error sits in the failure taxonomy.
///
/// `Configuration` errors abort the invoking command. `Item` errors belong to
/// a single recipe or file and never stop a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Item,
}

impl PromptError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PromptError::ConfigParseError { .. }
            | PromptError::MissingDirectoryError { .. }
            | PromptError::NotFoundError { .. }
            | PromptError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            _ => ErrorCategory::Item,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PromptError::MissingDirectoryError { kind, path } => {
                format!("{} directory not found: {}", kind, path.display())
            }
            PromptError::NotFoundError { kind, path } => {
                format!("Error: {} file not found: {}", kind, path.display())
            }
            PromptError::RecipeParseError { source, .. } => {
                format!("Error loading YAML: {}", source)
            }
            other => other.to_string(),
        }
    }

    /// Two-line stderr text for errors that end the process.
    pub fn fatal_report(&self) -> String {
        format!(
            "❌ {}\n💡 {}",
            self.user_friendly_message(),
            self.recovery_suggestion()
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            PromptError::MissingDirectoryError { kind: "Dist", .. } => {
                "Please run promptkit-build first to generate the prompt files."
            }
            PromptError::MissingDirectoryError { .. } => {
                "Create the directory or point --root / promptkit.toml at the right place."
            }
            PromptError::NotFoundError { .. } => "Check the name; the extension may be omitted.",
            PromptError::RecipeParseError { .. } => {
                "Recipes must be a YAML mapping with an optional `modules` list of paths."
            }
            PromptError::ConfigParseError { .. } | PromptError::InvalidConfigValueError { .. } => {
                "Fix promptkit.toml or the command-line overrides."
            }
            PromptError::TokenizerError { .. } => "Counts fall back to a character estimate.",
            _ => "Check file permissions and encoding (UTF-8 expected).",
        }
    }
}

pub type Result<T> = std::result::Result<T, PromptError>;
