use crate::core::ConfigProvider;
use crate::utils::error::{PromptError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "promptkit.toml";
pub const DEFAULT_ROOT_DIR: &str = ".";
pub const DEFAULT_RECIPE_DIR: &str = "recipes";
pub const DEFAULT_DIST_DIR: &str = "dist";
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub paths: PathsConfig,
    pub tokens: TokensConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Base for every other path, module references included.
    pub root: PathBuf,
    pub recipes: PathBuf,
    pub dist: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT_DIR),
            recipes: PathBuf::from(DEFAULT_RECIPE_DIR),
            dist: PathBuf::from(DEFAULT_DIST_DIR),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokensConfig {
    pub model: String,
}

impl Default for TokensConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ProjectConfig {
    /// Loads `explicit` if given, else `promptkit.toml` when present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) if !path.exists() => Err(PromptError::NotFoundError {
                kind: "Config",
                path: path.to_path_buf(),
            }),
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| PromptError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            PromptError::ConfigParseError { message, .. } => PromptError::ConfigParseError {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PromptError::ConfigParseError {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PromptError::ConfigParseError {
            path: PathBuf::from(DEFAULT_CONFIG_FILE),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.paths.root = root.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.tokens.model = model.into();
        self
    }

    /// Applies command-line overrides; `None` keeps the loaded value.
    pub fn apply_overrides(
        &mut self,
        root: Option<PathBuf>,
        recipes: Option<PathBuf>,
        dist: Option<PathBuf>,
        model: Option<String>,
    ) {
        if let Some(root) = root {
            self.paths.root = root;
        }
        if let Some(recipes) = recipes {
            self.paths.recipes = recipes;
        }
        if let Some(dist) = dist {
            self.paths.dist = dist;
        }
        if let Some(model) = model {
            self.tokens.model = model;
        }
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }
}

impl ConfigProvider for ProjectConfig {
    fn recipe_dir(&self) -> &Path {
        &self.paths.recipes
    }

    fn dist_dir(&self) -> &Path {
        &self.paths.dist
    }

    fn model(&self) -> &str {
        &self.tokens.model
    }
}

impl Validate for ProjectConfig {
    fn validate(&self) -> Result<()> {
        validate_path("paths.root", &self.paths.root)?;
        validate_path("paths.recipes", &self.paths.recipes)?;
        validate_path("paths.dist", &self.paths.dist)?;
        validate_non_empty_string("tokens.model", &self.tokens.model)?;
        Ok(())
    }
}
