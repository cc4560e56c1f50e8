//! Recipe to artifact assembly.
//!
//! A recipe lists module files in output order. Each module is read, trimmed
//! and, unless empty, joined to the others with a blank line. The artifact is
//! written to the dist directory under the recipe's stem.

use crate::core::{ConfigProvider, Storage};
use crate::domain::model::{
    BuildOutcome, BuildSummary, ModuleEntry, ModuleStatus, Recipe, RecipeFailure, RecipeFile,
    MODULE_SEPARATOR, RECIPE_EXTENSION,
};
use crate::utils::error::{PromptError, Result};
use crate::utils::validation::ensure_extension;
use std::path::{Path, PathBuf};

/// Joins module texts in order. Pieces are trimmed first; empty ones are dropped
/// without leaving a separator behind.
pub fn assemble<'a, I>(pieces: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join(MODULE_SEPARATOR)
}

/// Parses recipe YAML. An empty document or a null `modules` yields no modules.
pub fn parse_recipe(path: &Path, content: &str) -> Result<Recipe> {
    let parse_error = |source: serde_yaml::Error| PromptError::RecipeParseError {
        path: path.to_path_buf(),
        source,
    };

    let file = if content.trim().is_empty() {
        None
    } else {
        match serde_yaml::from_str::<serde_yaml::Value>(content).map_err(parse_error)? {
            serde_yaml::Value::Null => None,
            value => Some(serde_yaml::from_value::<RecipeFile>(value).map_err(parse_error)?),
        }
    };

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(Recipe {
        name,
        path: path.to_path_buf(),
        modules: file.and_then(|f| f.modules).unwrap_or_default(),
    })
}

pub struct Assembler<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> Assembler<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn check_recipe_dir(&self) -> Result<()> {
        let dir = self.config.recipe_dir();
        if self.storage.is_dir(dir) {
            Ok(())
        } else {
            Err(PromptError::MissingDirectoryError {
                kind: "Recipes",
                path: dir.to_path_buf(),
            })
        }
    }

    /// Maps a user-supplied name (extension optional) to an existing recipe path.
    pub fn locate_recipe(&self, name: &str) -> Result<PathBuf> {
        let path = self
            .config
            .recipe_dir()
            .join(ensure_extension(name, RECIPE_EXTENSION));
        if self.storage.exists(&path) {
            Ok(path)
        } else {
            Err(PromptError::NotFoundError {
                kind: "Recipe",
                path,
            })
        }
    }

    pub fn load_recipe(&self, path: &Path) -> Result<Recipe> {
        let content = self.storage.read_to_string(path)?;
        parse_recipe(path, &content)
    }

    pub fn artifact_path(&self, recipe: &Recipe) -> PathBuf {
        self.config.dist_dir().join(recipe.artifact_file_name())
    }

    /// Builds one recipe, overwriting its artifact.
    pub fn build_recipe(&self, path: &Path) -> Result<BuildOutcome> {
        self.run_recipe(path, true)
    }

    /// Resolves one recipe without writing anything.
    pub fn plan_recipe(&self, path: &Path) -> Result<BuildOutcome> {
        self.run_recipe(path, false)
    }

    pub fn build_all(&self) -> Result<BuildSummary> {
        self.run_all(true)
    }

    pub fn plan_all(&self) -> Result<BuildSummary> {
        self.run_all(false)
    }

    fn run_recipe(&self, path: &Path, write: bool) -> Result<BuildOutcome> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        println!("Building recipe: {}...", file_name);

        let recipe = self.load_recipe(path)?;
        tracing::debug!(
            "Recipe {} lists {} module(s)",
            recipe.name,
            recipe.modules.len()
        );

        let mut modules = Vec::with_capacity(recipe.modules.len());
        let mut texts = Vec::new();

        for reference in &recipe.modules {
            let (status, text) = self.resolve_module(reference);
            if let Some(text) = text {
                texts.push(text);
            }
            modules.push(ModuleEntry {
                reference: reference.clone(),
                status,
            });
        }

        let content = assemble(texts.iter().map(String::as_str));
        let artifact_path = self.artifact_path(&recipe);

        if write {
            self.storage.write_string(&artifact_path, &content)?;
            println!("Generated: {}", artifact_path.display());
            tracing::info!(
                recipe = %recipe.name,
                bytes = content.len(),
                "artifact written"
            );
        }

        Ok(BuildOutcome {
            recipe: recipe.name,
            artifact_path,
            modules,
            bytes: content.len(),
            written: write,
        })
    }

    fn resolve_module(&self, reference: &str) -> (ModuleStatus, Option<String>) {
        let path = Path::new(reference);

        if !self.storage.exists(path) {
            println!("  Warning: Module not found: {}", path.display());
            return (ModuleStatus::Missing, None);
        }

        match self.storage.read_to_string(path) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    tracing::debug!("Module {} is empty after trimming, skipped", reference);
                    (ModuleStatus::Empty, None)
                } else {
                    (ModuleStatus::Included, Some(trimmed.to_string()))
                }
            }
            Err(e) => {
                println!("  Warning: Module unreadable: {} ({})", path.display(), e);
                tracing::warn!("Skipping unreadable module {}: {}", reference, e);
                (ModuleStatus::Unreadable, None)
            }
        }
    }

    fn run_all(&self, write: bool) -> Result<BuildSummary> {
        let recipes = self
            .storage
            .list_files(self.config.recipe_dir(), RECIPE_EXTENSION)?;

        let mut summary = BuildSummary::default();

        if recipes.is_empty() {
            println!("No recipes found.");
            return Ok(summary);
        }

        for recipe in recipes {
            match self.run_recipe(&recipe, write) {
                Ok(outcome) => summary.outcomes.push(outcome),
                Err(e) => {
                    println!("{}", e.user_friendly_message());
                    tracing::error!("Recipe {} failed: {}", recipe.display(), e);
                    summary.failures.push(RecipeFailure {
                        recipe,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(summary)
    }
}
