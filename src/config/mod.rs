pub mod cli;
pub mod toml_config;

pub use toml_config::ProjectConfig;

#[cfg(feature = "cli")]
use clap::{Args, Parser, ValueEnum};
#[cfg(feature = "cli")]
use std::path::PathBuf;

/// Flags shared by both binaries. Each one overrides `promptkit.toml`.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Project config file (default: ./promptkit.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory that module references and the other paths resolve against
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Directory holding *.yaml recipes
    #[arg(long)]
    pub recipes_dir: Option<PathBuf>,

    /// Directory receiving the generated *.md artifacts
    #[arg(long)]
    pub dist_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CommonArgs {
    pub fn init_logging(&self) {
        if self.json_logs {
            crate::utils::logger::init_json_logger();
        } else {
            crate::utils::logger::init_cli_logger(self.verbose);
        }
    }

    /// Loads the project config and layers these flags over it.
    pub fn load_config(&self, model: Option<String>) -> crate::Result<ProjectConfig> {
        let mut config = ProjectConfig::load(self.config.as_deref())?;
        config.apply_overrides(
            self.root.clone(),
            self.recipes_dir.clone(),
            self.dist_dir.clone(),
            model,
        );
        Ok(config)
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "promptkit-build")]
#[command(about = "Build system prompts from recipes.")]
pub struct BuildArgs {
    /// The recipe to build (e.g. 'backend_master'). If omitted, builds all recipes.
    pub recipe_name: Option<String>,

    /// Show what each recipe would include without writing artifacts
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "promptkit-tokens")]
#[command(about = "Calculate tokens for generated prompts.")]
pub struct TokensArgs {
    /// The artifact in the dist directory to analyze. If omitted, analyzes all files.
    pub file_name: Option<String>,

    /// Target model for token calculation (e.g. gpt-4, gpt-3.5-turbo). Default: gpt-4o
    #[arg(short, long)]
    pub model: Option<String>,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_build_args_parse() {
        let args = BuildArgs::parse_from(["promptkit-build", "backend", "--dry-run", "-v"]);
        assert_eq!(args.recipe_name.as_deref(), Some("backend"));
        assert!(args.dry_run);
        assert!(args.common.verbose);
    }

    #[test]
    fn test_tokens_args_defaults() {
        let args = TokensArgs::parse_from(["promptkit-tokens"]);
        assert!(args.file_name.is_none());
        assert!(args.model.is_none());
        assert_eq!(args.format, OutputFormat::Table);
    }

    #[test]
    fn test_flags_override_defaults() {
        let args = TokensArgs::parse_from([
            "promptkit-tokens",
            "-m",
            "gpt-4",
            "--dist-dir",
            "out",
            "--format",
            "json",
        ]);
        let config = args.common.load_config(args.model.clone()).unwrap();
        assert_eq!(config.model(), "gpt-4");
        assert_eq!(config.dist_dir(), std::path::Path::new("out"));
        assert_eq!(args.format, OutputFormat::Json);
    }
}
