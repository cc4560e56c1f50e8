use clap::Parser;
use promptkit::config::BuildArgs;
use promptkit::core::BuildOutcome;
use promptkit::domain::model::ModuleStatus;
use promptkit::utils::validation::Validate;
use promptkit::{Assembler, LocalStorage, PromptError};

fn main() -> anyhow::Result<()> {
    let args = BuildArgs::parse();

    args.common.init_logging();
    tracing::debug!("Build args: {:?}", args);

    let config = match args.common.load_config(None) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let storage = LocalStorage::new(config.root().to_path_buf());
    let assembler = Assembler::new(storage, config);

    if let Err(e) = assembler.check_recipe_dir() {
        exit_with(&e);
    }

    match args.recipe_name.as_deref() {
        Some(name) => {
            let path = match assembler.locate_recipe(name) {
                Ok(path) => path,
                Err(e) => exit_with(&e),
            };

            let result = if args.dry_run {
                assembler.plan_recipe(&path)
            } else {
                assembler.build_recipe(&path)
            };

            match result {
                Ok(outcome) if args.dry_run => print_plan(&outcome),
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("Recipe {} failed: {}", path.display(), e);
                    println!("{}", e.user_friendly_message());
                }
            }
        }
        None => {
            println!("No recipe specified. Building all recipes...");

            let summary = if args.dry_run {
                assembler.plan_all()?
            } else {
                assembler.build_all()?
            };

            if args.dry_run {
                summary.outcomes.iter().for_each(print_plan);
            }

            if !summary.failures.is_empty() {
                tracing::warn!(
                    "{} of {} recipe(s) failed",
                    summary.failures.len(),
                    summary.outcomes.len() + summary.failures.len()
                );
            }
        }
    }

    println!("\nBuild process completed.");
    Ok(())
}

fn print_plan(outcome: &BuildOutcome) {
    println!(
        "  [dry-run] {} -> {} ({} of {} module(s), {} bytes)",
        outcome.recipe,
        outcome.artifact_path.display(),
        outcome.included(),
        outcome.modules.len(),
        outcome.bytes
    );
    for module in &outcome.modules {
        let status = match module.status {
            ModuleStatus::Included => "ok",
            ModuleStatus::Missing => "missing",
            ModuleStatus::Empty => "empty",
            ModuleStatus::Unreadable => "unreadable",
        };
        println!("    {:<10} {}", status, module.reference);
    }
}

fn exit_with(e: &PromptError) -> ! {
    tracing::error!("{} ({:?})", e, e.category());
    eprintln!("{}", e.fatal_report());
    std::process::exit(1);
}
