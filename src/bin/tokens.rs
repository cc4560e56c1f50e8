use clap::Parser;
use promptkit::config::{OutputFormat, TokensArgs};
use promptkit::core::report::{render_json, render_table};
use promptkit::core::ConfigProvider;
use promptkit::utils::validation::Validate;
use promptkit::{select_counter, Capability, Estimator, LocalStorage, PromptError};

fn main() -> anyhow::Result<()> {
    let args = TokensArgs::parse();

    args.common.init_logging();
    tracing::debug!("Tokens args: {:?}", args);

    let config = match args.common.load_config(args.model.clone()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = config.validate() {
        exit_with(&e);
    }

    let capability = Capability::detect();
    if !capability.is_available() && args.format == OutputFormat::Table {
        println!("Warning: exact tokenizer not compiled in. Using rough approximation.");
        println!("Rebuild with `--features tiktoken` for accurate results.\n");
    }

    let counter = select_counter(config.model(), capability);
    let storage = LocalStorage::new(config.root().to_path_buf());
    let estimator = Estimator::new(storage, config, counter);

    if let Err(e) = estimator.check_dist_dir() {
        exit_with(&e);
    }

    let (report, summary) = match args.file_name.as_deref() {
        Some(name) => {
            let path = match estimator.locate_artifact(name) {
                Ok(path) => path,
                Err(e) => exit_with(&e),
            };
            (estimator.analyze_paths(&[path]), false)
        }
        None => (estimator.analyze_all()?, true),
    };

    match args.format {
        OutputFormat::Json => println!("{}", render_json(&report)?),
        OutputFormat::Table if report.is_empty() => {
            println!(
                "No Markdown files found in {}.",
                estimator.dist_dir().display()
            );
        }
        OutputFormat::Table => println!("{}", render_table(&report, summary)),
    }

    Ok(())
}

fn exit_with(e: &PromptError) -> ! {
    tracing::error!("{} ({:?})", e, e.category());
    eprintln!("{}", e.fatal_report());
    std::process::exit(1);
}
