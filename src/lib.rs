pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, ProjectConfig};
pub use core::{
    assembler::Assembler,
    counter::{count_units, select_counter, Capability},
    estimator::Estimator,
};
pub use domain::model::{CountMethod, Report, ReportEntry, ReportRow, TokenCount};
pub use utils::error::{PromptError, Result};
