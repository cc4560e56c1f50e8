pub mod assembler;
pub mod counter;
pub mod estimator;
pub mod report;

pub use crate::domain::model::{BuildOutcome, CountMethod, Report, ReportRow, TokenCount};
pub use crate::domain::ports::{ConfigProvider, Storage, TokenCounter};
pub use crate::utils::error::Result;
