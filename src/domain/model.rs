use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const RECIPE_EXTENSION: &str = "yaml";
pub const ARTIFACT_EXTENSION: &str = "md";

/// Separator between consecutive modules in an artifact. A blank line reads
/// as a paragraph break in Markdown without adding visible decoration.
pub const MODULE_SEPARATOR: &str = "\n\n";

/// On-disk shape of a recipe. Keys other than `modules` are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeFile {
    #[serde(default)]
    pub modules: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// File stem; the artifact is named after it.
    pub name: String,
    pub path: PathBuf,
    /// Module references in output order. Duplicates are kept.
    pub modules: Vec<String>,
}

impl Recipe {
    pub fn artifact_file_name(&self) -> String {
        format!("{}.{}", self.name, ARTIFACT_EXTENSION)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleStatus {
    Included,
    Missing,
    Empty,
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleEntry {
    pub reference: String,
    pub status: ModuleStatus,
}

/// What happened to one recipe during a build or a dry run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildOutcome {
    pub recipe: String,
    pub artifact_path: PathBuf,
    pub modules: Vec<ModuleEntry>,
    pub bytes: usize,
    pub written: bool,
}

impl BuildOutcome {
    pub fn included(&self) -> usize {
        self.count(ModuleStatus::Included)
    }

    pub fn missing(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.modules
            .iter()
            .filter(|m| m.status == ModuleStatus::Missing)
    }

    fn count(&self, status: ModuleStatus) -> usize {
        self.modules.iter().filter(|m| m.status == status).count()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RecipeFailure {
    pub recipe: PathBuf,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildSummary {
    pub outcomes: Vec<BuildOutcome>,
    pub failures: Vec<RecipeFailure>,
}

impl BuildSummary {
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty() && self.failures.is_empty()
    }
}

/// Precision tier of a unit count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountMethod {
    /// Tokenizer for the requested model.
    Exact,
    /// Generic base encoding; the model was not recognised.
    Fallback,
    /// Character heuristic; no tokenizer available.
    Approx,
}

impl CountMethod {
    pub fn is_estimate(&self) -> bool {
        !matches!(self, CountMethod::Exact)
    }

    pub fn marker(&self) -> &'static str {
        if self.is_estimate() {
            "*"
        } else {
            ""
        }
    }

    pub fn note(&self) -> &'static str {
        match self {
            CountMethod::Exact => "",
            CountMethod::Fallback => "⚠️ Est. (base)",
            CountMethod::Approx => "⚠️ Est. (char)",
        }
    }
}

impl fmt::Display for CountMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CountMethod::Exact => "exact",
            CountMethod::Fallback => "fallback",
            CountMethod::Approx => "approx",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TokenCount {
    pub count: usize,
    pub method: CountMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub file_name: String,
    pub tokens: usize,
    pub chars: usize,
    pub method: CountMethod,
}

impl ReportRow {
    /// Token count with thousands separators, suffixed with `*` when estimated.
    pub fn token_display(&self) -> String {
        format!("{}{}", format_count(self.tokens), self.method.marker())
    }

    pub fn note(&self) -> &'static str {
        self.method.note()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportEntry {
    Counted(ReportRow),
    Failed { file_name: String, error: String },
}

impl ReportEntry {
    pub fn tokens(&self) -> usize {
        match self {
            ReportEntry::Counted(row) => row.tokens,
            ReportEntry::Failed { .. } => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    pub model: String,
    pub entries: Vec<ReportEntry>,
}

impl Report {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            entries: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_tokens(&self) -> usize {
        self.entries.iter().map(ReportEntry::tokens).sum()
    }

    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.entries.iter().filter_map(|e| match e {
            ReportEntry::Counted(row) => Some(row),
            ReportEntry::Failed { .. } => None,
        })
    }
}

/// `1234567` -> `"1,234,567"`.
pub fn format_count(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
