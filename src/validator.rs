use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::CorpusConfig;
use crate::corpus::{self, PromptMetadata};

static SLUG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug pattern is valid"));

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Error, // Fails validation
    Warning, // Reported only
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// What is wrong with a folder or entry.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueKind {
    #[error("missing metadata file '{0}'")]
    MissingMetadata(String),

    #[error("nested directory '{0}' is not allowed")]
    NestedDirectory(String),

    #[error("file '{0}' has a disallowed extension")]
    DisallowedExtension(String),

    #[error("invalid metadata: {0}")]
    InvalidMetadata(String),

    #[error("metadata file declares no entries")]
    EmptyMetadata,

    #[error("entry #{entry}: missing required field '{field}'")]
    MissingField { entry: usize, field: &'static str },

    #[error("entry #{entry}: type '{kind}' is not one of [{allowed}]")]
    InvalidType {
        entry: usize,
        kind: String,
        allowed: String,
    },

    #[error("duplicate slug '{slug}' (already defined in {first})")]
    DuplicateSlug { slug: String, first: String },

    #[error("entry #{entry}: referenced file '{file}' does not exist")]
    MissingReference { entry: usize, file: String },

    #[error("entry #{entry}: file reference '{file}' points outside the entry folder")]
    UnsafeReference { entry: usize, file: String },

    #[error("slug '{0}' is not lowercase kebab-case")]
    SlugFormat(String),

    #[error("entry #{0} references no markdown files")]
    NoFiles(usize),
}

impl IssueKind {
    pub fn severity(&self) -> Severity {
        match self {
            IssueKind::MissingReference { .. } | IssueKind::SlugFormat(_) | IssueKind::NoFiles(_) => {
                Severity::Warning
            }
            _ => Severity::Error,
        }
    }

    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            IssueKind::MissingMetadata(_) => {
                Some("Add a metadata file describing the prompt(s) in this folder")
            }
            IssueKind::NestedDirectory(_) => {
                Some("Move the files up into the entry folder or into a new entry folder")
            }
            IssueKind::UnsafeReference { .. } => {
                Some("Reference files by a relative path inside the entry folder")
            }
            IssueKind::DuplicateSlug { .. } => Some("Pick a slug that is unique across the corpus"),
            IssueKind::SlugFormat(_) => Some("Use lowercase letters, digits and single hyphens"),
            IssueKind::NoFiles(_) => Some("List the markdown file(s) under 'files'"),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Issue {
    pub severity: Severity,
    pub path: PathBuf,
    pub kind: IssueKind,
}

impl Issue {
    fn new(path: &Path, kind: IssueKind) -> Self {
        Self {
            severity: kind.severity(),
            path: path.to_path_buf(),
            kind,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.kind)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub issues: Vec<Issue>,
    pub folders: usize,
    pub entries: usize,
}

impl Report {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

/// Checks the corpus layout and metadata of every entry folder.
pub struct StructureValidator<'a> {
    config: &'a CorpusConfig,
}

impl<'a> StructureValidator<'a> {
    pub fn new(config: &'a CorpusConfig) -> Self {
        Self { config }
    }

    /// Walk `root` and collect every issue. Only an unreadable root is an `Err`.
    pub fn validate(&self, root: &Path) -> Result<Report> {
        let mut report = Report::default();
        // slug -> "folder/metadata#entry" where it was first seen
        let mut seen_slugs: HashMap<String, String> = HashMap::new();

        for folder in corpus::entry_folders(root)? {
            debug!("Validating {}", folder.display());
            report.folders += 1;
            self.check_folder(&folder, &mut report, &mut seen_slugs)?;
        }

        info!(
            "Validated {} folder(s), {} entr(ies): {} error(s), {} warning(s)",
            report.folders,
            report.entries,
            report.error_count(),
            report.warning_count()
        );

        Ok(report)
    }

    fn check_folder(
        &self,
        folder: &Path,
        report: &mut Report,
        seen_slugs: &mut HashMap<String, String>,
    ) -> Result<()> {
        let mut has_metadata = false;

        // Hidden directories still count as nesting; hidden files are OS noise
        for path in corpus::read_dir_sorted(folder, true)? {
            let name = corpus::folder_name(&path);
            if path.is_dir() {
                report
                    .issues
                    .push(Issue::new(folder, IssueKind::NestedDirectory(name)));
                continue;
            }
            if corpus::is_hidden(&path) {
                continue;
            }
            if name == self.config.metadata_file {
                has_metadata = true;
            }
            if !self.config.is_allowed_extension(&path) {
                report
                    .issues
                    .push(Issue::new(folder, IssueKind::DisallowedExtension(name)));
            }
        }

        if !has_metadata {
            report.issues.push(Issue::new(
                folder,
                IssueKind::MissingMetadata(self.config.metadata_file.clone()),
            ));
            return Ok(());
        }

        let metadata_path = folder.join(&self.config.metadata_file);
        let parsed = fs::read_to_string(&metadata_path)
            .map_err(anyhow::Error::from)
            .and_then(|text| corpus::parse_metadata(&text));
        let entries = match parsed {
            Ok(entries) => entries,
            Err(e) => {
                report.issues.push(Issue::new(
                    &metadata_path,
                    IssueKind::InvalidMetadata(format!("{:#}", e)),
                ));
                return Ok(());
            }
        };

        if entries.is_empty() {
            report
                .issues
                .push(Issue::new(&metadata_path, IssueKind::EmptyMetadata));
            return Ok(());
        }

        for (idx, entry) in entries.iter().enumerate() {
            report.entries += 1;
            self.check_entry(folder, &metadata_path, idx + 1, entry, report, seen_slugs);
        }

        Ok(())
    }

    fn check_entry(
        &self,
        folder: &Path,
        metadata_path: &Path,
        number: usize,
        entry: &PromptMetadata,
        report: &mut Report,
        seen_slugs: &mut HashMap<String, String>,
    ) {
        let issues = &mut report.issues;

        for field in entry.missing_fields() {
            issues.push(Issue::new(
                metadata_path,
                IssueKind::MissingField {
                    entry: number,
                    field,
                },
            ));
        }

        let kind = entry.kind.trim();
        if !kind.is_empty() && !self.config.is_allowed_type(kind) {
            issues.push(Issue::new(
                metadata_path,
                IssueKind::InvalidType {
                    entry: number,
                    kind: kind.to_string(),
                    allowed: self.config.allowed_types.join(", "),
                },
            ));
        }

        let slug = entry.slug.trim();
        if !slug.is_empty() {
            let location = format!("{}#{}", metadata_path.display(), number);
            if let Some(first) = seen_slugs.get(slug) {
                issues.push(Issue::new(
                    metadata_path,
                    IssueKind::DuplicateSlug {
                        slug: slug.to_string(),
                        first: first.clone(),
                    },
                ));
            } else {
                seen_slugs.insert(slug.to_string(), location);
            }

            if !SLUG_RE.is_match(slug) {
                issues.push(Issue::new(metadata_path, IssueKind::SlugFormat(slug.to_string())));
            }
        }

        let files = entry.files.to_vec();
        if files.is_empty() {
            issues.push(Issue::new(metadata_path, IssueKind::NoFiles(number)));
        }
        for file in files {
            if !corpus::is_contained_reference(&file) {
                issues.push(Issue::new(
                    metadata_path,
                    IssueKind::UnsafeReference {
                        entry: number,
                        file,
                    },
                ));
                continue;
            }
            if !folder.join(&file).is_file() {
                issues.push(Issue::new(
                    metadata_path,
                    IssueKind::MissingReference {
                        entry: number,
                        file,
                    },
                ));
            }
        }
    }

    /// Print the report in a human-readable format
    pub fn print_report(&self, report: &Report) {
        if report.issues.is_empty() {
            println!(
                "✅ Structure valid: {} folder(s), {} entr(ies)",
                report.folders, report.entries
            );
            return;
        }

        println!("\n📋 Prompt Structure Results:\n");

        for (severity, label) in [(Severity::Error, "❌ Errors"), (Severity::Warning, "⚠️  Warnings")]
        {
            let matching: Vec<&Issue> = report
                .issues
                .iter()
                .filter(|i| i.severity == severity)
                .collect();
            if matching.is_empty() {
                continue;
            }

            println!("{} ({}):", label, matching.len());
            for issue in matching {
                println!("   • {}", issue);
                if let Some(suggestion) = issue.kind.suggestion() {
                    println!("     💡 {}", suggestion);
                }
            }
            println!();
        }

        println!(
            "Summary: {} folders, {} entries, {} errors, {} warnings",
            report.folders,
            report.entries,
            report.error_count(),
            report.warning_count()
        );
    }
}
