//! Flattens the prompt corpus into a single JSON index.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::CorpusConfig;
use crate::corpus::{self, Author, PromptMetadata};
use crate::frontmatter;

/// A referenced markdown file with its front matter parsed out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub path: String,
    pub data: Map<String, Value>,
    pub content: String,
}

/// One metadata entry with its documents inlined.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    pub tags: Vec<String>,
    pub tech_stack: Vec<String>,
    pub folder: String,
    pub files: Vec<Document>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct IndexBuilder<'a> {
    config: &'a CorpusConfig,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(config: &'a CorpusConfig) -> Self {
        Self { config }
    }

    /// Collect every metadata entry under `root`, sorted by name then slug.
    pub fn build(&self, root: &Path) -> Result<Vec<IndexEntry>> {
        let mut entries = Vec::new();

        for folder in corpus::entry_folders(root)? {
            let metadata_path = folder.join(&self.config.metadata_file);
            if !metadata_path.is_file() {
                warn!(
                    "Skipping {}: no {}",
                    folder.display(),
                    self.config.metadata_file
                );
                continue;
            }

            let records = corpus::load_metadata(&metadata_path)?;
            debug!(
                "Loaded {} entr(ies) from {}",
                records.len(),
                metadata_path.display()
            );

            let folder_name = corpus::folder_name(&folder);
            for record in records {
                let files = self.load_documents(&folder, &record);
                entries.push(IndexEntry::from_metadata(record, &folder_name, files));
            }
        }

        entries.sort_by(|a, b| {
            a.name
                .to_lowercase()
                .cmp(&b.name.to_lowercase())
                .then_with(|| a.slug.cmp(&b.slug))
        });

        info!("Indexed {} entr(ies)", entries.len());
        Ok(entries)
    }

    /// Read every referenced file; unreadable ones are logged and left out.
    fn load_documents(&self, folder: &Path, record: &PromptMetadata) -> Vec<Document> {
        let mut documents = Vec::new();

        for file in record.files.to_vec() {
            if !corpus::is_contained_reference(&file) {
                warn!(
                    "Skipping reference '{}' for '{}': outside {}",
                    file,
                    record.slug,
                    folder.display()
                );
                continue;
            }
            let path = folder.join(&file);
            match fs::read_to_string(&path) {
                Ok(source) => {
                    let parsed = frontmatter::parse_markdown(&source);
                    documents.push(Document {
                        path: file,
                        data: parsed.data,
                        content: parsed.content,
                    });
                }
                Err(e) => {
                    warn!(
                        "Skipping referenced file {} for '{}': {}",
                        path.display(),
                        record.slug,
                        e
                    );
                }
            }
        }

        documents
    }
}

impl IndexEntry {
    fn from_metadata(record: PromptMetadata, folder: &str, files: Vec<Document>) -> Self {
        let mut extra = record.extra;
        extra.remove("folder");

        Self {
            name: record.name,
            description: record.description,
            kind: record.kind,
            slug: record.slug,
            author: record.author,
            tags: record.tags,
            tech_stack: record.tech_stack,
            folder: folder.to_string(),
            files,
            extra,
        }
    }
}

/// Write the index atomically: a temp file in the target directory is
/// persisted over `output`.
pub fn write_index(entries: &[IndexEntry], output: &Path, pretty: bool) -> Result<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut json = if pretty {
        serde_json::to_string_pretty(entries)?
    } else {
        serde_json::to_string(entries)?
    };
    json.push('\n');

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!("Wrote {} entr(ies) to {}", entries.len(), output.display());
    Ok(())
}
