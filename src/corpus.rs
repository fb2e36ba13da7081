//! Prompt corpus layout and metadata records.
//!
//! The corpus is a fixed two-level tree: `<root>/<entry folder>/<files>`.
//! Each entry folder carries a JSON metadata file describing one prompt, or
//! an array of prompts sharing the folder.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// File references: a single path or a list of paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileRefs {
    One(String),
    Many(Vec<String>),
}

impl Default for FileRefs {
    fn default() -> Self {
        FileRefs::Many(Vec::new())
    }
}

impl FileRefs {
    /// Flatten to a list, dropping blank entries.
    pub fn to_vec(&self) -> Vec<String> {
        let refs: Vec<&String> = match self {
            FileRefs::One(single) => vec![single],
            FileRefs::Many(many) => many.iter().collect(),
        };
        refs.into_iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// One prompt entry as written in the metadata file.
///
/// Every field is defaulted so that the validator can report missing values
/// instead of failing deserialization. Unknown keys are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptMetadata {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_author")]
    pub author: Option<Author>,
    #[serde(default, deserialize_with = "lenient_string_list")]
    pub tags: Vec<String>,
    #[serde(default, alias = "tech_stack", deserialize_with = "lenient_string_list")]
    pub tech_stack: Vec<String>,
    #[serde(default, alias = "file")]
    pub files: FileRefs,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Names of required string fields, as they appear in the JSON.
const REQUIRED_FIELDS: [&str; 5] = ["name", "description", "type", "slug", "author.name"];

impl PromptMetadata {
    /// Required fields that are absent or blank.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let author_name = self.author.as_ref().map(|a| a.name.as_str()).unwrap_or("");
        let values = [
            self.name.as_str(),
            self.description.as_str(),
            self.kind.as_str(),
            self.slug.as_str(),
            author_name,
        ];

        REQUIRED_FIELDS
            .iter()
            .zip(values)
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect()
    }
}

/// Optional list fields: `null` is empty, a bare string is one item, and
/// non-string array items are dropped.
fn lenient_string_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(single) => vec![single],
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// Anything other than an object leaves the author unset, so the validator
/// reports `author.name` as missing instead of rejecting the whole file.
fn lenient_author<'de, D>(deserializer: D) -> std::result::Result<Option<Author>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);

    Ok(Some(Author {
        name: text("name").unwrap_or_default(),
        url: text("url"),
    }))
}

/// A file reference must stay inside its entry folder: relative, with no
/// `..` components.
pub fn is_contained_reference(file: &str) -> bool {
    Path::new(file)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Parse the contents of a metadata file: a single object or an array of objects.
pub fn parse_metadata(text: &str) -> Result<Vec<PromptMetadata>> {
    let value: Value = serde_json::from_str(text).context("metadata is not valid JSON")?;

    let objects = match value {
        Value::Object(_) => vec![value],
        Value::Array(items) => items,
        _ => bail!("metadata must be a JSON object or an array of objects"),
    };

    objects
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            if !item.is_object() {
                bail!("entry #{} is not a JSON object", idx + 1);
            }
            serde_json::from_value(item).with_context(|| format!("entry #{}", idx + 1))
        })
        .collect()
}

/// Read and parse the metadata file at `path`.
pub fn load_metadata(path: &Path) -> Result<Vec<PromptMetadata>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_metadata(&text).with_context(|| format!("Invalid metadata in {}", path.display()))
}

pub fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

/// Children of `dir` sorted by file name; hidden ones only with `include_hidden`.
pub fn read_dir_sorted(dir: &Path, include_hidden: bool) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in
        fs::read_dir(dir).with_context(|| format!("Failed to read directory {}", dir.display()))?
    {
        let path = entry?.path();
        if include_hidden || !is_hidden(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Entry folders directly under the corpus root.
pub fn entry_folders(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        bail!("Prompt root not found: {}", root.display());
    }
    if !root.is_dir() {
        bail!("Prompt root is not a directory: {}", root.display());
    }

    Ok(read_dir_sorted(root, false)?
        .into_iter()
        .filter(|path| {
            let is_dir = path.is_dir();
            if !is_dir {
                tracing::debug!("Ignoring file at corpus root: {}", path.display());
            }
            is_dir
        })
        .collect())
}

/// Folder name used as the entry's location in messages and in the index.
pub fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}
