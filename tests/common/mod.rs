//! Helpers for building scratch prompt corpora on disk

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub struct Corpus {
    pub dir: TempDir,
}

impl Corpus {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("prompts")).unwrap();
        Self { dir }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("prompts")
    }

    /// Create an entry folder with the given metadata JSON and files.
    pub fn entry(&self, folder: &str, metadata: &str, files: &[(&str, &str)]) -> PathBuf {
        let path = self.root().join(folder);
        fs::create_dir_all(&path).unwrap();
        fs::write(path.join("aiprompt.json"), metadata).unwrap();
        for (name, content) in files {
            write(&path.join(name), content);
        }
        path
    }
}

pub fn write(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// A complete, valid metadata object.
pub fn metadata(name: &str, slug: &str, files: &str) -> String {
    format!(
        r#"{{
  "name": "{name}",
  "description": "{name} guidelines",
  "type": "rule",
  "slug": "{slug}",
  "author": {{"name": "Test Author", "url": "https://example.com"}},
  "tags": ["test"],
  "techStack": ["typescript"],
  "files": {files}
}}"#
    )
}
