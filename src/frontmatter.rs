//! Markdown front matter parsing.
//!
//! Front matter is a YAML block fenced by `---` lines at the very top of a
//! markdown file. Blocks are parsed with `serde_yaml_ng`; when a block is not
//! a valid YAML mapping, a lenient line-based parser takes over so that a
//! sloppy header never prevents a prompt from being indexed.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// A markdown file split into its front matter and body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkdownDocument {
    pub data: Map<String, Value>,
    pub content: String,
}

/// Parse a markdown source. Never fails: a missing or unterminated
/// front matter block leaves `data` empty and keeps the whole text as content.
pub fn parse_markdown(source: &str) -> MarkdownDocument {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    match split_front_matter(source) {
        Some((block, body)) => MarkdownDocument {
            data: parse_block(block),
            content: body.trim().to_string(),
        },
        None => MarkdownDocument {
            data: Map::new(),
            content: source.trim().to_string(),
        },
    }
}

/// Returns `(front matter block, body)` when the source opens with a `---`
/// line and a closing `---` line follows.
fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    None
}

fn parse_block(block: &str) -> Map<String, Value> {
    if block.trim().is_empty() {
        return Map::new();
    }

    match parse_yaml(block) {
        Some(data) => data,
        None => {
            warn!("Front matter is not valid YAML, falling back to lenient parsing");
            parse_lenient(block)
        }
    }
}

fn parse_yaml(block: &str) -> Option<Map<String, Value>> {
    let yaml: serde_yaml_ng::Value = serde_yaml_ng::from_str(block).ok()?;
    if !yaml.is_mapping() {
        return None;
    }
    match serde_json::to_value(&yaml).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

/// Line-based `key: value` parser used when YAML rejects the block.
///
/// Recognises booleans, inline `[a, b]` arrays, `- item` lists under an empty
/// key, and quoted strings. Everything else is kept as a string.
fn parse_lenient(block: &str) -> Map<String, Value> {
    let mut data = Map::new();
    let mut list_key: Option<String> = None;

    for line in block.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        if let Some(item) = trimmed.strip_prefix('-') {
            if let Some(key) = &list_key {
                let item = Value::String(unquote(item.trim()).to_string());
                match data.get_mut(key) {
                    Some(Value::Array(items)) => items.push(item),
                    Some(slot) => *slot = Value::Array(vec![item]),
                    None => {}
                }
            }
            continue;
        }

        let Some((key, value)) = trimmed.split_once(':') else {
            list_key = None;
            continue;
        };
        let key = unquote(key.trim());
        if key.is_empty() {
            list_key = None;
            continue;
        }

        let value = value.trim();
        if value.is_empty() {
            data.insert(key.to_string(), Value::String(String::new()));
            list_key = Some(key.to_string());
        } else {
            data.insert(key.to_string(), coerce_scalar(value));
            list_key = None;
        }
    }

    data
}

fn coerce_scalar(raw: &str) -> Value {
    match raw {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Some(inner) = raw.strip_prefix('[').and_then(|r| r.strip_suffix(']')) {
        let items = inner
            .split(',')
            .map(|item| unquote(item.trim()))
            .filter(|item| !item.is_empty())
            .map(|item| Value::String(item.to_string()))
            .collect();
        return Value::Array(items);
    }

    Value::String(unquote(raw).to_string())
}

fn unquote(s: &str) -> &str {
    for quote in ['"', '\''] {
        if s.len() >= 2 && s.starts_with(quote) && s.ends_with(quote) {
            return &s[1..s.len() - 1];
        }
    }
    s
}
