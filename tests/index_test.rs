//! Index building over real directory trees

mod common;

use aiprompts::config::CorpusConfig;
use aiprompts::index::{write_index, IndexBuilder};
use anyhow::Result;
use common::{metadata, Corpus};
use serde_json::{json, Value};

fn build(corpus: &Corpus) -> Result<Vec<aiprompts::index::IndexEntry>> {
    let config = CorpusConfig::default();
    IndexBuilder::new(&config).build(&corpus.root())
}

#[test]
fn test_entry_count_matches_metadata_entries() -> Result<()> {
    let corpus = Corpus::new();
    corpus.entry("single", &metadata("Single", "single", r#""s.md""#), &[("s.md", "s")]);
    let pair = format!(
        "[{}, {}]",
        metadata("Pair One", "pair-one", r#""p.md""#),
        metadata("Pair Two", "pair-two", r#""p.md""#)
    );
    corpus.entry("pair", &pair, &[("p.md", "p")]);

    let entries = build(&corpus)?;
    assert_eq!(entries.len(), 3);
    Ok(())
}

#[test]
fn test_sorted_by_name_case_insensitive() -> Result<()> {
    let corpus = Corpus::new();
    corpus.entry("z", &metadata("alpha", "alpha", r#""x.md""#), &[("x.md", "x")]);
    corpus.entry("a", &metadata("Zeta", "zeta", r#""x.md""#), &[("x.md", "x")]);
    corpus.entry("m", &metadata("Beta", "beta", r#""x.md""#), &[("x.md", "x")]);

    let names: Vec<String> = build(&corpus)?.into_iter().map(|e| e.name).collect();
    assert_eq!(names, vec!["alpha", "Beta", "Zeta"]);
    Ok(())
}

#[test]
fn test_documents_inlined_in_reference_order() -> Result<()> {
    let corpus = Corpus::new();
    corpus.entry(
        "multi",
        &metadata("Multi", "multi", r#"["second.md", "first.md"]"#),
        &[
            ("first.md", "---\ndescription: \"x\"\n---\nhello"),
            ("second.md", "no front matter"),
        ],
    );

    let entries = build(&corpus)?;
    let files = &entries[0].files;
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, "second.md");
    assert!(files[0].data.is_empty());
    assert_eq!(files[0].content, "no front matter");
    assert_eq!(files[1].path, "first.md");
    assert_eq!(Value::Object(files[1].data.clone()), json!({"description": "x"}));
    assert_eq!(files[1].content, "hello");
    Ok(())
}

#[test]
fn test_missing_reference_omitted_not_fatal() -> Result<()> {
    let corpus = Corpus::new();
    corpus.entry(
        "partial",
        &metadata("Partial", "partial", r#"["here.md", "gone.md"]"#),
        &[("here.md", "here")],
    );

    let entries = build(&corpus)?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].files.len(), 1);
    assert_eq!(entries[0].files[0].path, "here.md");
    Ok(())
}

#[test]
fn test_folder_without_metadata_skipped() -> Result<()> {
    let corpus = Corpus::new();
    common::write(&corpus.root().join("draft").join("wip.md"), "wip");
    corpus.entry("done", &metadata("Done", "done", r#""d.md""#), &[("d.md", "d")]);

    let entries = build(&corpus)?;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].folder, "done");
    Ok(())
}

#[test]
fn test_invalid_metadata_fails_build() {
    let corpus = Corpus::new();
    corpus.entry("broken", "not json", &[]);

    let err = build(&corpus).unwrap_err();
    assert!(format!("{:#}", err).contains("aiprompt.json"));
}

#[test]
fn test_written_index_shape() -> Result<()> {
    let corpus = Corpus::new();
    let meta = metadata("Shape", "shape", r#""s.md""#).replace(
        r#""tags": ["test"],"#,
        r#""tags": ["test"], "version": "2.0","#,
    );
    corpus.entry("shape", &meta, &[("s.md", "---\nalwaysApply: true\n---\nBody")]);

    let entries = build(&corpus)?;
    let output = corpus.dir.path().join("dist").join("prompts.json");
    write_index(&entries, &output, true)?;

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(
        written,
        json!([{
            "name": "Shape",
            "description": "Shape guidelines",
            "type": "rule",
            "slug": "shape",
            "author": {"name": "Test Author", "url": "https://example.com"},
            "tags": ["test"],
            "techStack": ["typescript"],
            "folder": "shape",
            "files": [{
                "path": "s.md",
                "data": {"alwaysApply": true},
                "content": "Body"
            }],
            "version": "2.0"
        }])
    );
    Ok(())
}

#[test]
fn test_references_outside_folder_not_inlined() -> Result<()> {
    let corpus = Corpus::new();
    let secret = corpus.dir.path().join("secret.txt");
    std::fs::write(&secret, "TOP SECRET")?;
    let refs = format!(r#"["ok.md", "{}", "../../secret.txt"]"#, secret.display());
    corpus.entry("leaky", &metadata("Leaky", "leaky", &refs), &[("ok.md", "ok")]);

    let entries = build(&corpus)?;
    let paths: Vec<&str> = entries[0].files.iter().map(|d| d.path.as_str()).collect();
    assert_eq!(paths, vec!["ok.md"]);
    assert!(entries[0].files.iter().all(|d| !d.content.contains("SECRET")));
    Ok(())
}

#[test]
fn test_mistyped_optional_fields_do_not_sink_build() -> Result<()> {
    let corpus = Corpus::new();
    corpus.entry("good", &metadata("Good", "good", r#""g.md""#), &[("g.md", "g")]);
    corpus.entry(
        "loose",
        r#"{"name": "Loose", "slug": "loose", "tags": null, "techStack": "react",
            "author": "Jane", "files": "l.md"}"#,
        &[("l.md", "l")],
    );

    let entries = build(&corpus)?;
    assert_eq!(entries.len(), 2);
    let loose = entries.iter().find(|e| e.slug == "loose").unwrap();
    assert!(loose.tags.is_empty());
    assert_eq!(loose.tech_stack, vec!["react"]);
    assert!(loose.author.is_none());
    assert_eq!(loose.files.len(), 1);
    Ok(())
}

#[test]
fn test_empty_array_metadata_contributes_nothing() -> Result<()> {
    let corpus = Corpus::new();
    corpus.entry("empty", "[]", &[]);
    corpus.entry("one", &metadata("One", "one", r#""o.md""#), &[("o.md", "o")]);

    assert_eq!(build(&corpus)?.len(), 1);
    Ok(())
}
