use anyhow::Result;

use crate::config::Config;
use crate::index::{write_index, IndexBuilder};

/// Build the index; with `validate_first`, structure errors abort before anything is written.
pub fn run(config: &Config, validate_first: bool) -> Result<()> {
    if validate_first {
        super::validate::run(config)?;
    }

    let builder = IndexBuilder::new(&config.corpus);
    let entries = builder.build(&config.corpus.root)?;
    write_index(&entries, &config.index.output, config.index.pretty)?;

    println!(
        "✅ Indexed {} entries into {}",
        entries.len(),
        config.index.output.display()
    );

    Ok(())
}
