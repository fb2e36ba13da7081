use anyhow::{bail, Result};
use tracing::info;

use crate::config::Config;
use crate::validator::StructureValidator;

pub fn run(config: &Config) -> Result<()> {
    let root = &config.corpus.root;
    info!("Validating prompt structure under {}", root.display());

    let validator = StructureValidator::new(&config.corpus);
    let report = validator.validate(root)?;

    validator.print_report(&report);

    if report.has_errors() {
        bail!("{} validation error(s) found", report.error_count());
    }

    Ok(())
}
