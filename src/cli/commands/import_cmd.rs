//! `prjrem import` — merge entries from a JSON export into the vault.
//!
//! Existing keys are overwritten.  Entries that fail validation are
//! reported and skipped; the rest are imported and saved.

use std::fs;
use std::path::Path;

use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PrjRemError, Result};

/// Execute the `import` command.
pub fn execute(cli: &Cli, file: &str) -> Result<()> {
    let source = Path::new(file);
    if !source.exists() {
        return Err(PrjRemError::PathError(format!(
            "import file not found: {file}"
        )));
    }
    let text = Zeroizing::new(fs::read_to_string(source)?);

    let ctx = Context::load(cli)?;
    let mut session = ctx.open_store(cli)?;

    let report = session.store.import_all(&text)?;
    output::print_import_report(&report);

    if session.store.is_dirty() {
        session.save()?;
    } else {
        output::info("Nothing imported; vault unchanged.");
    }

    Ok(())
}
