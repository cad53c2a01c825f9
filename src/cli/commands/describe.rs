//! `prjrem describe` — set or clear an entry's description.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `describe` command.
pub fn execute(cli: &Cli, identifier: &str, description: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut session = ctx.open_store(cli)?;

    let key = session.store.describe(identifier, description)?.key.clone();
    session.save()?;

    match description {
        Some(_) => output::success(&format!("Description of '{key}' updated")),
        None => output::success(&format!("Description of '{key}' cleared")),
    }
    Ok(())
}
