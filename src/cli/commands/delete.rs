//! `prjrem delete` — remove an entry by exact key.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PrjRemError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, key: &str, force: bool) -> Result<()> {
    let ctx = Context::load(cli)?;

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete entry '{key}'?"))
            .default(false)
            .interact()
            .map_err(|e| PrjRemError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            return Err(PrjRemError::UserCancelled);
        }
    }

    let mut session = ctx.open_store(cli)?;

    if !session.store.delete(key)? {
        return Err(PrjRemError::NotFound(key.to_string()));
    }
    session.save()?;

    output::success(&format!("Deleted entry '{key}'"));
    Ok(())
}
