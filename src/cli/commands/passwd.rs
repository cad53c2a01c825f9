//! `prjrem passwd` — change the vault passphrase.
//!
//! Opens the vault with the current passphrase and saves it under the new
//! one.  The save picks a fresh salt, so nothing derived from the old
//! passphrase survives.  A legacy vault is migrated in the same step.

use crate::cli::output;
use crate::cli::{prompt_new_passphrase, prompt_passphrase, Cli, Context};
use crate::errors::{PrjRemError, Result};
use crate::vault::VaultStatus;

/// Execute the `passwd` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut store = ctx.store(cli)?;

    // Only an existing vault has a passphrase to change.
    if store.current_status() != VaultStatus::Locked {
        return Err(PrjRemError::InvalidState {
            operation: "change the passphrase",
            status: store.current_status(),
        });
    }

    output::info("Enter your current vault passphrase.");
    let old_passphrase = prompt_passphrase()?;
    store.open(&old_passphrase)?;

    output::info("Choose your new vault passphrase.");
    let new_passphrase = prompt_new_passphrase()?;
    store.save(&new_passphrase)?;

    output::success(&format!(
        "Passphrase changed ({} entries re-encrypted)",
        store.entry_count()
    ));
    Ok(())
}
