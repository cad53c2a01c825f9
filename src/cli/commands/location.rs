//! `prjrem location` — point the config at a different vault file.

use std::path::Path;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;
use crate::vault::{VaultStatus, VaultStore};

/// Execute the `location` command.
pub fn execute(cli: &Cli, path: &Path) -> Result<()> {
    let mut ctx = Context::load(cli)?;

    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    // Validate before touching the config; a bad path leaves it unchanged.
    let mut store = VaultStore::new(ctx.settings.kdf_params()?, ctx.settings.alphabet());
    let status = store.set_location(&path)?;

    ctx.settings.location = Some(path.clone());
    ctx.settings.save(&ctx.config_dir)?;

    match status {
        VaultStatus::New => {
            output::success(&format!("Vault location set to {}", path.display()));
            output::tip("No file there yet; it is created on the first `prjrem set`.");
        }
        _ => output::success(&format!(
            "Vault location set to existing file {}",
            path.display()
        )),
    }

    Ok(())
}
