//! `prjrem info` — show configuration and vault file status.
//!
//! Needs no passphrase: the status is what `set_location` reports, and the
//! format is read from the file's framing alone.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;
use crate::vault::format::{detect_version, read_vault_file, VersionTag};
use crate::vault::VaultStatus;

/// Execute the `info` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let path = ctx.vault_path(cli);
    let store = ctx.store(cli)?;
    let settings = &ctx.settings;

    output::info(&format!("Config directory: {}", ctx.config_dir.display()));
    output::info(&format!("Vault file:       {}", path.display()));
    output::info(&format!("Status:           {}", store.current_status()));

    if store.current_status() == VaultStatus::Locked {
        let format = match detect_version(&read_vault_file(&path)?) {
            VersionTag::Current => "current (scrypt, AES-256-GCM)",
            VersionTag::Legacy => "legacy (AES-CBC), migrated on next save",
            VersionTag::Unknown => "unrecognized",
        };
        output::info(&format!("Format:           {format}"));
    }

    output::info(&format!(
        "Editor:           {}",
        settings.editor.as_deref().unwrap_or("$VISUAL / $EDITOR / vi")
    ));
    output::info(&format!(
        "Omitted symbols:  {}",
        settings.omit_symbols.as_deref().unwrap_or("(none)")
    ));
    output::info(&format!(
        "scrypt:           N=2^{} r={} p={}",
        settings.scrypt_log_n, settings.scrypt_r, settings.scrypt_p
    ));
    output::info(&format!(
        "Generated length: {}",
        settings.generated_length
    ));

    Ok(())
}
