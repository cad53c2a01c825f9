//! `prjrem gen` — print a random secret without touching the vault.

use crate::cli::{Cli, Context};
use crate::crypto::random::{parse_length, sequence};
use crate::errors::Result;

/// Execute the `gen` command.
pub fn execute(cli: &Cli, length: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;
    let length = parse_length(length, ctx.settings.generated_length)?;
    println!("{}", sequence(&ctx.settings.alphabet(), length)?);
    Ok(())
}
