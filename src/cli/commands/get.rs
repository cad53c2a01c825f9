//! `prjrem get` — print or copy one entry's secret.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PrjRemError, Result};

/// Execute the `get` command.
pub fn execute(cli: &Cli, identifier: &str, copy: bool) -> Result<()> {
    let ctx = Context::load(cli)?;
    let store = ctx.open_store(cli)?.store;

    let entry = store.retrieve(identifier)?;

    if copy {
        let mut clipboard = arboard::Clipboard::new()
            .map_err(|e| PrjRemError::CommandFailed(format!("clipboard unavailable: {e}")))?;
        clipboard
            .set_text(entry.secret.as_str())
            .map_err(|e| PrjRemError::CommandFailed(format!("clipboard write failed: {e}")))?;
        output::success(&format!("Copied secret for '{}' to the clipboard", entry.key));
    } else {
        println!("{}", entry.secret);
    }

    if let Some(description) = &entry.description {
        eprintln!("{description}");
    }

    Ok(())
}
