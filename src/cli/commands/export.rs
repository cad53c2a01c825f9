//! `prjrem export` — dump every entry as indented JSON.
//!
//! The output is the same `key -> [secret, description]` map that
//! `prjrem import` reads back.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PrjRemError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: Option<&str>) -> Result<()> {
    let ctx = Context::load(cli)?;
    let store = ctx.open_store(cli)?.store;

    let json = store.export_all()?;

    match output_path {
        Some(path) => {
            write_private(Path::new(path), json.as_bytes())?;
            output::success(&format!(
                "Exported {} entries to {path}",
                store.entry_count()
            ));
            output::warning("The export file holds every secret in plain text.");
        }
        None => println!("{}", json.as_str()),
    }

    Ok(())
}

/// Write `bytes` to a new or truncated file readable only by the owner.
fn write_private(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path).map_err(|e| {
        PrjRemError::PathError(format!("cannot write {}: {e}", path.display()))
    })?;
    file.write_all(bytes)?;
    file.flush()?;
    Ok(())
}
