//! `prjrem list` — show entries with the indexes `get` accepts.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let store = ctx.open_store(cli)?.store;

    let mut rows = Vec::new();
    for (index, key) in store.list()? {
        let description = store.retrieve(key)?.description.as_deref();
        rows.push((index, key, description));
    }

    output::print_entries_table(&rows);
    Ok(())
}
