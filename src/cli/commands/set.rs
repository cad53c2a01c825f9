//! `prjrem set` — create or overwrite an entry.

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PrjRemError, Result};

/// Arguments for `set`, gathered from the command line.
pub struct SetArgs<'a> {
    pub key: &'a str,
    pub secret: Option<&'a str>,
    pub ask: bool,
    pub length: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// Execute the `set` command.
pub fn execute(cli: &Cli, args: &SetArgs<'_>) -> Result<()> {
    let ctx = Context::load(cli)?;

    let prompted = if args.ask {
        let value = dialoguer::Password::new()
            .with_prompt(format!("Secret for {}", args.key))
            .interact()
            .map_err(|e| PrjRemError::CommandFailed(format!("input prompt: {e}")))?;
        Some(zeroize::Zeroizing::new(value))
    } else {
        if args.secret.is_some() {
            output::warning("Secret provided on the command line; it may appear in shell history.");
        }
        None
    };
    let secret = prompted.as_deref().map(String::as_str).or(args.secret);

    let mut session = ctx.open_store(cli)?;
    let store = &mut session.store;

    let existed = store.retrieve(args.key).is_ok_and(|e| e.key == args.key);
    let generated = secret.is_none();
    store.create(args.key, secret, args.description, args.length)?;
    session.save()?;

    let verb = if existed { "updated" } else { "added" };
    output::success(&format!(
        "Entry '{}' {verb} ({} total)",
        args.key,
        session.store.entry_count()
    ));
    if generated {
        output::tip(&format!("Run `prjrem get {} --copy` to use it.", args.key));
    }

    Ok(())
}
