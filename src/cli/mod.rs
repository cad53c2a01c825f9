//! CLI module — Clap argument parser, prompts, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use crate::config::{self, Settings};
use crate::crypto::keys::Passphrase;
use crate::errors::{PrjRemError, Result};
use crate::vault::{VaultStatus, VaultStore};

/// Environment variable consulted before prompting for the passphrase.
pub const PASSPHRASE_ENV: &str = "PRJREM_PASSPHRASE";

/// Environment variable consulted before prompting for a new passphrase.
pub const NEW_PASSPHRASE_ENV: &str = "PRJREM_NEW_PASSPHRASE";

/// Shortest passphrase accepted for a new vault or a passphrase change.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// prjrem CLI: Project Remembrance, a passphrase-locked secret vault.
#[derive(Parser)]
#[command(
    name = "prjrem",
    about = "Project Remembrance: a passphrase-locked secret vault",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault file to use instead of the configured location
    #[arg(long, global = true)]
    pub vault: Option<PathBuf>,

    /// Config directory (default: ~/.prjrem)
    #[arg(long, global = true, env = "PRJREM_HOME")]
    pub config_dir: Option<PathBuf>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Print a random secret without storing it
    Gen {
        /// Number of characters (default from config, usually 16)
        #[arg(allow_hyphen_values = true)]
        length: Option<String>,
    },

    /// Show configuration and vault status
    Info,

    /// Set the vault file location in the config
    Location {
        /// Path to the vault file
        path: PathBuf,
    },

    /// Create or overwrite an entry (generates a secret unless one is given)
    Set {
        /// Entry key
        key: String,
        /// Secret value (appears in shell history; prefer --ask)
        #[arg(long, conflicts_with = "ask")]
        secret: Option<String>,
        /// Prompt for the secret instead of generating one
        #[arg(long)]
        ask: bool,
        /// Length of the generated secret
        #[arg(short, long, allow_hyphen_values = true)]
        length: Option<String>,
        /// Free-text description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Print an entry's secret by key or list index
    Get {
        /// Key or index from `list`
        identifier: String,
        /// Copy to the clipboard instead of printing
        #[arg(short, long)]
        copy: bool,
    },

    /// List entries with their indexes
    List,

    /// Delete an entry by exact key
    Delete {
        /// Entry key
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Change an entry's description
    Describe {
        /// Key or index from `list`
        identifier: String,
        /// New description (omit to clear it)
        description: Option<String>,
    },

    /// Export all entries as JSON
    Export {
        /// Output file path (prints to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Import entries from a JSON file produced by `export`
    Import {
        /// Path to the file to import
        file: String,
    },

    /// Edit all entries in an external editor
    Edit,

    /// Change the vault passphrase
    Passwd,
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Resolved config directory and the settings loaded from it.
pub struct Context {
    pub config_dir: PathBuf,
    pub settings: Settings,
}

impl Context {
    /// Load settings from `--config-dir` / `$PRJREM_HOME` / `~/.prjrem`.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_dir = match &cli.config_dir {
            Some(dir) => dir.clone(),
            None => config::config_dir()?,
        };
        let settings = Settings::load(&config_dir)?;
        Ok(Self {
            config_dir,
            settings,
        })
    }

    /// The vault file: `--vault` if given, else the configured location.
    pub fn vault_path(&self, cli: &Cli) -> PathBuf {
        cli.vault
            .clone()
            .unwrap_or_else(|| self.settings.vault_path(&self.config_dir))
    }

    /// A store pointed at the vault file but not yet opened.
    pub fn store(&self, cli: &Cli) -> Result<VaultStore> {
        // The default vault lives in the config dir, which may not exist yet.
        if cli.vault.is_none() && self.settings.location.is_none() {
            std::fs::create_dir_all(&self.config_dir)?;
        }

        let mut store = VaultStore::new(self.settings.kdf_params()?, self.settings.alphabet())
            .with_default_length(self.settings.generated_length);
        store.set_location(&self.vault_path(cli))?;
        Ok(store)
    }

    /// Open the vault, prompting for the passphrase only if a file exists.
    ///
    /// A NEW store is returned as is; its passphrase is chosen (with
    /// confirmation) on the first `Session::save`.
    pub fn open_store(&self, cli: &Cli) -> Result<Session> {
        let mut store = self.store(cli)?;
        if store.current_status() != VaultStatus::Locked {
            return Ok(Session {
                store,
                passphrase: None,
            });
        }

        let passphrase = prompt_passphrase()?;
        store.open(&passphrase)?;
        Ok(Session {
            store,
            passphrase: Some(passphrase),
        })
    }
}

/// An opened store plus the passphrase that unlocked it.
pub struct Session {
    pub store: VaultStore,
    /// `None` until a NEW vault gets its first passphrase.
    passphrase: Option<Passphrase>,
}

impl Session {
    /// Save under the unlocking passphrase, or ask for a new one if this
    /// is the first save of a NEW vault.
    pub fn save(&mut self) -> Result<()> {
        let passphrase = match self.passphrase.take() {
            Some(passphrase) => passphrase,
            None => prompt_creation_passphrase()?,
        };
        let result = self.store.save(&passphrase);
        self.passphrase = Some(passphrase);
        result
    }
}

/// Get the vault passphrase, trying in order:
/// 1. `PRJREM_PASSPHRASE` env var
/// 2. Interactive prompt
pub fn prompt_passphrase() -> Result<Passphrase> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return Ok(Passphrase::new(pw));
        }
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Vault passphrase")
        .allow_empty_password(true)
        .interact()
        .map_err(|e| PrjRemError::CommandFailed(format!("passphrase prompt: {e}")))?;
    Ok(Passphrase::new(pw))
}

/// Passphrase for a vault that is about to be written for the first time.
///
/// `PRJREM_PASSPHRASE` is honoured for scripted use; otherwise the user
/// chooses one with confirmation.  Either way the minimum length applies.
fn prompt_creation_passphrase() -> Result<Passphrase> {
    if let Ok(pw) = std::env::var(PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return checked_new_passphrase(pw);
        }
    }

    output::info("Creating a new vault.");
    prompt_new_passphrase()
}

/// Prompt for a new passphrase with confirmation.
///
/// Also respects `PRJREM_NEW_PASSPHRASE` for scripted use.
/// Enforces a minimum passphrase length.
pub fn prompt_new_passphrase() -> Result<Passphrase> {
    if let Ok(pw) = std::env::var(NEW_PASSPHRASE_ENV) {
        if !pw.is_empty() {
            return checked_new_passphrase(pw);
        }
    }

    loop {
        let pw = dialoguer::Password::new()
            .with_prompt("Choose vault passphrase")
            .with_confirmation(
                "Confirm vault passphrase",
                "Passphrases do not match, try again",
            )
            .interact()
            .map_err(|e| PrjRemError::CommandFailed(format!("passphrase prompt: {e}")))?;

        if pw.chars().count() < MIN_PASSPHRASE_LEN {
            output::warning(&format!(
                "Passphrase must be at least {MIN_PASSPHRASE_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(Passphrase::new(pw));
    }
}

fn checked_new_passphrase(pw: String) -> Result<Passphrase> {
    let long_enough = pw.chars().count() >= MIN_PASSPHRASE_LEN;
    let passphrase = Passphrase::new(pw);
    if !long_enough {
        return Err(PrjRemError::CommandFailed(format!(
            "passphrase must be at least {MIN_PASSPHRASE_LEN} characters"
        )));
    }
    Ok(passphrase)
}
