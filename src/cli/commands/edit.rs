//! `prjrem edit` — open every entry in an editor.
//!
//! Writes the JSON export to a private temp file, launches the configured
//! editor (or `$VISUAL` / `$EDITOR` / `vi`), and applies the result back:
//! new and changed entries go through the usual validation, and keys that
//! disappeared from the file are deleted.  Nothing is applied while any
//! entry is rejected; the user can reopen the editor on the same text.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use dialoguer::Confirm;
use zeroize::Zeroizing;

use crate::cli::output;
use crate::cli::{Cli, Context};
use crate::errors::{PrjRemError, Result};
use crate::vault::format::deserialize_entries;
use crate::vault::{Alphabet, EntryRegistry};

/// Execute the `edit` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let ctx = Context::load(cli)?;
    let mut session = ctx.open_store(cli)?;

    let original = session.store.export_all()?;
    let before: HashSet<String> = session
        .store
        .list()?
        .into_iter()
        .map(|(_, key)| key.to_string())
        .collect();

    let tmp_path = write_temp_file(original.as_bytes())?;
    let editor = find_editor(ctx.settings.editor.as_deref());

    let outcome = edit_until_valid(&editor, &tmp_path, session.store.alphabet());
    secure_delete(&tmp_path);
    let edited = outcome?;

    if edited.trim() == original.trim() {
        output::info("No changes detected.");
        return Ok(());
    }

    let after: HashSet<String> = deserialize_entries(edited.as_bytes())?
        .into_keys()
        .collect();

    let report = session.store.import_all(&edited)?;
    if !report.rejected.is_empty() {
        output::print_import_report(&report);
        return Err(PrjRemError::EditorError(
            "edited entries were rejected; vault left unchanged".into(),
        ));
    }

    let mut removed = 0;
    for key in before.difference(&after) {
        if session.store.delete(key)? {
            removed += 1;
        }
    }

    output::print_import_report(&report);
    if removed > 0 {
        output::info(&format!("Removed {removed} entries"));
    }

    if session.store.is_dirty() {
        session.save()?;
        output::success(&format!(
            "Vault saved ({} entries)",
            session.store.entry_count()
        ));
    }

    Ok(())
}

/// Run the editor until the file parses and every entry is acceptable.
///
/// Declining to retry (or having no terminal to ask on) is an error, so
/// a rejected edit never reaches the vault.
fn edit_until_valid(editor: &str, path: &Path, alphabet: &Alphabet) -> Result<Zeroizing<String>> {
    loop {
        run_editor(editor, path)?;

        let edited = fs::read_to_string(path)
            .map(Zeroizing::new)
            .map_err(|e| PrjRemError::EditorError(format!("failed to read edited file: {e}")))?;

        let problems = check_edited(&edited, alphabet);
        if problems.is_empty() {
            return Ok(edited);
        }
        for problem in &problems {
            output::warning(problem);
        }

        let retry = Confirm::new()
            .with_prompt("Re-open the editor?")
            .default(true)
            .interact()
            .unwrap_or(false);
        if !retry {
            return Err(PrjRemError::EditorError(format!(
                "{} problem(s) in the edited file; vault left unchanged",
                problems.len()
            )));
        }
    }
}

fn run_editor(editor: &str, path: &Path) -> Result<()> {
    let status = Command::new(editor)
        .arg(path)
        .status()
        .map_err(|e| PrjRemError::EditorError(format!("failed to launch '{editor}': {e}")))?;

    if !status.success() {
        return Err(PrjRemError::EditorError(format!(
            "editor exited with code {}",
            status.code().unwrap_or(-1)
        )));
    }
    Ok(())
}

/// Reasons the edited text cannot be applied; empty when it can.
fn check_edited(text: &str, alphabet: &Alphabet) -> Vec<String> {
    let mut scratch = EntryRegistry::new();
    match scratch.import_all(text, alphabet) {
        Ok(report) => report
            .rejected
            .into_iter()
            .map(|(key, reason)| format!("'{key}': {reason}"))
            .collect(),
        Err(e) => vec![e.to_string()],
    }
}

/// Create a 0600 temp file holding `contents` and return its path.
fn write_temp_file(contents: &[u8]) -> Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let tmp_path =
        std::env::temp_dir().join(format!("prjrem-edit-{}-{nanos}.json", std::process::id()));

    // Create the file with restrictive permissions atomically (no TOCTOU race).
    #[cfg(unix)]
    let mut file = {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(&tmp_path)
            .map_err(|e| PrjRemError::EditorError(format!("failed to create temp file: {e}")))?
    };

    #[cfg(not(unix))]
    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|e| PrjRemError::EditorError(format!("failed to create temp file: {e}")))?;

    let written = file.write_all(contents).and_then(|_| file.flush());
    if let Err(e) = written {
        secure_delete(&tmp_path);
        return Err(e.into());
    }
    Ok(tmp_path)
}

/// The configured editor, else `$VISUAL`, else `$EDITOR`, else `vi`.
fn find_editor(configured: Option<&str>) -> String {
    if let Some(editor) = configured.filter(|e| !e.is_empty()) {
        return editor.to_string();
    }

    for var in ["VISUAL", "EDITOR"] {
        if let Ok(editor) = std::env::var(var) {
            if !editor.is_empty() {
                return editor;
            }
        }
    }

    "vi".to_string()
}

/// Overwrite a file's contents with zeros before deleting it.
/// Best-effort: failures are silently ignored.
fn secure_delete(path: &Path) {
    if let Ok(metadata) = fs::metadata(path) {
        let len = metadata.len() as usize;
        if len > 0 {
            if let Ok(mut file) = fs::OpenOptions::new().write(true).open(path) {
                let zeros = vec![0u8; len];
                let _ = file.write_all(&zeros);
                let _ = file.flush();
            }
        }
    }
    let _ = fs::remove_file(path);
}
