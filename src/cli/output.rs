//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::ImportReport;

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of `(index, key, description)` rows.
pub fn print_entries_table(rows: &[(usize, &str, Option<&str>)]) {
    if rows.is_empty() {
        info("No entries in this vault yet.");
        tip("Run `prjrem set <KEY>` to add your first entry.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Key", "Description"]);

    for (index, key, description) in rows {
        table.add_row(vec![
            index.to_string(),
            key.to_string(),
            description.unwrap_or("").to_string(),
        ]);
    }

    println!("{table}");
}

/// Summarize a bulk import, listing every refused key.
pub fn print_import_report(report: &ImportReport) {
    for (key, reason) in &report.rejected {
        warning(&format!("skipped '{key}': {reason}"));
    }
    if report.rejected.is_empty() {
        success(&format!("Imported {} entries", report.imported));
    } else {
        info(&format!(
            "Imported {} entries, skipped {}",
            report.imported,
            report.rejected.len()
        ));
    }
}
