//! Integration tests for the prjrem CLI.
//!
//! The binary runs against a throwaway config directory (`PRJREM_HOME`)
//! whose config lowers the scrypt cost, and reads the passphrase from
//! `PRJREM_PASSPHRASE` so no prompt is ever shown.

use std::fs;

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

const PASSPHRASE: &str = "integration-test-pw";

/// Helper: a config directory with a cheap scrypt setting.
fn home() -> TempDir {
    let tmp = TempDir::new().unwrap();
    tmp.child("config.toml")
        .write_str("scrypt_log_n = 14\n")
        .unwrap();
    tmp
}

/// Helper: get a Command pointing at the prjrem binary inside `home`.
fn prjrem(home: &TempDir) -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("prjrem").expect("binary should exist");
    cmd.env("PRJREM_HOME", home.path())
        .env("PRJREM_PASSPHRASE", PASSPHRASE)
        .env_remove("PRJREM_NEW_PASSPHRASE")
        .env_remove("PRJREM_LOG");
    cmd
}

#[test]
fn help_flag_shows_usage() {
    let home = home();
    prjrem(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("passphrase-locked secret vault"))
        .stdout(predicate::str::contains("set"))
        .stdout(predicate::str::contains("get"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("passwd"));
}

#[test]
fn no_args_shows_help() {
    let home = home();
    prjrem(&home)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn gen_prints_requested_length() {
    let home = home();
    prjrem(&home)
        .args(["gen", "24"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Za-z0-9!@#$]{24}\n$").unwrap());
}

#[test]
fn gen_rejects_negative_length() {
    let home = home();
    prjrem(&home)
        .args(["gen", "-3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("length"));
}

#[test]
fn set_then_get_round_trip() {
    let home = home();
    prjrem(&home)
        .args(["set", "mail", "--secret", "Xy7!pass", "-d", "work"])
        .assert()
        .success();

    home.child("vault.dat").assert(predicate::path::exists());

    prjrem(&home)
        .args(["get", "mail"])
        .assert()
        .success()
        .stdout("Xy7!pass\n");

    // Index 0 is the first key in sorted order.
    prjrem(&home)
        .args(["get", "0"])
        .assert()
        .success()
        .stdout("Xy7!pass\n");
}

#[test]
fn generated_secret_has_default_length() {
    let home = home();
    prjrem(&home).args(["set", "bank"]).assert().success();
    prjrem(&home)
        .args(["get", "bank"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"^[A-Za-z0-9!@#$]{16}\n$").unwrap());
}

#[test]
fn invalid_key_is_refused() {
    let home = home();
    prjrem(&home)
        .args(["set", "bad key", "--secret", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid key"));
    home.child("vault.dat").assert(predicate::path::missing());
}

#[test]
fn wrong_passphrase_fails() {
    let home = home();
    prjrem(&home)
        .args(["set", "k", "--secret", "v"])
        .assert()
        .success();

    prjrem(&home)
        .env("PRJREM_PASSPHRASE", "not-the-passphrase")
        .args(["get", "k"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Decryption failed"));
}

#[test]
fn list_shows_keys_and_descriptions() {
    let home = home();
    prjrem(&home)
        .args(["set", "zeta", "--secret", "z1", "-d", "last"])
        .assert()
        .success();
    prjrem(&home)
        .args(["set", "alpha", "--secret", "a1"])
        .assert()
        .success();

    prjrem(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("alpha"))
        .stdout(predicate::str::contains("zeta"))
        .stdout(predicate::str::contains("last"));
}

#[test]
fn delete_removes_entry() {
    let home = home();
    prjrem(&home)
        .args(["set", "gone", "--secret", "g1"])
        .assert()
        .success();
    prjrem(&home)
        .args(["delete", "gone", "--force"])
        .assert()
        .success();
    prjrem(&home).args(["get", "gone"]).assert().failure();

    prjrem(&home)
        .args(["delete", "gone", "--force"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No entry"));
}

#[test]
fn describe_updates_description() {
    let home = home();
    prjrem(&home)
        .args(["set", "svc", "--secret", "s1"])
        .assert()
        .success();
    prjrem(&home)
        .args(["describe", "svc", "staging"])
        .assert()
        .success();
    prjrem(&home)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("staging"));
}

#[test]
fn export_and_import_between_vaults() {
    let source = home();
    prjrem(&source)
        .args(["set", "one", "--secret", "O1", "-d", "first"])
        .assert()
        .success();
    prjrem(&source)
        .args(["set", "two", "--secret", "T2"])
        .assert()
        .success();

    let dump = source.child("dump.json");
    prjrem(&source)
        .args(["export", "-o", dump.path().to_str().unwrap()])
        .assert()
        .success();
    assert!(fs::read_to_string(dump.path()).unwrap().contains("\"one\""));

    let target = home();
    prjrem(&target)
        .args(["import", dump.path().to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 entries"));
    prjrem(&target)
        .args(["get", "two"])
        .assert()
        .success()
        .stdout("T2\n");
}

#[test]
fn passwd_changes_passphrase() {
    let home = home();
    prjrem(&home)
        .args(["set", "k", "--secret", "v"])
        .assert()
        .success();

    prjrem(&home)
        .env("PRJREM_NEW_PASSPHRASE", "brand-new")
        .arg("passwd")
        .assert()
        .success();

    prjrem(&home).args(["get", "k"]).assert().failure();
    prjrem(&home)
        .env("PRJREM_PASSPHRASE", "brand-new")
        .args(["get", "k"])
        .assert()
        .success()
        .stdout("v\n");
}

#[test]
fn location_is_saved_in_config() {
    let home = home();
    let elsewhere = home.child("elsewhere.dat");
    prjrem(&home)
        .args(["location", elsewhere.path().to_str().unwrap()])
        .assert()
        .success();
    let config = fs::read_to_string(home.child("config.toml").path()).unwrap();
    assert!(config.contains("elsewhere.dat"));
    assert!(config.contains("scrypt_log_n = 14"));

    prjrem(&home)
        .args(["set", "k", "--secret", "v"])
        .assert()
        .success();
    elsewhere.assert(predicate::path::exists());
}

#[test]
fn location_rejects_missing_directory() {
    let home = home();
    let bad = home.path().join("no-such-dir").join("vault.dat");
    prjrem(&home)
        .args(["location", bad.to_str().unwrap()])
        .assert()
        .failure();
    let config = fs::read_to_string(home.child("config.toml").path()).unwrap();
    assert!(!config.contains("no-such-dir"));
}

#[test]
fn info_reports_status() {
    let home = home();
    prjrem(&home)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("NEW"));

    prjrem(&home)
        .args(["set", "k", "--secret", "v"])
        .assert()
        .success();
    prjrem(&home)
        .arg("info")
        .assert()
        .success()
        .stdout(predicate::str::contains("LOCKED"))
        .stdout(predicate::str::contains("current"));
}

#[test]
fn weak_scrypt_config_is_refused() {
    let home = TempDir::new().unwrap();
    home.child("config.toml")
        .write_str("scrypt_log_n = 8\n")
        .unwrap();
    prjrem(&home)
        .args(["set", "k", "--secret", "v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scrypt"));
}

// ---------------------------------------------------------------------------
// New-vault passphrase
// ---------------------------------------------------------------------------

#[test]
fn new_vault_without_a_confirmed_passphrase_is_not_created() {
    let home = home();
    // No scripted passphrase and no terminal to confirm one on.
    prjrem(&home)
        .env_remove("PRJREM_PASSPHRASE")
        .env("PRJREM_NEW_PASSPHRASE", "")
        .args(["set", "k", "--secret", "v"])
        .assert()
        .failure();
    home.child("vault.dat").assert(predicate::path::missing());
}

#[test]
fn new_vault_refuses_short_passphrase() {
    let home = home();
    prjrem(&home)
        .env("PRJREM_PASSPHRASE", "short")
        .args(["set", "k", "--secret", "v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
    home.child("vault.dat").assert(predicate::path::missing());
}

#[test]
fn reading_a_new_vault_needs_no_passphrase() {
    let home = home();
    prjrem(&home)
        .env_remove("PRJREM_PASSPHRASE")
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No entries"));
}

#[test]
fn passwd_refuses_short_passphrase() {
    let home = home();
    prjrem(&home)
        .args(["set", "k", "--secret", "v"])
        .assert()
        .success();
    prjrem(&home)
        .env("PRJREM_NEW_PASSPHRASE", "tiny")
        .arg("passwd")
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 8 characters"));
    prjrem(&home).args(["get", "k"]).assert().success();
}

#[test]
fn gen_fails_when_every_character_is_omitted() {
    let home = home();
    home.child("config.toml")
        .write_str(
            "scrypt_log_n = 14\n\
             omit_symbols = '!@#$abcdefghijklmnopqrstuvwxyz0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ'\n",
        )
        .unwrap();
    prjrem(&home)
        .args(["gen", "12"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("omitted"));
}

// ---------------------------------------------------------------------------
// edit with a scripted editor
// ---------------------------------------------------------------------------

/// Helper: install a shell script as the configured editor.
#[cfg(unix)]
fn script_editor(home: &TempDir, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let script = home.child("editor.sh");
    script.write_str(&format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(script.path(), fs::Permissions::from_mode(0o755)).unwrap();

    home.child("config.toml")
        .write_str(&format!(
            "scrypt_log_n = 14\neditor = '{}'\n",
            script.path().display()
        ))
        .unwrap();
}

#[cfg(unix)]
#[test]
fn edit_with_rejected_rename_keeps_original_entry() {
    let home = home();
    script_editor(
        &home,
        r#"sed 's/"bank"/"bad key"/' "$1" > "$1.new" && cat "$1.new" > "$1" && rm "$1.new""#,
    );
    prjrem(&home)
        .args(["set", "bank", "--secret", "B4nk1"])
        .assert()
        .success();

    prjrem(&home)
        .arg("edit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("bad key"))
        .stderr(predicate::str::contains("vault left unchanged"));

    prjrem(&home)
        .args(["get", "bank"])
        .assert()
        .success()
        .stdout("B4nk1\n");
}

#[cfg(unix)]
#[test]
fn edit_with_malformed_json_changes_nothing() {
    let home = home();
    script_editor(&home, r#"printf '{broken' > "$1""#);
    prjrem(&home)
        .args(["set", "bank", "--secret", "B4nk1"])
        .assert()
        .success();

    prjrem(&home).arg("edit").assert().failure();
    prjrem(&home)
        .args(["get", "bank"])
        .assert()
        .success()
        .stdout("B4nk1\n");
}

#[cfg(unix)]
#[test]
fn edit_applies_changes_and_removals() {
    let home = home();
    script_editor(
        &home,
        r#"printf '{"bank": ["Fresh9", "updated"]}' > "$1""#,
    );
    prjrem(&home)
        .args(["set", "bank", "--secret", "B4nk1"])
        .assert()
        .success();
    prjrem(&home)
        .args(["set", "mail", "--secret", "M4il1"])
        .assert()
        .success();

    prjrem(&home)
        .arg("edit")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 entries"));

    prjrem(&home)
        .args(["get", "bank"])
        .assert()
        .success()
        .stdout("Fresh9\n");
    prjrem(&home).args(["get", "mail"]).assert().failure();
}
