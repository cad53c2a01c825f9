use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;
use crate::crypto::random::DEFAULT_SEQUENCE_LEN;
use crate::errors::{PrjRemError, Result};
use crate::vault::format::write_vault_file;
use crate::vault::Alphabet;

/// Environment variable that overrides the config directory.
pub const HOME_ENV: &str = "PRJREM_HOME";

/// Lowest `scrypt_log_n` a config file may ask for.
pub const MIN_LOG_N: u8 = 14;

/// Resolve the config directory: `$PRJREM_HOME`, else `~/.prjrem`.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(HOME_ENV) {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    dirs::home_dir()
        .map(|home| home.join(".prjrem"))
        .ok_or_else(|| PrjRemError::ConfigError("cannot determine home directory".into()))
}

/// User settings, loaded from `<config_dir>/config.toml`.
///
/// Every field has a default so prjrem works without any config file.
/// Keys this version does not know about are kept in `extra` and written
/// back unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Vault file path (default: `<config_dir>/vault.dat`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<PathBuf>,

    /// External editor for `edit` (default: `$VISUAL`, `$EDITOR`, `vi`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor: Option<String>,

    /// Characters never used in generated secrets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub omit_symbols: Option<String>,

    /// log2 of scrypt N for new saves (default: 20).
    #[serde(default = "default_scrypt_log_n")]
    pub scrypt_log_n: u8,

    /// scrypt block size (default: 8).
    #[serde(default = "default_scrypt_r")]
    pub scrypt_r: u32,

    /// scrypt parallelism (default: 1).
    #[serde(default = "default_scrypt_p")]
    pub scrypt_p: u32,

    /// Length of generated secrets (default: 16).
    #[serde(default = "default_generated_length")]
    pub generated_length: usize,

    #[serde(flatten)]
    pub extra: toml::Table,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_scrypt_log_n() -> u8 {
    KdfParams::LOG_N
}

fn default_scrypt_r() -> u32 {
    KdfParams::R
}

fn default_scrypt_p() -> u32 {
    KdfParams::P
}

fn default_generated_length() -> usize {
    DEFAULT_SEQUENCE_LEN
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            location: None,
            editor: None,
            omit_symbols: None,
            scrypt_log_n: default_scrypt_log_n(),
            scrypt_r: default_scrypt_r(),
            scrypt_p: default_scrypt_p(),
            generated_length: default_generated_length(),
            extra: toml::Table::new(),
        }
    }
}

impl Settings {
    /// Name of the config file inside the config directory.
    const FILE_NAME: &'static str = "config.toml";

    /// Default vault file name inside the config directory.
    const VAULT_FILE_NAME: &'static str = "vault.dat";

    /// Load settings from `<config_dir>/config.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&config_path)?;

        toml::from_str(&contents).map_err(|e| {
            PrjRemError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })
    }

    /// Write settings to `<config_dir>/config.toml`, creating the
    /// directory if needed.  Unknown keys from the loaded file are kept.
    pub fn save(&self, config_dir: &Path) -> Result<()> {
        fs::create_dir_all(config_dir).map_err(|e| {
            PrjRemError::ConfigError(format!("cannot create {}: {e}", config_dir.display()))
        })?;

        let contents = toml::to_string_pretty(self)
            .map_err(|e| PrjRemError::ConfigError(format!("cannot serialize settings: {e}")))?;

        // Same temp-and-rename path as the vault itself, owner-only.
        write_vault_file(&config_dir.join(Self::FILE_NAME), contents.as_bytes())
    }

    /// The vault file this config points at.
    pub fn vault_path(&self, config_dir: &Path) -> PathBuf {
        self.location
            .clone()
            .unwrap_or_else(|| config_dir.join(Self::VAULT_FILE_NAME))
    }

    /// The alphabet for generated secrets, minus `omit_symbols`.
    pub fn alphabet(&self) -> Alphabet {
        match &self.omit_symbols {
            Some(omit) => Alphabet::omitting(omit),
            None => Alphabet::full(),
        }
    }

    /// Convert the scrypt settings into crypto-layer params.
    ///
    /// Refuses settings cheaper than `2^MIN_LOG_N` so an edited config
    /// cannot quietly weaken new saves.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        let params = KdfParams {
            log_n: self.scrypt_log_n,
            r: self.scrypt_r,
            p: self.scrypt_p,
        };
        if params.log_n < MIN_LOG_N || !params.within_bounds() {
            return Err(PrjRemError::ConfigError(format!(
                "scrypt settings out of range (log_n {}..=20, r 1..=32, p 1..=16)",
                MIN_LOG_N
            )));
        }
        Ok(params)
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.location, None);
        assert_eq!(s.scrypt_log_n, 20);
        assert_eq!(s.scrypt_r, 8);
        assert_eq!(s.scrypt_p, 1);
        assert_eq!(s.generated_length, 16);
        assert_eq!(s.kdf_params().unwrap(), KdfParams::default());
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.editor, None);
        assert_eq!(
            settings.vault_path(tmp.path()),
            tmp.path().join("vault.dat")
        );
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
location = "/srv/vault.dat"
editor = "nano"
omit_symbols = "@#"
scrypt_log_n = 15
generated_length = 24
"#;
        fs::write(tmp.path().join("config.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(
            settings.vault_path(tmp.path()),
            PathBuf::from("/srv/vault.dat")
        );
        assert_eq!(settings.editor.as_deref(), Some("nano"));
        assert!(!settings.alphabet().contains('@'));
        assert!(settings.alphabet().contains('!'));
        assert_eq!(settings.kdf_params().unwrap().log_n, 15);
        assert_eq!(settings.generated_length, 24);
        // Rest should be defaults
        assert_eq!(settings.scrypt_r, 8);
    }

    #[test]
    fn unknown_keys_survive_a_save() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "theme = \"dark\"\nretries = 3\n",
        )
        .unwrap();

        let mut settings = Settings::load(tmp.path()).unwrap();
        settings.editor = Some("vim".into());
        settings.save(tmp.path()).unwrap();

        let reloaded = Settings::load(tmp.path()).unwrap();
        assert_eq!(reloaded.editor.as_deref(), Some("vim"));
        assert_eq!(
            reloaded.extra.get("theme").and_then(|v| v.as_str()),
            Some("dark")
        );
        assert_eq!(
            reloaded.extra.get("retries").and_then(|v| v.as_integer()),
            Some(3)
        );
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "not valid {{toml").unwrap();
        assert!(Settings::load(tmp.path()).is_err());
    }

    #[test]
    fn weak_scrypt_settings_are_refused() {
        let s = Settings {
            scrypt_log_n: 10,
            ..Settings::default()
        };
        assert!(matches!(s.kdf_params(), Err(PrjRemError::ConfigError(_))));
    }

    #[test]
    fn save_creates_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join(".prjrem");
        Settings::default().save(&dir).unwrap();
        assert!(dir.join("config.toml").exists());
        assert!(!dir.join(".config.toml.tmp").exists());
    }
}
