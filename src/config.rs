use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::catalog::LocationMode;
use crate::plural::{ConfiguredPluralRules, MAX_PLURAL_FORMS};

pub const CONFIG_FILE_NAME: &str = ".tscatrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Plural-form counts per locale, overriding the built-in table.
    #[serde(default)]
    pub plural_forms: HashMap<String, u32>,
    /// Count used for locales neither the overrides nor the table know.
    #[serde(default)]
    pub default_plural_forms: Option<u32>,
    #[serde(default)]
    pub locations: LocationMode,
    #[serde(default = "default_source_language")]
    pub source_language: String,
    /// Globs naming the catalogs to work on when none are given on the
    /// command line.
    #[serde(default)]
    pub catalogs: Vec<String>,
    #[serde(default = "default_ignores")]
    pub ignores: Vec<String>,
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_ignores() -> Vec<String> {
    ["**/build/**", "**/.git/**"].map(String::from).to_vec()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            plural_forms: HashMap::new(),
            default_plural_forms: None,
            locations: LocationMode::default(),
            source_language: default_source_language(),
            catalogs: Vec::new(),
            ignores: default_ignores(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Rejects invalid glob patterns and plural counts outside `1..=6`.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.catalogs {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'catalogs': \"{}\"", pattern))?;
        }
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        let counts = self
            .plural_forms
            .iter()
            .map(|(locale, count)| (format!("'pluralForms.{}'", locale), *count))
            .chain(
                self.default_plural_forms
                    .map(|count| ("'defaultPluralForms'".to_string(), count)),
            );
        for (field, count) in counts {
            if !(1..=MAX_PLURAL_FORMS).contains(&count) {
                bail!(
                    "Invalid plural form count in {}: {} (expected 1 to {})",
                    field,
                    count,
                    MAX_PLURAL_FORMS
                );
            }
        }

        Ok(())
    }

    pub fn plural_rules(&self) -> ConfiguredPluralRules {
        ConfiguredPluralRules::new(&self.plural_forms, self.default_plural_forms)
    }
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// Directory holding the config file; catalog globs are relative to it.
    pub root: PathBuf,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            let root = path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| start_dir.to_path_buf());
            Ok(ConfigLoadResult {
                config,
                root,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            root: start_dir.to_path_buf(),
            from_file: false,
        }),
    }
}
