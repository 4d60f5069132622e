// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use networth_app::PageSize;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

pub const APP_NAME: &str = "networth";
const CONFIG_VERSION: i64 = 1;
const DEFAULT_CURRENCY_SYMBOL: &str = "₹";
const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub data: Data,
    #[serde(default)]
    pub ui: Ui,
    #[serde(default)]
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            data: Data::default(),
            ui: Ui::default(),
            log: Log::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Data {
    pub snapshot_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub page_size: Option<usize>,
    pub currency_symbol: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            page_size: Some(PageSize::default().get()),
            currency_symbol: Some(DEFAULT_CURRENCY_SYMBOL.to_owned()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Log {
    pub level: Option<String>,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Some(DEFAULT_LOG_LEVEL.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("NETWORTH_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set NETWORTH_CONFIG_PATH to the config file")
        })?;
        Ok(config_root.join(APP_NAME).join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is not versioned. Add `version = 1` and put values under [data], [ui], and [log]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if let Some(size) = self.ui.page_size
            && PageSize::new(size).is_none()
        {
            bail!(
                "ui.page_size in {} must be one of {:?}, got {}",
                path.display(),
                PageSize::ALLOWED,
                size
            );
        }

        if let Some(symbol) = &self.ui.currency_symbol
            && symbol.trim().is_empty()
        {
            bail!(
                "ui.currency_symbol in {} must not be blank -- remove it to use {}",
                path.display(),
                DEFAULT_CURRENCY_SYMBOL
            );
        }

        if let Some(snapshot_path) = &self.data.snapshot_path
            && snapshot_path.trim().is_empty()
        {
            bail!(
                "data.snapshot_path in {} must not be blank -- remove it or point it at a JSON snapshot",
                path.display()
            );
        }

        if let Some(level) = &self.log.level {
            EnvFilter::try_new(level).with_context(|| {
                format!(
                    "log.level in {} is not a valid filter; use e.g. \"warn\" or \"networth_app=debug\"",
                    path.display()
                )
            })?;
        }

        Ok(())
    }

    pub fn snapshot_path(&self) -> Option<PathBuf> {
        self.data.snapshot_path.as_ref().map(PathBuf::from)
    }

    pub fn page_size(&self) -> PageSize {
        self.ui
            .page_size
            .and_then(PageSize::new)
            .unwrap_or_default()
    }

    pub fn currency_symbol(&self) -> &str {
        self.ui
            .currency_symbol
            .as_deref()
            .unwrap_or(DEFAULT_CURRENCY_SYMBOL)
    }

    pub fn log_level(&self) -> &str {
        self.log.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# networth config\n# Place this file at: {}\n\nversion = 1\n\n[data]\n# JSON snapshot with assets, liabilities and templates\n# snapshot_path = \"/absolute/path/to/snapshot.json\"\n\n[ui]\npage_size = {}\ncurrency_symbol = \"{}\"\n\n[log]\n# Overridden by NETWORTH_LOG\nlevel = \"{}\"\n",
            path.display(),
            PageSize::default().get(),
            DEFAULT_CURRENCY_SYMBOL,
            DEFAULT_LOG_LEVEL,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.page_size().get(), 10);
        assert_eq!(config.currency_symbol(), "₹");
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.snapshot_path(), None);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\npage_size = 25\n")?;
        let error = Config::load(&path).expect_err("unversioned config should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[data], [ui], and [log]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[data]\nsnapshot_path = \"/srv/networth/snapshot.json\"\n[ui]\npage_size = 25\ncurrency_symbol = \"$\"\n[log]\nlevel = \"networth_app=debug\"\n",
        )?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size().get(), 25);
        assert_eq!(config.currency_symbol(), "$");
        assert_eq!(config.log_level(), "networth_app=debug");
        assert_eq!(
            config.snapshot_path(),
            Some(PathBuf::from("/srv/networth/snapshot.json"))
        );
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 2\n")?;
        let error = Config::load(&path).expect_err("v2 config should fail");
        assert!(error.to_string().contains("unsupported config version 2"));
        Ok(())
    }

    #[test]
    fn page_size_outside_allowed_set_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\npage_size = 30\n")?;
        let error = Config::load(&path).expect_err("page size 30 should fail");
        assert!(error.to_string().contains("ui.page_size"));
        Ok(())
    }

    #[test]
    fn blank_values_are_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\ncurrency_symbol = \"  \"\n")?;
        let error = Config::load(&path).expect_err("blank symbol should fail");
        assert!(error.to_string().contains("ui.currency_symbol"));

        let (_temp, path) = write_config("version = 1\n[data]\nsnapshot_path = \"\"\n")?;
        let error = Config::load(&path).expect_err("blank snapshot path should fail");
        assert!(error.to_string().contains("data.snapshot_path"));
        Ok(())
    }

    #[test]
    fn invalid_log_level_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[log]\nlevel = \"networth=[\"\n")?;
        let error = Config::load(&path).expect_err("bad filter should fail");
        assert!(error.to_string().contains("log.level"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("NETWORTH_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("NETWORTH_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn default_path_uses_app_directory_without_env_override() -> Result<()> {
        let _guard = env_lock();
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::remove_var("NETWORTH_CONFIG_PATH");
        }
        let path = Config::default_path()?;
        assert!(path.ends_with("networth/config.toml"));
        Ok(())
    }

    #[test]
    fn example_config_round_trips_through_load() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[data]"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("[log]"));

        std::fs::write(&path, example)?;
        let config = Config::load(&path)?;
        assert_eq!(config.page_size().get(), 10);
        Ok(())
    }
}
