use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::{Path, PathBuf}};

use crate::{paginate::PageSize, provider::open_meteo::DEFAULT_ARCHIVE_URL, theme::Theme};

/// Environment variable that overrides the archive endpoint.
pub const ARCHIVE_URL_ENV: &str = "WEATHER_ARCHIVE_URL";

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Archive endpoint; the public Open-Meteo archive when absent.
    pub archive_url: Option<String>,

    /// Persisted dark-mode flag. Absent means "follow the system".
    pub dark_mode: Option<bool>,

    /// Default rows per table page (10, 20 or 50).
    pub page_size: Option<usize>,
}

impl Config {
    /// Effective endpoint: environment override, then config, then default.
    pub fn archive_url(&self) -> String {
        self.archive_url_with_override(std::env::var(ARCHIVE_URL_ENV).ok())
    }

    fn archive_url_with_override(&self, env: Option<String>) -> String {
        env.filter(|s| !s.trim().is_empty())
            .or_else(|| self.archive_url.clone())
            .unwrap_or_else(|| DEFAULT_ARCHIVE_URL.to_string())
    }

    /// Configured page size; anything other than 10/20/50 falls back to 10.
    pub fn page_size(&self) -> PageSize {
        self.page_size.and_then(|n| PageSize::try_from(n).ok()).unwrap_or_default()
    }

    pub fn theme(&self) -> Theme {
        Theme::resolve(self.dark_mode)
    }

    /// Persist an explicit theme, or `None` to go back to the system preference.
    pub fn set_dark_mode(&mut self, dark: Option<bool>) {
        self.dark_mode = dark;
    }

    /// Flip the effective theme and pin it.
    pub fn toggle_theme(&mut self) -> Theme {
        let next = self.theme().toggled();
        self.dark_mode = Some(next.is_dark());
        next
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }
}

pub(crate) fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-archive", "weather-archive")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_url_defaults_to_open_meteo() {
        let cfg = Config::default();
        assert_eq!(cfg.archive_url_with_override(None), DEFAULT_ARCHIVE_URL);
    }

    #[test]
    fn env_override_beats_config() {
        let cfg = Config { archive_url: Some("http://mirror/archive".into()), ..Default::default() };
        assert_eq!(cfg.archive_url_with_override(None), "http://mirror/archive");
        assert_eq!(
            cfg.archive_url_with_override(Some("http://env/archive".into())),
            "http://env/archive"
        );
        assert_eq!(cfg.archive_url_with_override(Some("  ".into())), "http://mirror/archive");
    }

    #[test]
    fn invalid_page_size_falls_back_to_ten() {
        let cfg = Config { page_size: Some(20), ..Default::default() };
        assert_eq!(cfg.page_size(), PageSize::Twenty);

        let cfg = Config { page_size: Some(33), ..Default::default() };
        assert_eq!(cfg.page_size(), PageSize::Ten);
    }

    #[test]
    fn explicit_dark_mode_wins() {
        let mut cfg = Config::default();
        cfg.set_dark_mode(Some(true));
        assert_eq!(cfg.theme(), Theme::Dark);

        let next = cfg.toggle_theme();
        assert_eq!(next, Theme::Light);
        assert_eq!(cfg.dark_mode, Some(false));
    }

    #[test]
    fn save_and_load_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = Config { dark_mode: Some(true), page_size: Some(50), archive_url: None };
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, cfg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, Config::default());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "dark_mode = [").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
