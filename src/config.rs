//! @ai:module:intent Configuration structs for the dashboard
//! @ai:module:layer infrastructure
//! @ai:module:public_api DashboardConfig, StoreConfig, ChartConfig, PathConfig
//! @ai:module:stateless true

use crate::metrics::{MonthWindow, SlaTargets, MAX_WINDOW_MONTHS};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// @ai:intent Main configuration for the dashboard
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub targets: SlaTargets,
    #[serde(default)]
    pub charts: ChartConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Remote record store connection settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Web-app endpoint; SHEETS_API_URL is used when unset
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// 0 disables caching between fetches within one command
    #[serde(default)]
    pub cache_ttl_secs: u64,
}

/// @ai:intent Month window shown on the volume charts
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// First month as "YYYY-MM"; empty means the window trails the current month
    #[serde(default = "default_start_month")]
    pub start_month: String,
    #[serde(default = "default_months")]
    pub months: u32,
}

/// @ai:intent Output and journal locations
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Queue writes here when the store is unreachable
    #[serde(default = "default_offline_journal")]
    pub offline_journal: PathBuf,
    /// false fails writes while the store is unreachable instead of queueing them
    #[serde(default = "default_offline_enabled")]
    pub offline_enabled: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            timeout_secs: default_timeout_secs(),
            cache_ttl_secs: 0,
        }
    }
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            start_month: default_start_month(),
            months: default_months(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            offline_journal: default_offline_journal(),
            offline_enabled: default_offline_enabled(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_start_month() -> String {
    "2025-07".to_string()
}

fn default_months() -> u32 {
    6
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("reports")
}

fn default_offline_journal() -> PathBuf {
    PathBuf::from(".opsboard/pending.json")
}

fn default_offline_enabled() -> bool {
    true
}

impl DashboardConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl StoreConfig {
    /// @ai:intent Cache lifetime for fetched collections
    /// @ai:effects pure
    pub fn cache_max_age(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}

impl PathConfig {
    /// @ai:intent Journal location when offline queueing is on
    /// @ai:post None when offline_enabled is false or the path is empty
    /// @ai:effects pure
    pub fn journal_path(&self) -> Option<&Path> {
        if !self.offline_enabled || self.offline_journal.as_os_str().is_empty() {
            return None;
        }
        Some(&self.offline_journal)
    }
}

impl ChartConfig {
    /// @ai:intent Resolve the configured month window relative to today
    /// @ai:effects pure
    pub fn window(&self, today: chrono::NaiveDate) -> anyhow::Result<MonthWindow> {
        if self.months > MAX_WINDOW_MONTHS {
            anyhow::bail!(
                "charts.months is {}, at most {} months can be charted",
                self.months,
                MAX_WINDOW_MONTHS
            );
        }

        let start = self.start_month.trim();

        if start.is_empty() {
            return Ok(MonthWindow::trailing(today, self.months));
        }

        MonthWindow::parse_start(start, self.months)
            .with_context(|| format!("Invalid charts.start_month '{}', expected YYYY-MM", start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: DashboardConfig = toml::from_str("").unwrap();
        assert_eq!(config.store.timeout_secs, 30);
        assert_eq!(config.targets, SlaTargets::default());
        assert_eq!(config.charts.months, 6);
        assert_eq!(config.paths.output_dir, PathBuf::from("reports"));
        assert!(config.store.cache_max_age().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("opsboard.toml");

        let mut config = DashboardConfig::default();
        config.store.api_url = Some("https://example.invalid/exec".to_string());
        config.targets.billing_minutes = 10;
        config.save(&path).unwrap();

        let loaded = DashboardConfig::load(&path).unwrap();
        assert_eq!(loaded.store.api_url.as_deref(), Some("https://example.invalid/exec"));
        assert_eq!(loaded.targets.billing_minutes, 10);
        assert_eq!(loaded.targets.issue_minutes, 30);
    }

    #[test]
    fn test_chart_window() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        let fixed = ChartConfig::default().window(today).unwrap();
        assert_eq!(fixed, MonthWindow::default());

        let trailing = ChartConfig {
            start_month: String::new(),
            months: 2,
        }
        .window(today)
        .unwrap();
        assert_eq!(trailing.labels(), vec!["Feb 2026", "Mar 2026"]);

        let bad = ChartConfig {
            start_month: "spring".to_string(),
            months: 6,
        };
        assert!(bad.window(today).is_err());
    }

    #[test]
    fn test_chart_window_rejects_oversized_months() {
        let today = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();

        let oversized = ChartConfig {
            start_month: "2025-07".to_string(),
            months: 100_000,
        };
        assert!(oversized.window(today).is_err());

        let trailing = ChartConfig {
            start_month: String::new(),
            months: MAX_WINDOW_MONTHS + 1,
        };
        assert!(trailing.window(today).is_err());

        let widest = ChartConfig {
            start_month: String::new(),
            months: MAX_WINDOW_MONTHS,
        }
        .window(today)
        .unwrap();
        assert_eq!(widest.labels().len(), MAX_WINDOW_MONTHS as usize);
    }

    #[test]
    fn test_offline_journal_disabled_survives_round_trip() {
        let mut config = DashboardConfig::default();
        assert_eq!(
            config.paths.journal_path(),
            Some(Path::new(".opsboard/pending.json"))
        );

        config.paths.offline_enabled = false;
        let reloaded: DashboardConfig =
            toml::from_str(&toml::to_string_pretty(&config).unwrap()).unwrap();

        assert!(!reloaded.paths.offline_enabled);
        assert_eq!(reloaded.paths.journal_path(), None);
    }

    #[test]
    fn test_empty_offline_journal_path_disables_queueing() {
        let config: DashboardConfig = toml::from_str("[paths]\noffline_journal = \"\"\n").unwrap();
        assert!(config.paths.offline_enabled);
        assert_eq!(config.paths.journal_path(), None);
    }
}
