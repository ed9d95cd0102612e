use crate::core::period::WeekBoundary;
use crate::errors::{AppError, AppResult};
use crate::utils::path::expand_tilde;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    #[serde(default = "default_category")]
    pub default_category: String,
    #[serde(default)]
    pub week_boundary: WeekBoundary,
    #[serde(default)]
    pub goals: GoalConfig,
    #[serde(default)]
    pub kpi: KpiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub notifications: NotificationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalConfig {
    #[serde(default = "default_weekly_goal")]
    pub weekly_default: u32,
    #[serde(default = "default_monthly_weeks")]
    pub monthly_weeks: u32,
    /// Login → goals for employees imported from legacy tables that carry
    /// no goal column.
    #[serde(default = "default_legacy_goals")]
    pub legacy_overrides: BTreeMap<String, GoalOverride>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalOverride {
    pub weekly: u32,
    #[serde(default)]
    pub monthly: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KpiConfig {
    /// Percentage of the weekly goal counted as "meeting the goal".
    #[serde(default = "default_meeting_threshold")]
    pub meeting_threshold: f64,
    /// Percentage of the weekly goal counted as "top performer".
    #[serde(default = "default_top_threshold")]
    pub top_threshold: f64,
    #[serde(default = "default_list_limit")]
    pub list_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub max_capacity: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_sender")]
    pub sender: String,
    /// Send a copy of every confirmation to `sender`.
    #[serde(default = "default_true")]
    pub copy_sender: bool,
    #[serde(default = "default_spool_dir")]
    pub spool_dir: String,
    /// Display name → email address.
    #[serde(default)]
    pub recipients: BTreeMap<String, String>,
}

fn default_category() -> String {
    "General".to_string()
}
fn default_weekly_goal() -> u32 {
    2375
}
fn default_monthly_weeks() -> u32 {
    4
}
fn default_legacy_goals() -> BTreeMap<String, GoalOverride> {
    BTreeMap::from([(
        "E89P".to_string(),
        GoalOverride {
            weekly: 2675,
            monthly: Some(10500),
        },
    )])
}
fn default_meeting_threshold() -> f64 {
    70.0
}
fn default_top_threshold() -> f64 {
    110.0
}
fn default_list_limit() -> usize {
    3
}
fn default_cache_ttl() -> u64 {
    300
}
fn default_cache_capacity() -> u64 {
    256
}
fn default_sender() -> String {
    "points@localhost".to_string()
}
fn default_true() -> bool {
    true
}
fn default_spool_dir() -> String {
    Config::config_dir()
        .join("outbox")
        .to_string_lossy()
        .to_string()
}

impl Default for GoalConfig {
    fn default() -> Self {
        Self {
            weekly_default: default_weekly_goal(),
            monthly_weeks: default_monthly_weeks(),
            legacy_overrides: default_legacy_goals(),
        }
    }
}

impl Default for KpiConfig {
    fn default() -> Self {
        Self {
            meeting_threshold: default_meeting_threshold(),
            top_threshold: default_top_threshold(),
            list_limit: default_list_limit(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            max_capacity: default_cache_capacity(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            sender: default_sender(),
            copy_sender: true,
            spool_dir: default_spool_dir(),
            recipients: BTreeMap::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::with_database(Self::database_file())
    }
}

impl Config {
    fn with_database(db_path: PathBuf) -> Self {
        Self {
            database: db_path.to_string_lossy().to_string(),
            default_category: default_category(),
            week_boundary: WeekBoundary::default(),
            goals: GoalConfig::default(),
            kpi: KpiConfig::default(),
            cache: CacheConfig::default(),
            notifications: NotificationConfig::default(),
        }
    }

    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("refpoints")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".refpoints")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("refpoints.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("refpoints.sqlite")
    }

    /// Load configuration from file, or return defaults if not found
    pub fn load() -> AppResult<Self> {
        let path = Self::config_file();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> AppResult<Self> {
        let mut cfg: Config = serde_yaml::from_str(content)?;
        cfg.database = expand_tilde(&cfg.database).to_string_lossy().to_string();
        cfg.notifications.spool_dir = expand_tilde(&cfg.notifications.spool_dir)
            .to_string_lossy()
            .to_string();
        Ok(cfg)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Initialize configuration and database files.
    /// Returns the configuration that was written (or would have been, in test mode).
    pub fn init_all(custom_db: Option<String>, is_test: bool) -> AppResult<Self> {
        let dir = Self::config_dir();

        // DB name: user provided or default
        let db_path = match custom_db {
            Some(name) => {
                let p = expand_tilde(&name);
                if p.is_absolute() { p } else { dir.join(p) }
            }
            None => Self::database_file(),
        };

        let config = Self::with_database(db_path.clone());

        // Write config file
        if !is_test {
            fs::create_dir_all(&dir)?;
            let yaml = config.to_yaml()?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
        }

        if let Some(parent) = db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(config)
    }
}
