//! Seminar configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// File name looked up in the current directory.
pub const LOCAL_CONFIG_FILE: &str = "seminar.toml";

/// Output format for generated reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Html,
}

impl ReportFormat {
    /// File extension used when exporting.
    pub fn extension(self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Html => "html",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportFormat::Text => write!(f, "text"),
            ReportFormat::Html => write!(f, "html"),
        }
    }
}

impl std::str::FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "html" => Ok(ReportFormat::Html),
            other => anyhow::bail!("unknown report format: {other}"),
        }
    }
}

/// Top-level seminar configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeminarConfig {
    /// Snapshot file holding the whole seminar.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    /// Directory reports are exported into.
    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,
    #[serde(default)]
    pub default_report_format: ReportFormat,
}

fn default_data_file() -> PathBuf {
    PathBuf::from("seminar_data.json")
}
fn default_report_dir() -> PathBuf {
    PathBuf::from("./seminar-reports")
}

impl Default for SeminarConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            report_dir: default_report_dir(),
            default_report_format: ReportFormat::default(),
        }
    }
}

impl SeminarConfig {
    /// Render as TOML, for `seminar init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize config")
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Unset variables expand to the empty string. Substituted values are not
/// scanned again, so a value containing `${...}` is taken literally.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + len];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `seminar.toml` in the current directory
/// 2. `~/.config/seminar/config.toml`
///
/// Environment variable overrides: `SEMINAR_DATA_FILE`, `SEMINAR_REPORT_DIR`.
pub fn load_config() -> Result<SeminarConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SeminarConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("loading config from {}", path.display());
            parse_config(&path)?
        }
        None => SeminarConfig::default(),
    };

    if let Ok(data_file) = std::env::var("SEMINAR_DATA_FILE") {
        config.data_file = PathBuf::from(data_file);
    }
    if let Ok(report_dir) = std::env::var("SEMINAR_REPORT_DIR") {
        config.report_dir = PathBuf::from(report_dir);
    }

    config.data_file = resolve_path(&config.data_file);
    config.report_dir = resolve_path(&config.report_dir);

    Ok(config)
}

fn parse_config(path: &Path) -> Result<SeminarConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    toml::from_str::<SeminarConfig>(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("seminar"))
}
