use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::{PluginDescriptor, top_level_plugins};

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveConfig {
    pub host: HostConfig,
    pub ui: UiConfig,
    pub probe: ProbeConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
}

/// What the commands know about the application they report on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostConfig {
    pub package: PackageInfo,
    pub bugs: BugsConfig,
    pub plugins: Vec<PluginDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BugsConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UiConfig {
    pub color: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeConfig {
    pub timeout_secs: u64,
}

impl HostConfig {
    /// The configured tracker URL, or `None` when absent or blank.
    pub fn bugs_url(&self) -> Option<&str> {
        self.bugs
            .url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn top_level_plugins(&self) -> Vec<&PluginDescriptor> {
        top_level_plugins(&self.plugins)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        let name = env!("CARGO_PKG_NAME").to_string();
        let version = env!("CARGO_PKG_VERSION").to_string();
        Self {
            plugins: vec![PluginDescriptor::new(&name, &version, "core")],
            package: PackageInfo { name, version },
            bugs: BugsConfig::default(),
        }
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            host: HostConfig::default(),
            ui: UiConfig { color: true },
            probe: ProbeConfig { timeout_secs: 10 },
            config_path: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    package: Option<RawPackageConfig>,
    bugs: Option<RawBugsConfig>,
    plugins: Option<Vec<PluginDescriptor>>,
    ui: Option<RawUiConfig>,
    probe: Option<RawProbeConfig>,
}

#[derive(Debug, Deserialize)]
struct RawPackageConfig {
    name: Option<String>,
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawBugsConfig {
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawUiConfig {
    color: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct RawProbeConfig {
    timeout_secs: Option<u64>,
}

pub fn default_config_path(home_dir: &Path) -> PathBuf {
    home_dir.join(".config/devdiag/config.toml")
}

pub fn load(config_path: Option<&Path>, home_dir: &Path) -> Result<EffectiveConfig> {
    let mut cfg = EffectiveConfig::default();

    let path = config_path
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| default_config_path(home_dir));

    if path.exists() {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let raw: RawConfig = toml::from_str(&s).context("failed to parse config file (TOML)")?;
        apply_raw_config(&mut cfg, raw);
        cfg.config_path = Some(path.display().to_string());
    } else if config_path.is_some() {
        return Err(anyhow::anyhow!(
            "config file not found: {}",
            path.display()
        ));
    }

    apply_env_overrides(&mut cfg)?;

    Ok(cfg)
}

fn apply_raw_config(cfg: &mut EffectiveConfig, raw: RawConfig) {
    if let Some(package) = raw.package {
        if let Some(name) = package.name {
            cfg.host.package.name = name;
        }
        if let Some(version) = package.version {
            cfg.host.package.version = version;
        }
    }

    if let Some(bugs) = raw.bugs {
        cfg.host.bugs.url = bugs.url;
    }

    if let Some(plugins) = raw.plugins {
        cfg.host.plugins = plugins;
    }

    if let Some(ui) = raw.ui {
        if let Some(color) = ui.color {
            cfg.ui.color = color;
        }
    }

    if let Some(probe) = raw.probe {
        if let Some(timeout_secs) = probe.timeout_secs {
            cfg.probe.timeout_secs = timeout_secs;
        }
    }
}

fn apply_env_overrides(cfg: &mut EffectiveConfig) -> Result<()> {
    if let Ok(v) = std::env::var("DEVDIAG_PACKAGE_NAME") {
        let v = v.trim();
        if !v.is_empty() {
            cfg.host.package.name = v.to_string();
        }
    }
    if let Ok(v) = std::env::var("DEVDIAG_BUGS_URL") {
        cfg.host.bugs.url = Some(v.trim().to_string());
    }
    if let Ok(v) = std::env::var("DEVDIAG_UI_COLOR") {
        cfg.ui.color = parse_bool(&v).with_context(|| "DEVDIAG_UI_COLOR")?;
    }
    if let Ok(v) = std::env::var("DEVDIAG_PROBE_TIMEOUT_SECS") {
        cfg.probe.timeout_secs = v
            .trim()
            .parse::<u64>()
            .with_context(|| "DEVDIAG_PROBE_TIMEOUT_SECS")?;
    }

    Ok(())
}

fn parse_bool(s: &str) -> Result<bool> {
    let s = s.trim().to_ascii_lowercase();
    match s.as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(anyhow::anyhow!(
            "invalid boolean: {s} (expected true|false|1|0|yes|no|on|off)"
        )),
    }
}
