pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "cms-scan")]
#[command(about = "Security scan tool using WhatCMS API")]
pub struct CliConfig {
    /// Target domain or URL
    #[arg(long)]
    pub target: String,

    /// WhatCMS API key
    #[arg(long, env = "WHATCMS_API_KEY", hide_env_values = true)]
    pub apikey: Option<String>,

    /// Output file name for JSON results
    #[arg(long)]
    pub output: String,

    /// Directory the report files are written into
    #[arg(long, default_value = ".")]
    pub output_dir: String,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory usage per scan phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 合併命令列參數與設定檔
    pub fn into_scan_config(self) -> Result<ScanConfig> {
        let api_key = validation::validate_required_field("apikey", &self.apikey)?.clone();

        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading settings from: {}", path);
                TomlConfig::from_file(path)?
            }
            None => TomlConfig::default(),
        };
        if self.monitor {
            settings.monitoring.enabled = true;
        }

        Ok(ScanConfig::new(self.target, api_key, self.output)
            .with_output_dir(self.output_dir)
            .with_settings(settings))
    }
}

/// 一次掃描所需的完整設定
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub target: String,
    pub api_key: String,
    pub output_file: String,
    pub output_dir: String,
    pub settings: TomlConfig,
}

impl ScanConfig {
    pub fn new(
        target: impl Into<String>,
        api_key: impl Into<String>,
        output_file: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            api_key: api_key.into(),
            output_file: output_file.into(),
            output_dir: ".".to_string(),
            settings: TomlConfig::default(),
        }
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<String>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_settings(mut self, settings: TomlConfig) -> Self {
        self.settings = settings;
        self
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.settings.monitoring.enabled
    }

    pub fn output_path(&self) -> PathBuf {
        Path::new(&self.output_dir).join(&self.output_file)
    }
}

impl Validate for ScanConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("target", &self.target)?;
        validation::validate_non_empty_string("apikey", &self.api_key)?;
        validation::validate_path("output", &self.output_file)?;
        validation::validate_path("output_dir", &self.output_dir)?;
        self.settings.validate()
    }
}

impl ConfigProvider for ScanConfig {
    fn target(&self) -> &str {
        &self.target
    }

    fn api_key(&self) -> &str {
        &self.api_key
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }

    fn output_formats(&self) -> &[String] {
        &self.settings.output.formats
    }

    fn whatcms_endpoint(&self) -> &str {
        &self.settings.endpoints.whatcms
    }

    fn wordpress_version_endpoint(&self) -> &str {
        &self.settings.endpoints.wordpress_version_check
    }

    fn confidence_threshold(&self) -> f64 {
        self.settings.scan.confidence_threshold
    }

    fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.scan.probe_timeout_seconds)
    }

    fn api_timeout(&self) -> Duration {
        Duration::from_secs(self.settings.scan.api_timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.settings.scan.user_agent
    }
}
