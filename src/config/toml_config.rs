use crate::utils::error::{Result, ScanError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_WHATCMS_ENDPOINT: &str = "https://whatcms.org/APIEndpoint";
pub const DEFAULT_WORDPRESS_VERSION_ENDPOINT: &str =
    "https://api.wordpress.org/core/version-check/1.7/";
pub const SUPPORTED_OUTPUT_FORMATS: [&str; 2] = ["json", "csv"];

/// 可選的 TOML 設定檔；所有欄位皆有預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub scan: ScanSection,
    pub endpoints: EndpointsConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    pub confidence_threshold: f64,
    pub probe_timeout_seconds: u64,
    pub api_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            confidence_threshold: 80.0,
            probe_timeout_seconds: 5,
            api_timeout_seconds: 30,
            user_agent: format!("cms-scan/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointsConfig {
    pub whatcms: String,
    pub wordpress_version_check: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            whatcms: DEFAULT_WHATCMS_ENDPOINT.to_string(),
            wordpress_version_check: DEFAULT_WORDPRESS_VERSION_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub formats: Vec<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            formats: vec!["json".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(&path).map_err(|e| ScanError::ConfigValidationError {
                field: "config".to_string(),
                message: format!("cannot read {}: {}", path.as_ref().display(), e),
            })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ScanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${WHATCMS_API_KEY})；未定義的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ScanError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_range(
            "scan.confidence_threshold",
            self.scan.confidence_threshold,
            0.0,
            100.0,
        )?;
        validation::validate_positive_number(
            "scan.probe_timeout_seconds",
            self.scan.probe_timeout_seconds,
            1,
        )?;
        validation::validate_positive_number(
            "scan.api_timeout_seconds",
            self.scan.api_timeout_seconds,
            1,
        )?;
        validation::validate_non_empty_string("scan.user_agent", &self.scan.user_agent)?;

        validation::validate_url("endpoints.whatcms", &self.endpoints.whatcms)?;
        validation::validate_url(
            "endpoints.wordpress_version_check",
            &self.endpoints.wordpress_version_check,
        )?;

        if self.output.formats.is_empty() {
            return Err(ScanError::ConfigValidationError {
                field: "output.formats".to_string(),
                message: "At least one output format is required".to_string(),
            });
        }
        validation::validate_allowed_values(
            "output.formats",
            &self.output.formats,
            &SUPPORTED_OUTPUT_FORMATS,
        )
    }
}
