use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// 兩種 scheme 都無法連線
    #[error("Connection Error: could not reach {target} over http or https")]
    ConnectionError { target: String },

    #[error("API request failed: {message}")]
    ApiUnreachable { message: String },

    #[error("API request failed with status {status}")]
    ApiRequestFailed { status: u16 },

    #[error("Unexpected API response: {message}")]
    ApiResponseError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Api,
    Configuration,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScanError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScanError::HttpError(_) | ScanError::ConnectionError { .. } => ErrorCategory::Network,
            ScanError::ApiUnreachable { .. }
            | ScanError::ApiRequestFailed { .. }
            | ScanError::ApiResponseError { .. } => ErrorCategory::Api,
            ScanError::ConfigValidationError { .. }
            | ScanError::InvalidConfigValueError { .. }
            | ScanError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ScanError::CsvError(_) | ScanError::IoError(_) | ScanError::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 暫時性網路錯誤，重試可能成功
            ScanError::HttpError(_) => ErrorSeverity::Medium,
            ScanError::ConnectionError { .. }
            | ScanError::ApiUnreachable { .. }
            | ScanError::ApiRequestFailed { .. }
            | ScanError::ApiResponseError { .. }
            | ScanError::ConfigValidationError { .. }
            | ScanError::InvalidConfigValueError { .. }
            | ScanError::MissingConfigError { .. } => ErrorSeverity::High,
            ScanError::CsvError(_) | ScanError::IoError(_) | ScanError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ScanError::HttpError(_) => {
                "Check network connectivity and retry the scan".to_string()
            }
            ScanError::ConnectionError { target } => format!(
                "Verify that '{}' resolves and answers on port 80 or 443",
                target
            ),
            ScanError::ApiUnreachable { .. } => {
                "Check connectivity to the WhatCMS endpoint and api_timeout_seconds".to_string()
            }
            ScanError::ApiRequestFailed { status } => format!(
                "WhatCMS answered HTTP {}; check the API key quota and endpoint",
                status
            ),
            ScanError::ApiResponseError { .. } => {
                "The WhatCMS endpoint did not return JSON; check endpoints.whatcms".to_string()
            }
            ScanError::ConfigValidationError { field, .. }
            | ScanError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
            ScanError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the config file", field)
            }
            ScanError::CsvError(_) | ScanError::IoError(_) | ScanError::SerializationError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ScanError::ConnectionError { .. } => "Connection Error".to_string(),
            ScanError::ApiUnreachable { .. } | ScanError::ApiRequestFailed { .. } => {
                "API request failed".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;
