use crate::utils::error::{Result, ScanError};
use reqwest::Client;
use std::time::Duration;

const SCHEMES: [&str; 2] = ["http://", "https://"];

pub fn has_scheme(target: &str) -> bool {
    SCHEMES.iter().any(|scheme| target.starts_with(scheme))
}

/// 將網域轉為完整 URL。已帶 scheme 的直接回傳；否則依序嘗試 http、https，
/// 取第一個狀態碼小於 400 的。
pub async fn normalize_target(client: &Client, target: &str, timeout: Duration) -> Result<String> {
    if has_scheme(target) {
        return Ok(target.to_string());
    }

    for scheme in SCHEMES {
        let candidate = format!("{}{}", scheme, target);
        tracing::debug!("Probing {}", candidate);

        match client.get(&candidate).timeout(timeout).send().await {
            Ok(response) if response.status().as_u16() < 400 => {
                tracing::info!("🎯 Target resolved to {}", candidate);
                return Ok(candidate);
            }
            Ok(response) => {
                tracing::debug!("{} answered {}", candidate, response.status());
            }
            Err(e) => {
                tracing::debug!("{} unreachable: {}", candidate, e);
            }
        }
    }

    Err(ScanError::ConnectionError {
        target: target.to_string(),
    })
}

/// 以單一斜線連接目標與路徑
pub fn join_path(target: &str, path: &str) -> String {
    format!(
        "{}/{}",
        target.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
