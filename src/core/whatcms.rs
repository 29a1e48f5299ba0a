use crate::domain::model::{CmsInfo, CmsLookup, INVALID_API_KEY_MESSAGE};
use crate::utils::error::{Result, ScanError};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

/// WhatCMS 偵測 API 客戶端
pub struct WhatCmsClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl WhatCmsClient {
    pub fn new(client: Client, endpoint: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    pub async fn lookup(&self, target: &str) -> Result<CmsLookup> {
        tracing::debug!("Making WhatCMS request for: {}", target);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("key", self.api_key.as_str()), ("url", target)])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ScanError::ApiUnreachable {
                message: e.to_string(),
            })?;

        tracing::debug!("WhatCMS response status: {}", response.status());
        if response.status() != StatusCode::OK {
            return Err(ScanError::ApiRequestFailed {
                status: response.status().as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScanError::ApiUnreachable {
                message: e.to_string(),
            })?;
        let data: Value = serde_json::from_str(&body).map_err(|e| ScanError::ApiResponseError {
            message: format!("invalid JSON body: {}", e),
        })?;

        Ok(parse_lookup(&data))
    }
}

/// 解析 WhatCMS 回應；欄位先讀最上層，缺少 name 時改讀 `result` 物件
pub fn parse_lookup(data: &Value) -> CmsLookup {
    let invalid_key = data
        .get("msg")
        .and_then(Value::as_str)
        .map(|msg| msg.contains(INVALID_API_KEY_MESSAGE))
        .unwrap_or(false);
    if invalid_key {
        return CmsLookup::InvalidApiKey;
    }

    let source = match data.get("name") {
        Some(name) if !name.is_null() => data,
        _ => data.get("result").filter(|r| r.is_object()).unwrap_or(data),
    };

    CmsLookup::Detected(CmsInfo {
        name: non_empty_string(source.get("name")),
        version: non_empty_string(source.get("version")),
        confidence: parse_confidence(source.get("confidence")),
    })
}

fn non_empty_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 接受數字或數字字串（可帶 `%`）；其餘視為 0
pub fn parse_confidence(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
