use serde::{Deserialize, Serialize};

/// WhatCMS 回傳的偵測結果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CmsInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    pub confidence: f64,
}

impl CmsInfo {
    pub fn kind(&self) -> CmsKind {
        self.name.as_deref().map(CmsKind::from_name).unwrap_or(CmsKind::Other)
    }

    /// `Detected CMS: <name> <version>`；信心值不足或沒有名稱時為 None
    pub fn detection_message(&self, threshold: f64) -> Option<String> {
        let name = self.name.as_deref()?;
        if self.confidence < threshold {
            return None;
        }
        Some(match self.version.as_deref() {
            Some(version) => format!("Detected CMS: {} {}", name, version),
            None => format!("Detected CMS: {}", name),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CmsLookup {
    Detected(CmsInfo),
    InvalidApiKey,
}

/// 有專屬檢查的 CMS；名稱需完全相符
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmsKind {
    WordPress,
    Joomla,
    Drupal,
    Other,
}

impl CmsKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "WordPress" => CmsKind::WordPress,
            "Joomla" => CmsKind::Joomla,
            "Drupal" => CmsKind::Drupal,
            _ => CmsKind::Other,
        }
    }
}

pub const INVALID_API_KEY_MESSAGE: &str = "Invalid API key";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    pub target: String,
    pub messages: Vec<String>,
}

impl ScanReport {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            messages: Vec::new(),
        }
    }

    pub fn invalid_api_key(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            messages: vec![INVALID_API_KEY_MESSAGE.to_string()],
        }
    }

    /// 加入訊息並同步輸出到 console
    pub fn push(&mut self, message: impl Into<String>) {
        let message = message.into();
        println!("{}", message);
        self.messages.push(message);
    }

    pub fn extend(&mut self, messages: impl IntoIterator<Item = String>) {
        for message in messages {
            self.push(message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(name: Option<&str>, version: Option<&str>, confidence: f64) -> CmsInfo {
        CmsInfo {
            name: name.map(str::to_string),
            version: version.map(str::to_string),
            confidence,
        }
    }

    #[test]
    fn test_detection_message_with_and_without_version() {
        assert_eq!(
            info(Some("WordPress"), Some("6.4.2"), 100.0).detection_message(80.0),
            Some("Detected CMS: WordPress 6.4.2".to_string())
        );
        assert_eq!(
            info(Some("Drupal"), None, 80.0).detection_message(80.0),
            Some("Detected CMS: Drupal".to_string())
        );
    }

    #[test]
    fn test_detection_message_requires_name_and_confidence() {
        assert_eq!(info(Some("Joomla"), None, 79.9).detection_message(80.0), None);
        assert_eq!(info(None, Some("1.0"), 100.0).detection_message(80.0), None);
    }

    #[test]
    fn test_kind_matches_exact_names_only() {
        assert_eq!(info(Some("WordPress"), None, 0.0).kind(), CmsKind::WordPress);
        assert_eq!(info(Some("wordpress"), None, 0.0).kind(), CmsKind::Other);
        assert_eq!(info(None, None, 0.0).kind(), CmsKind::Other);
    }

    #[test]
    fn test_report_keeps_insertion_order() {
        let mut report = ScanReport::new("https://example.com");
        report.push("first");
        report.extend(vec!["second".to_string(), "third".to_string()]);
        assert_eq!(report.messages, vec!["first", "second", "third"]);
    }
}
