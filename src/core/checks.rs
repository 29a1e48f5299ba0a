use crate::core::target::join_path;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

pub const WP_README_EXPOSED: &str = "readme.html is accessible – version disclosure risk";
pub const WP_CONFIG_EXPOSED: &str = "wp-config.php is accessible – critical security risk";
pub const JOOMLA_CONFIG_EXPOSED: &str =
    "configuration.php is accessible – sensitive data exposure risk";
pub const JOOMLA_ADMIN_EXPOSED: &str =
    "/administrator/ directory is accessible – check access restrictions";
pub const DRUPAL_CHANGELOG_EXPOSED: &str = "CHANGELOG.txt is accessible – version disclosure risk";
pub const MISSING_CSP: &str = "Missing Content-Security-Policy header";
pub const MISSING_FRAME_OPTIONS: &str = "Missing X-Frame-Options header";

/// 帶逾時設定的 GET 探測
#[derive(Clone)]
pub struct Prober {
    client: Client,
    timeout: Duration,
}

impl Prober {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// 狀態碼剛好為 200 才算可存取；連線錯誤視為不可存取
    pub async fn is_accessible(&self, url: &str) -> bool {
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => {
                tracing::debug!("GET {} -> {}", url, response.status());
                response.status() == StatusCode::OK
            }
            Err(e) => {
                tracing::debug!("GET {} failed: {}", url, e);
                false
            }
        }
    }

    pub async fn fetch_headers(&self, url: &str) -> Option<HeaderMap> {
        match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) => Some(response.headers().clone()),
            Err(e) => {
                tracing::debug!("GET {} failed: {}", url, e);
                None
            }
        }
    }

    pub async fn fetch_json(&self, url: &str) -> Option<Value> {
        let response = match self.client.get(url).timeout(self.timeout).send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                tracing::debug!("GET {} -> {}", url, response.status());
                return None;
            }
            Err(e) => {
                tracing::debug!("GET {} failed: {}", url, e);
                return None;
            }
        };

        match response.json::<Value>().await {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::debug!("GET {} returned invalid JSON: {}", url, e);
                None
            }
        }
    }
}

pub async fn check_wordpress(
    prober: &Prober,
    target: &str,
    version: Option<&str>,
    version_check_endpoint: &str,
) -> Vec<String> {
    let readme_url = join_path(target, "readme.html");
    let config_url = join_path(target, "wp-config.php");
    let (readme, config) = tokio::join!(
        prober.is_accessible(&readme_url),
        prober.is_accessible(&config_url)
    );

    let mut messages = Vec::new();
    if readme {
        messages.push(WP_README_EXPOSED.to_string());
    }
    if config {
        messages.push(WP_CONFIG_EXPOSED.to_string());
    }

    if let Some(version) = version {
        match latest_wordpress_version(prober, version_check_endpoint).await {
            Some(latest) if latest != version => messages.push(format!(
                "WordPress version ({}) is outdated. Latest: {}",
                version, latest
            )),
            Some(_) => tracing::debug!("WordPress {} is current", version),
            None => tracing::warn!("⚠️ Could not determine latest WordPress version"),
        }
    }

    messages
}

/// 讀取 `offers[0].current`
pub async fn latest_wordpress_version(prober: &Prober, endpoint: &str) -> Option<String> {
    let data = prober.fetch_json(endpoint).await?;
    data.get("offers")?
        .get(0)?
        .get("current")?
        .as_str()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

pub async fn check_joomla(prober: &Prober, target: &str) -> Vec<String> {
    let config_url = join_path(target, "configuration.php");
    let admin_url = join_path(target, "administrator/");
    let (config, admin) = tokio::join!(
        prober.is_accessible(&config_url),
        prober.is_accessible(&admin_url)
    );

    let mut messages = Vec::new();
    if config {
        messages.push(JOOMLA_CONFIG_EXPOSED.to_string());
    }
    if admin {
        messages.push(JOOMLA_ADMIN_EXPOSED.to_string());
    }
    messages
}

pub async fn check_drupal(prober: &Prober, target: &str) -> Vec<String> {
    let changelog_url = join_path(target, "CHANGELOG.txt");
    if prober.is_accessible(&changelog_url).await {
        vec![DRUPAL_CHANGELOG_EXPOSED.to_string()]
    } else {
        Vec::new()
    }
}

/// 任何狀態碼都檢查；連線失敗則不產生訊息
pub async fn check_security_headers(prober: &Prober, target: &str) -> Vec<String> {
    let Some(headers) = prober.fetch_headers(target).await else {
        return Vec::new();
    };
    missing_security_headers(&headers)
}

pub fn missing_security_headers(headers: &HeaderMap) -> Vec<String> {
    let mut messages = Vec::new();
    if !headers.contains_key("content-security-policy") {
        messages.push(MISSING_CSP.to_string());
    }
    if !headers.contains_key("x-frame-options") {
        messages.push(MISSING_FRAME_OPTIONS.to_string());
    }
    messages
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use reqwest::header::HeaderValue;
    use serde_json::json;

    fn prober() -> Prober {
        Prober::new(Client::new(), Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_wordpress_exposures_and_outdated_version() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/readme.html");
            then.status(200).body("<h1>WordPress</h1>");
        });
        server.mock(|when, then| {
            when.method(GET).path("/wp-config.php");
            then.status(200).body("");
        });
        server.mock(|when, then| {
            when.method(GET).path("/version-check/1.7/");
            then.status(200)
                .json_body(json!({"offers": [{"response": "upgrade", "current": "6.6.2"}]}));
        });

        let messages = check_wordpress(
            &prober(),
            &server.base_url(),
            Some("6.4.2"),
            &server.url("/version-check/1.7/"),
        )
        .await;

        assert_eq!(
            messages,
            vec![
                WP_README_EXPOSED.to_string(),
                WP_CONFIG_EXPOSED.to_string(),
                "WordPress version (6.4.2) is outdated. Latest: 6.6.2".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_wordpress_current_version_without_exposures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/readme.html");
            then.status(403);
        });
        let version_mock = server.mock(|when, then| {
            when.method(GET).path("/version-check");
            then.status(200).json_body(json!({"offers": [{"current": "6.6.2"}]}));
        });

        let messages = check_wordpress(
            &prober(),
            &server.base_url(),
            Some("6.6.2"),
            &server.url("/version-check"),
        )
        .await;

        version_mock.assert();
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_wordpress_version_check_skipped_without_version() {
        let server = MockServer::start();
        let version_mock = server.mock(|when, then| {
            when.method(GET).path("/version-check");
            then.status(200).json_body(json!({"offers": [{"current": "6.6.2"}]}));
        });

        let messages =
            check_wordpress(&prober(), &server.base_url(), None, &server.url("/version-check"))
                .await;

        version_mock.assert_hits(0);
        assert!(messages.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_version_feed_is_ignored() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/version-check");
            then.status(200).json_body(json!({"offers": []}));
        });

        let latest = latest_wordpress_version(&prober(), &server.url("/version-check")).await;
        assert_eq!(latest, None);
    }

    #[tokio::test]
    async fn test_joomla_checks_keep_order() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/configuration.php");
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(GET).path("/administrator/");
            then.status(200).body("login");
        });

        let messages = check_joomla(&prober(), &format!("{}/", server.base_url())).await;
        assert_eq!(
            messages,
            vec![
                JOOMLA_CONFIG_EXPOSED.to_string(),
                JOOMLA_ADMIN_EXPOSED.to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_drupal_missing_changelog() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/CHANGELOG.txt");
            then.status(404);
        });

        assert!(check_drupal(&prober(), &server.base_url()).await.is_empty());
    }

    #[tokio::test]
    async fn test_security_headers_on_error_page() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(500).header("x-frame-options", "DENY");
        });

        let messages = check_security_headers(&prober(), &server.base_url()).await;
        assert_eq!(messages, vec![MISSING_CSP.to_string()]);
    }

    #[tokio::test]
    async fn test_security_headers_unreachable_target() {
        let prober = Prober::new(Client::new(), Duration::from_secs(1));
        let messages = check_security_headers(&prober, "http://127.0.0.1:1").await;
        assert!(messages.is_empty());
    }

    #[test]
    fn test_missing_security_headers_only_reports_absent() {
        let mut headers = HeaderMap::new();
        assert_eq!(missing_security_headers(&headers).len(), 2);

        headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
        assert_eq!(missing_security_headers(&headers), vec![MISSING_CSP.to_string()]);

        headers.insert(
            "content-security-policy",
            HeaderValue::from_static("default-src 'self'"),
        );
        headers.insert("x-frame-options", HeaderValue::from_static("SAMEORIGIN"));
        assert!(missing_security_headers(&headers).is_empty());
    }
}
