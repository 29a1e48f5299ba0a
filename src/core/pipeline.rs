use crate::core::checks::{self, Prober};
use crate::core::report;
use crate::core::target::normalize_target;
use crate::core::whatcms::WhatCmsClient;
use crate::domain::model::{CmsInfo, CmsKind, CmsLookup, ScanReport};
use crate::domain::ports::{ConfigProvider, Scanner, Storage};
use crate::utils::error::Result;
use reqwest::Client;

/// 以 WhatCMS 偵測加上 HTTP 探測實作的掃描流程
pub struct ScanPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
    prober: Prober,
    whatcms: WhatCmsClient,
}

impl<S: Storage, C: ConfigProvider> ScanPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let client = Client::builder().user_agent(config.user_agent()).build()?;
        let prober = Prober::new(client.clone(), config.probe_timeout());
        let whatcms = WhatCmsClient::new(
            client.clone(),
            config.whatcms_endpoint(),
            config.api_key(),
            config.api_timeout(),
        );

        Ok(Self {
            storage,
            config,
            client,
            prober,
            whatcms,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Scanner for ScanPipeline<S, C> {
    async fn resolve_target(&self) -> Result<String> {
        normalize_target(&self.client, self.config.target(), self.config.probe_timeout()).await
    }

    async fn identify(&self, target: &str) -> Result<CmsLookup> {
        self.whatcms.lookup(target).await
    }

    async fn audit(&self, target: &str, cms: &CmsInfo, report: &mut ScanReport) -> Result<()> {
        match cms.kind() {
            CmsKind::WordPress => {
                println!("Starting WordPress security checks...");
                let messages = checks::check_wordpress(
                    &self.prober,
                    target,
                    cms.version.as_deref(),
                    self.config.wordpress_version_endpoint(),
                )
                .await;
                report.extend(messages);
            }
            CmsKind::Joomla => {
                println!("Starting Joomla security checks...");
                report.extend(checks::check_joomla(&self.prober, target).await);
            }
            CmsKind::Drupal => {
                println!("Starting Drupal security checks...");
                report.extend(checks::check_drupal(&self.prober, target).await);
            }
            CmsKind::Other => {
                tracing::debug!("No CMS-specific checks for {:?}", cms.name);
            }
        }

        println!("Checking common security headers...");
        report.extend(checks::check_security_headers(&self.prober, target).await);
        Ok(())
    }

    async fn save(&self, scan_report: &ScanReport) -> Result<String> {
        let mut saved_path = None;

        for format in self.config.output_formats() {
            let path = match format.as_str() {
                "csv" => {
                    let data = report::render_csv(scan_report)?;
                    let name = report::csv_file_name(self.config.output_file());
                    self.storage.write_file(&name, &data).await?
                }
                _ => {
                    let data = report::render_json(scan_report, report::FILE_INDENT)?;
                    self.storage
                        .write_file(self.config.output_file(), &data)
                        .await?
                }
            };
            tracing::debug!("Wrote {} report to {}", format, path);

            // JSON 檔優先作為回傳路徑
            if format == "json" || saved_path.is_none() {
                saved_path = Some(path);
            }
        }

        Ok(saved_path.unwrap_or_default())
    }

    fn confidence_threshold(&self) -> f64 {
        self.config.confidence_threshold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use crate::config::ScanConfig;
    use httpmock::prelude::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(format!("mock://{}", path))
        }
    }

    fn config_for(server: &MockServer, formats: &[&str]) -> ScanConfig {
        config_with_output(server, formats, "scan.json")
    }

    fn config_with_output(server: &MockServer, formats: &[&str], output: &str) -> ScanConfig {
        let mut settings = TomlConfig::default();
        settings.endpoints.whatcms = server.url("/APIEndpoint");
        settings.endpoints.wordpress_version_check = server.url("/version-check");
        settings.output.formats = formats.iter().map(|f| f.to_string()).collect();
        ScanConfig::new(server.base_url(), "secret", output).with_settings(settings)
    }

    #[tokio::test]
    async fn test_audit_runs_joomla_then_header_checks() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/administrator/");
            then.status(200);
        });
        server.mock(|when, then| {
            when.method(GET).path("/");
            then.status(200)
                .header("content-security-policy", "default-src 'self'");
        });

        let pipeline = ScanPipeline::new(MockStorage::new(), config_for(&server, &["json"])).unwrap();
        let cms = CmsInfo {
            name: Some("Joomla".to_string()),
            version: None,
            confidence: 10.0,
        };
        let mut report = ScanReport::new(server.base_url());
        pipeline
            .audit(&server.base_url(), &cms, &mut report)
            .await
            .unwrap();

        assert_eq!(
            report.messages,
            vec![
                checks::JOOMLA_ADMIN_EXPOSED.to_string(),
                checks::MISSING_FRAME_OPTIONS.to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_save_writes_json_and_csv() {
        let server = MockServer::start();
        let storage = MockStorage::new();
        let pipeline =
            ScanPipeline::new(storage.clone(), config_for(&server, &["csv", "json"])).unwrap();

        let mut report = ScanReport::new("https://example.com");
        report.push("Missing X-Frame-Options header");
        let path = pipeline.save(&report).await.unwrap();

        assert_eq!(path, "mock://scan.json");
        let json = storage.get_file("scan.json").await.unwrap();
        let parsed: ScanReport = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed, report);

        let csv = String::from_utf8(storage.get_file("scan.csv").await.unwrap()).unwrap();
        assert!(csv.contains("0,Missing X-Frame-Options header"));
    }

    #[tokio::test]
    async fn test_csv_named_output_keeps_json_report() {
        let server = MockServer::start();
        let storage = MockStorage::new();
        let pipeline = ScanPipeline::new(
            storage.clone(),
            config_with_output(&server, &["json", "csv"], "report.csv"),
        )
        .unwrap();

        let mut report = ScanReport::new("https://example.com");
        report.push("Missing X-Frame-Options header");
        let path = pipeline.save(&report).await.unwrap();

        assert_eq!(path, "mock://report.csv");
        let json = storage.get_file("report.csv").await.unwrap();
        let parsed: ScanReport = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed, report);

        let csv = String::from_utf8(storage.get_file("report.messages.csv").await.unwrap()).unwrap();
        assert!(csv.starts_with("index,message\n"));
    }
}
