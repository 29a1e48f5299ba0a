use crate::domain::model::{CmsInfo, CmsLookup, ScanReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn target(&self) -> &str;
    fn api_key(&self) -> &str;
    fn output_file(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn whatcms_endpoint(&self) -> &str;
    fn wordpress_version_endpoint(&self) -> &str;
    fn confidence_threshold(&self) -> f64;
    fn probe_timeout(&self) -> Duration;
    fn api_timeout(&self) -> Duration;
    fn user_agent(&self) -> &str;
}

/// 掃描的各個階段，由 `ScanEngine` 依序呼叫
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn resolve_target(&self) -> Result<String>;
    async fn identify(&self, target: &str) -> Result<CmsLookup>;
    async fn audit(&self, target: &str, cms: &CmsInfo, report: &mut ScanReport) -> Result<()>;
    async fn save(&self, report: &ScanReport) -> Result<String>;
    fn confidence_threshold(&self) -> f64;
}
