use crate::domain::model::{CmsLookup, ScanReport};
use crate::domain::ports::Scanner;
use crate::utils::error::Result;
use crate::utils::monitor::ScanMonitor;

#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub report: ScanReport,
    pub output_path: String,
}

pub struct ScanEngine<S: Scanner> {
    scanner: S,
    monitor: ScanMonitor,
}

impl<S: Scanner> ScanEngine<S> {
    pub fn new(scanner: S) -> Self {
        Self::new_with_monitoring(scanner, false)
    }

    pub fn new_with_monitoring(scanner: S, monitor_enabled: bool) -> Self {
        Self {
            scanner,
            monitor: ScanMonitor::new(monitor_enabled),
        }
    }

    /// 執行掃描並保存報告，不輸出結果摘要
    pub async fn scan(&self) -> Result<ScanReport> {
        tracing::info!("🔎 Resolving target");
        let target = self.scanner.resolve_target().await?;
        self.monitor.log_stats("Resolve");

        tracing::info!("🧭 Identifying CMS for {}", target);
        let lookup = self.scanner.identify(&target).await?;
        self.monitor.log_stats("Identify");

        let cms = match lookup {
            CmsLookup::InvalidApiKey => {
                tracing::warn!("⚠️ WhatCMS rejected the API key, skipping checks");
                return Ok(ScanReport::invalid_api_key(target));
            }
            CmsLookup::Detected(cms) => cms,
        };
        tracing::debug!("WhatCMS result: {:?}", cms);

        let mut report = ScanReport::new(target.clone());
        if let Some(message) = cms.detection_message(self.scanner.confidence_threshold()) {
            report.push(message);
        }

        self.scanner.audit(&target, &cms, &mut report).await?;
        self.monitor.log_stats("Audit");

        tracing::info!("Scan finished with {} messages", report.messages.len());
        Ok(report)
    }

    pub async fn run(&self) -> Result<ScanOutcome> {
        let report = self.scan().await?;

        let output_path = self.scanner.save(&report).await?;
        self.monitor.log_final_stats();

        Ok(ScanOutcome {
            report,
            output_path,
        })
    }
}
