use clap::Parser;
use cms_scan::core::report;
use cms_scan::utils::{logger, validation::Validate};
use cms_scan::{CliConfig, LocalStorage, ScanEngine, ScanError, ScanPipeline};

fn fail(e: &ScanError) -> ! {
    tracing::error!(
        "❌ Scan failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("{}", e.user_friendly_message());
    std::process::exit(e.exit_code());
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting cms-scan for {}", cli.target);

    let config = match cli.into_scan_config() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };
    if let Err(e) = config.validate() {
        fail(&e);
    }

    let monitor_enabled = config.monitoring_enabled();
    if monitor_enabled {
        tracing::info!("🔍 Process monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_dir.clone());
    let pipeline = match ScanPipeline::new(storage, config) {
        Ok(pipeline) => pipeline,
        Err(e) => fail(&e),
    };
    let engine = ScanEngine::new_with_monitoring(pipeline, monitor_enabled);

    let outcome = match engine.run().await {
        Ok(outcome) => outcome,
        Err(e) => fail(&e),
    };

    println!("RESULTS:\n{}", report::render_console(&outcome.report)?);
    println!("Results saved to {}", outcome.output_path);
    tracing::info!("✅ Scan completed");

    Ok(())
}
