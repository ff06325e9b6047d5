use clap::Parser;
use quote_cart::app::checkout::{render_quote, render_summary};
use quote_cart::app::replay;
use quote_cart::config::quote_config::QuoteConfig;
use quote_cart::utils::{logger, validation::Validate};
use quote_cart::CliConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting quote-cart CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 載入報價腳本
    let script = match QuoteConfig::from_file(&config.config) {
        Ok(script) => script,
        Err(e) => {
            tracing::error!("❌ Failed to load quote script: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 驗證腳本
    if let Err(e) = script.validate() {
        tracing::error!("❌ Quote script validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 顯示腳本摘要
    display_script_summary(&script, &config);

    match replay::run_script(&script, config.dry_run, config.output.as_deref()).await {
        Ok(outcome) => {
            tracing::info!("✅ Quote priced successfully!");

            println!(
                "{}",
                render_quote(&script.session.name, &outcome.breakdown, &outcome.aggregate)
            );

            if let Some(order) = &outcome.order {
                println!();
                println!("{}", render_summary(order));
                println!("📁 Order record saved to: {}", order_dir(&config, &script));
            } else if config.dry_run {
                println!("🔍 Dry run: no order record written");
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Quote replay failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            // 輸出用戶友好的錯誤信息
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                quote_cart::utils::error::ErrorSeverity::Low => 0, // 警告，但成功
                quote_cart::utils::error::ErrorSeverity::Medium => 2, // 重試錯誤
                quote_cart::utils::error::ErrorSeverity::High => 1, // 處理錯誤
                quote_cart::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_script_summary(script: &QuoteConfig, config: &CliConfig) {
    println!("📋 Quote Script Summary:");
    println!("  Session: {}", script.session.name);

    if let Some(description) = &script.session.description {
        println!("  Description: {}", description);
    }

    println!("  Catalog source: {}", script.catalog.r#type);
    println!("  Discount source: {}", script.discounts.r#type);
    println!("  Actions: {}", script.action.len());

    if script.checkout_enabled() {
        println!("  Checkout: enabled -> {}", order_dir(config, script));
    }

    if config.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn order_dir<'a>(config: &'a CliConfig, script: &'a QuoteConfig) -> &'a str {
    match &config.output {
        Some(dir) => dir,
        None => script.order_output_dir(),
    }
}
