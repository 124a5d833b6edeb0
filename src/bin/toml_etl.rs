use anyhow::Context;
use clap::Parser;
use ufo_etl::core::columns::inspect_header;
use ufo_etl::core::{ConfigProvider, Storage};
use ufo_etl::utils::{logger, validation::Validate};
use ufo_etl::{EtlEngine, LocalStorage, SightingPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-etl")]
#[command(about = "Convert UFO sightings CSV to JSON using a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "ufo-etl.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override extract.max_records from config
    #[arg(long)]
    limit: Option<usize>,

    /// Check the input header and show what would be written, without writing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-based ufo-etl");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(e.exit_code());
        }
    };

    // 應用命令列覆蓋設定
    if let Some(limit) = args.limit {
        tracing::info!("🔧 Record limit overridden to: {}", limit);
    }
    config.override_limit(args.limit);

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    display_config_summary(&config, &args);

    let storage = LocalStorage::default();

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        return perform_dry_run(&storage, &config).await;
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let pipeline = SightingPipeline::new(storage, config);
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ ETL process completed successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    match &config.pipeline.version {
        Some(version) => println!("  Pipeline: {} v{}", config.pipeline.name, version),
        None => println!("  Pipeline: {}", config.pipeline.name),
    }
    if let Some(description) = &config.pipeline.description {
        println!("  Description: {}", description);
    }
    println!("  Input: {}", config.input_path());
    println!("  Output: {}", config.output_path());
    if let Some(max_records) = config.max_records() {
        println!("  Max Records: {}", max_records);
    }
    println!("  Pretty JSON: {}", config.pretty());

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

async fn perform_dry_run(storage: &LocalStorage, config: &TomlConfig) -> anyhow::Result<()> {
    let bytes = storage
        .read_file(config.input_path())
        .await
        .with_context(|| format!("reading {}", config.input_path()))?;

    let report = inspect_header(&bytes).context("checking CSV header")?;
    println!("🔍 Dry Run Analysis:");
    println!("  Columns ({}):", report.columns.len());
    for column in &report.columns {
        println!("    {:?}", column);
    }
    println!("  Longitude column: {:?}", report.map.longitude);
    println!();
    println!("✅ Input header is usable. Run without --dry-run to write the JSON.");

    Ok(())
}
