use anyhow::Context;
use clap::Parser;
use small_checkout::config::catalog_config::CatalogConfig;
use small_checkout::core::replay::{ReplayEngine, ReplayOp};
use small_checkout::domain::model::CartTotals;
use small_checkout::utils::{logger, validation::Validate};
use small_checkout::{CartState, FileCartStore};

#[derive(Parser)]
#[command(name = "cart-replay")]
#[command(about = "Replays a recorded cart operation file and reports the totals")]
struct Args {
    /// Path to the catalog TOML file
    #[arg(short, long, default_value = "catalog.toml")]
    catalog: String,

    /// Path to the JSON operation file to replay
    #[arg(short, long)]
    ops: String,

    /// JSON file to restore the cart from and save it back to
    #[arg(long)]
    store: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - list the operations without applying them
    #[arg(long)]
    dry_run: bool,

    /// Print the resulting totals as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting cart replay tool");
    tracing::info!("📁 Loading catalog from: {}", args.catalog);

    // 載入 TOML 配置
    let config = match CatalogConfig::from_file(&args.catalog) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load catalog file '{}': {}", args.catalog, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Catalog validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 載入操作檔
    let ops = match load_ops(&args.ops) {
        Ok(ops) => ops,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            eprintln!("💡 Expected a JSON array of cart operations");
            std::process::exit(1);
        }
    };

    tracing::info!("✅ Loaded {} operation(s)", ops.len());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No operations will be applied");
        perform_dry_run(&ops);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 建立存儲與重放引擎
    let store = args.store.as_deref().map(FileCartStore::new);
    if let Some(path) = &args.store {
        tracing::info!("📁 Cart store: {}", path);
    }

    let mut cart = CartState::new(config.cart.clone());
    let engine = ReplayEngine::new_with_monitoring(store, monitor_enabled);

    match engine.run(&mut cart, ops).await {
        Ok(totals) => {
            tracing::info!("✅ Replay completed successfully!");
            if args.json {
                println!("{}", serde_json::to_string_pretty(&totals)?);
            } else {
                println!("✅ Replay completed successfully!");
                print_totals(&totals);
            }
        }
        Err(e) => {
            // 記錄詳細錯誤信息
            tracing::error!(
                "❌ Replay failed: {} (Category: {:?}, Severity: {:?})",
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
                small_checkout::utils::error::ErrorSeverity::Low => 0, // 警告，但成功
                small_checkout::utils::error::ErrorSeverity::Medium => 2, // 重試錯誤
                small_checkout::utils::error::ErrorSeverity::High => 1, // 處理錯誤
                small_checkout::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn load_ops(path: &str) -> anyhow::Result<Vec<ReplayOp>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read operation file '{}'", path))?;
    let ops = serde_json::from_str(&content)
        .with_context(|| format!("operation file '{}' is not valid JSON", path))?;
    Ok(ops)
}

fn perform_dry_run(ops: &[ReplayOp]) {
    println!("🔍 Dry Run Analysis:");
    println!();
    println!("  Operations in file: {}", ops.len());
    println!();

    // 操作清單分析
    for (index, op) in ops.iter().enumerate() {
        println!("  {}. {}", index + 1, describe(op));
    }

    println!();
    println!("✅ Dry run analysis complete. Drop --dry-run to apply.");
}

fn describe(op: &ReplayOp) -> String {
    match op {
        ReplayOp::AddItem { line } => format!(
            "add {} x{} @ {} (vendor {})",
            line.product_id, line.quantity, line.unit_price, line.vendor_id
        ),
        ReplayOp::RemoveItem { product_id, .. } => format!("remove {}", product_id),
        ReplayOp::UpdateQuantity {
            product_id,
            quantity,
            ..
        } => format!("set {} quantity to {}", product_id, quantity),
        ReplayOp::ApplyCoupon { coupon } => format!("apply coupon {}", coupon.code),
        ReplayOp::RemoveCoupon => "remove coupon".to_string(),
        ReplayOp::Clear => "clear cart".to_string(),
    }
}

fn print_totals(totals: &CartTotals) {
    println!("📊 Cart Totals:");
    println!("  Items:       {}", totals.item_count);
    println!("  Subtotal:    {}", totals.subtotal);
    println!("  Shipping:    {}", totals.shipping_fee);
    println!("  Tax:         {}", totals.tax_amount);
    println!("  Discount:   -{}", totals.discount_amount);
    println!("  Grand total: {}", totals.grand_total);
}
