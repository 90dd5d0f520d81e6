use clap::Parser;
use small_checkout::utils::error::{CheckoutError, ErrorSeverity};
use small_checkout::utils::{logger, validation::Validate};
use small_checkout::{compute_price, CatalogConfig, PriceQuote, PriceQuoteRequest};

#[derive(Debug, Parser)]
#[command(name = "small-checkout")]
#[command(about = "Price quote calculator for a home services storefront")]
struct Args {
    /// Catalog TOML file to price against
    #[arg(long, default_value = "catalog.toml")]
    catalog: String,

    /// Service type, e.g. home-regular
    #[arg(long)]
    service: String,

    /// Property size, e.g. medium
    #[arg(long)]
    size: String,

    /// Booking frequency, e.g. weekly
    #[arg(long)]
    frequency: String,

    /// Add-on service; repeat the flag for more than one
    #[arg(long = "add-on")]
    add_ons: Vec<String>,

    #[arg(long, help = "Print the quote as JSON")]
    json: bool,

    #[arg(long, help = "Enable verbose output")]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("Starting small-checkout quote");
    if args.verbose {
        tracing::debug!("CLI args: {:?}", args);
    }

    // 載入目錄配置
    let config = match CatalogConfig::from_file(&args.catalog) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Catalog validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    // 組合報價請求
    let request = PriceQuoteRequest {
        service_type: args.service.clone(),
        property_size: args.size.clone(),
        frequency: args.frequency.clone(),
        add_ons: args.add_ons.iter().cloned().collect(),
    };

    // 計算報價並輸出
    match compute_price(&request, &config.catalog) {
        Ok(quote) => {
            if args.json {
                println!("{}", serde_json::to_string_pretty(&quote)?);
            } else {
                print_quote(&request, &quote);
            }
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

fn print_quote(request: &PriceQuoteRequest, quote: &PriceQuote) {
    println!(
        "📋 Quote for {} ({}, {})",
        request.service_type, request.property_size, request.frequency
    );
    println!("  Base price:           {}", quote.base_price);
    println!("  Size adjusted:        {}", quote.size_adjusted_price);
    println!("  Frequency discount:  -{}", quote.frequency_discount_amount);
    println!("  Add-ons:             +{}", quote.add_on_total);
    println!("  Total:                {}", quote.total);

    for warning in &quote.warnings {
        println!("⚠️  {}", warning);
    }
}

fn fail(e: &CheckoutError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Quote failed: {} (Category: {:?}, Severity: {:?})",
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
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 重試錯誤
        ErrorSeverity::High => 1,     // 處理錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    };
    std::process::exit(exit_code);
}
