use crate::domain::model::{CartRules, PriceCatalog};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{CheckoutError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Store configuration as loaded from a catalog TOML file: the price
/// tables, the cart rules and optional submission / monitoring settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub catalog: PriceCatalog,
    pub cart: CartRules,
    pub submission: Option<SubmissionConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

/// Where and how bookings are submitted. Everything optional; without an
/// endpoint the simulated gateway is the only option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub simulated_delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl CatalogConfig {
    /// 從 TOML 檔案載入目錄配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckoutError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckoutError::ConfigParseError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CHECKOUT_ENDPOINT})，未定義的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        // 使用正規表達式匹配 ${VAR_NAME} 格式
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    ///
    /// The pricing engine itself never validates; a bad catalog must be
    /// rejected here, at load time.
    pub fn validate_config(&self) -> Result<()> {
        // 驗證價格表
        if self.catalog.base_prices.is_empty() {
            return Err(CheckoutError::MissingConfigError {
                field: "catalog.base_prices".to_string(),
            });
        }

        // 目錄表的鍵不可為空白
        for key in self.catalog.base_prices.keys() {
            validation::validate_non_empty_string("catalog.base_prices", key)?;
        }
        for key in self.catalog.add_on_prices.keys() {
            validation::validate_non_empty_string("catalog.add_on_prices", key)?;
        }

        // 驗證倍率與折扣
        for (key, multiplier) in &self.catalog.size_multipliers {
            validation::validate_non_empty_string("catalog.size_multipliers", key)?;
            validation::validate_rate(&format!("catalog.size_multipliers.{}", key), *multiplier)?;
        }
        for (key, multiplier) in &self.catalog.frequency_discounts {
            validation::validate_non_empty_string("catalog.frequency_discounts", key)?;
            validation::validate_rate(
                &format!("catalog.frequency_discounts.{}", key),
                *multiplier,
            )?;
        }

        // 驗證稅率
        validation::validate_range("cart.tax_rate", self.cart.tax_rate, 0.0, 1.0)?;

        // 驗證提交端點
        if let Some(endpoint) = self.submission_endpoint() {
            validation::validate_url("submission.endpoint", endpoint)?;
        }

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    /// 取得提交端點 (未設定時回傳 None)
    pub fn submission_endpoint(&self) -> Option<&str> {
        self.submission
            .as_ref()
            .and_then(|s| s.endpoint.as_deref())
            .filter(|endpoint| !endpoint.is_empty())
    }

    /// 取得提交逾時秒數
    pub fn timeout_seconds(&self) -> u64 {
        self.submission
            .as_ref()
            .and_then(|s| s.timeout_seconds)
            .unwrap_or(10)
    }

    /// 取得模擬提交的延遲毫秒數
    pub fn simulated_delay_ms(&self) -> u64 {
        self.submission
            .as_ref()
            .and_then(|s| s.simulated_delay_ms)
            .unwrap_or(800)
    }
}

impl CatalogSource for CatalogConfig {
    fn catalog(&self) -> &PriceCatalog {
        &self.catalog
    }

    fn cart_rules(&self) -> &CartRules {
        &self.cart
    }
}

impl Validate for CatalogConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
