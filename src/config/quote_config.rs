use crate::adapters::wire::{DiscountRecord, ProductRecord};
use crate::domain::model::TermLength;
use crate::utils::error::{CartError, Result};
use crate::utils::validation::{
    self, validate_file_extension, validate_path, validate_required_field, validate_url, Validate,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A quote script: where the catalog and discount snapshots come from,
/// the cart actions to replay, and the optional checkout handoff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub session: SessionConfig,
    pub catalog: CatalogSourceConfig,
    pub discounts: DiscountSourceConfig,
    #[serde(default)]
    pub action: Vec<ActionConfig>,
    pub checkout: Option<CheckoutConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSourceConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub products: Option<Vec<ProductRecord>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscountSourceConfig {
    pub r#type: String,
    pub path: Option<String>,
    pub endpoint: Option<String>,
    pub discounts: Option<Vec<DiscountRecord>>,
}

/// One cart action. `op` decides which of the optional fields apply;
/// `line` addresses the cart 1-based in its current order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionConfig {
    pub op: String,
    pub line: Option<usize>,
    pub product: Option<String>,
    pub value: Option<u32>,
    pub months: Option<u32>,
    pub discount: Option<String>,
    pub code: Option<String>,
    pub amount: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub enabled: bool,
    pub output_dir: Option<String>,
}

const CATALOG_TYPES: [&str; 3] = ["csv", "http", "inline"];
const DISCOUNT_TYPES: [&str; 3] = ["json", "http", "inline"];
const ACTION_OPS: [&str; 8] = [
    "add",
    "remove",
    "quantity",
    "term",
    "attach",
    "code",
    "override",
    "clear-override",
];

impl QuoteConfig {
    /// 從 TOML 檔案載入報價腳本
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析報價腳本
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| CartError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CRM_API_URL})，找不到時保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    /// 驗證腳本的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("session.name", &self.session.name)?;

        self.validate_catalog_source()?;
        self.validate_discount_source()?;

        for (index, action) in self.action.iter().enumerate() {
            self.validate_action(index, action)?;
        }

        if let Some(checkout) = &self.checkout {
            if let Some(dir) = &checkout.output_dir {
                validate_path("checkout.output_dir", dir)?;
            }
        }

        Ok(())
    }

    fn validate_catalog_source(&self) -> Result<()> {
        match self.catalog.r#type.as_str() {
            "csv" => {
                let path = validate_required_field("catalog.path", &self.catalog.path)?;
                validate_file_extension("catalog.path", path, &["csv"])?;
            }
            "http" => {
                let endpoint = validate_required_field("catalog.endpoint", &self.catalog.endpoint)?;
                validate_url("catalog.endpoint", endpoint)?;
            }
            "inline" => {
                validate_required_field("catalog.products", &self.catalog.products)?;
            }
            other => {
                return Err(CartError::InvalidConfigValueError {
                    field: "catalog.type".to_string(),
                    value: other.to_string(),
                    reason: format!(
                        "Unsupported source. Valid types: {}",
                        CATALOG_TYPES.join(", ")
                    ),
                })
            }
        }
        Ok(())
    }

    fn validate_discount_source(&self) -> Result<()> {
        match self.discounts.r#type.as_str() {
            "json" => {
                let path = validate_required_field("discounts.path", &self.discounts.path)?;
                validate_file_extension("discounts.path", path, &["json"])?;
            }
            "http" => {
                let endpoint =
                    validate_required_field("discounts.endpoint", &self.discounts.endpoint)?;
                validate_url("discounts.endpoint", endpoint)?;
            }
            "inline" => {
                validate_required_field("discounts.discounts", &self.discounts.discounts)?;
            }
            other => {
                return Err(CartError::InvalidConfigValueError {
                    field: "discounts.type".to_string(),
                    value: other.to_string(),
                    reason: format!(
                        "Unsupported source. Valid types: {}",
                        DISCOUNT_TYPES.join(", ")
                    ),
                })
            }
        }
        Ok(())
    }

    fn validate_action(&self, index: usize, action: &ActionConfig) -> Result<()> {
        let field = |name: &str| format!("action[{}].{}", index, name);

        if !ACTION_OPS.contains(&action.op.as_str()) {
            return Err(CartError::InvalidConfigValueError {
                field: field("op"),
                value: action.op.clone(),
                reason: format!("Unknown op. Valid ops: {}", ACTION_OPS.join(", ")),
            });
        }

        match action.op.as_str() {
            "add" => {
                validate_required_field(&field("product"), &action.product)?;
            }
            "code" => {
                validate_required_field(&field("code"), &action.code)?;
            }
            "override" => {
                validate_required_field(&field("line"), &action.line)?;
                let amount = validate_required_field(&field("amount"), &action.amount)?;
                validation::validate_money_amount(&field("amount"), *amount)?;
            }
            "term" => {
                validate_required_field(&field("line"), &action.line)?;
                if let Some(months) = action.months {
                    if TermLength::from_months(months).is_none() {
                        return Err(CartError::InvalidConfigValueError {
                            field: field("months"),
                            value: months.to_string(),
                            reason: "contract term must be 6 or 12 months".to_string(),
                        });
                    }
                }
            }
            "quantity" => {
                validate_required_field(&field("line"), &action.line)?;
                validate_required_field(&field("value"), &action.value)?;
            }
            // remove / attach / clear-override 只需要行號
            _ => {
                validate_required_field(&field("line"), &action.line)?;
            }
        }

        Ok(())
    }

    pub fn checkout_enabled(&self) -> bool {
        self.checkout.as_ref().map(|c| c.enabled).unwrap_or(false)
    }

    pub fn order_output_dir(&self) -> &str {
        self.checkout
            .as_ref()
            .and_then(|c| c.output_dir.as_deref())
            .unwrap_or("./orders")
    }
}

impl Validate for QuoteConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
