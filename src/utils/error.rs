use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum CartError {
    #[error("Promo code is empty")]
    CodeEmpty,

    #[error("Unknown promo code: {code}")]
    InvalidCode { code: String },

    #[error("Promo code has expired: {code}")]
    CodeExpired { code: String },

    #[error("Promo code cannot be entered directly: {code}")]
    NotApplicableViaCode { code: String },

    #[error("Promo code {code} does not apply to any item in the cart")]
    NoEligibleItems { code: String },

    #[error("Invalid quantity: {value} (must be at least 1)")]
    InvalidQuantity { value: u32 },

    #[error("Invalid override amount: {value} (must not be negative)")]
    InvalidOverrideAmount { value: Decimal },

    #[error("Cart item not found: {item_id}")]
    ItemNotFound { item_id: Uuid },

    #[error("Product not found in catalog: {product_id}")]
    ProductNotFound { product_id: String },

    #[error("Discount not found in registry: {discount_id}")]
    DiscountNotFound { discount_id: String },

    #[error("Discount {discount_id} is not selectable for this item")]
    DiscountNotSelectable { discount_id: String },

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Checkout hand-off failed: {message}")]
    CheckoutError { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Data,
    Network,
    Config,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CartError::CodeEmpty
            | CartError::InvalidCode { .. }
            | CartError::CodeExpired { .. }
            | CartError::NotApplicableViaCode { .. }
            | CartError::NoEligibleItems { .. }
            | CartError::InvalidQuantity { .. }
            | CartError::InvalidOverrideAmount { .. } => ErrorCategory::Validation,

            CartError::ItemNotFound { .. }
            | CartError::ProductNotFound { .. }
            | CartError::DiscountNotFound { .. }
            | CartError::DiscountNotSelectable { .. }
            | CartError::CsvError(_)
            | CartError::SerializationError(_) => ErrorCategory::Data,

            CartError::ApiError(_) => ErrorCategory::Network,

            CartError::ConfigError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => ErrorCategory::Config,

            CartError::IoError(_) | CartError::CheckoutError { .. } => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CartError::CodeEmpty => ErrorSeverity::Low,

            CartError::InvalidCode { .. }
            | CartError::CodeExpired { .. }
            | CartError::NotApplicableViaCode { .. }
            | CartError::NoEligibleItems { .. }
            | CartError::InvalidQuantity { .. }
            | CartError::InvalidOverrideAmount { .. }
            | CartError::ApiError(_) => ErrorSeverity::Medium,

            CartError::ItemNotFound { .. }
            | CartError::ProductNotFound { .. }
            | CartError::DiscountNotFound { .. }
            | CartError::DiscountNotSelectable { .. }
            | CartError::CsvError(_)
            | CartError::SerializationError(_)
            | CartError::ConfigError { .. }
            | CartError::InvalidConfigValueError { .. }
            | CartError::MissingConfigError { .. } => ErrorSeverity::High,

            CartError::IoError(_) | CartError::CheckoutError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CartError::CodeEmpty => "Please enter a promo code".to_string(),
            CartError::InvalidCode { .. } => "That promo code is not valid".to_string(),
            CartError::CodeExpired { .. } => "That promo code has expired".to_string(),
            CartError::NotApplicableViaCode { .. } => {
                "That offer is tied to a contract term and cannot be applied as a code".to_string()
            }
            CartError::NoEligibleItems { .. } => {
                "No items in the cart qualify for that code".to_string()
            }
            CartError::InvalidQuantity { value } => {
                format!("Quantity must be at least 1 (got {})", value)
            }
            CartError::InvalidOverrideAmount { value } => {
                format!("Override amount must not be negative (got {})", value)
            }
            CartError::ItemNotFound { .. } => "That line is no longer in the cart".to_string(),
            CartError::ProductNotFound { product_id } => {
                format!("Product '{}' is not in the catalog", product_id)
            }
            CartError::DiscountNotFound { discount_id } => {
                format!("Discount '{}' is not in the registry", discount_id)
            }
            CartError::DiscountNotSelectable { .. } => {
                "Contract offers are chosen through the term selector, not directly".to_string()
            }
            CartError::ApiError(_) => "Could not reach the CRM API".to_string(),
            CartError::CsvError(_) => "The catalog file could not be read".to_string(),
            CartError::IoError(_) => "A file operation failed".to_string(),
            CartError::SerializationError(_) => "Data could not be parsed".to_string(),
            CartError::CheckoutError { .. } => {
                "Checkout failed; the cart has been kept so you can retry".to_string()
            }
            CartError::ConfigError { message } => format!("Configuration problem: {}", message),
            CartError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            CartError::MissingConfigError { field } => {
                format!("Configuration field '{}' is required", field)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Validation => "Correct the input and try the action again".to_string(),
            ErrorCategory::Data => {
                "Check that the quote script matches the catalog and discount snapshots".to_string()
            }
            ErrorCategory::Network => {
                "Check the endpoint URL and network connectivity, then retry".to_string()
            }
            ErrorCategory::Config => "Fix the configuration file and rerun".to_string(),
            ErrorCategory::System => {
                "Check file permissions and available disk space, then retry".to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CartError>;
