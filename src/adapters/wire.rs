use crate::domain::model::{
    BillingCycle, ContractEffect, Discount, DiscountKind, Product, ProductScope, TermLength,
};
use crate::utils::error::{CartError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Catalog row as the CRM backend publishes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub billing_cycle: BillingCycle,
}

impl ProductRecord {
    pub fn into_product(self) -> Product {
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            billing_cycle: self.billing_cycle,
        }
    }
}

/// Discount row in the legacy CRM shape: a `type` string, one untyped
/// `value`, and a product list carrying the `"ALL"` sentinel. The legacy
/// convention that a CONTRACT discount named with "free" means months-free
/// (any other name means percent-off) is resolved here, once, at import.
/// Pricing only ever sees the tagged [`ContractEffect`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(rename = "type")]
    pub discount_type: String,
    pub value: Decimal,
    #[serde(default)]
    pub contract_term: Option<u32>,
    #[serde(default = "all_products")]
    pub applicable_product_ids: Vec<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

fn all_products() -> Vec<String> {
    vec!["ALL".to_string()]
}

impl DiscountRecord {
    pub fn into_discount(self) -> Result<Discount> {
        let scope = if self.applicable_product_ids.iter().any(|id| id == "ALL") {
            ProductScope::All
        } else {
            ProductScope::Only(self.applicable_product_ids.iter().cloned().collect())
        };

        let kind = match self.discount_type.as_str() {
            "PERCENTAGE" => DiscountKind::Percentage {
                percent: self.value,
            },
            "CONTRACT" => DiscountKind::Contract {
                effect: contract_effect(&self.name, self.value)?,
                term: match self.contract_term {
                    Some(months) => Some(term_length(months)?),
                    None => None,
                },
            },
            "CUSTOM" => DiscountKind::Custom { value: self.value },
            "TRIAL_EXTENSION" => DiscountKind::TrialExtension {
                months: whole_months("value", self.value)?,
            },
            "FIXED_AMOUNT" => DiscountKind::FixedAmount { amount: self.value },
            other => {
                return Err(CartError::InvalidConfigValueError {
                    field: "type".to_string(),
                    value: other.to_string(),
                    reason: "unknown discount type".to_string(),
                })
            }
        };

        Ok(Discount {
            id: self.id,
            name: self.name,
            code: self.code,
            kind,
            scope,
            expires_at: self.expires_at,
        })
    }
}

// 「名稱含 free 即為免月數」的舊約定只在匯入時判讀一次
fn contract_effect(name: &str, value: Decimal) -> Result<ContractEffect> {
    if name.to_lowercase().contains("free") {
        Ok(ContractEffect::FreeMonths(whole_months("value", value)?))
    } else {
        Ok(ContractEffect::PercentOff(value))
    }
}

fn term_length(months: u32) -> Result<TermLength> {
    TermLength::from_months(months).ok_or_else(|| CartError::InvalidConfigValueError {
        field: "contractTerm".to_string(),
        value: months.to_string(),
        reason: "contract term must be 6 or 12 months".to_string(),
    })
}

fn whole_months(field: &str, value: Decimal) -> Result<u32> {
    if value.fract() != Decimal::ZERO {
        return Err(CartError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "month count must be a whole number".to_string(),
        });
    }
    value
        .to_u32()
        .ok_or_else(|| CartError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "month count out of range".to_string(),
        })
}
