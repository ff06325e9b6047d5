use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillingCycle {
    #[serde(rename = "MONTHLY")]
    Monthly,
    #[serde(rename = "YEARLY")]
    Yearly,
    #[serde(rename = "ONE_TIME")]
    OneTime,
    #[serde(rename = "EVERY_28_DAYS")]
    Every28Days,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TermLength {
    #[serde(rename = "6_MONTHS")]
    Six,
    #[serde(rename = "12_MONTHS")]
    Twelve,
}

impl TermLength {
    pub fn months(&self) -> u32 {
        match self {
            TermLength::Six => 6,
            TermLength::Twelve => 12,
        }
    }

    pub fn from_months(months: u32) -> Option<TermLength> {
        match months {
            6 => Some(TermLength::Six),
            12 => Some(TermLength::Twelve),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub billing_cycle: BillingCycle,
}

/// How a contract offer reduces the price. Decided when the discount is
/// authored; never re-derived from the display name at pricing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContractEffect {
    FreeMonths(u32),
    PercentOff(Decimal),
}

impl ContractEffect {
    /// Raw magnitude used by the selection tie-break. Free-months counts
    /// and percentages compare on the same axis, as authored.
    pub fn value(&self) -> Decimal {
        match self {
            ContractEffect::FreeMonths(n) => Decimal::from(*n),
            ContractEffect::PercentOff(pct) => *pct,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DiscountKind {
    Percentage { percent: Decimal },
    Contract {
        effect: ContractEffect,
        term: Option<TermLength>,
    },
    Custom { value: Decimal },
    TrialExtension { months: u32 },
    FixedAmount { amount: Decimal },
}

impl DiscountKind {
    pub fn is_contract(&self) -> bool {
        matches!(self, DiscountKind::Contract { .. })
    }
}

/// Which products an offer covers: everything, or an explicit id set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProductScope {
    All,
    Only(HashSet<String>),
}

impl ProductScope {
    pub fn covers(&self, product_id: &str) -> bool {
        match self {
            ProductScope::All => true,
            ProductScope::Only(ids) => ids.contains(product_id),
        }
    }

    pub fn is_specific(&self) -> bool {
        matches!(self, ProductScope::Only(_))
    }

    /// Authoring helper: flip a product id in or out of the scope.
    /// Toggling on an `All` scope narrows it to just that product.
    pub fn toggle_product(&mut self, product_id: &str) {
        match self {
            ProductScope::All => {
                let mut ids = HashSet::new();
                ids.insert(product_id.to_string());
                *self = ProductScope::Only(ids);
            }
            ProductScope::Only(ids) => {
                if !ids.remove(product_id) {
                    ids.insert(product_id.to_string());
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Discount {
    pub id: String,
    pub name: String,
    pub code: String,
    pub kind: DiscountKind,
    pub scope: ProductScope,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Discount {
    pub fn is_expired(&self, as_of: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => expires_at < as_of,
            None => false,
        }
    }
}

/// The one pricing mechanism active on a cart line. Replaces three
/// independently-optional fields (attached discount, contract term,
/// override amount) whose consistency would otherwise rest on call-site
/// discipline. An override remembers a committed term so the term survives
/// into the order record and keeps promo codes off the item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PricingMode {
    NoDiscount,
    Attached { discount_id: String },
    Contracted {
        term: TermLength,
        discount_id: Option<String>,
    },
    Overridden {
        amount: Decimal,
        term: Option<TermLength>,
    },
}

impl PricingMode {
    pub fn term(&self) -> Option<TermLength> {
        match self {
            PricingMode::Contracted { term, .. } => Some(*term),
            PricingMode::Overridden { term, .. } => *term,
            _ => None,
        }
    }

    pub fn discount_id(&self) -> Option<&str> {
        match self {
            PricingMode::Attached { discount_id } => Some(discount_id),
            PricingMode::Contracted { discount_id, .. } => discount_id.as_deref(),
            _ => None,
        }
    }

    pub fn override_amount(&self) -> Option<Decimal> {
        match self {
            PricingMode::Overridden { amount, .. } => Some(*amount),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: Uuid,
    pub product: Product,
    pub quantity: u32,
    pub pricing: PricingMode,
}

impl CartItem {
    pub fn new(product: Product) -> Self {
        CartItem {
            id: Uuid::new_v4(),
            product,
            quantity: 1,
            pricing: PricingMode::NoDiscount,
        }
    }

    pub fn item_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

/// Immutable-per-session product snapshot.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: HashMap<String, Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Catalog {
            products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn product(&self, id: &str) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

/// Immutable-per-session discount snapshot. Codes are stored as authored
/// (uppercase by CRM convention); lookup is exact.
#[derive(Debug, Clone, Default)]
pub struct DiscountRegistry {
    discounts: Vec<Discount>,
}

impl DiscountRegistry {
    pub fn new(discounts: Vec<Discount>) -> Self {
        DiscountRegistry { discounts }
    }

    pub fn discounts(&self) -> &[Discount] {
        &self.discounts
    }

    pub fn discount(&self, id: &str) -> Option<&Discount> {
        self.discounts.iter().find(|d| d.id == id)
    }

    pub fn discount_by_code(&self, code: &str) -> Option<&Discount> {
        self.discounts.iter().find(|d| d.code == code)
    }

    pub fn len(&self) -> usize {
        self.discounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }
}

/// Derived totals, recomputed on every read and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartAggregate {
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    pub final_total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineBreakdown {
    pub item_id: Uuid,
    pub product_name: String,
    pub quantity: u32,
    pub contract_term: Option<TermLength>,
    pub undiscounted_total: Decimal,
    pub discounted_total: Decimal,
    pub applied_discount_name: Option<String>,
}

/// Order record handed to the checkout collaborator. Amounts are rounded
/// to 2 dp here because this is a presentation artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub reference: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<LineBreakdown>,
    pub subtotal: Decimal,
    pub total_discount: Decimal,
    pub final_total: Decimal,
}
