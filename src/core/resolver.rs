use crate::domain::model::{
    BillingCycle, CartItem, ContractEffect, Discount, DiscountKind, TermLength,
};
use rust_decimal::Decimal;

/// Resolved price for one cart line, with the rule and discount that won.
#[derive(Debug, Clone, PartialEq)]
pub struct LinePrice {
    pub total: Decimal,
    pub rule: &'static str,
    pub discount_name: Option<String>,
}

/// One precedence entry: a predicate and the price function that fires
/// when it is the first to match.
struct PricingRule {
    name: &'static str,
    uses_discount: bool,
    applies: fn(&CartItem, Option<&Discount>) -> bool,
    price: fn(&CartItem, Option<&Discount>) -> Decimal,
}

static MANAGER_OVERRIDE: PricingRule = PricingRule {
    name: "manager_override",
    uses_discount: false,
    applies: override_applies,
    price: override_price,
};

static NO_DISCOUNT: PricingRule = PricingRule {
    name: "no_discount",
    uses_discount: false,
    applies: no_discount_applies,
    price: undiscounted_price,
};

static PERCENTAGE: PricingRule = PricingRule {
    name: "percentage",
    uses_discount: true,
    applies: percentage_applies,
    price: percentage_price,
};

static CONTRACT: PricingRule = PricingRule {
    name: "contract",
    uses_discount: true,
    applies: contract_applies,
    price: contract_price,
};

static FALLBACK: PricingRule = PricingRule {
    name: "fallback",
    uses_discount: false,
    applies: always_applies,
    price: undiscounted_price,
};

/// Precedence as data, top-down, first match wins. The order is the
/// contract: a manager override beats everything, an absent discount
/// beats an attached one, and unknown discount kinds price as no-ops.
static RULES: [&PricingRule; 5] = [
    &MANAGER_OVERRIDE,
    &NO_DISCOUNT,
    &PERCENTAGE,
    &CONTRACT,
    &FALLBACK,
];

pub fn resolve_price(item: &CartItem, discount: Option<&Discount>) -> LinePrice {
    // FALLBACK 恆成立，find 不會落空
    let rule = RULES
        .iter()
        .copied()
        .find(|rule| (rule.applies)(item, discount))
        .unwrap_or(&FALLBACK);

    let discount_name = if rule.uses_discount {
        discount.map(|d| d.name.clone())
    } else {
        None
    };

    // 價格一律夾在零以上
    let total = (rule.price)(item, discount).max(Decimal::ZERO);

    tracing::debug!(
        "Resolved line {} via rule '{}': {}",
        item.id,
        rule.name,
        total
    );

    LinePrice {
        total,
        rule: rule.name,
        discount_name,
    }
}

/// Names of the precedence entries, in evaluation order.
pub fn rule_names() -> Vec<&'static str> {
    RULES.iter().map(|rule| rule.name).collect()
}

fn override_applies(item: &CartItem, _discount: Option<&Discount>) -> bool {
    item.pricing.override_amount().is_some()
}

fn override_price(item: &CartItem, _discount: Option<&Discount>) -> Decimal {
    let amount = item.pricing.override_amount().unwrap_or(Decimal::ZERO);
    item.item_total() - amount
}

fn no_discount_applies(_item: &CartItem, discount: Option<&Discount>) -> bool {
    discount.is_none()
}

fn undiscounted_price(item: &CartItem, _discount: Option<&Discount>) -> Decimal {
    item.item_total()
}

fn percentage_applies(_item: &CartItem, discount: Option<&Discount>) -> bool {
    matches!(
        discount.map(|d| &d.kind),
        Some(DiscountKind::Percentage { .. })
    )
}

fn percentage_price(item: &CartItem, discount: Option<&Discount>) -> Decimal {
    match discount.map(|d| &d.kind) {
        Some(DiscountKind::Percentage { percent }) => percent_off(item.item_total(), *percent),
        _ => item.item_total(),
    }
}

fn contract_applies(_item: &CartItem, discount: Option<&Discount>) -> bool {
    matches!(
        discount.map(|d| &d.kind),
        Some(DiscountKind::Contract { .. })
    )
}

fn contract_price(item: &CartItem, discount: Option<&Discount>) -> Decimal {
    let (effect, declared_term) = match discount.map(|d| &d.kind) {
        Some(DiscountKind::Contract { effect, term }) => (effect, *term),
        _ => return item.item_total(),
    };

    match effect {
        ContractEffect::FreeMonths(count) => {
            // 月費：年繳商品以年價除以十二，其餘視同月價
            let monthly_price = if item.product.billing_cycle == BillingCycle::Yearly {
                item.product.price / Decimal::from(12)
            } else {
                item.product.price
            };

            // 免費月數不能超過承諾期長
            let term_months = declared_term
                .map(|t| t.months())
                .unwrap_or_else(|| match item.pricing.term() {
                    Some(TermLength::Six) => 6,
                    _ => 12,
                });
            let free_months = (*count).min(term_months);

            let discount_amount =
                monthly_price * Decimal::from(free_months) * Decimal::from(item.quantity);
            item.item_total() - discount_amount
        }
        ContractEffect::PercentOff(pct) => percent_off(item.item_total(), *pct),
    }
}

fn always_applies(_item: &CartItem, _discount: Option<&Discount>) -> bool {
    true
}

fn percent_off(total: Decimal, percent: Decimal) -> Decimal {
    total * (Decimal::ONE - percent / Decimal::ONE_HUNDRED)
}
